//! `pts-directory` — who works here and who may log in.
//!
//! Two seeded read-only directories standing in for the plant's HR
//! systems: the employee roster (badge number to name and sector) and the
//! login principals with their roles.

pub mod employee;
pub mod principal;

pub use employee::{Employee, EmployeeDirectory};
pub use principal::{Principal, PrincipalDirectory};
