//! `pts-auth` — authentication boundary.
//!
//! Claims model, role identifiers and the HS256 token codec. This crate is
//! intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod roles;
pub mod token;

pub use claims::JwtClaims;
pub use roles::Role;
pub use token::{Hs256TokenCodec, TokenError};
