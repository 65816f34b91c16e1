//! `pts-permits` — the Safe Work Permit domain.
//!
//! Permit document model, the lifecycle state machine
//! (create → sign → close) with its equipment side effects, search
//! filters, and the store abstraction the lifecycle runs against.

pub mod filter;
pub mod lifecycle;
pub mod model;
pub mod store;

pub use filter::PermitFilter;
pub use lifecycle::{ClosePermitRequest, PermitLifecycle, SignPermitRequest};
pub use model::{
    Permit, PermitDraft, ReturnToOperation, RiskControl, RtoStatus, SafetyEquipmentItem, Signature,
};
pub use store::{
    InMemoryPermitStore, PermitQuery, PermitStore, PermitUpdate, StoreError, apply_permit_update,
};
