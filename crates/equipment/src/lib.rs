//! `pts-equipment` — plant equipment registry and DCS gateway boundary.
//!
//! Equipment records are seeded out-of-band and mutated only through the
//! registry; permit operations touch them as best-effort side effects.

pub mod dcs;
pub mod model;
pub mod registry;

pub use dcs::{DcsCommand, DcsGateway, LoggingDcsGateway, RecordingDcsGateway};
pub use model::{Equipment, LockCondition, OperationalState};
pub use registry::{EquipmentRegistry, InMemoryEquipmentRegistry};
