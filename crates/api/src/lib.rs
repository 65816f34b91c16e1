//! HTTP API: axum server, routing and request mapping for the permit
//! backend.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
