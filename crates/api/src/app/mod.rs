//! HTTP application wiring (axum router + service graph).
//!
//! Layout:
//! - `services.rs`: service construction and environment configuration
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: API-local request payloads
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services(&jwt_secret).await);
    let auth_state = middleware::AuthState {
        codec: services.token_codec.clone(),
    };

    // Authenticated routes: require a valid bearer token; role gates run
    // inside the handlers.
    let authenticated = routes::authenticated_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(authenticated)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
