use axum::Router;

pub mod auth;
pub mod dcs;
pub mod employees;
pub mod equipment;
pub mod permits;
pub mod public;
pub mod reports;
pub mod system;

/// Routes reachable without a token. The permit CRUD itself is public;
/// the plant kiosks that file permits carry no credentials.
pub fn public_router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/permits", permits::router())
        .nest("/public", public::router())
}

/// Routes behind bearer authentication.
pub fn authenticated_router() -> Router {
    Router::new()
        .nest("/equipment", equipment::router())
        .nest("/employees", employees::router())
        .nest("/reports", reports::router())
        .nest("/dcs", dcs::router())
}
