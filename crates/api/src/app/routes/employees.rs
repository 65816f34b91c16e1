use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use pts_core::EmployeeId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:legajo", get(get_employee))
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(legajo): Path<String>,
) -> axum::response::Response {
    match services.employees.find(&EmployeeId::new(legajo.trim())) {
        Some(employee) => (StatusCode::OK, Json(employee)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "employee not found"),
    }
}
