use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/login", post(login))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    if body.employee_id.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "employeeId is required",
        );
    }
    if body.password.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password is required",
        );
    }

    let Some(principal) = services
        .principals
        .authenticate(&body.employee_id, &body.password)
    else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid employee id or password",
        );
    };

    match services
        .token_codec
        .issue(principal.legajo.clone(), principal.roles.clone())
    {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": token,
                "employeeId": principal.legajo,
                "roles": principal.roles,
            })),
        )
            .into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            e.to_string(),
        ),
    }
}
