use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use pts_auth::Role;
use pts_core::EquipmentTag;
use pts_equipment::{LockCondition, OperationalState};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_equipment))
        .route("/:tag", get(get_equipment))
        .route("/:tag/operational-state", put(set_operational_state))
        .route("/:tag/lock-condition", put(set_lock_condition))
}

pub async fn list_equipment(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (StatusCode::OK, Json(services.equipment.list())).into_response()
}

pub async fn get_equipment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(tag): Path<String>,
) -> axum::response::Response {
    match services.equipment.get(&EquipmentTag::new(tag.trim())) {
        Some(equipment) => (StatusCode::OK, Json(equipment)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "equipment not found"),
    }
}

pub async fn set_operational_state(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(tag): Path<String>,
    Json(body): Json<dto::OperationalStateRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require_any_role(&principal, &[Role::supervisor(), Role::admin()])
    {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let state: OperationalState = match body.state.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .equipment
        .set_operational_state(&EquipmentTag::new(tag.trim()), state)
    {
        Ok(equipment) => (StatusCode::OK, Json(equipment)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_lock_condition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(tag): Path<String>,
    Json(body): Json<dto::LockConditionRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require_any_role(&principal, &[Role::supervisor(), Role::admin()])
    {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let condition: LockCondition = match body.condition.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .equipment
        .set_lock_condition(&EquipmentTag::new(tag.trim()), condition)
    {
        Ok(equipment) => (StatusCode::OK, Json(equipment)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
