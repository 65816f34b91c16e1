use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use pts_auth::Role;
use pts_core::EquipmentTag;
use pts_equipment::OperationalState;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/update", post(update_state))
}

/// Plant-side state report simulation. The report runs through the same
/// registry transition as the equipment API, so ENABLED/DISABLED still
/// echo to the DCS gateway.
pub async fn update_state(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::DcsUpdateRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require_any_role(&principal, &[Role::admin()]) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let state: OperationalState = match body.state.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let tag = EquipmentTag::new(body.tag.trim());
    tracing::info!(
        tag = %tag,
        state = %state,
        reported_by = %principal.legajo(),
        "DCS state report received"
    );

    match services.equipment.set_operational_state(&tag, state) {
        Ok(equipment) => (StatusCode::OK, Json(equipment)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
