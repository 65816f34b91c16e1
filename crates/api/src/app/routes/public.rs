use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use pts_core::EquipmentTag;
use pts_permits::{Permit, PermitFilter};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/equipment-status/:tag", get(equipment_status))
}

/// Unauthenticated consultation: the state of an asset and the permits
/// holding it. A cancelled permit still holds the asset; only a closed
/// RTO releases it.
pub async fn equipment_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(tag): Path<String>,
) -> axum::response::Response {
    let tag = EquipmentTag::new(tag.trim());
    let Some(equipment) = services.equipment.get(&tag) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "equipment not found");
    };

    let permits = services
        .lifecycle
        .search(&PermitFilter::by_equipment(tag.as_str()))
        .await;
    let active: Vec<Permit> = permits.into_iter().filter(Permit::is_active).collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "equipment": equipment,
            "activePermits": active,
        })),
    )
        .into_response()
}
