use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use pts_core::PermitId;
use pts_permits::{ClosePermitRequest, PermitDraft, PermitFilter, SignPermitRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(search_permits).post(create_permit))
        .route("/last-sequence", get(last_sequence))
        .route("/sign", put(sign_permit))
        .route("/close", put(close_permit))
        .route("/:id", get(get_permit))
}

pub async fn create_permit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<PermitDraft>,
) -> axum::response::Response {
    match services.lifecycle.create(draft).await {
        Ok(permit) => (StatusCode::CREATED, Json(permit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn search_permits(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<PermitFilter>,
) -> axum::response::Response {
    let permits = services.lifecycle.search(&filter).await;
    (StatusCode::OK, Json(permits)).into_response()
}

pub async fn get_permit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.lifecycle.get(&PermitId::new(id)).await {
        Ok(permit) => (StatusCode::OK, Json(permit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn sign_permit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<SignPermitRequest>,
) -> axum::response::Response {
    match services.lifecycle.sign(request).await {
        Ok(permit) => (StatusCode::OK, Json(permit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn close_permit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<ClosePermitRequest>,
) -> axum::response::Response {
    match services.lifecycle.close(request).await {
        Ok(permit) => (StatusCode::OK, Json(permit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Daily id sequence lookup for the issuing UI. A store failure answers
/// 200 with the -1 sentinel instead of an error status.
pub async fn last_sequence(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::LastSequenceParams>,
) -> axum::response::Response {
    let last = match services.lifecycle.last_sequence(&params.start_date).await {
        Ok(sequence) => i64::from(sequence),
        Err(err) => {
            tracing::warn!(error = %err, "last-sequence degraded to sentinel");
            -1
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "startDate": params.start_date,
            "lastSequence": last,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::app::services::AppServices;
    use pts_auth::Hs256TokenCodec;
    use pts_auth::token::DEFAULT_TOKEN_TTL_SECONDS;
    use pts_core::EmployeeId;
    use pts_directory::{EmployeeDirectory, PrincipalDirectory};
    use pts_equipment::{InMemoryEquipmentRegistry, LoggingDcsGateway};
    use pts_permits::{Permit, PermitLifecycle, PermitQuery, PermitStore, PermitUpdate, StoreError};

    struct FailingStore;

    #[async_trait]
    impl PermitStore for FailingStore {
        async fn create(&self, _permit: &Permit) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }

        async fn get(&self, _id: &PermitId) -> Result<Option<Permit>, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }

        async fn query(&self, _query: &PermitQuery) -> Result<Vec<Permit>, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }

        async fn apply_update(
            &self,
            _id: &PermitId,
            _update: PermitUpdate,
        ) -> Result<Option<Permit>, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }
    }

    fn services_with_failing_store() -> Arc<AppServices> {
        let registry =
            Arc::new(InMemoryEquipmentRegistry::with_plant_seed(Arc::new(
                LoggingDcsGateway::new(),
            )));
        Arc::new(AppServices {
            lifecycle: PermitLifecycle::new(
                Arc::new(FailingStore),
                registry.clone(),
                EmployeeId::new("SUP222"),
            ),
            equipment: registry,
            employees: EmployeeDirectory::with_plant_seed(),
            principals: PrincipalDirectory::with_plant_seed(),
            token_codec: Arc::new(Hs256TokenCodec::new("test-secret", DEFAULT_TOKEN_TTL_SECONDS)),
        })
    }

    #[tokio::test]
    async fn last_sequence_answers_the_sentinel_when_the_store_fails() {
        let services = services_with_failing_store();
        let params = dto::LastSequenceParams {
            start_date: "2025-11-07".to_string(),
        };

        let response = last_sequence(Extension(services), Query(params)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["startDate"], "2025-11-07");
        assert_eq!(body["lastSequence"], -1);
    }
}
