use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use pts_core::{DomainError, EmployeeId, PermitId};

use crate::model::{Permit, ReturnToOperation, Signature};

/// Failures raised by permit storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("duplicate permit id {0}")]
    DuplicateId(String),
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::storage(err.to_string())
    }
}

/// Equality predicates a backend can evaluate natively. Substring matching
/// stays in [`crate::filter::PermitFilter`], applied after the query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitQuery {
    pub rto_status: Option<String>,
    pub start_date: Option<String>,
}

impl PermitQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_start_date(start_date: impl Into<String>) -> Self {
        Self {
            rto_status: None,
            start_date: Some(start_date.into()),
        }
    }

    pub fn matches(&self, permit: &Permit) -> bool {
        if let Some(status) = &self.rto_status {
            if permit.return_to_operation.status.as_str() != status {
                return false;
            }
        }
        if let Some(start_date) = &self.start_date {
            if &permit.start_date != start_date {
                return false;
            }
        }
        true
    }
}

/// The two mutations the lifecycle applies to an existing permit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermitUpdate {
    Signature(Signature),
    ReturnToOperation(ReturnToOperation),
}

/// Shared by every backend so a signed or closed record looks identical no
/// matter which store produced it.
pub fn apply_permit_update(permit: &mut Permit, update: PermitUpdate) {
    match update {
        PermitUpdate::Signature(signature) => permit.signature = Some(signature),
        PermitUpdate::ReturnToOperation(rto) => permit.return_to_operation = rto,
    }
}

/// Persistence seam for permits.
///
/// `query` returns records in insertion order; `apply_update` returns the
/// updated record, or `None` when the id is unknown.
#[async_trait]
pub trait PermitStore: Send + Sync {
    async fn create(&self, permit: &Permit) -> Result<(), StoreError>;
    async fn get(&self, id: &PermitId) -> Result<Option<Permit>, StoreError>;
    async fn query(&self, query: &PermitQuery) -> Result<Vec<Permit>, StoreError>;
    async fn apply_update(
        &self,
        id: &PermitId,
        update: PermitUpdate,
    ) -> Result<Option<Permit>, StoreError>;
}

/// Vec-backed store, the default backend. Insertion order is the storage
/// order, which keeps listings stable without a separate sort key.
pub struct InMemoryPermitStore {
    records: RwLock<Vec<Permit>>,
}

impl InMemoryPermitStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// A store preloaded with a few recognizable permits for demos and
    /// manual testing.
    pub fn with_demo_seed() -> Self {
        Self {
            records: RwLock::new(demo_permits()),
        }
    }
}

impl Default for InMemoryPermitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermitStore for InMemoryPermitStore {
    async fn create(&self, permit: &Permit) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("permit store lock poisoned".to_string()))?;
        if records.iter().any(|existing| existing.id == permit.id) {
            return Err(StoreError::DuplicateId(permit.id.as_str().to_string()));
        }
        records.push(permit.clone());
        Ok(())
    }

    async fn get(&self, id: &PermitId) -> Result<Option<Permit>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("permit store lock poisoned".to_string()))?;
        Ok(records.iter().find(|permit| &permit.id == id).cloned())
    }

    async fn query(&self, query: &PermitQuery) -> Result<Vec<Permit>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("permit store lock poisoned".to_string()))?;
        Ok(records
            .iter()
            .filter(|permit| query.matches(permit))
            .cloned()
            .collect())
    }

    async fn apply_update(
        &self,
        id: &PermitId,
        update: PermitUpdate,
    ) -> Result<Option<Permit>, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("permit store lock poisoned".to_string()))?;
        match records.iter_mut().find(|permit| &permit.id == id) {
            Some(permit) => {
                apply_permit_update(permit, update);
                Ok(Some(permit.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Three permits spanning the lifecycle: one pending, one signed, one
/// pending on a later date.
pub fn demo_permits() -> Vec<Permit> {
    let mut first = Permit::from_draft(
        PermitId::new("PTS-251107-001"),
        crate::model::PermitDraft {
            area: "Mantenimiento".to_string(),
            equipment_or_installation: "K7451".to_string(),
            work_description: "Cambio de filtros del compresor".to_string(),
            location: "Sala de compresores".to_string(),
            work_type: "Mecánico".to_string(),
            requester_id: "12345".to_string(),
            requester_name: "Juan Pérez".to_string(),
            supervisor_id: "SUP222".to_string(),
            start_date: "2025-11-07".to_string(),
            end_date: "2025-11-07".to_string(),
            start_time: "08:00".to_string(),
            end_time: "16:00".to_string(),
            ..Default::default()
        },
    );
    first.risk_controls.push(crate::model::RiskControl {
        hazard: "Presión residual en línea".to_string(),
        consequence: "Golpe por proyección de partículas".to_string(),
        required_control: "Despresurizar y ventear antes de abrir".to_string(),
    });

    let mut second = Permit::from_draft(
        PermitId::new("PTS-251107-002"),
        crate::model::PermitDraft {
            area: "Producción".to_string(),
            equipment_or_installation: "R301".to_string(),
            work_description: "Inspección de bridas del reactor".to_string(),
            location: "Unidad de polietileno".to_string(),
            work_type: "Inspección".to_string(),
            requester_id: "54321".to_string(),
            requester_name: "Ana Gómez".to_string(),
            supervisor_id: "SUP222".to_string(),
            start_date: "2025-11-07".to_string(),
            end_date: "2025-11-08".to_string(),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            ..Default::default()
        },
    );
    second.signature = Some(Signature {
        base64_image: "ZmlybWE=".to_string(),
        signer_id: EmployeeId::new("SUP222"),
        signed_at: chrono::Utc::now(),
    });

    let third = Permit::from_draft(
        PermitId::new("PTS-251110-001"),
        crate::model::PermitDraft {
            area: "Control de Calidad".to_string(),
            equipment_or_installation: "MX2233".to_string(),
            work_description: "Calibración del mezclador en línea".to_string(),
            location: "Área de mezcla".to_string(),
            work_type: "Instrumentación".to_string(),
            requester_id: "98765".to_string(),
            requester_name: "Carlos Sanchez".to_string(),
            supervisor_id: "SUP222".to_string(),
            start_date: "2025-11-10".to_string(),
            end_date: "2025-11-10".to_string(),
            start_time: "10:00".to_string(),
            end_time: "14:00".to_string(),
            ..Default::default()
        },
    );

    vec![first, second, third]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PermitDraft, RtoStatus};

    fn test_permit(id: &str, start_date: &str) -> Permit {
        Permit::from_draft(
            PermitId::new(id),
            PermitDraft {
                area: "Mantenimiento".to_string(),
                equipment_or_installation: "K7451".to_string(),
                requester_id: "12345".to_string(),
                supervisor_id: "SUP222".to_string(),
                start_date: start_date.to_string(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let store = InMemoryPermitStore::new();
        let permit = test_permit("PTS-251107-001", "2025-11-07");

        store.create(&permit).await.unwrap();
        let found = store.get(&permit.id).await.unwrap();
        assert_eq!(found, Some(permit));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = InMemoryPermitStore::new();
        let permit = test_permit("PTS-251107-001", "2025-11-07");

        store.create(&permit).await.unwrap();
        let err = store.create(&permit).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateId("PTS-251107-001".to_string())
        );
    }

    #[tokio::test]
    async fn query_filters_by_start_date_and_keeps_insertion_order() {
        let store = InMemoryPermitStore::new();
        store
            .create(&test_permit("PTS-251107-001", "2025-11-07"))
            .await
            .unwrap();
        store
            .create(&test_permit("PTS-251110-001", "2025-11-10"))
            .await
            .unwrap();
        store
            .create(&test_permit("PTS-251107-002", "2025-11-07"))
            .await
            .unwrap();

        let found = store
            .query(&PermitQuery::by_start_date("2025-11-07"))
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PTS-251107-001", "PTS-251107-002"]);
    }

    #[tokio::test]
    async fn query_filters_by_rto_status() {
        let store = InMemoryPermitStore::new();
        let open = test_permit("PTS-251107-001", "2025-11-07");
        let mut closed = test_permit("PTS-251107-002", "2025-11-07");
        closed.return_to_operation.status = RtoStatus::Closed;

        store.create(&open).await.unwrap();
        store.create(&closed).await.unwrap();

        let query = PermitQuery {
            rto_status: Some("CLOSED".to_string()),
            start_date: None,
        };
        let found = store.query(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "PTS-251107-002");
    }

    #[tokio::test]
    async fn apply_update_installs_signature() {
        let store = InMemoryPermitStore::new();
        let permit = test_permit("PTS-251107-001", "2025-11-07");
        store.create(&permit).await.unwrap();

        let signature = Signature {
            base64_image: "aW1n".to_string(),
            signer_id: EmployeeId::new("SUP222"),
            signed_at: chrono::Utc::now(),
        };
        let updated = store
            .apply_update(&permit.id, PermitUpdate::Signature(signature.clone()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.signature, Some(signature));
        // The stored record was mutated, not just the returned copy.
        let fetched = store.get(&permit.id).await.unwrap().unwrap();
        assert!(fetched.is_signed());
    }

    #[tokio::test]
    async fn apply_update_on_unknown_id_returns_none() {
        let store = InMemoryPermitStore::new();
        let result = store
            .apply_update(
                &PermitId::new("PTS-251107-099"),
                PermitUpdate::ReturnToOperation(ReturnToOperation::default()),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn demo_seed_has_one_signed_permit() {
        let store = InMemoryPermitStore::with_demo_seed();
        let all = store.query(&PermitQuery::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().filter(|p| p.is_signed()).count(), 1);
        assert!(all.iter().all(|p| !p.is_terminal()));
    }
}
