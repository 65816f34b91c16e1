use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use pts_core::{DomainError, DomainResult, EmployeeId, EquipmentTag, PermitId, parse_start_date};
use pts_equipment::{EquipmentRegistry, LockCondition, OperationalState};

use crate::filter::PermitFilter;
use crate::model::{Permit, PermitDraft, ReturnToOperation, RtoStatus, Signature};
use crate::store::{PermitQuery, PermitStore, PermitUpdate};

/// Supervisor sign-off on an existing permit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignPermitRequest {
    pub permit_id: String,
    pub signer_id: String,
    pub signature_image: String,
}

/// Return-to-operation closure of a signed permit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClosePermitRequest {
    pub permit_id: String,
    pub closed_by: String,
    pub remarks: Option<String>,
}

/// Coordinates permit transitions against the store and the plant registry.
///
/// Equipment side effects are best-effort: a registry failure is logged and
/// never blocks the permit transition that triggered it. Store failures do
/// block, except for search, which degrades to an empty result.
pub struct PermitLifecycle {
    store: Arc<dyn PermitStore>,
    equipment: Arc<dyn EquipmentRegistry>,
    override_supervisor: EmployeeId,
}

impl PermitLifecycle {
    pub fn new(
        store: Arc<dyn PermitStore>,
        equipment: Arc<dyn EquipmentRegistry>,
        override_supervisor: EmployeeId,
    ) -> Self {
        Self {
            store,
            equipment,
            override_supervisor,
        }
    }

    /// Validate a draft, take its equipment out of service, assign the next
    /// id for the start date, and persist the permit.
    pub async fn create(&self, draft: PermitDraft) -> DomainResult<Permit> {
        required_field(&draft.requester_id, "requesterId")?;
        required_field(&draft.supervisor_id, "supervisorId")?;
        let start_date = parse_start_date(&draft.start_date)?;

        self.lock_equipment(&draft.equipment_or_installation);

        // Two creates for the same date can read the same maximum and
        // collide; the store's duplicate-id check surfaces the loser as a
        // storage failure.
        let sequence = self.highest_sequence(draft.start_date.trim()).await? + 1;
        let id = PermitId::generate(start_date, sequence);

        let permit = Permit::from_draft(id, draft);
        self.store.create(&permit).await?;
        info!(permit_id = %permit.id, start_date = %permit.start_date, "permit created");
        Ok(permit)
    }

    pub async fn get(&self, id: &PermitId) -> DomainResult<Permit> {
        let permit = self.store.get(id).await?;
        permit.ok_or_else(DomainError::not_found)
    }

    /// Equality predicates go to the store; substring criteria run here over
    /// what comes back. A store failure degrades to an empty listing.
    pub async fn search(&self, filter: &PermitFilter) -> Vec<Permit> {
        let records = match self.store.query(&filter.push_down()).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "permit search degraded to empty result");
                return Vec::new();
            }
        };
        records
            .into_iter()
            .filter(|permit| filter.matches_residual(permit))
            .collect()
    }

    /// Highest sequence already issued for a start date, 0 when none.
    pub async fn last_sequence(&self, start_date: &str) -> DomainResult<u32> {
        self.highest_sequence(start_date.trim()).await
    }

    /// Record the supervisor signature and take the equipment out of
    /// service for the duration of the work.
    pub async fn sign(&self, request: SignPermitRequest) -> DomainResult<Permit> {
        let permit_id = required_field(&request.permit_id, "permitId")?;
        let signer_id = required_field(&request.signer_id, "signerId")?;
        required_field(&request.signature_image, "signatureImage")?;

        let id = PermitId::new(permit_id);
        let signer = EmployeeId::new(signer_id);

        let permit = self.get(&id).await?;
        self.ensure_authorized_signer(&permit, &signer)?;
        permit.ensure_can_sign()?;

        let signature = Signature {
            base64_image: request.signature_image,
            signer_id: signer.clone(),
            signed_at: Utc::now(),
        };
        let updated = self
            .store
            .apply_update(&id, PermitUpdate::Signature(signature))
            .await?
            .ok_or_else(DomainError::not_found)?;

        self.disable_equipment(&updated.equipment_or_installation);
        info!(permit_id = %updated.id, signer_id = %signer, "permit signed");
        Ok(updated)
    }

    /// Close the permit and hand its equipment back to operation. The lock
    /// condition stays as-is; clearing it is a separate plant decision.
    pub async fn close(&self, request: ClosePermitRequest) -> DomainResult<Permit> {
        let permit_id = required_field(&request.permit_id, "permitId")?;
        let closed_by = required_field(&request.closed_by, "closedBy")?;

        let id = PermitId::new(permit_id);
        let permit = self.get(&id).await?;
        permit.ensure_can_close()?;

        let rto = ReturnToOperation {
            status: RtoStatus::Closed,
            closed_by: Some(EmployeeId::new(closed_by)),
            remarks: request.remarks,
            closed_at: Some(Utc::now()),
        };
        let updated = self
            .store
            .apply_update(&id, PermitUpdate::ReturnToOperation(rto))
            .await?
            .ok_or_else(DomainError::not_found)?;

        self.release_equipment(&updated.equipment_or_installation);
        info!(permit_id = %updated.id, closed_by = %closed_by, "permit closed");
        Ok(updated)
    }

    fn ensure_authorized_signer(&self, permit: &Permit, signer: &EmployeeId) -> DomainResult<()> {
        if signer == &permit.supervisor_id || signer == &self.override_supervisor {
            return Ok(());
        }
        Err(DomainError::unauthorized(
            "signer is neither the assigned supervisor nor the universal supervisor",
        ))
    }

    async fn highest_sequence(&self, start_date: &str) -> DomainResult<u32> {
        let records = self
            .store
            .query(&PermitQuery::by_start_date(start_date))
            .await?;
        Ok(records
            .iter()
            .filter_map(|permit| permit.id.sequence())
            .max()
            .unwrap_or(0))
    }

    /// Creation side effect: disable the equipment and flag it locked.
    fn lock_equipment(&self, tag: &str) {
        let Some(tag) = equipment_tag(tag) else {
            return;
        };
        if let Err(err) = self
            .equipment
            .set_operational_state(&tag, OperationalState::Disabled)
        {
            warn!(%tag, error = %err, "equipment disable on permit creation failed");
        }
        if let Err(err) = self
            .equipment
            .set_lock_condition(&tag, LockCondition::Locked)
        {
            warn!(%tag, error = %err, "equipment lock on permit creation failed");
        }
    }

    /// Sign side effect: confirm the equipment is out of service.
    fn disable_equipment(&self, tag: &str) {
        let Some(tag) = equipment_tag(tag) else {
            return;
        };
        if let Err(err) = self
            .equipment
            .set_operational_state(&tag, OperationalState::Disabled)
        {
            warn!(%tag, error = %err, "equipment disable on permit signing failed");
        }
    }

    /// Close side effect: operational state only, the lock stays put.
    fn release_equipment(&self, tag: &str) {
        let Some(tag) = equipment_tag(tag) else {
            return;
        };
        if let Err(err) = self
            .equipment
            .set_operational_state(&tag, OperationalState::Enabled)
        {
            warn!(%tag, error = %err, "equipment release on permit close failed");
        }
    }
}

fn required_field<'a>(value: &'a str, field: &str) -> DomainResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn equipment_tag(raw: &str) -> Option<EquipmentTag> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(EquipmentTag::new(trimmed))
}
