use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pts_core::{DomainError, DomainResult, EmployeeId, PermitId};

/// Return-to-operation status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RtoStatus {
    #[default]
    Pending,
    Closed,
    Cancelled,
}

impl RtoStatus {
    /// CLOSED and CANCELLED are terminal: no further sign or close succeeds.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// One row of the permit's risk analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskControl {
    pub hazard: String,
    pub consequence: String,
    pub required_control: String,
}

/// One row of the required/provided safety equipment checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyEquipmentItem {
    pub item: String,
    pub is_required: bool,
    pub is_provided: bool,
    pub remark: String,
}

/// Supervisor signature captured at sign time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub base64_image: String,
    pub signer_id: EmployeeId,
    pub signed_at: DateTime<Utc>,
}

/// Return-to-operation block: how and when the permit released its
/// equipment back to normal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReturnToOperation {
    pub status: RtoStatus,
    pub closed_by: Option<EmployeeId>,
    pub remarks: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// The Safe Work Permit document (aggregate root).
///
/// Field names mirror the wire and persisted JSON; the stored record is
/// exactly this shape, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: PermitId,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub equipment_or_installation: String,
    #[serde(default)]
    pub work_description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub detailed_task: String,
    #[serde(default)]
    pub work_type: String,
    pub requester_id: EmployeeId,
    #[serde(default)]
    pub requester_name: String,
    pub supervisor_id: EmployeeId,
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub risk_controls: Vec<RiskControl>,
    #[serde(default)]
    pub safety_equipment: Vec<SafetyEquipmentItem>,
    /// Present iff the permit has been signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default)]
    pub return_to_operation: ReturnToOperation,
}

/// Creation input: a permit record before id assignment.
///
/// Identity and schedule fields arrive as free-form strings; the lifecycle
/// validates them before a `Permit` exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermitDraft {
    pub area: String,
    pub equipment_or_installation: String,
    pub work_description: String,
    pub location: String,
    pub detailed_task: String,
    pub work_type: String,
    pub requester_id: String,
    pub requester_name: String,
    pub supervisor_id: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub risk_controls: Vec<RiskControl>,
    pub safety_equipment: Vec<SafetyEquipmentItem>,
}

impl Permit {
    /// Materialize a validated draft under its assigned id: unsigned, RTO
    /// pending.
    pub fn from_draft(id: PermitId, draft: PermitDraft) -> Self {
        Self {
            id,
            area: draft.area,
            equipment_or_installation: draft.equipment_or_installation,
            work_description: draft.work_description,
            location: draft.location,
            detailed_task: draft.detailed_task,
            work_type: draft.work_type,
            requester_id: EmployeeId::new(draft.requester_id.trim()),
            requester_name: draft.requester_name,
            supervisor_id: EmployeeId::new(draft.supervisor_id.trim()),
            start_date: draft.start_date.trim().to_string(),
            end_date: draft.end_date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            risk_controls: draft.risk_controls,
            safety_equipment: draft.safety_equipment,
            signature: None,
            return_to_operation: ReturnToOperation::default(),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Whether the RTO status is terminal (closed or cancelled).
    pub fn is_terminal(&self) -> bool {
        self.return_to_operation.status.is_terminal()
    }

    /// Active permits still gate their equipment: everything not CLOSED.
    pub fn is_active(&self) -> bool {
        self.return_to_operation.status != RtoStatus::Closed
    }

    pub fn ensure_can_sign(&self) -> DomainResult<()> {
        if self.is_terminal() {
            return Err(DomainError::conflict("permit is already closed or cancelled"));
        }
        if self.is_signed() {
            return Err(DomainError::conflict("permit is already signed"));
        }
        Ok(())
    }

    pub fn ensure_can_close(&self) -> DomainResult<()> {
        if self.is_terminal() {
            return Err(DomainError::conflict("permit is already closed or cancelled"));
        }
        if !self.is_signed() {
            return Err(DomainError::conflict("permit must be signed before closing"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draft() -> PermitDraft {
        PermitDraft {
            area: "Mantenimiento".to_string(),
            equipment_or_installation: "K7451".to_string(),
            work_description: "Cambio de filtros".to_string(),
            requester_id: "12345".to_string(),
            requester_name: "Juan Pérez".to_string(),
            supervisor_id: "SUP222".to_string(),
            start_date: "2025-11-07".to_string(),
            ..PermitDraft::default()
        }
    }

    fn test_permit() -> Permit {
        Permit::from_draft(PermitId::new("PTS-251107-001"), test_draft())
    }

    fn test_signature() -> Signature {
        Signature {
            base64_image: "aW1n".to_string(),
            signer_id: EmployeeId::new("SUP222"),
            signed_at: Utc::now(),
        }
    }

    #[test]
    fn draft_materializes_unsigned_and_pending() {
        let permit = test_permit();
        assert!(!permit.is_signed());
        assert!(!permit.is_terminal());
        assert!(permit.is_active());
        assert_eq!(permit.return_to_operation.status, RtoStatus::Pending);
        assert_eq!(permit.requester_id, EmployeeId::new("12345"));
    }

    #[test]
    fn unsigned_permit_cannot_close() {
        let err = test_permit().ensure_can_close().unwrap_err();
        match err {
            DomainError::Conflict(msg) if msg.contains("signed before closing") => {}
            _ => panic!("Expected conflict for closing unsigned permit"),
        }
    }

    #[test]
    fn signed_permit_cannot_sign_again() {
        let mut permit = test_permit();
        permit.signature = Some(test_signature());

        let err = permit.ensure_can_sign().unwrap_err();
        match err {
            DomainError::Conflict(msg) if msg.contains("already signed") => {}
            _ => panic!("Expected conflict for double signing"),
        }
    }

    #[test]
    fn terminal_permit_rejects_both_transitions() {
        for status in [RtoStatus::Closed, RtoStatus::Cancelled] {
            let mut permit = test_permit();
            permit.signature = Some(test_signature());
            permit.return_to_operation.status = status;

            assert!(matches!(
                permit.ensure_can_sign(),
                Err(DomainError::Conflict(_))
            ));
            assert!(matches!(
                permit.ensure_can_close(),
                Err(DomainError::Conflict(_))
            ));
        }
    }

    #[test]
    fn cancelled_permit_still_counts_as_active() {
        let mut permit = test_permit();
        permit.return_to_operation.status = RtoStatus::Cancelled;
        assert!(permit.is_active());

        permit.return_to_operation.status = RtoStatus::Closed;
        assert!(!permit.is_active());
    }

    #[test]
    fn wire_shape_is_camel_case_with_screaming_statuses() {
        let mut permit = test_permit();
        permit.risk_controls.push(RiskControl {
            hazard: "Presión residual".to_string(),
            consequence: "Golpe por proyección".to_string(),
            required_control: "Despresurizar y ventear".to_string(),
        });

        let json = serde_json::to_value(&permit).unwrap();
        assert_eq!(json["id"], "PTS-251107-001");
        assert_eq!(json["equipmentOrInstallation"], "K7451");
        assert_eq!(json["requesterId"], "12345");
        assert_eq!(json["returnToOperation"]["status"], "PENDING");
        assert_eq!(json["riskControls"][0]["requiredControl"], "Despresurizar y ventear");
        // Unsigned permits carry no signature key at all.
        assert!(json.get("signature").is_none());
    }

    #[test]
    fn stored_records_without_rto_block_default_to_pending() {
        let json = serde_json::json!({
            "id": "PTS-251107-001",
            "requesterId": "12345",
            "supervisorId": "SUP222",
            "startDate": "2025-11-07"
        });

        let permit: Permit = serde_json::from_value(json).unwrap();
        assert_eq!(permit.return_to_operation.status, RtoStatus::Pending);
        assert!(permit.signature.is_none());
        assert_eq!(permit.area, "");
    }
}
