use serde::Deserialize;

use crate::model::Permit;
use crate::store::PermitQuery;

/// Search criteria for permit listings. Every field is optional; blank or
/// whitespace-only values count as absent. Supplied fields combine with AND.
///
/// `status` and `start_date` are exact matches the backend can evaluate,
/// exposed through [`PermitFilter::push_down`]. The text fields are
/// case-insensitive substring matches applied in memory afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermitFilter {
    pub equipment: Option<String>,
    pub requester: Option<String>,
    pub area: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl PermitFilter {
    /// Filter on equipment alone, as the public consultation endpoint does.
    pub fn by_equipment(tag: impl Into<String>) -> Self {
        Self {
            equipment: Some(tag.into()),
            ..Self::default()
        }
    }

    /// The equality part of the filter, for the storage backend. The status
    /// value is uppercased to the stored encoding, so `pending` finds
    /// PENDING permits.
    pub fn push_down(&self) -> PermitQuery {
        PermitQuery {
            rto_status: supplied(&self.status).map(str::to_uppercase),
            start_date: supplied(&self.start_date).map(str::to_string),
        }
    }

    /// The substring part of the filter, applied to each returned record.
    pub fn matches_residual(&self, permit: &Permit) -> bool {
        if let Some(equipment) = supplied(&self.equipment) {
            if !contains_ci(&permit.equipment_or_installation, equipment) {
                return false;
            }
        }
        if let Some(requester) = supplied(&self.requester) {
            let id_match = contains_ci(permit.requester_id.as_str(), requester);
            let name_match = contains_ci(&permit.requester_name, requester);
            if !id_match && !name_match {
                return false;
            }
        }
        if let Some(area) = supplied(&self.area) {
            if !contains_ci(&permit.area, area) {
                return false;
            }
        }
        true
    }
}
