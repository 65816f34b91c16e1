//! API-local request payloads.
//!
//! Permit bodies and search filters are the domain wire types themselves
//! (`PermitDraft`, `SignPermitRequest`, `ClosePermitRequest`,
//! `PermitFilter`); only payloads with no domain counterpart live here.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub employee_id: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationalStateRequest {
    pub state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockConditionRequest {
    pub condition: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DcsUpdateRequest {
    pub tag: String,
    pub state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastSequenceParams {
    pub start_date: String,
}
