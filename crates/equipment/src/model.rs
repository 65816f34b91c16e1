use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use pts_core::{DomainError, EquipmentTag};

/// Operational state of a plant asset as the DCS reports it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalState {
    Enabled,
    Disabled,
    Stopped,
    Running,
}

impl OperationalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
            Self::Stopped => "STOPPED",
            Self::Running => "RUNNING",
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationalState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ENABLED" => Ok(Self::Enabled),
            "DISABLED" => Ok(Self::Disabled),
            "STOPPED" => Ok(Self::Stopped),
            "RUNNING" => Ok(Self::Running),
            other => Err(DomainError::validation(format!(
                "invalid operational state: {other:?}"
            ))),
        }
    }
}

/// Lock condition applied while a permit gates work on the asset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockCondition {
    Locked,
    Unlocked,
}

impl LockCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
        }
    }
}

impl fmt::Display for LockCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOCKED" => Ok(Self::Locked),
            "UNLOCKED" => Ok(Self::Unlocked),
            other => Err(DomainError::validation(format!(
                "invalid lock condition: {other:?}"
            ))),
        }
    }
}

/// A physical plant asset a permit can gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub tag: EquipmentTag,
    pub description: String,
    pub operational_state: OperationalState,
    pub lock_condition: LockCondition,
}

impl Equipment {
    pub fn new(
        tag: impl Into<EquipmentTag>,
        description: impl Into<String>,
        operational_state: OperationalState,
        lock_condition: LockCondition,
    ) -> Self {
        Self {
            tag: tag.into(),
            description: description.into(),
            operational_state,
            lock_condition,
        }
    }
}
