use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for endpoint gating.
///
/// Roles are opaque strings at this layer; the well-known plant roles get
/// named constructors so call sites cannot drift on spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Permit issuer (emisor): raises new work permits.
    pub fn issuer() -> Self {
        Self(Cow::Borrowed("issuer"))
    }

    /// Field supervisor: signs permits and operates equipment state.
    pub fn supervisor() -> Self {
        Self(Cow::Borrowed("supervisor"))
    }

    /// Work executor (ejecutante): performs the permitted work.
    pub fn executor() -> Self {
        Self(Cow::Borrowed("executor"))
    }

    /// System administrator.
    pub fn admin() -> Self {
        Self(Cow::Borrowed("admin"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
