use serde::{Deserialize, Serialize};

use pts_core::EmployeeId;

use crate::Role;

/// JWT claims model.
///
/// This is the full set of claims a PTS access token carries once decoded
/// and verified by [`crate::Hs256TokenCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated employee's badge number (legajo).
    pub sub: EmployeeId,

    /// Roles granted to the principal.
    pub roles: Vec<Role>,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiration (Unix timestamp, seconds).
    pub exp: i64,
}

impl JwtClaims {
    /// Whether any of the principal's roles matches `role`.
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
