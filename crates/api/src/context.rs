use pts_auth::Role;
use pts_core::EmployeeId;

/// Principal context for a request (authenticated identity + roles).
///
/// Inserted by the authentication middleware; present on every route
/// behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    legajo: EmployeeId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(legajo: EmployeeId, roles: Vec<Role>) -> Self {
        Self { legajo, roles }
    }

    pub fn legajo(&self) -> &EmployeeId {
        &self.legajo
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}
