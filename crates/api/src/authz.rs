//! API-side role gate.
//!
//! Token validity is the middleware's job; this checks what the validated
//! principal may touch. Domain authorization (the signer rule) stays in
//! the lifecycle.

use thiserror::Error;

use pts_auth::Role;

use crate::context::PrincipalContext;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("requires one of roles: {0}")]
    MissingRole(String),
}

/// Check that the principal holds at least one of `allowed`.
pub fn require_any_role(principal: &PrincipalContext, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.iter().any(|role| principal.has_role(role)) {
        return Ok(());
    }

    let wanted = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AuthzError::MissingRole(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pts_core::EmployeeId;

    fn principal(roles: Vec<Role>) -> PrincipalContext {
        PrincipalContext::new(EmployeeId::new("SUP222"), roles)
    }

    #[test]
    fn any_listed_role_passes() {
        let ctx = principal(vec![Role::supervisor()]);
        assert!(require_any_role(&ctx, &[Role::supervisor(), Role::admin()]).is_ok());
    }

    #[test]
    fn missing_role_is_rejected_with_the_wanted_list() {
        let ctx = principal(vec![Role::executor()]);
        let err = require_any_role(&ctx, &[Role::supervisor(), Role::admin()]).unwrap_err();
        assert!(err.to_string().contains("supervisor"));
        assert!(err.to_string().contains("admin"));
    }

    #[test]
    fn no_roles_never_passes() {
        let ctx = principal(Vec::new());
        assert!(require_any_role(&ctx, &[Role::admin()]).is_err());
    }
}
