use std::collections::HashMap;

use pts_auth::Role;
use pts_core::EmployeeId;

/// An account that can obtain an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub legajo: EmployeeId,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(legajo: impl Into<EmployeeId>, roles: Vec<Role>) -> Self {
        Self {
            legajo: legajo.into(),
            roles,
        }
    }
}

/// The login accounts of the prototype environment.
///
/// Prototype credential rule: the password is the legajo itself. Anything
/// else, or an unknown legajo, fails authentication the same way, so a
/// caller cannot probe which accounts exist.
pub struct PrincipalDirectory {
    principals: HashMap<EmployeeId, Principal>,
}

impl PrincipalDirectory {
    pub fn with_plant_seed() -> Self {
        let principals = plant_principals()
            .into_iter()
            .map(|principal| (principal.legajo.clone(), principal))
            .collect();
        Self { principals }
    }

    pub fn find(&self, legajo: &EmployeeId) -> Option<Principal> {
        self.principals.get(legajo).cloned()
    }

    /// Check credentials; `None` for unknown accounts and bad passwords
    /// alike.
    pub fn authenticate(&self, legajo: &str, password: &str) -> Option<Principal> {
        let legajo = legajo.trim();
        if legajo.is_empty() || password != legajo {
            return None;
        }
        self.find(&EmployeeId::new(legajo))
    }
}

fn plant_principals() -> Vec<Principal> {
    vec![
        Principal::new("VINF011422", vec![Role::issuer()]),
        Principal::new("SUP222", vec![Role::supervisor()]),
        Principal::new("EJE444", vec![Role::executor()]),
        Principal::new("ADM999", vec![Role::admin()]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legajo_as_password_authenticates() {
        let directory = PrincipalDirectory::with_plant_seed();
        let principal = directory.authenticate("SUP222", "SUP222").unwrap();
        assert_eq!(principal.legajo, EmployeeId::new("SUP222"));
        assert_eq!(principal.roles, vec![Role::supervisor()]);
    }

    #[test]
    fn wrong_password_fails() {
        let directory = PrincipalDirectory::with_plant_seed();
        assert!(directory.authenticate("SUP222", "hunter2").is_none());
    }

    #[test]
    fn unknown_account_fails() {
        let directory = PrincipalDirectory::with_plant_seed();
        assert!(directory.authenticate("OPR999", "OPR999").is_none());
    }

    #[test]
    fn each_seed_account_carries_its_role() {
        let directory = PrincipalDirectory::with_plant_seed();
        let cases = [
            ("VINF011422", Role::issuer()),
            ("SUP222", Role::supervisor()),
            ("EJE444", Role::executor()),
            ("ADM999", Role::admin()),
        ];
        for (legajo, role) in cases {
            let principal = directory.find(&EmployeeId::new(legajo)).unwrap();
            assert_eq!(principal.roles, vec![role], "roles of {legajo}");
        }
    }
}
