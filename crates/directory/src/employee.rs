use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pts_core::EmployeeId;

/// One roster entry, as HR reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub legajo: EmployeeId,
    pub full_name: String,
    pub sector: String,
}

impl Employee {
    pub fn new(
        legajo: impl Into<EmployeeId>,
        full_name: impl Into<String>,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            legajo: legajo.into(),
            full_name: full_name.into(),
            sector: sector.into(),
        }
    }
}

/// Read-only lookup over the plant roster. The permit forms autofill
/// requester name and sector from here.
pub struct EmployeeDirectory {
    employees: HashMap<EmployeeId, Employee>,
}

impl EmployeeDirectory {
    /// The roster the prototype environment ships with.
    pub fn with_plant_seed() -> Self {
        let employees = plant_roster()
            .into_iter()
            .map(|employee| (employee.legajo.clone(), employee))
            .collect();
        Self { employees }
    }

    pub fn find(&self, legajo: &EmployeeId) -> Option<Employee> {
        self.employees.get(legajo).cloned()
    }
}

fn plant_roster() -> Vec<Employee> {
    vec![
        Employee::new("12345", "Juan Pérez", "Operaciones Planta"),
        Employee::new("54321", "Ana Gómez", "Mantenimiento Eléctrico"),
        Employee::new("98765", "Carlos Sanchez", "Seguridad e Higiene"),
        Employee::new("11111", "María Rodriguez", "Control de Calidad"),
    ]
}
