use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use pts_core::{DomainError, DomainResult, EquipmentTag};

use crate::dcs::DcsGateway;
use crate::model::{Equipment, LockCondition, OperationalState};

/// Registry of plant equipment a permit can gate.
///
/// Lookups return `None` for unknown tags; mutations return `NotFound` so
/// the HTTP boundary can map them. ENABLED/DISABLED transitions are echoed
/// to the DCS gateway; STOPPED/RUNNING are plant-reported and written
/// directly.
pub trait EquipmentRegistry: Send + Sync {
    fn get(&self, tag: &EquipmentTag) -> Option<Equipment>;
    fn list(&self) -> Vec<Equipment>;
    fn set_operational_state(
        &self,
        tag: &EquipmentTag,
        state: OperationalState,
    ) -> DomainResult<Equipment>;
    fn set_lock_condition(
        &self,
        tag: &EquipmentTag,
        condition: LockCondition,
    ) -> DomainResult<Equipment>;
}

/// In-memory registry guarded by a single RwLock.
///
/// Field updates are lookup-then-set; interleavings across concurrent
/// callers are accepted at prototype contention.
pub struct InMemoryEquipmentRegistry {
    inner: RwLock<HashMap<EquipmentTag, Equipment>>,
    gateway: Arc<dyn DcsGateway>,
}

impl InMemoryEquipmentRegistry {
    pub fn new(gateway: Arc<dyn DcsGateway>) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            gateway,
        }
    }

    /// Registry pre-loaded with the plant's asset list.
    pub fn with_plant_seed(gateway: Arc<dyn DcsGateway>) -> Self {
        let registry = Self::new(gateway);
        for equipment in plant_seed() {
            let tag = equipment.tag.clone();
            if let Err(err) = registry.insert(equipment) {
                warn!(%tag, error = %err, "plant seed record dropped");
            }
        }
        registry
    }

    /// Seed or replace a record. Equipment is created out-of-band; this is
    /// the only way records enter the registry.
    pub fn insert(&self, equipment: Equipment) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("equipment registry lock poisoned"))?;
        map.insert(equipment.tag.clone(), equipment);
        Ok(())
    }

    fn update<F>(&self, tag: &EquipmentTag, apply: F) -> DomainResult<Equipment>
    where
        F: FnOnce(&mut Equipment),
    {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("equipment registry lock poisoned"))?;
        let equipment = map.get_mut(tag).ok_or_else(DomainError::not_found)?;
        apply(equipment);
        Ok(equipment.clone())
    }
}

impl EquipmentRegistry for InMemoryEquipmentRegistry {
    fn get(&self, tag: &EquipmentTag) -> Option<Equipment> {
        let map = self.inner.read().ok()?;
        map.get(tag).cloned()
    }

    fn list(&self) -> Vec<Equipment> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut all: Vec<Equipment> = map.values().cloned().collect();
        all.sort_by(|a, b| a.tag.as_str().cmp(b.tag.as_str()));
        all
    }

    fn set_operational_state(
        &self,
        tag: &EquipmentTag,
        state: OperationalState,
    ) -> DomainResult<Equipment> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("equipment registry lock poisoned"))?;
        let equipment = map.get_mut(tag).ok_or_else(DomainError::not_found)?;

        // The gateway only hears about states the backend commands; the
        // plant-reported pair is written through as received.
        match state {
            OperationalState::Enabled => self.gateway.enable(tag),
            OperationalState::Disabled => self.gateway.disable(tag),
            OperationalState::Stopped | OperationalState::Running => {}
        }
        equipment.operational_state = state;
        Ok(equipment.clone())
    }

    fn set_lock_condition(
        &self,
        tag: &EquipmentTag,
        condition: LockCondition,
    ) -> DomainResult<Equipment> {
        self.update(tag, |equipment| equipment.lock_condition = condition)
    }
}

/// The plant's asset list, as provisioned in the prototype environment.
fn plant_seed() -> Vec<Equipment> {
    use LockCondition::Unlocked;
    use OperationalState::{Disabled, Enabled, Running, Stopped};

    vec![
        Equipment::new("K7451", "Compresor de aire de instrumentos", Enabled, Unlocked),
        Equipment::new("F1002A", "Bomba de refrigeración Torre 1", Stopped, Unlocked),
        Equipment::new("R301", "Reactor Principal Polietileno", Running, Unlocked),
        Equipment::new("P5511", "Bomba A de agua caliente", Enabled, Unlocked),
        Equipment::new("P5512", "Bomba B de agua caliente", Enabled, Unlocked),
        Equipment::new("P22401", "Bomba de inyeccion", Stopped, Unlocked),
        Equipment::new("V5533", "Almacenamiento acido", Disabled, Unlocked),
        Equipment::new("V2633", "Almacenamiento solvente", Disabled, Unlocked),
        Equipment::new("MX2233", "Mezclador en linea", Running, Unlocked),
        Equipment::new("V1231", "Reservorio aceite", Enabled, Unlocked),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcs::{DcsCommand, RecordingDcsGateway};

    fn tag(s: &str) -> EquipmentTag {
        EquipmentTag::new(s)
    }

    fn registry() -> (Arc<RecordingDcsGateway>, InMemoryEquipmentRegistry) {
        let gateway = Arc::new(RecordingDcsGateway::new());
        let registry = InMemoryEquipmentRegistry::with_plant_seed(gateway.clone());
        (gateway, registry)
    }

    #[test]
    fn seed_contains_the_plant_assets() {
        let (_, registry) = registry();
        assert_eq!(registry.list().len(), 10);

        let compressor = registry.get(&tag("K7451")).unwrap();
        assert_eq!(compressor.operational_state, OperationalState::Enabled);
        assert_eq!(compressor.lock_condition, LockCondition::Unlocked);
    }

    #[test]
    fn insert_replaces_an_existing_record() {
        let (_, registry) = registry();
        registry
            .insert(Equipment::new(
                "K7451",
                "Compresor de reemplazo",
                OperationalState::Stopped,
                LockCondition::Unlocked,
            ))
            .unwrap();

        let stored = registry.get(&tag("K7451")).unwrap();
        assert_eq!(stored.description, "Compresor de reemplazo");
        assert_eq!(stored.operational_state, OperationalState::Stopped);
        assert_eq!(registry.list().len(), 10);
    }

    #[test]
    fn unknown_tag_reads_as_none_and_mutates_as_not_found() {
        let (gateway, registry) = registry();
        assert!(registry.get(&tag("NOPE")).is_none());
        assert_eq!(
            registry.set_operational_state(&tag("NOPE"), OperationalState::Disabled),
            Err(DomainError::NotFound)
        );
        // No command may leave for a tag the registry does not know.
        assert!(gateway.commands().is_empty());
    }

    #[test]
    fn disable_goes_through_the_gateway() {
        let (gateway, registry) = registry();
        let updated = registry
            .set_operational_state(&tag("K7451"), OperationalState::Disabled)
            .unwrap();

        assert_eq!(updated.operational_state, OperationalState::Disabled);
        assert_eq!(gateway.commands(), vec![DcsCommand::Disable(tag("K7451"))]);
    }

    #[test]
    fn plant_reported_states_skip_the_gateway() {
        let (gateway, registry) = registry();
        registry
            .set_operational_state(&tag("P5511"), OperationalState::Stopped)
            .unwrap();

        assert!(gateway.commands().is_empty());
    }

    #[test]
    fn lock_condition_updates_in_place() {
        let (gateway, registry) = registry();
        let updated = registry
            .set_lock_condition(&tag("R301"), LockCondition::Locked)
            .unwrap();

        assert_eq!(updated.lock_condition, LockCondition::Locked);
        assert!(gateway.commands().is_empty());
    }
}
