//! Warehouses and the lifecycle of their NVE counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::picking::PickingType;
use crate::core::{
    CounterKey, CounterStore, Gln, MissingField, NumberSequence, NvePrefix, VersandError,
    WarehouseId,
};

/// A warehouse with its NVE settings.
///
/// The NVE counter is created the first time both GLN and prefix are set,
/// and its padding follows the GLN length on every later change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    gln: Option<Gln>,
    nve_prefix: Option<NvePrefix>,
    sequence: Option<CounterKey>,
}

/// Complete NVE configuration of a warehouse.
#[derive(Debug, Clone, Copy)]
pub struct NveSettings<'a> {
    pub gln: &'a Gln,
    pub nve_prefix: NvePrefix,
    pub sequence: &'a CounterKey,
}

impl Warehouse {
    pub fn gln(&self) -> Option<&Gln> {
        self.gln.as_ref()
    }

    pub fn nve_prefix(&self) -> Option<NvePrefix> {
        self.nve_prefix
    }

    /// Key of the NVE counter, once created.
    pub fn sequence(&self) -> Option<&CounterKey> {
        self.sequence.as_ref()
    }

    /// GLN, prefix and counter, if all three are present.
    pub fn nve_settings(&self) -> Option<NveSettings<'_>> {
        Some(NveSettings {
            gln: self.gln.as_ref()?,
            nve_prefix: self.nve_prefix?,
            sequence: self.sequence.as_ref()?,
        })
    }

    /// Fail with [`VersandError::ConfigurationMissing`] unless prefix and GLN are set.
    pub fn require_nve_settings(&self) -> Result<(), VersandError> {
        if self.nve_prefix.is_none() {
            return Err(VersandError::ConfigurationMissing {
                warehouse: self.name.clone(),
                field: MissingField::NvePrefix,
            });
        }
        if self.gln.is_none() {
            return Err(VersandError::ConfigurationMissing {
                warehouse: self.name.clone(),
                field: MissingField::Gln,
            });
        }
        Ok(())
    }

    /// Change the GLN. An invalid GLN is rejected before anything is modified.
    pub fn set_gln(
        &mut self,
        gln: Option<&str>,
        counters: &dyn CounterStore,
    ) -> Result<(), VersandError> {
        self.gln = gln.map(Gln::parse).transpose()?;
        self.sync_sequence(counters)
    }

    /// Change the NVE prefix digit.
    pub fn set_nve_prefix(
        &mut self,
        prefix: Option<u8>,
        counters: &dyn CounterStore,
    ) -> Result<(), VersandError> {
        self.nve_prefix = prefix.map(NvePrefix::new).transpose()?;
        self.sync_sequence(counters)
    }

    fn sync_sequence(&mut self, counters: &dyn CounterStore) -> Result<(), VersandError> {
        let (Some(gln), Some(_)) = (&self.gln, self.nve_prefix) else {
            return Ok(());
        };
        let padding = gln.padding();

        if let Some(key) = &self.sequence {
            return counters.set_padding(key, padding);
        }

        let key = CounterKey::Nve(self.id);
        if counters.contains(&key)? {
            // counter survived an earlier removal or a restart
            counters.set_padding(&key, padding)?;
        } else {
            counters.create(key.clone(), NumberSequence::new(padding))?;
            info!(warehouse = %self.name, counter = %key, padding, "NVE sequence created");
        }
        self.sequence = Some(key);
        Ok(())
    }
}

/// Builder for [`Warehouse`].
///
/// ```
/// use versand::core::{InMemoryCounterStore, WarehouseId};
/// use versand::nve::WarehouseBuilder;
///
/// let counters = InMemoryCounterStore::new();
/// let wh = WarehouseBuilder::new(WarehouseId(1), "Mainz")
///     .gln("1234567")
///     .nve_prefix(0)
///     .build(&counters)
///     .unwrap();
/// assert!(wh.nve_settings().is_some());
/// ```
pub struct WarehouseBuilder {
    id: WarehouseId,
    name: String,
    gln: Option<String>,
    nve_prefix: Option<u8>,
}

impl WarehouseBuilder {
    pub fn new(id: WarehouseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gln: None,
            nve_prefix: None,
        }
    }

    pub fn gln(mut self, gln: impl Into<String>) -> Self {
        self.gln = Some(gln.into());
        self
    }

    pub fn nve_prefix(mut self, digit: u8) -> Self {
        self.nve_prefix = Some(digit);
        self
    }

    /// Validate the settings and create the NVE counter if both are given.
    pub fn build(self, counters: &dyn CounterStore) -> Result<Warehouse, VersandError> {
        let gln = self.gln.as_deref().map(Gln::parse).transpose()?;
        let nve_prefix = self.nve_prefix.map(NvePrefix::new).transpose()?;

        let mut warehouse = Warehouse {
            id: self.id,
            name: self.name,
            gln,
            nve_prefix,
            sequence: None,
        };
        warehouse.sync_sequence(counters)?;
        Ok(warehouse)
    }
}

/// What happens to a warehouse's NVE counter when the warehouse is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterRetention {
    /// Keep the counter so a re-created warehouse continues where it left off.
    #[default]
    Keep,
    /// Drop the counter together with the warehouse.
    Remove,
}

/// All known warehouses, looked up by id or by picking type.
#[derive(Debug, Default)]
pub struct Warehouses {
    warehouses: HashMap<WarehouseId, Warehouse>,
}

impl Warehouses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, warehouse: Warehouse) -> Option<Warehouse> {
        self.warehouses.insert(warehouse.id, warehouse)
    }

    pub fn get(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.get(&id)
    }

    pub fn get_mut(&mut self, id: WarehouseId) -> Option<&mut Warehouse> {
        self.warehouses.get_mut(&id)
    }

    /// Warehouse a picking type belongs to.
    pub fn for_picking_type(&self, picking_type: &PickingType) -> Option<&Warehouse> {
        picking_type.warehouse.and_then(|id| self.get(id))
    }

    /// Remove a warehouse, applying `retention` to its NVE counter.
    pub fn remove(
        &mut self,
        id: WarehouseId,
        retention: CounterRetention,
        counters: &dyn CounterStore,
    ) -> Result<Option<Warehouse>, VersandError> {
        let Some(warehouse) = self.warehouses.remove(&id) else {
            return Ok(None);
        };
        if let (CounterRetention::Remove, Some(key)) = (retention, &warehouse.sequence) {
            counters.remove(key)?;
        }
        debug!(warehouse = %warehouse.name, ?retention, "warehouse removed");
        Ok(Some(warehouse))
    }
}
