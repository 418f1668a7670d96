//! Physical packages and their write-once NVE.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Nve, PackageId, PickingId, VersandError};

/// A physical shipping unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    /// Picking the package was last packed on.
    pub picking: Option<PickingId>,
    /// Assigned once on picking validation, cleared only by unpacking.
    pub nve: Option<Nve>,
    /// Weight of the empty packaging in kg.
    pub tare_weight: Decimal,
    pub contents: Vec<PackageContent>,
}

/// A product quantity inside a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageContent {
    pub product: String,
    pub quantity: Decimal,
    /// Weight of one unit in kg.
    pub unit_weight: Decimal,
}

impl Package {
    pub fn new(id: PackageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            picking: None,
            nve: None,
            tare_weight: Decimal::ZERO,
            contents: Vec::new(),
        }
    }

    pub fn with_tare_weight(mut self, kg: Decimal) -> Self {
        self.tare_weight = kg;
        self
    }

    pub fn add_content(
        mut self,
        product: impl Into<String>,
        quantity: Decimal,
        unit_weight: Decimal,
    ) -> Self {
        self.contents.push(PackageContent {
            product: product.into(),
            quantity,
            unit_weight,
        });
        self
    }

    /// Sum of quantity × unit weight over the contents.
    pub fn net_weight(&self) -> Decimal {
        self.contents
            .iter()
            .map(|c| c.quantity * c.unit_weight)
            .sum()
    }

    /// Net weight plus packaging.
    pub fn gross_weight(&self) -> Decimal {
        self.net_weight() + self.tare_weight
    }
}

/// Persistence for packages.
///
/// [`set_nve`](Self::set_nve) has write-once semantics: it fails when the
/// package already carries an NVE.
pub trait PackageStore: Send + Sync {
    fn insert(&self, package: Package) -> Result<(), VersandError>;

    fn get(&self, id: PackageId) -> Result<Option<Package>, VersandError>;

    fn nve(&self, id: PackageId) -> Result<Option<Nve>, VersandError>;

    fn set_nve(&self, id: PackageId, nve: Nve) -> Result<(), VersandError>;

    /// Clear the NVE, returning the old one.
    fn clear_nve(&self, id: PackageId) -> Result<Option<Nve>, VersandError>;

    fn link_picking(&self, id: PackageId, picking: Option<PickingId>) -> Result<(), VersandError>;

    /// Detach the package from its picking and clear its NVE so that the
    /// next validation assigns a fresh one.
    fn unpack(&self, id: PackageId) -> Result<Option<Nve>, VersandError> {
        let old = self.clear_nve(id)?;
        self.link_picking(id, None)?;
        debug!(package = %id, nve = ?old.as_ref().map(Nve::as_str), "package unpacked");
        Ok(old)
    }
}

/// Process-local [`PackageStore`].
#[derive(Debug, Default)]
pub struct InMemoryPackageStore {
    packages: Mutex<HashMap<PackageId, Package>>,
}

impl InMemoryPackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PackageId, Package>>, VersandError> {
        self.packages
            .lock()
            .map_err(|_| VersandError::Package("package store lock poisoned".into()))
    }

    fn with_package<T>(
        &self,
        id: PackageId,
        f: impl FnOnce(&mut Package) -> Result<T, VersandError>,
    ) -> Result<T, VersandError> {
        let mut packages = self.lock()?;
        let package = packages
            .get_mut(&id)
            .ok_or_else(|| VersandError::Package(format!("{id} does not exist")))?;
        f(package)
    }
}

impl PackageStore for InMemoryPackageStore {
    fn insert(&self, package: Package) -> Result<(), VersandError> {
        let mut packages = self.lock()?;
        if packages.contains_key(&package.id) {
            return Err(VersandError::Package(format!(
                "{} already exists",
                package.id
            )));
        }
        packages.insert(package.id, package);
        Ok(())
    }

    fn get(&self, id: PackageId) -> Result<Option<Package>, VersandError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn nve(&self, id: PackageId) -> Result<Option<Nve>, VersandError> {
        self.with_package(id, |p| Ok(p.nve.clone()))
    }

    fn set_nve(&self, id: PackageId, nve: Nve) -> Result<(), VersandError> {
        self.with_package(id, |p| {
            if let Some(existing) = &p.nve {
                return Err(VersandError::Package(format!(
                    "{id} already has NVE {existing}"
                )));
            }
            p.nve = Some(nve);
            Ok(())
        })
    }

    fn clear_nve(&self, id: PackageId) -> Result<Option<Nve>, VersandError> {
        self.with_package(id, |p| Ok(p.nve.take()))
    }

    fn link_picking(&self, id: PackageId, picking: Option<PickingId>) -> Result<(), VersandError> {
        self.with_package(id, |p| {
            p.picking = picking;
            Ok(())
        })
    }
}
