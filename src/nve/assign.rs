//! NVE assignment for the packages of a picking.

use tracing::{debug, info, warn};

use super::package::PackageStore;
use super::picking::Picking;
use super::warehouse::Warehouse;
use crate::core::{CounterStore, Nve, PackageId, VersandError};

/// Result of one assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Packages that received an NVE in this run.
    pub assigned: Vec<(PackageId, Nve)>,
    /// Packages that already carried an NVE and were left untouched.
    pub already_assigned: Vec<PackageId>,
}

impl AssignmentReport {
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty() && self.already_assigned.is_empty()
    }
}

/// Assign an NVE to every result package of `picking` that has none yet.
///
/// Returns an empty report without allocating anything when the warehouse
/// lacks GLN, prefix or counter. Packages that already carry an NVE are
/// skipped, so repeated runs are safe.
///
/// All numbers are allocated and composed before the first package is
/// written. A failing run leaves every package as it was; the numbers it
/// allocated stay consumed.
pub fn assign_all(
    picking: &Picking,
    warehouse: &Warehouse,
    counters: &dyn CounterStore,
    packages: &dyn PackageStore,
) -> Result<AssignmentReport, VersandError> {
    let mut report = AssignmentReport::default();

    let Some(settings) = warehouse.nve_settings() else {
        debug!(picking = %picking.name, warehouse = %warehouse.name, "NVE settings incomplete, nothing assigned");
        return Ok(report);
    };
    if !counters.contains(settings.sequence)? {
        debug!(picking = %picking.name, counter = %settings.sequence, "NVE counter missing, nothing assigned");
        return Ok(report);
    }

    let mut pending = Vec::new();
    for package in picking.result_packages() {
        if packages.nve(package)?.is_some() {
            report.already_assigned.push(package);
            continue;
        }

        let issued = counters.allocate(settings.sequence)?;
        if !issued.fits() {
            return Err(VersandError::Sequence(format!(
                "counter '{}' exhausted: {} does not fit into {} digits",
                settings.sequence, issued.value, issued.padding
            )));
        }
        let nve = Nve::compose(settings.nve_prefix, settings.gln, &issued.digits())?;
        pending.push((package, nve, issued.value));
    }

    for (package, nve, value) in pending {
        match packages.set_nve(package, nve.clone()) {
            Ok(()) => {
                info!(picking = %picking.name, %package, nve = %nve, warehouse = %warehouse.name, "NVE assigned");
                report.assigned.push((package, nve));
            }
            Err(VersandError::Package(reason)) if packages.nve(package)?.is_some() => {
                // a concurrent validation got there first; the allocated number stays burnt
                warn!(%package, burnt = value, %reason, "package received an NVE concurrently");
                report.already_assigned.push(package);
            }
            Err(e) => {
                withdraw(&report, packages);
                return Err(e);
            }
        }
    }

    Ok(report)
}

/// Clear the NVEs a run has written so far.
fn withdraw(report: &AssignmentReport, packages: &dyn PackageStore) {
    for (package, nve) in &report.assigned {
        if let Err(e) = packages.clear_nve(*package) {
            warn!(%package, nve = %nve, error = %e, "could not withdraw NVE");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::core::{
        CounterKey, InMemoryCounterStore, NumberSequence, PickingId, PickingTypeId, WarehouseId,
    };
    use crate::nve::package::{InMemoryPackageStore, Package};
    use crate::nve::picking::PickingType;
    use crate::nve::warehouse::WarehouseBuilder;

    struct Fixture {
        counters: InMemoryCounterStore,
        packages: InMemoryPackageStore,
        warehouse: Warehouse,
        picking: Picking,
    }

    fn fixture(package_count: u64) -> Fixture {
        let counters = InMemoryCounterStore::new();
        let packages = InMemoryPackageStore::new();
        let warehouse = WarehouseBuilder::new(WarehouseId(1), "Mainz")
            .gln("1234567")
            .nve_prefix(0)
            .build(&counters)
            .unwrap();
        let mut picking = Picking::new(
            PickingId(1),
            "WH/OUT/00001",
            PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
        );
        for i in 1..=package_count {
            packages
                .insert(Package::new(PackageId(i), format!("PACK{i:04}")))
                .unwrap();
            let line = picking.add_move_line("Akku", dec!(1));
            picking.put_in_pack(line, PackageId(i), &packages).unwrap();
        }
        Fixture {
            counters,
            packages,
            warehouse,
            picking,
        }
    }

    #[test]
    fn assigns_in_package_order() {
        let f = fixture(2);
        let report = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        let nves: Vec<&str> = report.assigned.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(nves, vec!["012345670000000015", "012345670000000022"]);
        assert!(report.already_assigned.is_empty());
    }

    #[test]
    fn second_run_changes_nothing() {
        let f = fixture(3);
        assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        let key = f.warehouse.sequence().unwrap();
        let next_before = f.counters.get(key).unwrap().unwrap().next_raw();

        let report = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        assert!(report.assigned.is_empty());
        assert_eq!(report.already_assigned.len(), 3);
        assert_eq!(f.counters.get(key).unwrap().unwrap().next_raw(), next_before);
    }

    #[test]
    fn incomplete_settings_is_a_no_op() {
        let f = fixture(1);
        let bare = WarehouseBuilder::new(WarehouseId(2), "Leer")
            .gln("1234567")
            .build(&f.counters)
            .unwrap();
        let report = assign_all(&f.picking, &bare, &f.counters, &f.packages).unwrap();
        assert!(report.is_empty());
        assert!(f.packages.nve(PackageId(1)).unwrap().is_none());
    }

    #[test]
    fn missing_counter_is_a_no_op() {
        let f = fixture(1);
        f.counters.remove(f.warehouse.sequence().unwrap()).unwrap();
        let report = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn exhausted_counter_fails() {
        let f = fixture(1);
        let key = CounterKey::Nve(WarehouseId(1));
        f.counters.remove(&key).unwrap();
        f.counters
            .create(key, NumberSequence::starting_at(9, 1_000_000_000).unwrap())
            .unwrap();
        let err = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap_err();
        assert!(err.to_string().contains("exhausted"));
        assert!(f.packages.nve(PackageId(1)).unwrap().is_none());
    }

    #[test]
    fn exhaustion_mid_batch_writes_nothing() {
        let f = fixture(3);
        let key = CounterKey::Nve(WarehouseId(1));
        f.counters.remove(&key).unwrap();
        f.counters
            .create(key.clone(), NumberSequence::starting_at(9, 999_999_998).unwrap())
            .unwrap();

        let err = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap_err();
        assert!(matches!(err, VersandError::Sequence(_)));
        for id in 1..=3 {
            assert!(f.packages.nve(PackageId(id)).unwrap().is_none());
        }
        // the two numbers that fitted are burnt
        assert_eq!(f.counters.get(&key).unwrap().unwrap().next_raw(), 1_000_000_001);
    }

    #[test]
    fn reassign_after_unpack_uses_fresh_number() {
        let f = fixture(1);
        let first = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        f.packages.unpack(PackageId(1)).unwrap();

        let second = assign_all(&f.picking, &f.warehouse, &f.counters, &f.packages).unwrap();
        assert_ne!(first.assigned[0].1, second.assigned[0].1);
        assert_eq!(second.assigned[0].1.as_str(), "012345670000000022");
    }
}
