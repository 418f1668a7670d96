//! NVE (Nummer der Versandeinheit) generation.
//!
//! On validation of an outgoing picking whose sale journal activates NVEs,
//! every result package without an NVE receives one built from the
//! warehouse prefix digit, its GLN, the next value of the warehouse counter
//! and a GS1 check digit.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use versand::core::*;
//! use versand::nve::*;
//!
//! let counters = InMemoryCounterStore::new();
//! let packages = InMemoryPackageStore::new();
//! let mut warehouses = Warehouses::new();
//! warehouses.insert(
//!     WarehouseBuilder::new(WarehouseId(1), "Mainz")
//!         .gln("1234567")
//!         .nve_prefix(0)
//!         .build(&counters)
//!         .unwrap(),
//! );
//!
//! packages.insert(Package::new(PackageId(1), "PACK0001")).unwrap();
//! let mut picking = Picking::new(
//!     PickingId(1),
//!     "WH/OUT/00001",
//!     PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
//! )
//! .with_sale_order(SaleOrderId(1), true);
//! let line = picking.add_move_line("Akku 48V", dec!(1));
//! picking.put_in_pack(line, PackageId(1), &packages).unwrap();
//!
//! let ctx = NveContext { warehouses: &warehouses, counters: &counters, packages: &packages };
//! validate_picking(&mut picking, ctx, &mut NoInvoicing).unwrap();
//!
//! let nve = packages.nve(PackageId(1)).unwrap().unwrap();
//! assert_eq!(nve.as_str(), "012345670000000015");
//! ```

mod assign;
#[cfg(feature = "label")]
pub mod label;
mod package;
mod picking;
mod trigger;
mod warehouse;

pub use assign::{AssignmentReport, assign_all};
pub use package::{InMemoryPackageStore, Package, PackageContent, PackageStore};
pub use picking::{MoveLine, Picking, PickingState, PickingType, PickingTypeCode};
pub use trigger::{
    DeliveryInvoicing, NoInvoicing, NveContext, SkipReason, TriggerOutcome, on_picking_validated,
    validate_picking,
};
pub use warehouse::{CounterRetention, NveSettings, Warehouse, WarehouseBuilder, Warehouses};
