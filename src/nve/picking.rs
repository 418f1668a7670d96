//! Pickings, their operation types and state transitions.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::package::PackageStore;
use crate::core::{PackageId, PickingId, PickingTypeId, SaleOrderId, VersandError, WarehouseId};

/// Direction of a picking type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickingTypeCode {
    Incoming,
    Outgoing,
    Internal,
}

/// Operation type a picking originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickingType {
    pub id: PickingTypeId,
    pub code: PickingTypeCode,
    pub warehouse: Option<WarehouseId>,
}

impl PickingType {
    pub fn outgoing(id: PickingTypeId, warehouse: WarehouseId) -> Self {
        Self {
            id,
            code: PickingTypeCode::Outgoing,
            warehouse: Some(warehouse),
        }
    }
}

/// Lifecycle state of a picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickingState {
    Draft,
    Waiting,
    Confirmed,
    /// Reserved and in progress.
    Assigned,
    Done,
    Cancelled,
}

impl PickingState {
    /// Done and cancelled pickings accept no further transitions.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl fmt::Display for PickingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Waiting => "waiting",
            Self::Confirmed => "confirmed",
            Self::Assigned => "assigned",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A product movement line, optionally packed into a result package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveLine {
    pub product: String,
    pub quantity: Decimal,
    pub result_package: Option<PackageId>,
}

/// A shipment, receipt or internal transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picking {
    pub id: PickingId,
    pub name: String,
    pub picking_type: PickingType,
    state: PickingState,
    /// Inherited from the journal of the linked sale order.
    pub activate_nve: bool,
    pub sale_order: Option<SaleOrderId>,
    pub move_lines: Vec<MoveLine>,
}

impl Picking {
    pub fn new(id: PickingId, name: impl Into<String>, picking_type: PickingType) -> Self {
        Self {
            id,
            name: name.into(),
            picking_type,
            state: PickingState::Draft,
            activate_nve: false,
            sale_order: None,
            move_lines: Vec::new(),
        }
    }

    pub fn with_sale_order(mut self, order: SaleOrderId, activate_nve: bool) -> Self {
        self.sale_order = Some(order);
        self.activate_nve = activate_nve;
        self
    }

    pub fn add_move_line(&mut self, product: impl Into<String>, quantity: Decimal) -> usize {
        self.move_lines.push(MoveLine {
            product: product.into(),
            quantity,
            result_package: None,
        });
        self.move_lines.len() - 1
    }

    pub fn state(&self) -> PickingState {
        self.state
    }

    pub fn is_outgoing(&self) -> bool {
        self.picking_type.code == PickingTypeCode::Outgoing
    }

    /// Draft → confirmed.
    pub fn confirm(&mut self) -> Result<(), VersandError> {
        self.transition(&[PickingState::Draft], PickingState::Confirmed)
    }

    /// Confirmed or waiting → assigned (reserved, work in progress).
    pub fn reserve(&mut self) -> Result<(), VersandError> {
        self.transition(
            &[PickingState::Confirmed, PickingState::Waiting],
            PickingState::Assigned,
        )
    }

    /// Any non-final state → done.
    pub fn mark_done(&mut self) -> Result<(), VersandError> {
        self.transition(
            &[
                PickingState::Draft,
                PickingState::Waiting,
                PickingState::Confirmed,
                PickingState::Assigned,
            ],
            PickingState::Done,
        )
    }

    /// Any non-final state → cancelled.
    pub fn cancel(&mut self) -> Result<(), VersandError> {
        self.transition(
            &[
                PickingState::Draft,
                PickingState::Waiting,
                PickingState::Confirmed,
                PickingState::Assigned,
            ],
            PickingState::Cancelled,
        )
    }

    /// Undo a transition whose enclosing operation failed.
    pub(crate) fn restore_state(&mut self, state: PickingState) {
        self.state = state;
    }

    fn transition(&mut self, from: &[PickingState], to: PickingState) -> Result<(), VersandError> {
        if !from.contains(&self.state) {
            return Err(VersandError::Picking(format!(
                "{} cannot go from {} to {to}",
                self.name, self.state
            )));
        }
        self.state = to;
        Ok(())
    }

    /// Pack a move line into `package` and link the package to this picking.
    pub fn put_in_pack(
        &mut self,
        line: usize,
        package: PackageId,
        packages: &dyn PackageStore,
    ) -> Result<(), VersandError> {
        if self.state.is_final() {
            return Err(VersandError::Picking(format!(
                "{} is {} and can no longer be packed",
                self.name, self.state
            )));
        }
        let count = self.move_lines.len();
        let move_line = self.move_lines.get_mut(line).ok_or_else(|| {
            VersandError::Picking(format!("move line {line} out of range (0..{count})"))
        })?;
        packages.link_picking(package, Some(self.id))?;
        move_line.result_package = Some(package);
        Ok(())
    }

    /// Distinct result packages of the move lines, in line order.
    pub fn result_packages(&self) -> Vec<PackageId> {
        let mut seen = Vec::new();
        for id in self.move_lines.iter().filter_map(|l| l.result_package) {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::nve::package::{InMemoryPackageStore, Package};

    fn picking() -> Picking {
        Picking::new(
            PickingId(1),
            "WH/OUT/00001",
            PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
        )
    }

    #[test]
    fn regular_flow() {
        let mut p = picking();
        p.confirm().unwrap();
        p.reserve().unwrap();
        p.mark_done().unwrap();
        assert_eq!(p.state(), PickingState::Done);
    }

    #[test]
    fn done_is_terminal() {
        let mut p = picking();
        p.mark_done().unwrap();
        assert!(p.mark_done().is_err());
        assert!(p.cancel().is_err());
    }

    #[test]
    fn cancelled_cannot_be_done() {
        let mut p = picking();
        p.cancel().unwrap();
        let err = p.mark_done().unwrap_err();
        assert!(err.to_string().contains("from cancelled to done"));
    }

    #[test]
    fn result_packages_are_distinct() {
        let store = InMemoryPackageStore::new();
        store.insert(Package::new(PackageId(10), "A")).unwrap();
        store.insert(Package::new(PackageId(11), "B")).unwrap();

        let mut p = picking();
        let a = p.add_move_line("Akku", dec!(1));
        let b = p.add_move_line("Kabel", dec!(2));
        let c = p.add_move_line("Lader", dec!(1));
        p.add_move_line("lose Ware", dec!(1));
        p.put_in_pack(a, PackageId(11), &store).unwrap();
        p.put_in_pack(b, PackageId(10), &store).unwrap();
        p.put_in_pack(c, PackageId(11), &store).unwrap();

        assert_eq!(p.result_packages(), vec![PackageId(11), PackageId(10)]);
        let linked = store.get(PackageId(10)).unwrap().unwrap();
        assert_eq!(linked.picking, Some(PickingId(1)));
    }

    #[test]
    fn put_in_pack_checks_line_and_package() {
        let store = InMemoryPackageStore::new();
        let mut p = picking();
        p.add_move_line("Akku", dec!(1));
        assert!(p.put_in_pack(3, PackageId(1), &store).is_err());
        assert!(p.put_in_pack(0, PackageId(1), &store).is_err());
        assert!(p.move_lines[0].result_package.is_none());
    }
}
