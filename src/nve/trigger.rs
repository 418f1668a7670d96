//! Picking validation: the point where NVE assignment runs.

use tracing::{debug, warn};

use super::assign::{AssignmentReport, assign_all};
use super::package::PackageStore;
use super::picking::{Picking, PickingState};
use super::warehouse::Warehouses;
use crate::core::{CounterStore, MissingField, VersandError};

/// Collaborators needed to assign NVEs.
#[derive(Clone, Copy)]
pub struct NveContext<'a> {
    pub warehouses: &'a Warehouses,
    pub counters: &'a dyn CounterStore,
    pub packages: &'a dyn PackageStore,
}

/// Invoicing step that runs after the preconditions pass and before assignment.
pub trait DeliveryInvoicing {
    /// Create the invoice for the picking's sale order and link the picking to it.
    fn invoice_delivery(&mut self, picking: &Picking) -> Result<(), VersandError>;

    /// Undo the last [`invoice_delivery`](Self::invoice_delivery) for `picking`
    /// after NVE assignment failed.
    fn revert_delivery(&mut self, _picking: &Picking) -> Result<(), VersandError> {
        Ok(())
    }
}

/// [`DeliveryInvoicing`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInvoicing;

impl DeliveryInvoicing for NoInvoicing {
    fn invoice_delivery(&mut self, _picking: &Picking) -> Result<(), VersandError> {
        Ok(())
    }
}

/// Why a validated picking did not get NVEs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotDone,
    NotOutgoing,
    NveInactive,
}

/// What the validation trigger did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Skipped(SkipReason),
    Assigned(AssignmentReport),
}

/// Run NVE assignment for a picking that has just reached `done`.
///
/// Fires only for outgoing pickings whose sale journal activates NVEs.
/// Missing prefix or GLN fails with [`VersandError::ConfigurationMissing`]
/// before anything is invoiced or allocated. If assignment fails after the
/// delivery was invoiced, the invoicing step is reverted.
pub fn on_picking_validated(
    picking: &Picking,
    ctx: NveContext<'_>,
    invoicing: &mut dyn DeliveryInvoicing,
) -> Result<TriggerOutcome, VersandError> {
    let skip = if picking.state() != PickingState::Done {
        Some(SkipReason::NotDone)
    } else if !picking.is_outgoing() {
        Some(SkipReason::NotOutgoing)
    } else if !picking.activate_nve {
        Some(SkipReason::NveInactive)
    } else {
        None
    };
    if let Some(reason) = skip {
        debug!(picking = %picking.name, ?reason, "NVE assignment skipped");
        return Ok(TriggerOutcome::Skipped(reason));
    }

    let Some(warehouse) = ctx.warehouses.for_picking_type(&picking.picking_type) else {
        let warehouse = picking
            .picking_type
            .warehouse
            .map_or_else(|| "none".to_string(), |id| id.to_string());
        return Err(VersandError::ConfigurationMissing {
            warehouse,
            field: MissingField::NvePrefix,
        });
    };
    warehouse.require_nve_settings()?;

    invoicing.invoice_delivery(picking)?;
    match assign_all(picking, warehouse, ctx.counters, ctx.packages) {
        Ok(report) => Ok(TriggerOutcome::Assigned(report)),
        Err(e) => {
            if let Err(undo) = invoicing.revert_delivery(picking) {
                warn!(picking = %picking.name, error = %undo, "delivery invoice not reverted");
            }
            Err(e)
        }
    }
}

/// Mark a picking done and run [`on_picking_validated`] as one operation.
///
/// If the trigger fails the picking returns to its previous state. Numbers
/// already allocated by the failed run are not returned to the counter.
pub fn validate_picking(
    picking: &mut Picking,
    ctx: NveContext<'_>,
    invoicing: &mut dyn DeliveryInvoicing,
) -> Result<TriggerOutcome, VersandError> {
    let previous = picking.state();
    picking.mark_done()?;

    match on_picking_validated(picking, ctx, invoicing) {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            warn!(picking = %picking.name, error = %e, "picking validation rolled back");
            picking.restore_state(previous);
            Err(e)
        }
    }
}
