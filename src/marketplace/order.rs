//! Sale orders and their confirmation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::channel::Marketplace;
use super::journal::{Journal, Journals};
use crate::core::{InvoiceId, JournalId, SaleOrderId, ValidationError, VersandError};

/// Lifecycle state of a sale order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleOrderState {
    Draft,
    Sent,
    Sale,
    Cancelled,
}

/// A sale order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOrderLine {
    pub product: String,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    /// Tax rate in percent, `None` for untaxed lines.
    pub tax_rate: Option<Decimal>,
    pub qty_invoiced: Decimal,
}

impl SaleOrderLine {
    pub fn new(product: impl Into<String>, quantity: Decimal, price_unit: Decimal) -> Self {
        Self {
            product: product.into(),
            quantity,
            price_unit,
            tax_rate: None,
            qty_invoiced: Decimal::ZERO,
        }
    }

    pub fn with_tax_rate(mut self, percent: Decimal) -> Self {
        self.tax_rate = Some(percent);
        self
    }

    /// Quantity not yet invoiced.
    pub fn qty_to_invoice(&self) -> Decimal {
        (self.quantity - self.qty_invoiced).max(Decimal::ZERO)
    }
}

/// A sale order, optionally placed on a marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: SaleOrderId,
    pub name: String,
    to_marketplace: bool,
    pub marketplace: Option<Marketplace>,
    /// Journal the order's invoices go to, set on confirmation.
    pub journal: Option<JournalId>,
    state: SaleOrderState,
    pub date_order: NaiveDate,
    pub lines: Vec<SaleOrderLine>,
}

impl SaleOrder {
    /// New draft order. Orders are marketplace orders unless switched off.
    pub fn new(id: SaleOrderId, name: impl Into<String>, date_order: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            to_marketplace: true,
            marketplace: None,
            journal: None,
            state: SaleOrderState::Draft,
            date_order,
            lines: Vec::new(),
        }
    }

    pub fn with_marketplace(mut self, marketplace: Marketplace) -> Self {
        self.marketplace = Some(marketplace);
        self
    }

    pub fn add_line(&mut self, line: SaleOrderLine) {
        self.lines.push(line);
    }

    pub fn to_marketplace(&self) -> bool {
        self.to_marketplace
    }

    /// Switch marketplace routing on or off. Switching off clears the marketplace.
    pub fn set_to_marketplace(&mut self, value: bool) {
        self.to_marketplace = value;
        if !value {
            self.marketplace = None;
        }
    }

    pub fn state(&self) -> SaleOrderState {
        self.state
    }

    pub fn cancel(&mut self) -> Result<(), VersandError> {
        if self.state == SaleOrderState::Sale {
            return Err(VersandError::Marketplace(format!(
                "order '{}' is confirmed and cannot be cancelled here",
                self.name
            )));
        }
        self.state = SaleOrderState::Cancelled;
        Ok(())
    }

    /// Check the order as it would be in state `sale`.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.to_marketplace && self.marketplace.is_none() {
            errors.push(ValidationError::with_rule(
                "order.marketplace",
                "Marketplace field is required",
                "SO-01",
            ));
        }
        if self.lines.is_empty() {
            errors.push(ValidationError::with_rule(
                "order.lines",
                "order has no lines",
                "SO-02",
            ));
        }
        for (i, line) in self.lines.iter().enumerate() {
            if line.quantity <= Decimal::ZERO {
                errors.push(ValidationError::with_rule(
                    format!("order.lines[{i}].quantity"),
                    "quantity must be positive",
                    "SO-03",
                ));
            }
        }
        errors
    }

    /// Whether any line still has quantity to invoice.
    pub fn has_invoiceable_lines(&self) -> bool {
        self.lines.iter().any(|l| l.qty_to_invoice() > Decimal::ZERO)
    }
}

/// Creates and posts invoices for confirmed orders.
pub trait InvoiceService {
    /// Invoice all not yet invoiced quantities of `order` into `journal`.
    ///
    /// Returns no ids if there is nothing left to invoice.
    fn create_invoices(
        &mut self,
        order: &mut SaleOrder,
        journal: &Journal,
    ) -> Result<Vec<InvoiceId>, VersandError>;

    /// Post draft invoices.
    fn post(&mut self, invoices: &[InvoiceId]) -> Result<(), VersandError>;

    /// Drop draft invoices that belong to a confirmation or delivery that failed.
    fn discard(&mut self, invoices: &[InvoiceId]) -> Result<(), VersandError>;
}

/// Result of [`confirm_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    pub journal: Option<JournalId>,
    pub invoices: Vec<InvoiceId>,
    pub posted: bool,
}

/// Confirm a draft or sent order.
///
/// Marketplace orders are routed to the sale journal named after their
/// marketplace, invoiced and posted. Other orders are invoiced as drafts into
/// the default sale journal. MediaMarktSaturn retail orders are not invoiced.
///
/// If anything fails, state, journal and invoiced quantities of the order are
/// restored and invoices created on the way are discarded. Document numbers
/// they consumed are not returned.
pub fn confirm_order(
    order: &mut SaleOrder,
    journals: &Journals,
    invoicing: &mut dyn InvoiceService,
) -> Result<ConfirmationOutcome, VersandError> {
    if !matches!(order.state, SaleOrderState::Draft | SaleOrderState::Sent) {
        return Err(VersandError::Marketplace(format!(
            "order '{}' cannot be confirmed from state {:?}",
            order.name, order.state
        )));
    }
    if let Some(error) = order.validate().into_iter().next() {
        return Err(VersandError::Marketplace(error.to_string()));
    }

    let routed = if order.to_marketplace {
        let Some(marketplace) = order.marketplace else {
            return Err(VersandError::Marketplace("Marketplace field is required".into()));
        };
        let journal = journals
            .find_sale_journal(marketplace.journal_name())
            .ok_or_else(|| {
                VersandError::Marketplace(format!(
                    "failed to create invoice, create a sales journal named '{}'",
                    marketplace.journal_name()
                ))
            })?;
        Some(journal)
    } else {
        None
    };

    let previous = (order.state, order.journal);
    let invoiced: Vec<Decimal> = order.lines.iter().map(|l| l.qty_invoiced).collect();
    order.state = SaleOrderState::Sale;
    order.journal = routed.map(|j| j.id);

    let skip_invoicing = order
        .marketplace
        .is_some_and(|m| !m.invoices_on_confirmation());
    let mut outcome = ConfirmationOutcome {
        journal: order.journal,
        invoices: Vec::new(),
        posted: false,
    };
    if skip_invoicing {
        info!(order = %order.name, "confirmed without invoice");
        return Ok(outcome);
    }

    let result = invoice_confirmed(order, routed, journals, invoicing);
    match result {
        Ok((invoices, posted)) => {
            outcome.invoices = invoices;
            outcome.posted = posted;
            info!(
                order = %order.name,
                invoices = outcome.invoices.len(),
                posted,
                "order confirmed"
            );
            Ok(outcome)
        }
        Err(e) => {
            (order.state, order.journal) = previous;
            for (line, qty) in order.lines.iter_mut().zip(invoiced) {
                line.qty_invoiced = qty;
            }
            Err(e)
        }
    }
}

fn invoice_confirmed(
    order: &mut SaleOrder,
    routed: Option<&Journal>,
    journals: &Journals,
    invoicing: &mut dyn InvoiceService,
) -> Result<(Vec<InvoiceId>, bool), VersandError> {
    let journal = routed
        .or_else(|| journals.default_sale_journal())
        .ok_or_else(|| VersandError::Journal("no sale journal configured".into()))?;
    let invoices = invoicing.create_invoices(order, journal)?;
    let post = order.to_marketplace && !invoices.is_empty();
    if post {
        if let Err(e) = invoicing.post(&invoices) {
            if let Err(undo) = invoicing.discard(&invoices) {
                warn!(order = %order.name, error = %undo, "unposted invoices not discarded");
            }
            return Err(e);
        }
    }
    debug!(order = %order.name, journal = %journal.code, "invoiced on confirmation");
    Ok((invoices, post))
}

/// Whether deliveries of `order` get NVEs, taken from its journal.
pub fn activate_nve_for(order: &SaleOrder, journals: &Journals) -> bool {
    order
        .journal
        .and_then(|id| journals.get(id))
        .is_some_and(|j| j.activate_nve)
}

/// Outgoing delivery for a confirmed order, one move line per order line.
#[cfg(feature = "nve")]
pub fn delivery_picking(
    order: &SaleOrder,
    journals: &Journals,
    id: crate::core::PickingId,
    name: impl Into<String>,
    picking_type: crate::nve::PickingType,
) -> Result<crate::nve::Picking, VersandError> {
    if order.state != SaleOrderState::Sale {
        return Err(VersandError::Marketplace(format!(
            "order '{}' is not confirmed",
            order.name
        )));
    }
    let mut picking = crate::nve::Picking::new(id, name, picking_type)
        .with_sale_order(order.id, activate_nve_for(order, journals));
    for line in &order.lines {
        picking.add_move_line(line.product.clone(), line.quantity);
    }
    Ok(picking)
}
