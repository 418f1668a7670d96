//! In-memory invoice ledger.

use std::collections::BTreeMap;
#[cfg(feature = "nve")]
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::config::NumberingConfig;
use super::document::{MoveKind, next_document_name, placeholder_name};
use super::journal::{Journal, Journals};
use super::order::{InvoiceService, SaleOrder};
use crate::core::{CounterStore, InvoiceId, JournalId, PickingId, SaleOrderId, VersandError};

/// State of an invoice or credit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceState {
    Draft,
    Posted,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    pub product: String,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub tax_rate: Option<Decimal>,
}

impl InvoiceLine {
    /// Unit price including tax, rounded to cents.
    ///
    /// The tax amount is rounded before it is added.
    pub fn price_with_tax(&self) -> Decimal {
        match self.tax_rate {
            Some(rate) => {
                let tax = (rate * self.price_unit / Decimal::ONE_HUNDRED).round_dp(2);
                (self.price_unit + tax).round_dp(2)
            }
            None => self.price_unit,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        (self.quantity * self.price_unit).round_dp(2)
    }
}

/// A customer invoice or credit note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub name: String,
    pub kind: MoveKind,
    pub journal: JournalId,
    pub sale_order: Option<SaleOrderId>,
    /// Delivery this invoice was created for.
    pub picking: Option<PickingId>,
    /// Credit note: the invoice it reverses.
    pub reversed: Option<InvoiceId>,
    pub state: InvoiceState,
    pub date: NaiveDate,
    pub lines: Vec<InvoiceLine>,
    /// Set once the customer has been notified about payment.
    pub payment_notified: bool,
}

impl Invoice {
    pub fn total_net(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::subtotal).sum()
    }
}

/// Sends the paid invoice to the customer.
pub trait PaymentNotifier {
    fn invoice_paid(&mut self, invoice: &Invoice) -> Result<(), VersandError>;
}

/// Invoices and credit notes, named through a shared [`CounterStore`].
pub struct Ledger {
    counters: Arc<dyn CounterStore>,
    config: NumberingConfig,
    accounting_date: Option<NaiveDate>,
    next_id: u64,
    invoices: BTreeMap<InvoiceId, Invoice>,
}

impl Ledger {
    pub fn new(counters: Arc<dyn CounterStore>, config: NumberingConfig) -> Self {
        Self {
            counters,
            config,
            accounting_date: None,
            next_id: 1,
            invoices: BTreeMap::new(),
        }
    }

    /// Fix the document date instead of using today's local date.
    pub fn with_accounting_date(mut self, date: NaiveDate) -> Self {
        self.accounting_date = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.accounting_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn next_id(&mut self) -> InvoiceId {
        let id = InvoiceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether the journal holds no invoice or credit note yet.
    fn first_in_journal(&self, journal: JournalId) -> bool {
        !self.invoices.values().any(|i| i.journal == journal)
    }

    fn get_mut(&mut self, id: InvoiceId) -> Result<&mut Invoice, VersandError> {
        self.invoices
            .get_mut(&id)
            .ok_or_else(|| VersandError::Journal(format!("{id} does not exist")))
    }

    pub fn get(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.get(&id)
    }

    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.values()
    }

    pub fn for_order(&self, order: SaleOrderId) -> Vec<&Invoice> {
        self.invoices
            .values()
            .filter(|i| i.sale_order == Some(order))
            .collect()
    }

    /// Name the next document in `journal` would get.
    pub fn placeholder(&self, journal: &Journal, kind: MoveKind) -> Result<String, VersandError> {
        placeholder_name(
            journal,
            kind,
            self.first_in_journal(journal.id),
            self.date(),
            &self.config,
            self.counters.as_ref(),
        )
    }

    fn create(
        &mut self,
        journal: &Journal,
        kind: MoveKind,
        lines: Vec<InvoiceLine>,
        sale_order: Option<SaleOrderId>,
        reversed: Option<InvoiceId>,
    ) -> Result<InvoiceId, VersandError> {
        let date = self.date();
        let name = next_document_name(
            journal,
            kind,
            self.first_in_journal(journal.id),
            date,
            &self.config,
            self.counters.as_ref(),
        )?;
        let id = self.next_id();
        self.invoices.insert(
            id,
            Invoice {
                id,
                name,
                kind,
                journal: journal.id,
                sale_order,
                picking: None,
                reversed,
                state: InvoiceState::Draft,
                date,
                lines,
                payment_notified: false,
            },
        );
        Ok(id)
    }

    /// Reverse an invoice with a credit note in the same journal.
    pub fn create_credit_note(
        &mut self,
        invoice: InvoiceId,
        journals: &Journals,
    ) -> Result<InvoiceId, VersandError> {
        let original = self
            .get(invoice)
            .ok_or_else(|| VersandError::Journal(format!("{invoice} does not exist")))?;
        if original.kind != MoveKind::OutInvoice {
            return Err(VersandError::Journal(format!(
                "{} is not an invoice",
                original.name
            )));
        }
        let journal = journals.get(original.journal).ok_or_else(|| {
            VersandError::Journal(format!("{} does not exist", original.journal))
        })?;
        let (lines, order) = (original.lines.clone(), original.sale_order);
        self.create(journal, MoveKind::OutRefund, lines, order, Some(invoice))
    }

    /// Record the delivery an invoice belongs to.
    pub fn link_picking(
        &mut self,
        invoice: InvoiceId,
        picking: PickingId,
    ) -> Result<(), VersandError> {
        self.get_mut(invoice)?.picking = Some(picking);
        Ok(())
    }

    /// Register payment and notify the customer once.
    ///
    /// A failed notification is logged and retried on the next call.
    pub fn mark_paid(
        &mut self,
        id: InvoiceId,
        notifier: &mut dyn PaymentNotifier,
    ) -> Result<(), VersandError> {
        let invoice = self.get_mut(id)?;
        if invoice.state == InvoiceState::Draft {
            return Err(VersandError::Journal(format!(
                "{} must be posted before payment",
                invoice.name
            )));
        }
        invoice.state = InvoiceState::Paid;
        if invoice.payment_notified {
            return Ok(());
        }
        invoice.payment_notified = true;
        if let Err(e) = notifier.invoice_paid(invoice) {
            invoice.payment_notified = false;
            warn!(invoice = %invoice.name, error = %e, "payment notification failed");
        }
        Ok(())
    }
}

impl InvoiceService for Ledger {
    fn create_invoices(
        &mut self,
        order: &mut SaleOrder,
        journal: &Journal,
    ) -> Result<Vec<InvoiceId>, VersandError> {
        let lines: Vec<InvoiceLine> = order
            .lines
            .iter()
            .filter(|l| l.qty_to_invoice() > Decimal::ZERO)
            .map(|l| InvoiceLine {
                product: l.product.clone(),
                quantity: l.qty_to_invoice(),
                price_unit: l.price_unit,
                tax_rate: l.tax_rate,
            })
            .collect();
        if lines.is_empty() {
            debug!(order = %order.name, "nothing left to invoice");
            return Ok(Vec::new());
        }

        let id = self.create(journal, MoveKind::OutInvoice, lines, Some(order.id), None)?;
        for line in &mut order.lines {
            line.qty_invoiced = line.quantity;
        }
        debug!(order = %order.name, invoice = %id, "invoice created");
        Ok(vec![id])
    }

    fn post(&mut self, invoices: &[InvoiceId]) -> Result<(), VersandError> {
        for id in invoices {
            let invoice = self.get_mut(*id)?;
            if invoice.state != InvoiceState::Draft {
                return Err(VersandError::Journal(format!(
                    "{} is already posted",
                    invoice.name
                )));
            }
            invoice.state = InvoiceState::Posted;
        }
        Ok(())
    }

    /// Remove draft invoices. Nothing is removed if one of them is posted.
    fn discard(&mut self, invoices: &[InvoiceId]) -> Result<(), VersandError> {
        for id in invoices {
            let invoice = self
                .get(*id)
                .ok_or_else(|| VersandError::Journal(format!("{id} does not exist")))?;
            if invoice.state != InvoiceState::Draft {
                return Err(VersandError::Journal(format!(
                    "{} is posted and cannot be discarded",
                    invoice.name
                )));
            }
        }
        for id in invoices {
            if let Some(invoice) = self.invoices.remove(id) {
                debug!(invoice = %invoice.name, "draft invoice discarded");
            }
        }
        Ok(())
    }
}

/// Invoices a validated delivery through a [`Ledger`].
///
/// Remembers what the last delivery changed so that a failed NVE assignment
/// can take the invoice back.
#[cfg(feature = "nve")]
pub struct DeliveryInvoicer<'a> {
    ledger: &'a mut Ledger,
    journals: &'a Journals,
    orders: &'a mut HashMap<SaleOrderId, SaleOrder>,
    last: Option<DeliveryUndo>,
}

#[cfg(feature = "nve")]
struct DeliveryUndo {
    picking: PickingId,
    order: SaleOrderId,
    qty_invoiced: Vec<Decimal>,
    invoices: Vec<InvoiceId>,
}

#[cfg(feature = "nve")]
impl<'a> DeliveryInvoicer<'a> {
    pub fn new(
        ledger: &'a mut Ledger,
        journals: &'a Journals,
        orders: &'a mut HashMap<SaleOrderId, SaleOrder>,
    ) -> Self {
        Self {
            ledger,
            journals,
            orders,
            last: None,
        }
    }

    fn undo(&mut self, undo: DeliveryUndo) -> Result<(), VersandError> {
        self.ledger.discard(&undo.invoices)?;
        if let Some(order) = self.orders.get_mut(&undo.order) {
            for (line, qty) in order.lines.iter_mut().zip(undo.qty_invoiced) {
                line.qty_invoiced = qty;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "nve")]
impl crate::nve::DeliveryInvoicing for DeliveryInvoicer<'_> {
    fn invoice_delivery(&mut self, picking: &crate::nve::Picking) -> Result<(), VersandError> {
        self.last = None;
        let Some(order_id) = picking.sale_order else {
            return Ok(());
        };
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| VersandError::Marketplace(format!("{order_id} does not exist")))?;
        let journal = order
            .journal
            .and_then(|id| self.journals.get(id))
            .or_else(|| self.journals.default_sale_journal())
            .ok_or_else(|| VersandError::Journal("no sale journal configured".into()))?;

        let qty_invoiced = order.lines.iter().map(|l| l.qty_invoiced).collect();
        let invoices = self.ledger.create_invoices(order, journal)?;
        let undo = DeliveryUndo {
            picking: picking.id,
            order: order_id,
            qty_invoiced,
            invoices,
        };
        let linked = undo
            .invoices
            .iter()
            .try_for_each(|id| self.ledger.link_picking(*id, picking.id));
        if let Err(e) = linked {
            self.undo(undo)?;
            return Err(e);
        }
        self.last = Some(undo);
        Ok(())
    }

    fn revert_delivery(&mut self, picking: &crate::nve::Picking) -> Result<(), VersandError> {
        match self.last.take() {
            Some(undo) if undo.picking == picking.id => {
                debug!(picking = %picking.name, invoices = undo.invoices.len(), "delivery invoice reverted");
                self.undo(undo)
            }
            other => {
                self.last = other;
                Ok(())
            }
        }
    }
}
