//! Marketplace orders, sale journals and invoice numbering.
//!
//! Confirmed marketplace orders are routed to the sale journal named after
//! their marketplace, invoiced and posted. Invoices and credit notes are named
//! from a per-journal counter, e.g. `RE_AMZ2025-000001`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use versand::core::*;
//! use versand::marketplace::*;
//!
//! let mut journals = Journals::new();
//! journals.insert(Journal::sale(JournalId(1), "AMZ", "Amazon")).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
//! let mut ledger = Ledger::new(Arc::new(InMemoryCounterStore::new()), NumberingConfig::default())
//!     .with_accounting_date(date);
//!
//! let mut order = SaleOrder::new(SaleOrderId(1), "S00001", date).with_marketplace(Marketplace::Amazon);
//! order.add_line(SaleOrderLine::new("Akku 48V", dec!(1), dec!(199)));
//!
//! let outcome = confirm_order(&mut order, &journals, &mut ledger).unwrap();
//! let invoice = ledger.get(outcome.invoices[0]).unwrap();
//! assert_eq!(invoice.name, "RE_AMZ2025-000001");
//! assert_eq!(invoice.state, InvoiceState::Posted);
//! ```

mod channel;
mod config;
mod document;
mod journal;
mod ledger;
mod order;

pub use channel::Marketplace;
pub use config::{NumberingConfig, NumberingConfigBuilder};
pub use document::{MoveKind, document_sequence, next_document_name, placeholder_name};
pub use journal::{Journal, JournalKind, Journals};
#[cfg(feature = "nve")]
pub use ledger::DeliveryInvoicer;
pub use ledger::{Invoice, InvoiceLine, InvoiceState, Ledger, PaymentNotifier};
#[cfg(feature = "nve")]
pub use order::delivery_picking;
pub use order::{
    ConfirmationOutcome, InvoiceService, SaleOrder, SaleOrderLine, SaleOrderState,
    activate_nve_for, confirm_order,
};
