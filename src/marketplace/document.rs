//! Invoice and credit note names.
//!
//! Names take the form `<prefix><journal code><year>-<number>`, for example
//! `RE_AMZ2025-000001`. Each journal owns one counter shared by invoices and
//! credit notes; the counter starts over at 1 for a journal's first document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::NumberingConfig;
use super::journal::Journal;
use crate::core::{CounterStore, IssuedNumber, NumberSequence, VersandError};

/// Kind of accounting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Customer invoice.
    OutInvoice,
    /// Customer credit note.
    OutRefund,
}

impl MoveKind {
    pub fn name_prefix(self, config: &NumberingConfig) -> &str {
        match self {
            Self::OutInvoice => &config.invoice_prefix,
            Self::OutRefund => &config.credit_note_prefix,
        }
    }
}

fn ensure_counter(
    journal: &Journal,
    config: &NumberingConfig,
    counters: &dyn CounterStore,
) -> Result<(), VersandError> {
    let key = journal.document_counter();
    if counters.contains(&key)? {
        return Ok(());
    }
    let sequence = NumberSequence::new(config.padding).with_prefix(config.sequence_prefix.clone());
    match counters.create(key.clone(), sequence) {
        Ok(()) => Ok(()),
        // created concurrently
        Err(_) if counters.contains(&key)? => Ok(()),
        Err(e) => Err(e),
    }
}

fn compose(
    journal: &Journal,
    kind: MoveKind,
    issued: &IssuedNumber,
    date: NaiveDate,
    config: &NumberingConfig,
) -> String {
    format!(
        "{}{}{}",
        kind.name_prefix(config),
        journal.code,
        issued.render(date)
    )
}

/// Allocate the next document name for a journal.
///
/// Creates the journal counter on first use. When `first_in_journal` is set
/// the counter is reset to 1 before allocating.
pub fn next_document_name(
    journal: &Journal,
    kind: MoveKind,
    first_in_journal: bool,
    date: NaiveDate,
    config: &NumberingConfig,
    counters: &dyn CounterStore,
) -> Result<String, VersandError> {
    ensure_counter(journal, config, counters)?;
    let key = journal.document_counter();
    if first_in_journal {
        counters.reset(&key)?;
    }
    let issued = counters.allocate(&key)?;
    let name = compose(journal, kind, &issued, date, config);
    debug!(journal = %journal.code, %name, "document name allocated");
    Ok(name)
}

/// Name a draft document would get, without consuming a number.
pub fn placeholder_name(
    journal: &Journal,
    kind: MoveKind,
    first_in_journal: bool,
    date: NaiveDate,
    config: &NumberingConfig,
    counters: &dyn CounterStore,
) -> Result<String, VersandError> {
    let key = journal.document_counter();
    let issued = if first_in_journal || !counters.contains(&key)? {
        IssuedNumber {
            value: 1,
            padding: config.padding,
            prefix: Some(config.sequence_prefix.clone()),
        }
    } else {
        counters.peek(&key)?
    };
    Ok(compose(journal, kind, &issued, date, config))
}

/// Strip the document prefix, returning e.g. `"AMZ2025-000001"`.
///
/// Returns an empty string if `name` does not carry the prefix for `kind`.
/// Whitespace after the prefix is ignored.
pub fn document_sequence<'a>(name: &'a str, kind: MoveKind, config: &NumberingConfig) -> &'a str {
    name.strip_prefix(kind.name_prefix(config))
        .map(str::trim_start)
        .unwrap_or("")
}
