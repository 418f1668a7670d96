//! Accounting journals used for marketplace routing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CounterKey, CounterStore, JournalId, VersandError};

/// Type of an accounting journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    Sale,
    Purchase,
    Cash,
    Bank,
    General,
}

/// An accounting journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    /// Short code, part of every document name in this journal.
    pub code: String,
    pub name: String,
    pub kind: JournalKind,
    /// Outgoing pickings of orders in this journal get NVEs on validation.
    pub activate_nve: bool,
}

impl Journal {
    pub fn sale(id: JournalId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            kind: JournalKind::Sale,
            activate_nve: false,
        }
    }

    pub fn with_nve(mut self, active: bool) -> Self {
        self.activate_nve = active;
        self
    }

    /// Key of this journal's document counter.
    pub fn document_counter(&self) -> CounterKey {
        CounterKey::Document(self.code.clone())
    }
}

/// All journals, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Journals {
    journals: BTreeMap<JournalId, Journal>,
}

impl Journals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a journal. Codes must be unique.
    pub fn insert(&mut self, journal: Journal) -> Result<(), VersandError> {
        if let Some(clash) = self
            .journals
            .values()
            .find(|j| j.code == journal.code && j.id != journal.id)
        {
            return Err(VersandError::Journal(format!(
                "code '{}' already used by journal '{}'",
                journal.code, clash.name
            )));
        }
        self.journals.insert(journal.id, journal);
        Ok(())
    }

    pub fn get(&self, id: JournalId) -> Option<&Journal> {
        self.journals.get(&id)
    }

    /// Sale journal with exactly this name.
    pub fn find_sale_journal(&self, name: &str) -> Option<&Journal> {
        self.journals
            .values()
            .find(|j| j.kind == JournalKind::Sale && j.name == name)
    }

    /// Sale journal with the lowest id.
    pub fn default_sale_journal(&self) -> Option<&Journal> {
        self.journals.values().find(|j| j.kind == JournalKind::Sale)
    }

    /// Remove a journal together with its document counter.
    pub fn remove(
        &mut self,
        id: JournalId,
        counters: &dyn CounterStore,
    ) -> Result<Option<Journal>, VersandError> {
        let Some(journal) = self.journals.remove(&id) else {
            return Ok(None);
        };
        if counters.remove(&journal.document_counter())?.is_some() {
            debug!(journal = %journal.name, "document counter removed with journal");
        }
        Ok(Some(journal))
    }
}
