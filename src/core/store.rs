//! Keyed counter store.
//!
//! Every warehouse NVE counter and every journal document counter lives in
//! a [`CounterStore`] under a [`CounterKey`]. Allocation is the only shared
//! mutable state in the crate and is serialised per store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::VersandError;
use super::numbering::{IssuedNumber, NumberSequence};
use super::types::WarehouseId;

/// Identifies one counter in a [`CounterStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKey {
    /// NVE sequence of a warehouse.
    Nve(WarehouseId),
    /// Document sequence of a journal, keyed by journal code.
    Document(String),
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nve(id) => write!(f, "nve.sequence.{}", id.0),
            Self::Document(code) => write!(f, "document.sequence.{code}"),
        }
    }
}

/// Storage for gapless counters.
///
/// Implementations must serialise [`allocate`](Self::allocate) per key so
/// that concurrent callers never receive the same value. Issued numbers are
/// never handed out again, even if the caller fails afterwards.
pub trait CounterStore: Send + Sync {
    /// Register a new counter. Fails if the key already exists.
    fn create(&self, key: CounterKey, sequence: NumberSequence) -> Result<(), VersandError>;

    /// Take the next number of a counter.
    fn allocate(&self, key: &CounterKey) -> Result<IssuedNumber, VersandError>;

    /// Preview the next number without consuming it.
    fn peek(&self, key: &CounterKey) -> Result<IssuedNumber, VersandError>;

    /// Change the formatting width of future numbers.
    fn set_padding(&self, key: &CounterKey, padding: usize) -> Result<(), VersandError>;

    /// Restart a counter at 1.
    fn reset(&self, key: &CounterKey) -> Result<(), VersandError>;

    /// Drop a counter, returning its final state.
    fn remove(&self, key: &CounterKey) -> Result<Option<NumberSequence>, VersandError>;

    /// Copy of a counter's current state.
    fn get(&self, key: &CounterKey) -> Result<Option<NumberSequence>, VersandError>;

    fn contains(&self, key: &CounterKey) -> Result<bool, VersandError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Process-local [`CounterStore`] guarded by a single mutex.
///
/// State can be exported with [`snapshot`](Self::snapshot) and restored with
/// [`from_snapshot`](Self::from_snapshot) so counters survive restarts.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<CounterKey, NumberSequence>>,
}

/// Serialisable state of an [`InMemoryCounterStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub counters: Vec<(CounterKey, NumberSequence)>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CounterSnapshot) -> Self {
        Self {
            counters: Mutex::new(snapshot.counters.into_iter().collect()),
        }
    }

    pub fn snapshot(&self) -> Result<CounterSnapshot, VersandError> {
        let counters = self.lock()?;
        Ok(CounterSnapshot {
            counters: counters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CounterKey, NumberSequence>>, VersandError> {
        self.counters
            .lock()
            .map_err(|_| VersandError::Sequence("counter store lock poisoned".into()))
    }
}

fn unknown(key: &CounterKey) -> VersandError {
    VersandError::Sequence(format!("counter '{key}' does not exist"))
}

impl CounterStore for InMemoryCounterStore {
    fn create(&self, key: CounterKey, sequence: NumberSequence) -> Result<(), VersandError> {
        let mut counters = self.lock()?;
        if counters.contains_key(&key) {
            return Err(VersandError::Sequence(format!(
                "counter '{key}' already exists"
            )));
        }
        debug!(counter = %key, padding = sequence.padding(), "counter created");
        counters.insert(key, sequence);
        Ok(())
    }

    fn allocate(&self, key: &CounterKey) -> Result<IssuedNumber, VersandError> {
        let mut counters = self.lock()?;
        let sequence = counters.get_mut(key).ok_or_else(|| unknown(key))?;
        Ok(sequence.issue())
    }

    fn peek(&self, key: &CounterKey) -> Result<IssuedNumber, VersandError> {
        let counters = self.lock()?;
        counters
            .get(key)
            .map(NumberSequence::peek)
            .ok_or_else(|| unknown(key))
    }

    fn set_padding(&self, key: &CounterKey, padding: usize) -> Result<(), VersandError> {
        let mut counters = self.lock()?;
        let sequence = counters.get_mut(key).ok_or_else(|| unknown(key))?;
        debug!(counter = %key, from = sequence.padding(), to = padding, "counter padding updated");
        sequence.set_padding(padding);
        Ok(())
    }

    fn reset(&self, key: &CounterKey) -> Result<(), VersandError> {
        let mut counters = self.lock()?;
        counters.get_mut(key).ok_or_else(|| unknown(key))?.reset();
        Ok(())
    }

    fn remove(&self, key: &CounterKey) -> Result<Option<NumberSequence>, VersandError> {
        let removed = self.lock()?.remove(key);
        if removed.is_some() {
            debug!(counter = %key, "counter removed");
        }
        Ok(removed)
    }

    fn get(&self, key: &CounterKey) -> Result<Option<NumberSequence>, VersandError> {
        Ok(self.lock()?.get(key).cloned())
    }
}
