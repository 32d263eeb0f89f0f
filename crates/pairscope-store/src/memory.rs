//! In-memory tick store.

use pairscope_types::{PairscopeError, Result, Tick};
use std::sync::RwLock;

use crate::{TickSink, TickSource};

/// A tick store held in memory.
#[derive(Debug, Default)]
pub struct MemoryTickStore {
    ticks: RwLock<Vec<Tick>>,
}

impl MemoryTickStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `ticks`.
    #[must_use]
    pub const fn with_ticks(ticks: Vec<Tick>) -> Self {
        Self {
            ticks: RwLock::new(ticks),
        }
    }

    /// Returns the number of stored ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.read().map_or(0, |ticks| ticks.len())
    }

    /// Returns true if the store holds no ticks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TickSource for MemoryTickStore {
    fn snapshot(&self, limit: usize) -> Result<Vec<Tick>> {
        let ticks = self
            .ticks
            .read()
            .map_err(|_| PairscopeError::store("tick store lock poisoned"))?;

        let mut snapshot = ticks.clone();
        snapshot.sort_by_key(|t| t.timestamp);
        let skip = snapshot.len().saturating_sub(limit);
        Ok(snapshot.split_off(skip))
    }
}

impl TickSink for MemoryTickStore {
    fn append(&self, ticks: &[Tick]) -> Result<usize> {
        let mut stored = self
            .ticks
            .write()
            .map_err(|_| PairscopeError::store("tick store lock poisoned"))?;
        stored.extend_from_slice(ticks);
        Ok(ticks.len())
    }
}
