//! Compiled-view cache.
//!
//! Sharded concurrent map keyed by logical name. First compilation of a
//! name is serialized through a per-key cell, so concurrent misses on one
//! name converge on a single stored result while distinct names compile in
//! parallel. A failed compile leaves no entry behind and the next render
//! retries; only successful compiles occupy the map, and entries are only
//! ever visible fully formed.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::compose::CompiledView;
use crate::error::RenderResult;

type Slot = Arc<OnceCell<Arc<CompiledView>>>;

/// Concurrency-safe store from logical name to compiled view.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: DashMap<String, Slot>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for `name`, if a compile has completed.
    pub fn get(&self, name: &str) -> Option<Arc<CompiledView>> {
        self.entries.get(name).and_then(|slot| slot.get().cloned())
    }

    /// Insert or replace the view cached under `name`.
    pub fn put(&self, name: impl Into<String>, view: Arc<CompiledView>) {
        let slot = OnceCell::new();
        // A fresh cell cannot already be set.
        let _ = slot.set(view);
        self.entries.insert(name.into(), Arc::new(slot));
    }

    /// Cached view for `name`, compiling it on a miss.
    ///
    /// `compile` runs at most once per name per miss window; concurrent
    /// callers for the same name block on the in-flight compile and share
    /// its result. An erring compile leaves no entry behind, so names that
    /// never compile cannot grow the map.
    pub fn get_or_compile<F>(&self, name: &str, compile: F) -> RenderResult<Arc<CompiledView>>
    where
        F: FnOnce() -> RenderResult<Arc<CompiledView>>,
    {
        // Clone the slot out so the shard lock is released before any
        // caller blocks on the cell.
        let slot = self.entries.entry(name.to_string()).or_default().clone();
        let result = slot.get_or_try_init(compile).cloned();
        if result.is_err() {
            // Unless a concurrent compile filled the cell in the meantime,
            // drop the keyed slot.
            self.entries.remove_if(name, |_, entry| entry.get().is_none());
        }
        result
    }

    /// Drop every cached view.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of names with a completed compile.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
