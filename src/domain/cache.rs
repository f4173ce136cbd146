//! Flat id -> node index, scoped to a single build.

use std::collections::HashMap;

use generational_arena::Index;

/// Maps comment ids to their forest handles.
///
/// The handle gives both the full comment and its live children container,
/// so resolving a parent reference never walks the forest.
#[derive(Debug, Default)]
pub struct FlatCache {
    nodes: HashMap<i64, Index>,
}

impl FlatCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, id: i64) -> Option<Index> {
        self.nodes.get(&id).copied()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Record `id`; an already cached id keeps its first handle and
    /// `false` is returned.
    pub fn record(&mut self, id: i64, idx: Index) -> bool {
        match self.nodes.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(idx);
                true
            }
        }
    }
}
