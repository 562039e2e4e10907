use std::collections::HashMap;

/// Identifies a search node: side-to-move tiles, all tiles, and the
/// remaining search horizon. Depth is part of the key because
/// depth-limited heuristic scores from different horizons are not
/// comparable.
pub type SearchKey = (u64, u64, usize);

/// The memoized result of a search node: score and best column.
/// The column is `None` only for horizon and stalemate nodes.
pub type SearchEntry = (i32, Option<usize>);

/// A memo cache scoped to a single decision.
///
/// The table is built empty at the start of every top-level decision
/// and dropped at its end, so no eviction policy is needed; growth
/// within one decision is bounded by the nodes the budget allows.
/// Decisions are single-threaded, so no synchronisation either.
#[derive(Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<SearchKey, SearchEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &SearchKey) -> Option<SearchEntry> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: SearchKey, entry: SearchEntry) {
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
