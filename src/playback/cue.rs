// Cue memory - Edge-triggered countdown thresholds per segment visit

use std::collections::{HashMap, HashSet};

/// Default warnings: 10 s and 5 s before the end of a segment
pub const DEFAULT_CUE_THRESHOLDS_MS: [u64; 2] = [10_000, 5_000];

/// Identifies one visit of one segment
///
/// `visit` increases on every entry (natural transition, seek re-entry, loop
/// wrap), so revisiting the same segment index never shares memory with an
/// earlier visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitKey {
    pub segment_index: usize,
    pub visit: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CueMemory {
    fired: HashMap<VisitKey, HashSet<u64>>,
    current: Option<VisitKey>,
    visits: u64,
}

impl CueMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into a segment and start a fresh visit
    pub fn enter(&mut self, segment_index: usize) -> VisitKey {
        self.visits += 1;
        let key = VisitKey {
            segment_index,
            visit: self.visits,
        };
        // Only the current visit can still fire
        self.fired.clear();
        self.fired.insert(key, HashSet::new());
        self.current = Some(key);
        key
    }

    pub fn current(&self) -> Option<VisitKey> {
        self.current
    }

    /// Thresholds crossed for the first time during the current visit
    ///
    /// `thresholds` must be sorted descending; results keep that order.
    pub fn crossed(&mut self, thresholds: &[u64], remaining_ms: u64) -> Vec<u64> {
        let Some(key) = self.current else {
            return Vec::new();
        };
        let fired = self.fired.entry(key).or_default();

        thresholds
            .iter()
            .copied()
            .filter(|&threshold| remaining_ms <= threshold && fired.insert(threshold))
            .collect()
    }

    /// Forget everything (stop); visit numbering keeps increasing
    pub fn reset(&mut self) {
        self.fired.clear();
        self.current = None;
    }
}

/// Sort descending, drop duplicates and zeros
///
/// A zero threshold could never fire: inside a segment at least 1 ms remains.
pub fn normalize_thresholds(thresholds: &[u64]) -> Vec<u64> {
    let mut sorted: Vec<u64> = thresholds.iter().copied().filter(|&t| t > 0).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}
