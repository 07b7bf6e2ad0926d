//! Occupancy - derived per-slot counts plus the batch-local overlay.
//!
//! Occupancy is a view, never an owned entity: the caller rebuilds it
//! from the union of stock and staging placements at the start of each
//! allocation cycle. The overlay tracks assignments made within the
//! current batch that are not yet committed to the store.

use rustc_hash::FxHashMap;

use crate::slot::{parse_slot_label, SlotId};

/// Per-slot part counts at a point in time.
///
/// Built from stock + staging records grouped by slot. Blank or
/// unparseable slot references in the source rows are skipped, matching
/// how the store queries exclude them.
#[derive(Clone, Default)]
pub struct OccupancySnapshot {
    counts: FxHashMap<SlotId, u32>,
}

impl OccupancySnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    /// Build a snapshot from raw slot labels, one per resident part.
    ///
    /// Labels that do not parse ("", "-", foreign racks) contribute
    /// nothing.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut snapshot = Self::new();
        for label in labels {
            snapshot.record_label(label);
        }
        snapshot
    }

    /// Count one resident part in a slot
    #[inline]
    pub fn record(&mut self, slot: SlotId) {
        *self.counts.entry(slot).or_insert(0) += 1;
    }

    /// Count one resident part by its raw store label.
    ///
    /// # Returns
    /// `true` if the label parsed and was counted
    pub fn record_label(&mut self, label: &str) -> bool {
        match parse_slot_label(label) {
            Some(slot) => {
                self.record(slot);
                true
            }
            None => false,
        }
    }

    /// Committed part count for a slot
    #[inline]
    pub fn count(&self, slot: SlotId) -> u32 {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    /// Committed count plus the batch overlay's reservations
    #[inline]
    pub fn effective(&self, overlay: &Overlay, slot: SlotId) -> u32 {
        self.count(slot) + overlay.count(slot)
    }

    /// Total parts across all slots
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Number of occupied slots
    pub fn occupied_slots(&self) -> usize {
        self.counts.len()
    }
}

impl std::fmt::Debug for OccupancySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancySnapshot")
            .field("occupied_slots", &self.counts.len())
            .field("total", &self.total())
            .finish()
    }
}

/// Batch-local reservation counts layered on top of a snapshot.
///
/// Created at the start of a batch, bumped once per successful
/// allocation, discarded (reset) at batch end. Never persisted, and not
/// safe to share across threads without external synchronization.
#[derive(Clone, Default)]
pub struct Overlay {
    counts: FxHashMap<SlotId, u32>,
}

impl Overlay {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    /// Reserve one more part in a slot
    #[inline]
    pub fn bump(&mut self, slot: SlotId) {
        *self.counts.entry(slot).or_insert(0) += 1;
    }

    /// Reserved count for a slot
    #[inline]
    pub fn count(&self, slot: SlotId) -> u32 {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    /// Clear all reservations. Called once at the start of each batch.
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Returns true if no reservations are held
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total reservations across all slots
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Visit (slot, count) pairs in ascending slot order.
    ///
    /// Sorted so callers (state hashing, reporting) stay deterministic.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (SlotId, u32)> {
        let mut pairs: Vec<(SlotId, u32)> =
            self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        pairs.sort_unstable_by_key(|&(s, _)| s);
        pairs.into_iter()
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("slots", &self.counts.len())
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_labels() {
        let snapshot = OccupancySnapshot::from_labels([
            "SLOT 4", "SLOT 4", "SLOT 9", "", "-", "RACK 2", "SLOT 4",
        ]);
        assert_eq!(snapshot.count(4), 3);
        assert_eq!(snapshot.count(9), 1);
        assert_eq!(snapshot.count(1), 0);
        assert_eq!(snapshot.total(), 4);
        assert_eq!(snapshot.occupied_slots(), 2);
    }

    #[test]
    fn test_record_label_reports_parse() {
        let mut snapshot = OccupancySnapshot::new();
        assert!(snapshot.record_label("SLOT 12"));
        assert!(!snapshot.record_label("  "));
        assert!(!snapshot.record_label("SLOT x"));
        assert_eq!(snapshot.total(), 1);
    }

    #[test]
    fn test_effective_adds_overlay() {
        let mut snapshot = OccupancySnapshot::new();
        snapshot.record(7);
        snapshot.record(7);

        let mut overlay = Overlay::new();
        overlay.bump(7);
        overlay.bump(3);

        assert_eq!(snapshot.effective(&overlay, 7), 3);
        assert_eq!(snapshot.effective(&overlay, 3), 1);
        assert_eq!(snapshot.effective(&overlay, 1), 0);
    }

    #[test]
    fn test_overlay_reset() {
        let mut overlay = Overlay::new();
        overlay.bump(1);
        overlay.bump(1);
        overlay.bump(2);
        assert_eq!(overlay.total(), 3);

        overlay.reset();
        assert!(overlay.is_empty());
        assert_eq!(overlay.count(1), 0);
    }

    #[test]
    fn test_overlay_iter_sorted() {
        let mut overlay = Overlay::new();
        overlay.bump(9);
        overlay.bump(2);
        overlay.bump(9);
        overlay.bump(150);

        let pairs: Vec<(SlotId, u32)> = overlay.iter_sorted().collect();
        assert_eq!(pairs, vec![(2, 1), (9, 2), (150, 1)]);
    }
}
