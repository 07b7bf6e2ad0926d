//! Slot catalog - provisioned storage locations with capacity limits.
//!
//! Slots are numbered positions in a fixed namespace ("SLOT 1".."SLOT N"),
//! provisioned once at startup and mutated only by operator edits to
//! capacity or status. The allocator never creates or deletes them.

use rustc_hash::FxHashMap;

/// Type alias for slot identifiers - the numeric index in the namespace
pub type SlotId = u32;

/// Capacity limit applied when a slot has no limit, or an unparseable one
pub const DEFAULT_SLOT_LIMIT: u32 = 6;

/// Prefix used by slot labels in the backing store ("SLOT 7")
pub const SLOT_LABEL_PREFIX: &str = "SLOT";

/// Whether a slot may receive new placements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SlotStatus {
    /// Eligible for allocation
    Active = 0,
    /// Taken out of rotation by an operator; never selected
    Inactive = 1,
}

/// A single provisioned slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRecord {
    /// Active/inactive status
    pub status: SlotStatus,
    /// Capacity limit (parts that may reside here at once)
    pub limit: u32,
}

impl SlotRecord {
    /// A fresh active slot with the default limit
    #[inline]
    pub const fn new() -> Self {
        Self {
            status: SlotStatus::Active,
            limit: DEFAULT_SLOT_LIMIT,
        }
    }

    /// Returns true if this slot may receive placements
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SlotStatus::Active)
    }
}

impl Default for SlotRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a stored capacity limit leniently.
///
/// Limits live as free text in the backing store; anything missing,
/// non-numeric, or zero coerces to [`DEFAULT_SLOT_LIMIT`]. Never an error.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => match s.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => DEFAULT_SLOT_LIMIT,
        },
        _ => DEFAULT_SLOT_LIMIT,
    }
}

/// Format a slot id as its store label ("SLOT 7")
#[inline]
pub fn slot_label(id: SlotId) -> String {
    format!("{} {}", SLOT_LABEL_PREFIX, id)
}

/// Parse a store label back to a slot id.
///
/// # Returns
/// `None` for blank labels, foreign prefixes, or non-numeric suffixes.
/// Callers treat those as "not slotted here", never as errors.
pub fn parse_slot_label(label: &str) -> Option<SlotId> {
    let rest = label.trim().strip_prefix(SLOT_LABEL_PREFIX)?;
    rest.trim().parse::<SlotId>().ok()
}

/// The catalog of provisioned slots.
///
/// Lookup-only during allocation; iteration order is never relied upon
/// (the routing table walks its own ordered ranges).
pub struct SlotCatalog {
    slots: FxHashMap<SlotId, SlotRecord>,
}

impl SlotCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
        }
    }

    /// Create a catalog pre-provisioned for `1..=last` with defaults.
    pub fn provisioned(last: SlotId) -> Self {
        let mut catalog = Self::new();
        catalog.provision(1, last);
        catalog
    }

    /// Provision slots `first..=last` with default records.
    ///
    /// Idempotent: slots that already exist keep their edited limit and
    /// status.
    pub fn provision(&mut self, first: SlotId, last: SlotId) {
        for id in first..=last {
            self.slots.entry(id).or_insert_with(SlotRecord::new);
        }
    }

    /// Look up a slot record
    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&SlotRecord> {
        self.slots.get(&id)
    }

    /// Returns the record only if the slot exists and is active.
    /// Inactive and unprovisioned slots are invisible to allocation.
    #[inline]
    pub fn active(&self, id: SlotId) -> Option<&SlotRecord> {
        self.slots.get(&id).filter(|r| r.is_active())
    }

    /// Operator edit: set a slot's capacity limit from raw store text.
    ///
    /// # Returns
    /// The parsed limit actually applied, or `None` if the slot is not
    /// provisioned.
    pub fn set_limit(&mut self, id: SlotId, raw_limit: Option<&str>) -> Option<u32> {
        let limit = parse_limit(raw_limit);
        let record = self.slots.get_mut(&id)?;
        record.limit = limit;
        Some(limit)
    }

    /// Operator edit: activate or deactivate a slot.
    ///
    /// # Returns
    /// `true` if the slot exists and was updated
    pub fn set_status(&mut self, id: SlotId, status: SlotStatus) -> bool {
        match self.slots.get_mut(&id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Number of provisioned slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is provisioned
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SlotCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotCatalog")
            .field("provisioned", &self.slots.len())
            .finish()
    }
}
