//! Category routing - maps part-type codes to ordered slot ranges.
//!
//! Four static categories partition the slot namespace into disjoint
//! contiguous-range groups. Ranges are half-open, declared once at
//! startup, and always walked in ascending numeric order; nothing here
//! depends on map iteration order.

use rustc_hash::FxHashMap;
use std::ops::Range;

use crate::request::PartCode;
use crate::slot::SlotId;

/// Routing category for a part type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Category {
    /// Oversize ("GG") pieces: reserved low-numbered slots 1-3
    Oversize = 0,
    /// Large pieces: slots 4-40 and 81-117 (also the fallback for
    /// uncategorized codes)
    Large = 1,
    /// Mid-size pieces: slots 41-80 and 118-157
    Medium = 2,
    /// Small pieces: slots 158-273
    Small = 3,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Oversize => "oversize",
            Category::Large => "large",
            Category::Medium => "medium",
            Category::Small => "small",
        };
        f.write_str(name)
    }
}

/// Part-type codes routed to the large ranges
pub const LARGE_CODES: &[&str] = &["TSP", "TSA", "TSC", "TSB", "PBS", "VGA"];

/// Part-type codes routed to the mid-size ranges
pub const MEDIUM_CODES: &[&str] = &["PDE", "PDD", "PTE", "PTD", "TME", "TMD"];

/// Part-type codes routed to the small range
pub const SMALL_CODES: &[&str] = &[
    "FTE", "FTD", "QTD", "QTE", "QDD", "QDE", "FDD", "FDE", "CBE", "CBD",
];

/// Part-type codes whose physical layering requires exactly two parts
/// per slot (the paired-layer rule)
pub const PAIRED_LAYER_CODES: &[&str] = &["CBD", "CBE"];

/// Returns true if this code uses the two-pass paired-layer rule
#[inline]
pub fn is_paired_layer(part: PartCode) -> bool {
    matches!(part.as_str(), "CBD" | "CBE")
}

/// The category routing table.
///
/// Built once at startup; the range lists are the single source of slot
/// ordering for allocation.
pub struct RoutingTable {
    oversize: Vec<Range<SlotId>>,
    large: Vec<Range<SlotId>>,
    medium: Vec<Range<SlotId>>,
    small: Vec<Range<SlotId>>,
    by_code: FxHashMap<&'static str, Category>,
}

impl RoutingTable {
    /// Build the static routing table
    pub fn new() -> Self {
        let mut by_code =
            FxHashMap::with_capacity_and_hasher(
                LARGE_CODES.len() + MEDIUM_CODES.len() + SMALL_CODES.len(),
                Default::default(),
            );
        for &code in LARGE_CODES {
            by_code.insert(code, Category::Large);
        }
        for &code in MEDIUM_CODES {
            by_code.insert(code, Category::Medium);
        }
        for &code in SMALL_CODES {
            by_code.insert(code, Category::Small);
        }

        Self {
            oversize: vec![1..4],
            large: vec![4..41, 81..118],
            medium: vec![41..81, 118..158],
            small: vec![158..274],
            by_code,
        }
    }

    /// Route a part-type code to its category.
    ///
    /// Unknown codes fall back to [`Category::Large`] silently; this
    /// permissiveness is deliberate and callers must not treat it as an
    /// error.
    #[inline]
    pub fn category_for(&self, part: PartCode) -> Category {
        self.by_code
            .get(part.as_str())
            .copied()
            .unwrap_or(Category::Large)
    }

    /// The ordered slot ranges for a category
    #[inline]
    pub fn ranges(&self, category: Category) -> &[Range<SlotId>] {
        match category {
            Category::Oversize => &self.oversize,
            Category::Large => &self.large,
            Category::Medium => &self.medium,
            Category::Small => &self.small,
        }
    }

    /// Iterate a category's eligible slots in ascending declared order
    #[inline]
    pub fn slots(&self, category: Category) -> impl Iterator<Item = SlotId> + '_ {
        self.ranges(category).iter().flat_map(|r| r.clone())
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingTable")
            .field("oversize", &self.oversize)
            .field("large", &self.large)
            .field("medium", &self.medium)
            .field("small", &self.small)
            .finish()
    }
}
