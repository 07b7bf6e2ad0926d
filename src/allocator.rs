//! Slot Allocator - Core slot selection algorithm.
//!
//! Routing precedence (first matching rule wins):
//! 1. OVERSIZE: flagged project/part combinations get slots 1-3 only
//! 2. CATEGORY: the part code's category ranges (unknown codes fall
//!    back to the large ranges)
//! 3. PAIRED-LAYER: CBD/CBE use a two-pass fill (empty slots first,
//!    then half-full ones) and never share a slot three ways
//! 4. GENERAL: ascending first-fit under the slot's capacity limit
//!
//! Pure over its inputs: the only mutation is the overlay bump on a
//! successful selection. Persistence belongs to the caller.

use crate::category::{is_paired_layer, Category, RoutingTable};
use crate::occupancy::{OccupancySnapshot, Overlay};
use crate::request::PlaceRequest;
use crate::slot::{SlotCatalog, SlotId};

/// Effective occupancy cap for paired-layer slots: one sibling pair
pub const PAIRED_LAYER_CAP: u32 = 2;

/// A successful slot selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The selected slot
    pub slot: SlotId,
    /// The category that routed the selection
    pub category: Category,
}

/// The allocation core: a routing table plus the selection passes.
pub struct Allocator {
    routing: RoutingTable,
}

impl Allocator {
    /// Create an allocator with the static routing table
    pub fn new() -> Self {
        Self {
            routing: RoutingTable::new(),
        }
    }

    /// The routing table in use
    #[inline]
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Select a slot for one part.
    ///
    /// # Arguments
    /// * `request` - part and project codes
    /// * `catalog` - slot status and capacity limits
    /// * `occupancy` - committed counts (stock + staging, by slot)
    /// * `oversize` - the parts-catalog answer for this project/part
    /// * `overlay` - batch-local reservations, bumped on success
    ///
    /// # Returns
    /// The placement, or `None` when no eligible slot has remaining
    /// capacity. No-space is a normal outcome, not an error; the
    /// overlay is untouched in that case.
    ///
    /// Deterministic: identical inputs always select the same slot.
    pub fn allocate(
        &self,
        request: &PlaceRequest,
        catalog: &SlotCatalog,
        occupancy: &OccupancySnapshot,
        oversize: bool,
        overlay: &mut Overlay,
    ) -> Option<Placement> {
        // Rule 1: the oversize override narrows the range and fully
        // replaces category routing, including the paired-layer rule.
        if oversize {
            return self.first_fit(Category::Oversize, catalog, occupancy, overlay);
        }

        // Rule 2: category lookup with silent fallback
        let category = self.routing.category_for(request.part);

        // Rule 3: paired-layer parts use the two-pass fill
        if is_paired_layer(request.part) {
            return self.paired_fit(category, catalog, occupancy, overlay);
        }

        // Rule 4: general ascending first-fit
        self.first_fit(category, catalog, occupancy, overlay)
    }

    /// General placement: first active slot in ascending order whose
    /// effective occupancy is below its limit. No load balancing.
    fn first_fit(
        &self,
        category: Category,
        catalog: &SlotCatalog,
        occupancy: &OccupancySnapshot,
        overlay: &mut Overlay,
    ) -> Option<Placement> {
        for slot in self.routing.slots(category) {
            let record = match catalog.active(slot) {
                Some(r) => r,
                None => continue,
            };
            if occupancy.effective(overlay, slot) < record.limit {
                overlay.bump(slot);
                return Some(Placement { slot, category });
            }
        }
        None
    }

    /// Paired-layer placement: two full passes over the eligible range.
    ///
    /// Pass A takes the first slot at effective occupancy 0 (starts a
    /// new pair). Pass B runs only if pass A exhausted the whole range,
    /// and takes the first slot at exactly 1 (completes a pair). Slots
    /// at 2 or more are never candidates, and there is no fallback to
    /// general placement.
    fn paired_fit(
        &self,
        category: Category,
        catalog: &SlotCatalog,
        occupancy: &OccupancySnapshot,
        overlay: &mut Overlay,
    ) -> Option<Placement> {
        for target in 0..PAIRED_LAYER_CAP {
            for slot in self.routing.slots(category) {
                if catalog.active(slot).is_none() {
                    continue;
                }
                if occupancy.effective(overlay, slot) == target {
                    overlay.bump(slot);
                    return Some(Placement { slot, category });
                }
            }
        }
        None
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}
