//! Engine - Batch allocation loop over the allocator core.
//!
//! Owns the slot catalog, the parts catalog, the current occupancy
//! snapshot, and the batch overlay. Single-threaded per batch: one
//! owner drives it synchronously, one part at a time.

use crate::allocator::{Allocator, Placement};
use crate::occupancy::{OccupancySnapshot, Overlay};
use crate::parts::PartsCatalog;
use crate::request::{Assigned, Command, OutputEvent, PlaceRequest, SkipReason, Skipped};
use crate::slot::{SlotCatalog, SlotId};

/// Number of slots in the default provisioning run
pub const DEFAULT_PROVISION: SlotId = 273;

/// The batch allocation engine.
pub struct Engine {
    /// The allocation core
    allocator: Allocator,
    /// Slot status and capacity limits
    pub catalog: SlotCatalog,
    /// Oversize registrations
    pub parts: PartsCatalog,
    /// Committed occupancy, loaded by the caller per batch
    occupancy: OccupancySnapshot,
    /// Batch-local reservations
    overlay: Overlay,
}

impl Engine {
    /// Create an engine with the full slot namespace provisioned and
    /// empty catalogs.
    pub fn new() -> Self {
        Self::with_catalogs(SlotCatalog::provisioned(DEFAULT_PROVISION), PartsCatalog::new())
    }

    /// Create an engine over caller-provided catalogs
    pub fn with_catalogs(catalog: SlotCatalog, parts: PartsCatalog) -> Self {
        Self {
            allocator: Allocator::new(),
            catalog,
            parts,
            occupancy: OccupancySnapshot::new(),
            overlay: Overlay::new(),
        }
    }

    /// Replace the occupancy snapshot (stock + staging union).
    ///
    /// Call before `begin_batch`; the snapshot is read-only for the
    /// life of the batch.
    pub fn load_occupancy(&mut self, snapshot: OccupancySnapshot) {
        self.occupancy = snapshot;
    }

    /// Start a new batch: clears the overlay so reservations from a
    /// previous unrelated batch never leak into this one.
    pub fn begin_batch(&mut self) {
        self.overlay.reset();
    }

    /// Allocate a slot for one part, bumping the overlay on success.
    #[inline]
    pub fn allocate(&mut self, request: &PlaceRequest) -> Option<Placement> {
        let oversize = self.parts.is_oversize(request.project, request.part);
        self.allocator.allocate(
            request,
            &self.catalog,
            &self.occupancy,
            oversize,
            &mut self.overlay,
        )
    }

    /// Process a single command and return output events.
    ///
    /// This is the main entry point for synchronous usage (batch loops,
    /// testing, benchmarks).
    pub fn process_command(&mut self, cmd: Command) -> Vec<OutputEvent> {
        match cmd {
            Command::BeginBatch => {
                self.begin_batch();
                vec![OutputEvent::BatchStarted]
            }
            Command::Place(request) => {
                let event = match self.allocate(&request) {
                    Some(placement) => OutputEvent::Assigned(Assigned {
                        part: request.part,
                        slot: placement.slot,
                        category: placement.category,
                    }),
                    None => OutputEvent::Skipped(Skipped {
                        part: request.part,
                        reason: SkipReason::NoCapacity,
                    }),
                };
                vec![event]
            }
        }
    }

    /// Run the engine event loop.
    ///
    /// # Arguments
    /// * `input` - Consumer end of the command ring buffer
    /// * `output` - Producer end of the output event ring buffer
    /// * `pin_to_core` - Whether to pin to the last available CPU core
    ///
    /// # Note
    /// This function runs forever (until the program terminates).
    #[cfg(feature = "runtime")]
    pub fn run(
        &mut self,
        input: &mut rtrb::Consumer<Command>,
        output: &mut rtrb::Producer<OutputEvent>,
        pin_to_core: bool,
    ) {
        // Pin to isolated CPU core
        if pin_to_core {
            self.pin_to_core();
        }

        // Main event loop (busy-wait)
        loop {
            while let Ok(cmd) = input.pop() {
                let events = self.process_command(cmd);
                for event in events {
                    // Best effort - drop if full
                    let _ = output.push(event);
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically isolated from OS interrupts.
    pub fn pin_to_core(&self) {
        if let Some(core_ids) = core_affinity::get_core_ids() {
            if let Some(last_core) = core_ids.last() {
                core_affinity::set_for_current(*last_core);
            }
        }
    }

    /// Committed occupancy for a slot (without the overlay)
    #[inline]
    pub fn committed(&self, slot: SlotId) -> u32 {
        self.occupancy.count(slot)
    }

    /// Effective occupancy for a slot (committed + overlay)
    #[inline]
    pub fn occupied(&self, slot: SlotId) -> u32 {
        self.occupancy.effective(&self.overlay, slot)
    }

    /// Would one more part fit in this slot?
    ///
    /// Pre-commit check used when moving staged parts into stock at an
    /// already-chosen slot. Inactive and unprovisioned slots have no
    /// room.
    pub fn has_room(&self, slot: SlotId) -> bool {
        match self.catalog.active(slot) {
            Some(record) => self.occupied(slot) < record.limit,
            None => false,
        }
    }

    /// Reservations held by the current batch
    #[inline]
    pub fn reserved(&self) -> u64 {
        self.overlay.total()
    }

    /// Compute a hash of current occupancy + overlay state for
    /// determinism testing. Slot order is fixed so the digest never
    /// depends on map iteration.
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.occupancy.total().hash(&mut hasher);
        self.occupancy.occupied_slots().hash(&mut hasher);
        for (slot, count) in self.overlay.iter_sorted() {
            slot.hash(&mut hasher);
            count.hash(&mut hasher);
        }

        hasher.finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{PartCode, ProjectCode};
    use crate::slot::DEFAULT_SLOT_LIMIT;

    fn place(part: &str) -> Command {
        Command::Place(PlaceRequest::new(part, "").unwrap())
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new();
        assert_eq!(engine.catalog.len(), DEFAULT_PROVISION as usize);
        assert_eq!(engine.reserved(), 0);
    }

    #[test]
    fn test_engine_process_place() {
        let mut engine = Engine::new();

        let events = engine.process_command(place("TSP"));
        assert_eq!(events.len(), 1);
        match events[0] {
            OutputEvent::Assigned(a) => {
                assert_eq!(a.slot, 4);
                assert_eq!(a.part.as_str(), "TSP");
            }
            _ => panic!("Expected Assigned, got {:?}", events[0]),
        }
        assert_eq!(engine.reserved(), 1);
    }

    #[test]
    fn test_engine_emits_skip_on_no_capacity() {
        let mut engine = Engine::new();
        let mut snapshot = OccupancySnapshot::new();
        for slot in 1..=3 {
            for _ in 0..DEFAULT_SLOT_LIMIT {
                snapshot.record(slot);
            }
        }
        engine.load_occupancy(snapshot);
        engine
            .parts
            .flag_oversize(ProjectCode::none(), PartCode::new("TSP").unwrap());

        let events = engine.process_command(place("TSP"));
        assert!(matches!(
            events[0],
            OutputEvent::Skipped(Skipped {
                reason: SkipReason::NoCapacity,
                ..
            })
        ));
        assert_eq!(engine.reserved(), 0);
    }

    #[test]
    fn test_begin_batch_resets_overlay() {
        let mut engine = Engine::new();
        engine.process_command(place("TSP"));
        engine.process_command(place("TSP"));
        assert_eq!(engine.reserved(), 2);

        let events = engine.process_command(Command::BeginBatch);
        assert!(matches!(events[0], OutputEvent::BatchStarted));
        assert_eq!(engine.reserved(), 0);

        // With the overlay gone, allocation starts over from slot 4
        let events = engine.process_command(place("TSP"));
        match events[0] {
            OutputEvent::Assigned(a) => assert_eq!(a.slot, 4),
            _ => panic!("Expected Assigned"),
        }
    }

    #[test]
    fn test_oversize_lookup_is_wired() {
        let mut engine = Engine::new();
        let project = ProjectCode::new("P-7").unwrap();
        let part = PartCode::new("FTE").unwrap();
        engine.parts.flag_oversize(project, part);

        let req = PlaceRequest { part, project };
        let placement = engine.allocate(&req).unwrap();
        assert!((1..=3).contains(&placement.slot));
    }

    #[test]
    fn test_has_room() {
        let mut engine = Engine::new();
        engine.catalog.set_limit(10, Some("1"));
        assert!(engine.has_room(10));

        let mut snapshot = OccupancySnapshot::new();
        snapshot.record(10);
        engine.load_occupancy(snapshot);
        assert!(!engine.has_room(10));
        assert!(!engine.has_room(9999));
    }

    #[test]
    fn test_engine_state_hash_determinism() {
        let mut engine1 = Engine::new();
        let mut engine2 = Engine::new();

        for part in ["TSP", "PDE", "CBD", "ZZZ", "FTE"] {
            engine1.process_command(place(part));
            engine2.process_command(place(part));
        }

        assert_eq!(engine1.state_hash(), engine2.state_hash());
    }
}
