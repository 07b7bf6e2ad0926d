//! # Rackfill
//!
//! A deterministic warehouse slot allocation engine for cut-part
//! inventory.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: One owner drives a batch exclusively (no locks)
//! - **Deterministic**: Identical snapshot + inputs always select the
//!   same slot; ranges are walked in declared ascending order
//! - **Pure Core**: The allocator never performs I/O; persistence of a
//!   placement is the caller's responsibility
//! - **Overlay Accounting**: Batch-local reservations keep sequential
//!   allocations consistent before anything is committed
//!
//! ## Architecture
//!
//! ```text
//! [Intake (import/manual)] --> [Commands] --> [Engine (per batch)]
//!                                                   |
//!                              [Assigned / Skipped Events] --> [Store]
//! ```

pub mod allocator;
pub mod category;
pub mod engine;
pub mod import;
pub mod occupancy;
pub mod parts;
pub mod request;
pub mod slot;

// Re-exports for convenience
pub use allocator::{Allocator, Placement, PAIRED_LAYER_CAP};
pub use category::{Category, RoutingTable};
pub use engine::Engine;
pub use import::CutPlanRow;
pub use occupancy::{OccupancySnapshot, Overlay};
pub use parts::PartsCatalog;
pub use request::{
    Assigned, Command, OutputEvent, PartCode, PlaceRequest, ProjectCode, SkipReason, Skipped,
};
pub use slot::{SlotCatalog, SlotId, SlotRecord, SlotStatus, DEFAULT_SLOT_LIMIT};
