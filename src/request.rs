//! Command and Event types for the allocation engine.
//!
//! Commands are placement inputs from the intake layer.
//! Events are outputs for the persistence layer to commit.

use arrayvec::ArrayString;

use crate::category::Category;
use crate::slot::SlotId;

/// Maximum length of a part-type code (codes are typically 3 letters)
pub const MAX_PART_CODE_LEN: usize = 8;

/// Maximum length of a project code
pub const MAX_PROJECT_CODE_LEN: usize = 16;

/// A part-type code: short, non-empty, uppercase ASCII.
///
/// Stored inline (no heap allocation) so requests stay `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartCode(ArrayString<MAX_PART_CODE_LEN>);

impl PartCode {
    /// Parse a raw code: trims whitespace and uppercases ASCII.
    ///
    /// # Returns
    /// `None` if the trimmed code is empty or longer than
    /// [`MAX_PART_CODE_LEN`].
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_PART_CODE_LEN {
            return None;
        }
        let mut code = ArrayString::new();
        for ch in trimmed.chars() {
            code.push(ch.to_ascii_uppercase());
        }
        Some(Self(code))
    }

    /// View the code as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PartCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PartCode({})", self.0.as_str())
    }
}

impl std::fmt::Display for PartCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A project code. May be empty: some placements arrive without one,
/// and project only matters for the oversize lookup.
///
/// Comparisons are trimmed and uppercased at construction, matching how
/// the parts catalog keys its entries.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProjectCode(ArrayString<MAX_PROJECT_CODE_LEN>);

impl ProjectCode {
    /// Parse a raw project code: trims and uppercases.
    ///
    /// # Returns
    /// `None` only if the trimmed code is too long. An empty code is
    /// valid and means "no project".
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() > MAX_PROJECT_CODE_LEN {
            return None;
        }
        let mut code = ArrayString::new();
        for ch in trimmed.chars() {
            code.push(ch.to_ascii_uppercase());
        }
        Some(Self(code))
    }

    /// The empty project code
    #[inline]
    pub const fn none() -> Self {
        Self(ArrayString::new_const())
    }

    /// Returns true if no project was given
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the code as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for ProjectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProjectCode({})", self.0.as_str())
    }
}

impl std::fmt::Display for ProjectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// ============================================================================
// Input Commands
// ============================================================================

/// Place one part into a storage slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceRequest {
    /// Part-type code (drives category routing)
    pub part: PartCode,
    /// Project code (drives the oversize lookup; may be empty)
    pub project: ProjectCode,
}

impl PlaceRequest {
    /// Build a request from raw code strings.
    pub fn new(part: &str, project: &str) -> Option<Self> {
        Some(Self {
            part: PartCode::new(part)?,
            project: ProjectCode::new(project)?,
        })
    }
}

/// Input commands from the intake layer
#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Start a new batch: clears the overlay so reservations from a
    /// previous unrelated batch never leak into this one
    BeginBatch,
    /// Allocate a slot for one part
    Place(PlaceRequest),
}

// ============================================================================
// Output Events
// ============================================================================

/// A part was assigned a slot (pending commit by the caller)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assigned {
    /// The part that was placed
    pub part: PartCode,
    /// The selected slot
    pub slot: SlotId,
    /// Which category routed the placement
    pub category: Category,
}

/// Reasons a part could not be placed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SkipReason {
    /// All eligible slots are at or above their limit (or, for
    /// paired-layer parts, none are at occupancy 0 or 1)
    NoCapacity = 0,
}

/// A part was skipped. Not an error: the batch continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// The part that could not be placed
    pub part: PartCode,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Output events from the allocation engine
#[derive(Clone, Copy, Debug)]
pub enum OutputEvent {
    /// A slot was assigned
    Assigned(Assigned),
    /// No eligible slot had capacity; the part was skipped
    Skipped(Skipped),
    /// The overlay was reset for a new batch
    BatchStarted,
}
