//! Parts catalog - oversize flags keyed by (project, part).
//!
//! Certain project/part combinations are registered as oversize ("GG")
//! and must only ever land in the reserved low-numbered slots. The
//! catalog is loaded from the cut-file registry by the caller; the
//! allocator only asks the yes/no question.

use rustc_hash::FxHashSet;

use crate::request::{PartCode, ProjectCode};

/// Read view of oversize registrations.
#[derive(Clone, Default)]
pub struct PartsCatalog {
    oversize: FxHashSet<(ProjectCode, PartCode)>,
}

impl PartsCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            oversize: FxHashSet::default(),
        }
    }

    /// Register a project/part combination as oversize
    pub fn flag_oversize(&mut self, project: ProjectCode, part: PartCode) {
        self.oversize.insert((project, part));
    }

    /// Is this project/part combination flagged oversize?
    ///
    /// Missing entries simply answer `false`; an empty project code only
    /// matches registrations made without a project.
    #[inline]
    pub fn is_oversize(&self, project: ProjectCode, part: PartCode) -> bool {
        self.oversize.contains(&(project, part))
    }

    /// Number of oversize registrations
    pub fn len(&self) -> usize {
        self.oversize.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.oversize.is_empty()
    }
}

impl std::fmt::Debug for PartsCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartsCatalog")
            .field("oversize_entries", &self.oversize.len())
            .finish()
    }
}
