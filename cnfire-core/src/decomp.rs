//! Decomposed spatial domain: per-partition bounds and per-timestep filters.
//!
//! A partition owns a contiguous, inclusive range of global column ids and a
//! contiguous, inclusive range of global patch ids.
//! Dense state arrays cover the whole range and are addressed by local index
//! (`id - begin`).
//! Filters list the global ids that are active for the current timestep.
//!
//! # Examples
//!
//! ```rust
//! use cnfire_core::decomp::{Bounds, Filter};
//!
//! let bounds = Bounds::new(1, 3, 1, 6);
//! assert_eq!(bounds.num_columns(), 3);
//! assert_eq!(bounds.col(3), 2);
//!
//! let soilc = Filter::new(vec![1, 3]);
//! assert_eq!(soilc.count(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The two kinds of entity a field can be indexed by
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Vertical land unit owning area-integrated state
    Column,
    /// Vegetation unit nested within a column
    Patch,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Column => write!(f, "column"),
            EntityKind::Patch => write!(f, "patch"),
        }
    }
}

/// Index ranges of a single domain partition
///
/// Both ranges are inclusive and expressed as global ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub begc: usize,
    pub endc: usize,
    pub begp: usize,
    pub endp: usize,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    ///
    /// Panics if either range is empty.
    pub fn new(begc: usize, endc: usize, begp: usize, endp: usize) -> Self {
        assert!(begc <= endc, "Column range is empty: {}..={}", begc, endc);
        assert!(begp <= endp, "Patch range is empty: {}..={}", begp, endp);
        Self {
            begc,
            endc,
            begp,
            endp,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.endc - self.begc + 1
    }

    pub fn num_patches(&self) -> usize {
        self.endp - self.begp + 1
    }

    /// Number of entities of the given kind
    pub fn size(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Column => self.num_columns(),
            EntityKind::Patch => self.num_patches(),
        }
    }

    /// Local array index of global column `c`
    #[inline]
    pub fn col(&self, c: usize) -> usize {
        debug_assert!(
            self.contains_column(c),
            "Column {} outside bounds {}..={}",
            c,
            self.begc,
            self.endc
        );
        c - self.begc
    }

    /// Local array index of global patch `p`
    #[inline]
    pub fn patch(&self, p: usize) -> usize {
        debug_assert!(
            self.contains_patch(p),
            "Patch {} outside bounds {}..={}",
            p,
            self.begp,
            self.endp
        );
        p - self.begp
    }

    pub fn contains_column(&self, c: usize) -> bool {
        (self.begc..=self.endc).contains(&c)
    }

    pub fn contains_patch(&self, p: usize) -> bool {
        (self.begp..=self.endp).contains(&p)
    }
}

/// An ordered subset of active entity ids for the current timestep
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    indices: Vec<usize>,
}

impl Filter {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Number of active entries
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

impl From<Vec<usize>> for Filter {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

impl FromIterator<usize> for Filter {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The filters a fire method consumes each timestep
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Soil columns
    pub soilc: Filter,
    /// Patches on soil columns
    pub soilp: Filter,
    /// Patches with vegetation exposed above the snow
    pub exposedvegp: Filter,
    /// Patches with vegetation buried by snow, or no vegetation
    pub noexposedvegp: Filter,
}

impl FilterSet {
    /// Filters where every column and patch within the bounds is soil and
    /// all vegetation is exposed
    pub fn all_soil(bounds: &Bounds) -> Self {
        let patches: Filter = (bounds.begp..=bounds.endp).collect();
        Self {
            soilc: (bounds.begc..=bounds.endc).collect(),
            soilp: patches.clone(),
            exposedvegp: patches,
            noexposedvegp: Filter::default(),
        }
    }
}
