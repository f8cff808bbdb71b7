//! Patch-to-column subgrid structure and area-weighted aggregation
//!
//! Each patch belongs to exactly one column and carries the fraction of the
//! column's area it occupies (`wtcol`).
//! The weights of the patches of a column sum to 1, so aggregating a patch
//! field to its column is an area-weighted mean.
//!
//! # Examples
//!
//! ```rust
//! use cnfire_core::decomp::{Bounds, Filter};
//! use cnfire_core::subgrid::{p2c, PatchKind, Subgrid};
//! use ndarray::array;
//!
//! let bounds = Bounds::new(1, 1, 1, 2);
//! let subgrid = Subgrid::new(
//!     &bounds,
//!     vec![1, 1],
//!     array![0.25, 0.75],
//!     vec![PatchKind::Tree, PatchKind::Grass],
//!     array![45.0],
//! )
//! .unwrap();
//!
//! let leafc = array![100.0, 20.0];
//! let mut leafc_col = array![0.0];
//! p2c(&bounds, &subgrid, &Filter::new(vec![1]), &Filter::new(vec![1, 2]), &leafc, &mut leafc_col);
//! // 0.25 * 100 + 0.75 * 20
//! assert_eq!(leafc_col[0], 40.0);
//! ```

use crate::decomp::{Bounds, Filter};
use crate::errors::{FireError, FireResult};
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Broad vegetation class of a patch
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchKind {
    /// No vegetation
    BareGround,
    Tree,
    Shrub,
    Grass,
    Crop,
}

impl PatchKind {
    pub fn is_crop(&self) -> bool {
        matches!(self, PatchKind::Crop)
    }
}

/// Nesting of patches within columns for one partition
///
/// Patch arrays are indexed by local patch index, column arrays by local
/// column index (see [`Bounds`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subgrid {
    /// Global column id of each patch
    patch_column: Vec<usize>,
    /// Area weight of each patch relative to its column
    wtcol: Array1<FloatValue>,
    /// Whether each patch takes part in aggregation
    active: Vec<bool>,
    kind: Vec<PatchKind>,
    /// Latitude of each column
    /// unit: degrees north
    column_lat: Array1<FloatValue>,
}

impl Subgrid {
    /// Create a subgrid with every patch active
    ///
    /// Fails if array lengths do not match the bounds, if a patch points at a
    /// column outside the bounds, or if the weights of any column with patches
    /// do not sum to approximately 1.0 (within 1e-6)
    pub fn new(
        bounds: &Bounds,
        patch_column: Vec<usize>,
        wtcol: Array1<FloatValue>,
        kind: Vec<PatchKind>,
        column_lat: Array1<FloatValue>,
    ) -> FireResult<Self> {
        let n_patches = bounds.num_patches();
        for (parameter, len, expected) in [
            ("patch_column", patch_column.len(), n_patches),
            ("wtcol", wtcol.len(), n_patches),
            ("kind", kind.len(), n_patches),
            ("column_lat", column_lat.len(), bounds.num_columns()),
        ] {
            if len != expected {
                return Err(invalid(
                    parameter,
                    format!("expected {} entries, got {}", expected, len),
                ));
            }
        }

        let mut sums = vec![0.0; bounds.num_columns()];
        let mut has_patches = vec![false; bounds.num_columns()];
        for (c, w) in patch_column.iter().zip(wtcol.iter()) {
            if !bounds.contains_column(*c) {
                return Err(invalid(
                    "patch_column",
                    format!("column {} outside bounds {}..={}", c, bounds.begc, bounds.endc),
                ));
            }
            sums[bounds.col(*c)] += w;
            has_patches[bounds.col(*c)] = true;
        }
        for (i, (sum, any)) in sums.iter().zip(has_patches.iter()).enumerate() {
            if *any && (sum - 1.0).abs() >= 1e-6 {
                return Err(invalid(
                    "wtcol",
                    format!(
                        "Weights must sum to 1.0 within column {}, got {}",
                        bounds.begc + i,
                        sum
                    ),
                ));
            }
        }

        Ok(Self {
            active: vec![true; n_patches],
            patch_column,
            wtcol,
            kind,
            column_lat,
        })
    }

    /// Replace the active flags
    pub fn with_active(mut self, active: Vec<bool>) -> Self {
        assert_eq!(active.len(), self.active.len(), "active length");
        self.active = active;
        self
    }

    /// Global column id of local patch `pi`
    pub fn column_of(&self, pi: usize) -> usize {
        self.patch_column[pi]
    }

    pub fn wtcol(&self, pi: usize) -> FloatValue {
        self.wtcol[pi]
    }

    pub fn is_active(&self, pi: usize) -> bool {
        self.active[pi]
    }

    pub fn kind(&self, pi: usize) -> PatchKind {
        self.kind[pi]
    }

    /// Latitude of local column `ci`
    pub fn lat(&self, ci: usize) -> FloatValue {
        self.column_lat[ci]
    }
}

fn invalid(parameter: &str, reason: String) -> FireError {
    FireError::InvalidParameter {
        parameter: parameter.to_string(),
        reason,
    }
}

/// Aggregate a patch field to its columns with area weights
///
/// Every column in `filter_c` is overwritten with the weighted sum
/// over the active patches of `filter_p` that belong to it.
/// Columns outside `filter_c` are not written, and patches whose column is
/// not in `filter_c` are ignored.
///
/// # Panics
///
/// Panics if the arrays do not cover the bounds.
pub fn p2c(
    bounds: &Bounds,
    subgrid: &Subgrid,
    filter_c: &Filter,
    filter_p: &Filter,
    patch_values: &Array1<FloatValue>,
    column_values: &mut Array1<FloatValue>,
) {
    assert_eq!(patch_values.len(), bounds.num_patches());
    assert_eq!(column_values.len(), bounds.num_columns());

    let mut in_filter = vec![false; bounds.num_columns()];
    for c in filter_c.iter() {
        let ci = bounds.col(c);
        in_filter[ci] = true;
        column_values[ci] = 0.0;
    }

    for p in filter_p.iter() {
        let pi = bounds.patch(p);
        if !subgrid.is_active(pi) {
            continue;
        }
        let ci = bounds.col(subgrid.column_of(pi));
        if in_filter[ci] {
            column_values[ci] += subgrid.wtcol(pi) * patch_values[pi];
        }
    }
}

/// Fraction of each filtered column's area matching a patch predicate
pub fn column_fraction<F>(
    bounds: &Bounds,
    subgrid: &Subgrid,
    filter_c: &Filter,
    filter_p: &Filter,
    predicate: F,
) -> Array1<FloatValue>
where
    F: Fn(PatchKind) -> bool,
{
    let indicator = Array1::from_iter(
        (0..bounds.num_patches()).map(|pi| if predicate(subgrid.kind(pi)) { 1.0 } else { 0.0 }),
    );
    let mut fraction = Array1::zeros(bounds.num_columns());
    p2c(bounds, subgrid, filter_c, filter_p, &indicator, &mut fraction);
    fraction
}
