//! Soil properties, water retention and soil carbon diagnostics

use crate::decomp::Bounds;
use crate::FloatValue;
use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};

/// Freezing temperature of fresh water
/// unit: K
pub const TFRZ: FloatValue = 273.15;

/// Soil hydraulic properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilState {
    /// Volumetric water content at saturation (porosity), column x soil level
    /// unit: m3/m3
    pub watsat: Array2<FloatValue>,
    /// Minimum soil suction, column x soil level
    /// unit: mm
    pub sucsat: Array2<FloatValue>,
    /// Clapp and Hornberger "b", column x soil level
    /// unit: dimensionless
    pub bsw: Array2<FloatValue>,
    /// Fraction of the column covered by peatland
    /// unit: dimensionless
    pub peatf: Array1<FloatValue>,
}

impl SoilState {
    /// Loam-like soil without peat
    pub fn new(bounds: &Bounds, nlevsoi: usize) -> Self {
        let shape = (bounds.num_columns(), nlevsoi);
        Self {
            watsat: Array2::from_elem(shape, 0.45),
            sucsat: Array2::from_elem(shape, 200.0),
            bsw: Array2::from_elem(shape, 6.0),
            peatf: Array1::zeros(bounds.num_columns()),
        }
    }
}

/// Relationship between soil water content and soil matric potential
pub trait SoilWaterRetentionCurve: std::fmt::Debug + Send + Sync {
    /// Soil suction for relative saturation `s`
    ///
    /// # Arguments
    ///
    /// * `sucsat` - Minimum soil suction (mm)
    /// * `s` - Relative saturation, water content over porosity (0, 1]
    /// * `bsw` - Shape parameter
    ///
    /// # Returns
    ///
    /// Soil matric potential (mm, negative)
    fn soil_suction(&self, sucsat: FloatValue, s: FloatValue, bsw: FloatValue) -> FloatValue;
}

/// Clapp and Hornberger (1978) power-law retention curve
///
/// $$\psi = -\psi_{sat} s^{-b}$$
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClappHornberger1978;

impl SoilWaterRetentionCurve for ClappHornberger1978 {
    fn soil_suction(&self, sucsat: FloatValue, s: FloatValue, bsw: FloatValue) -> FloatValue {
        -sucsat * s.powf(-bsw)
    }
}

/// Column soil carbon series read by fire methods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilCarbon {
    /// Total litter carbon
    /// unit: gC/m2
    pub totlitc: Array1<FloatValue>,
    /// Decomposable carbon pools, column x decomposition level x pool
    /// unit: gC/m3
    pub decomp_cpools_vr: Array3<FloatValue>,
    /// Thickness of each decomposition level
    /// unit: m
    pub dzsoi_decomp: Array1<FloatValue>,
    /// Pool index of coarse woody debris, if the decomposition cascade has one
    pub cwd_pool: Option<usize>,
    /// Soil temperature at 17 cm depth
    /// unit: K
    pub t_soi17cm: Array1<FloatValue>,
}

impl SoilCarbon {
    /// Empty pools at the freezing point
    pub fn new(
        bounds: &Bounds,
        dzsoi_decomp: Array1<FloatValue>,
        ndecomp_pools: usize,
        cwd_pool: Option<usize>,
    ) -> Self {
        let n = bounds.num_columns();
        Self {
            totlitc: Array1::zeros(n),
            decomp_cpools_vr: Array3::zeros((n, dzsoi_decomp.len(), ndecomp_pools)),
            dzsoi_decomp,
            cwd_pool,
            t_soi17cm: Array1::from_elem(n, TFRZ),
        }
    }

    /// Depth-integrated coarse woody debris of local column `ci`
    ///
    /// unit: gC/m2
    pub fn cwdc(&self, ci: usize) -> FloatValue {
        match self.cwd_pool {
            Some(pool) => self
                .dzsoi_decomp
                .iter()
                .enumerate()
                .map(|(lev, dz)| self.decomp_cpools_vr[[ci, lev, pool]] * dz)
                .sum(),
            None => 0.0,
        }
    }
}
