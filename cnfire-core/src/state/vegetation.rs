//! Vegetation carbon/nitrogen state perturbed by fire
//!
//! [`CnVeg`] is the only bundle a fire method may write to.
//! It groups the column fire diagnostics ([`CnVegState`]), the patch carbon and
//! nitrogen pools ([`VegPools`]) and the fire loss fluxes ([`FireFluxes`]).

use crate::decomp::Bounds;
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Vegetation pools subject to fire loss
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegPool {
    Leaf = 0,
    FineRoot = 1,
    LiveStem = 2,
    DeadStem = 3,
}

impl VegPool {
    pub const ALL: [VegPool; 4] = [
        VegPool::Leaf,
        VegPool::FineRoot,
        VegPool::LiveStem,
        VegPool::DeadStem,
    ];
}

impl From<VegPool> for usize {
    fn from(pool: VegPool) -> usize {
        pool as usize
    }
}

/// Patch-level pools of one element (carbon or nitrogen)
///
/// unit: g/m2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegPools {
    pub leaf: Array1<FloatValue>,
    pub froot: Array1<FloatValue>,
    pub livestem: Array1<FloatValue>,
    pub deadstem: Array1<FloatValue>,
}

impl VegPools {
    pub fn new(bounds: &Bounds) -> Self {
        let n = bounds.num_patches();
        Self {
            leaf: Array1::zeros(n),
            froot: Array1::zeros(n),
            livestem: Array1::zeros(n),
            deadstem: Array1::zeros(n),
        }
    }

    pub fn get(&self, pool: VegPool) -> &Array1<FloatValue> {
        match pool {
            VegPool::Leaf => &self.leaf,
            VegPool::FineRoot => &self.froot,
            VegPool::LiveStem => &self.livestem,
            VegPool::DeadStem => &self.deadstem,
        }
    }

    pub fn get_mut(&mut self, pool: VegPool) -> &mut Array1<FloatValue> {
        match pool {
            VegPool::Leaf => &mut self.leaf,
            VegPool::FineRoot => &mut self.froot,
            VegPool::LiveStem => &mut self.livestem,
            VegPool::DeadStem => &mut self.deadstem,
        }
    }

    /// Sum over all pools of local patch `pi`
    pub fn total(&self, pi: usize) -> FloatValue {
        VegPool::ALL.iter().map(|pool| self.get(*pool)[pi]).sum()
    }
}

/// Column fire diagnostics
///
/// Burned-area fields are rates, unit: proportion/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnVegState {
    /// Leaf carbon aggregated from patches
    /// unit: gC/m2
    pub leafc_col: Array1<FloatValue>,
    /// Total fractional area burned
    pub farea_burned: Array1<FloatValue>,
    /// Fractional area burned on cropland
    pub baf_crop: Array1<FloatValue>,
    /// Fractional area burned on peatland
    pub baf_peatf: Array1<FloatValue>,
    /// Total fractional area burned in land-use conversion regions
    pub fbac: Array1<FloatValue>,
    /// Fractional area burned by land-use conversion fire
    pub fbac1: Array1<FloatValue>,
    /// Conversion-eligible area fraction not yet burned
    /// unit: proportion
    pub lfc: Array1<FloatValue>,
    /// Fire counts
    /// unit: counts/km2/s
    pub nfire: Array1<FloatValue>,
}

impl CnVegState {
    pub fn new(bounds: &Bounds) -> Self {
        let n = bounds.num_columns();
        Self {
            leafc_col: Array1::zeros(n),
            farea_burned: Array1::zeros(n),
            baf_crop: Array1::zeros(n),
            baf_peatf: Array1::zeros(n),
            fbac: Array1::zeros(n),
            fbac1: Array1::zeros(n),
            lfc: Array1::zeros(n),
            nfire: Array1::zeros(n),
        }
    }
}

/// Carbon and nitrogen lost to fire
///
/// unit: g/m2/s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireFluxes {
    /// Patch carbon emitted to the atmosphere
    pub fire_closs: Array1<FloatValue>,
    /// Patch nitrogen emitted to the atmosphere
    pub fire_nloss: Array1<FloatValue>,
    /// Patch carbon transferred to litter by fire mortality
    pub m_c_to_litter_fire: Array1<FloatValue>,
    /// Patch nitrogen transferred to litter by fire mortality
    pub m_n_to_litter_fire: Array1<FloatValue>,
    pub fire_closs_col: Array1<FloatValue>,
    pub fire_nloss_col: Array1<FloatValue>,
}

impl FireFluxes {
    pub fn new(bounds: &Bounds) -> Self {
        let np = bounds.num_patches();
        let nc = bounds.num_columns();
        Self {
            fire_closs: Array1::zeros(np),
            fire_nloss: Array1::zeros(np),
            m_c_to_litter_fire: Array1::zeros(np),
            m_n_to_litter_fire: Array1::zeros(np),
            fire_closs_col: Array1::zeros(nc),
            fire_nloss_col: Array1::zeros(nc),
        }
    }
}

/// Read/write vegetation carbon/nitrogen bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnVeg {
    pub state: CnVegState,
    pub carbon: VegPools,
    pub nitrogen: VegPools,
    pub fluxes: FireFluxes,
}

impl CnVeg {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            state: CnVegState::new(bounds),
            carbon: VegPools::new(bounds),
            nitrogen: VegPools::new(bounds),
            fluxes: FireFluxes::new(bounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_by_kind() {
        let bounds = Bounds::new(1, 1, 1, 2);
        let mut pools = VegPools::new(&bounds);
        pools.get_mut(VegPool::Leaf)[0] = 1.0;
        pools.get_mut(VegPool::FineRoot)[0] = 2.0;
        pools.get_mut(VegPool::LiveStem)[0] = 3.0;
        pools.get_mut(VegPool::DeadStem)[0] = 4.0;

        assert_eq!(pools.leaf[0], 1.0);
        assert_eq!(pools.deadstem[0], 4.0);
        assert_eq!(pools.total(0), 10.0);
        assert_eq!(pools.total(1), 0.0);
    }

    #[test]
    fn sizes_follow_bounds() {
        let bounds = Bounds::new(5, 7, 10, 14);
        let cnveg = CnVeg::new(&bounds);
        assert_eq!(cnveg.state.farea_burned.len(), 3);
        assert_eq!(cnveg.carbon.leaf.len(), 5);
        assert_eq!(cnveg.fluxes.fire_closs.len(), 5);
        assert_eq!(cnveg.fluxes.fire_closs_col.len(), 3);
    }
}
