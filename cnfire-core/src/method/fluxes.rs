//! Carbon and nitrogen losses from burned area.

use crate::decomp::{Bounds, FilterSet};
use crate::errors::{FireError, FireResult};
use crate::state::{CnVeg, VegPool};
use crate::subgrid::{p2c, Subgrid};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Per-pool fire loss factors
///
/// Of the burned part of a pool, the fraction `combustion` is emitted to the
/// atmosphere and the fraction `mortality` of the remainder dies and becomes
/// litter.
/// Indexed by [`VegPool`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombustionFactors {
    /// Combustion completeness
    /// unit: dimensionless
    pub combustion: [FloatValue; 4],
    /// Mortality of the uncombusted part
    /// unit: dimensionless
    pub mortality: [FloatValue; 4],
}

impl Default for CombustionFactors {
    fn default() -> Self {
        Self {
            // leaf, fine root, live stem, dead stem
            combustion: [0.80, 0.0, 0.50, 0.15],
            mortality: [0.80, 0.20, 0.50, 0.15],
        }
    }
}

impl CombustionFactors {
    pub fn combustion(&self, pool: VegPool) -> FloatValue {
        self.combustion[usize::from(pool)]
    }

    pub fn mortality(&self, pool: VegPool) -> FloatValue {
        self.mortality[usize::from(pool)]
    }

    /// Check that every factor is a fraction
    pub fn validate(&self) -> FireResult<()> {
        for pool in VegPool::ALL {
            for (name, value) in [
                ("combustion", self.combustion(pool)),
                ("mortality", self.mortality(pool)),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(FireError::InvalidParameter {
                        parameter: format!("{}[{:?}]", name, pool),
                        reason: format!("must be within [0, 1], got {}", value),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Remove carbon and nitrogen burned during this timestep
///
/// For each active patch in `filters.soilp` on a column of `filters.soilc`,
/// the fraction `farea_burned * dtime` of every pool burns.
/// Inactive patches keep their pools and report zero loss.
/// Patch loss rates are stored in `cnveg.fluxes` and aggregated to columns.
pub fn apply_fire_losses(
    bounds: &Bounds,
    filters: &FilterSet,
    subgrid: &Subgrid,
    dtime: FloatValue,
    factors: &CombustionFactors,
    cnveg: &mut CnVeg,
) {
    let mut in_filter = vec![false; bounds.num_columns()];
    for c in filters.soilc.iter() {
        in_filter[bounds.col(c)] = true;
    }

    for p in filters.soilp.iter() {
        let pi = bounds.patch(p);
        let ci = bounds.col(subgrid.column_of(pi));
        if !in_filter[ci] {
            continue;
        }
        if !subgrid.is_active(pi) {
            let fluxes = &mut cnveg.fluxes;
            fluxes.fire_closs[pi] = 0.0;
            fluxes.m_c_to_litter_fire[pi] = 0.0;
            fluxes.fire_nloss[pi] = 0.0;
            fluxes.m_n_to_litter_fire[pi] = 0.0;
            continue;
        }
        let burned = (cnveg.state.farea_burned[ci] * dtime).clamp(0.0, 1.0);

        let mut closs = 0.0;
        let mut c_to_litter = 0.0;
        let mut nloss = 0.0;
        let mut n_to_litter = 0.0;
        for pool in VegPool::ALL {
            let cc = factors.combustion(pool);
            let fm = factors.mortality(pool);

            let carbon = &mut cnveg.carbon.get_mut(pool)[pi];
            let to_fire = *carbon * burned * cc;
            let to_litter = *carbon * burned * (1.0 - cc) * fm;
            *carbon -= to_fire + to_litter;
            closs += to_fire;
            c_to_litter += to_litter;

            let nitrogen = &mut cnveg.nitrogen.get_mut(pool)[pi];
            let to_fire = *nitrogen * burned * cc;
            let to_litter = *nitrogen * burned * (1.0 - cc) * fm;
            *nitrogen -= to_fire + to_litter;
            nloss += to_fire;
            n_to_litter += to_litter;
        }

        let fluxes = &mut cnveg.fluxes;
        fluxes.fire_closs[pi] = closs / dtime;
        fluxes.m_c_to_litter_fire[pi] = c_to_litter / dtime;
        fluxes.fire_nloss[pi] = nloss / dtime;
        fluxes.m_n_to_litter_fire[pi] = n_to_litter / dtime;
    }

    let fluxes = &mut cnveg.fluxes;
    p2c(
        bounds,
        subgrid,
        &filters.soilc,
        &filters.soilp,
        &fluxes.fire_closs,
        &mut fluxes.fire_closs_col,
    );
    p2c(
        bounds,
        subgrid,
        &filters.soilc,
        &filters.soilp,
        &fluxes.fire_nloss,
        &mut fluxes.fire_nloss_col,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subgrid::PatchKind;
    use is_close::is_close;
    use ndarray::array;

    fn setup() -> (Bounds, Subgrid, CnVeg) {
        let bounds = Bounds::new(1, 2, 1, 3);
        let subgrid = Subgrid::new(
            &bounds,
            vec![1, 1, 2],
            array![0.5, 0.5, 1.0],
            vec![PatchKind::Tree, PatchKind::Grass, PatchKind::Tree],
            array![0.0, 0.0],
        )
        .unwrap();
        let mut cnveg = CnVeg::new(&bounds);
        for pool in VegPool::ALL {
            cnveg.carbon.get_mut(pool).fill(100.0);
            cnveg.nitrogen.get_mut(pool).fill(2.0);
        }
        (bounds, subgrid, cnveg)
    }

    #[test]
    fn default_factors_are_valid() {
        assert!(CombustionFactors::default().validate().is_ok());
    }

    #[test]
    fn invalid_factor_rejected() {
        let mut factors = CombustionFactors::default();
        factors.mortality[2] = 1.5;
        let err = factors.validate().unwrap_err();
        assert!(err.to_string().contains("mortality[LiveStem]"));
    }

    #[test]
    fn no_burned_area_no_loss() {
        let (bounds, subgrid, mut cnveg) = setup();
        let before = cnveg.carbon.clone();
        apply_fire_losses(
            &bounds,
            &FilterSet::all_soil(&bounds),
            &subgrid,
            1800.0,
            &CombustionFactors::default(),
            &mut cnveg,
        );
        assert_eq!(cnveg.carbon, before);
        assert!(cnveg.fluxes.fire_closs.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn losses_balance_pool_change() {
        let (bounds, subgrid, mut cnveg) = setup();
        let dtime = 1800.0;
        // 10% of column 1 burns this timestep
        cnveg.state.farea_burned = array![0.1 / dtime, 0.0];
        let factors = CombustionFactors::default();

        apply_fire_losses(
            &bounds,
            &FilterSet::all_soil(&bounds),
            &subgrid,
            dtime,
            &factors,
            &mut cnveg,
        );

        // Leaf: 100 * 0.1 * 0.8 emitted, 100 * 0.1 * 0.2 * 0.8 to litter
        assert!(is_close!(cnveg.carbon.leaf[0], 100.0 - 8.0 - 1.6));
        for pi in 0..2 {
            let removed = 400.0 - cnveg.carbon.total(pi);
            let lost = (cnveg.fluxes.fire_closs[pi] + cnveg.fluxes.m_c_to_litter_fire[pi]) * dtime;
            assert!(is_close!(removed, lost));
        }
        // Unburned column
        assert_eq!(cnveg.carbon.total(2), 400.0);
        assert!(is_close!(
            cnveg.fluxes.fire_closs_col[0],
            cnveg.fluxes.fire_closs[0]
        ));
        assert_eq!(cnveg.fluxes.fire_closs_col[1], 0.0);
        assert!(cnveg.fluxes.fire_nloss_col[0] > 0.0);
    }

    #[test]
    fn burned_fraction_capped_at_one() {
        let (bounds, subgrid, mut cnveg) = setup();
        cnveg.state.farea_burned = array![10.0, 10.0];
        let factors = CombustionFactors {
            combustion: [1.0; 4],
            mortality: [0.0; 4],
        };
        apply_fire_losses(
            &bounds,
            &FilterSet::all_soil(&bounds),
            &subgrid,
            1800.0,
            &factors,
            &mut cnveg,
        );
        for pi in 0..3 {
            assert_eq!(cnveg.carbon.total(pi), 0.0);
            assert_eq!(cnveg.nitrogen.total(pi), 0.0);
        }
    }

    #[test]
    fn inactive_patches_keep_their_pools() {
        let (bounds, subgrid, mut cnveg) = setup();
        let subgrid = subgrid.with_active(vec![true, false, true]);
        let dtime = 1800.0;
        cnveg.state.farea_burned = array![0.5 / dtime, 0.0];
        cnveg.fluxes.fire_closs[1] = 3.0;

        apply_fire_losses(
            &bounds,
            &FilterSet::all_soil(&bounds),
            &subgrid,
            dtime,
            &CombustionFactors::default(),
            &mut cnveg,
        );

        assert_eq!(cnveg.carbon.total(1), 400.0);
        assert_eq!(cnveg.nitrogen.total(1), 8.0);
        assert_eq!(cnveg.fluxes.fire_closs[1], 0.0);
        assert!(cnveg.carbon.total(0) < 400.0);

        // Column loss matches what left the pools
        let removed: f64 = (0..2).map(|pi| 0.5 * (400.0 - cnveg.carbon.total(pi))).sum();
        let reported = (cnveg.fluxes.fire_closs_col[0]
            + 0.5 * cnveg.fluxes.m_c_to_litter_fire[0])
            * dtime;
        assert!(is_close!(removed, reported));
    }

    #[test]
    fn unfiltered_columns_untouched() {
        let (bounds, subgrid, mut cnveg) = setup();
        cnveg.state.farea_burned = array![1.0e-4, 1.0e-4];
        cnveg.fluxes.fire_closs_col = array![-1.0, -1.0];
        let filters = FilterSet {
            soilc: vec![2].into(),
            soilp: vec![1, 2, 3].into(),
            ..FilterSet::default()
        };

        apply_fire_losses(
            &bounds,
            &filters,
            &subgrid,
            1800.0,
            &CombustionFactors::default(),
            &mut cnveg,
        );

        assert_eq!(cnveg.carbon.total(0), 400.0);
        assert_eq!(cnveg.fluxes.fire_closs_col[0], -1.0);
        assert!(cnveg.carbon.total(2) < 400.0);
    }
}
