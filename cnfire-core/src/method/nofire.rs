//! Disabled fire scheme.

use super::{aggregate_leaf_carbon, init_base, FireMethod};
use crate::config::FireEmissions;
use crate::decomp::{Bounds, FilterSet};
use crate::errors::{FireError, FireResult};
use crate::fields::FieldRegistry;
use crate::state::{CnVeg, FireDrivers, SoilCarbon};
use log::debug;
use serde::{Deserialize, Serialize};

/// A fire method that never burns anything.
///
/// Burned-area diagnostics on soil columns are set to zero every timestep and
/// no carbon or nitrogen pool is touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoFire {}

impl NoFire {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl FireMethod for NoFire {
    fn name(&self) -> &'static str {
        "NoFire"
    }

    fn need_lightning_and_population_density(&self) -> bool {
        false
    }

    fn init(
        &self,
        bounds: &Bounds,
        emissions: &FireEmissions,
        registry: &mut dyn FieldRegistry,
    ) -> FireResult<()> {
        if emissions.count() > 0 {
            return Err(FireError::FireEmissionsWithoutFire {
                method: self.name().to_string(),
                mechanisms: emissions.mechanisms.clone(),
            });
        }
        init_base(bounds, registry)
    }

    fn compute_burned_area(
        &self,
        bounds: &Bounds,
        filters: &FilterSet,
        drivers: &FireDrivers<'_>,
        cnveg: &mut CnVeg,
        _soil_carbon: &SoilCarbon,
    ) {
        // Other consumers read leafc_col even though nothing burns
        aggregate_leaf_carbon(bounds, filters, drivers.subgrid, cnveg);

        // Tree carbon removed by land-use change is handled by the land-use
        // change code, so the only obligation here is zero fire area.
        let state = &mut cnveg.state;
        for c in filters.soilc.iter() {
            let ci = bounds.col(c);
            state.farea_burned[ci] = 0.0;
            state.baf_crop[ci] = 0.0;
            state.baf_peatf[ci] = 0.0;
            state.fbac[ci] = 0.0;
            state.fbac1[ci] = 0.0;
            state.lfc[ci] = 0.0;
        }
        debug!(
            "NoFire: cleared burned area on {} columns",
            filters.soilc.count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomp::Filter;
    use crate::fields::FieldCatalog;
    use crate::state::DriverState;
    use crate::subgrid::{PatchKind, Subgrid};
    use ndarray::{array, Array1};

    /// Three columns with one patch each
    fn setup() -> (Bounds, DriverState, CnVeg, SoilCarbon) {
        let bounds = Bounds::new(1, 3, 1, 3);
        let subgrid = Subgrid::new(
            &bounds,
            vec![1, 2, 3],
            array![1.0, 1.0, 1.0],
            vec![PatchKind::Tree, PatchKind::Grass, PatchKind::Crop],
            array![10.0, 45.0, 70.0],
        )
        .unwrap();
        let drivers = DriverState::new(&bounds, subgrid, 2, 1800.0);
        let cnveg = CnVeg::new(&bounds);
        let soil_carbon = SoilCarbon::new(&bounds, array![0.1], 1, None);
        (bounds, drivers, cnveg, soil_carbon)
    }

    fn fill(cnveg: &mut CnVeg, value: f64) {
        let state = &mut cnveg.state;
        for field in [
            &mut state.farea_burned,
            &mut state.baf_crop,
            &mut state.baf_peatf,
            &mut state.fbac,
            &mut state.fbac1,
            &mut state.lfc,
        ] {
            field.fill(value);
        }
    }

    fn soilc_filters(soilc: Vec<usize>) -> FilterSet {
        FilterSet {
            soilp: soilc.iter().copied().collect(),
            exposedvegp: soilc.iter().copied().collect(),
            soilc: Filter::new(soilc),
            noexposedvegp: Filter::default(),
        }
    }

    #[test]
    fn never_needs_lightning() {
        let method = NoFire::new();
        for _ in 0..3 {
            assert!(!method.need_lightning_and_population_density());
        }
        assert!(method.required_streams().is_empty());
    }

    #[test]
    fn init_without_emissions_registers_fields() {
        let (bounds, ..) = setup();
        let mut catalog = FieldCatalog::new();
        NoFire::new()
            .init(&bounds, &FireEmissions::none(), &mut catalog)
            .unwrap();

        assert!(catalog.contains("FAREA_BURNED"));
        assert!(catalog.contains("LFC"));
        assert_eq!(catalog.get("BAF_CROP").unwrap().size, 3);
    }

    #[test]
    fn init_with_emissions_fails() {
        let (bounds, ..) = setup();
        for n in 1..=2 {
            let mechanisms = (0..n).map(|i| format!("mech{}", i)).collect();
            let emissions = FireEmissions::new(mechanisms);
            let mut catalog = FieldCatalog::new();

            let err = NoFire::new()
                .init(&bounds, &emissions, &mut catalog)
                .unwrap_err();
            assert!(matches!(
                &err,
                FireError::FireEmissionsWithoutFire { method, mechanisms }
                    if method == "NoFire" && mechanisms.len() == n
            ));
            assert!(err.to_string().contains("fire-capable"));
            // Nothing is registered when validation fails
            assert!(catalog.is_empty());
        }
    }

    #[test]
    fn filtered_columns_zeroed_others_untouched() {
        let (bounds, drivers, mut cnveg, soil_carbon) = setup();
        fill(&mut cnveg, 0.4);
        let filters = soilc_filters(vec![1, 3]);

        NoFire::new().compute_burned_area(
            &bounds,
            &filters,
            &drivers.drivers(),
            &mut cnveg,
            &soil_carbon,
        );

        assert_eq!(cnveg.state.farea_burned, array![0.0, 0.4, 0.0]);
        let state = &cnveg.state;
        for field in [
            &state.baf_crop,
            &state.baf_peatf,
            &state.fbac,
            &state.fbac1,
            &state.lfc,
        ] {
            assert_eq!(field[0], 0.0);
            assert_eq!(field[1].to_bits(), 0.4_f64.to_bits());
            assert_eq!(field[2], 0.0);
        }
    }

    #[test]
    fn repeated_timesteps_stay_zero() {
        let (bounds, drivers, mut cnveg, soil_carbon) = setup();
        let filters = FilterSet::all_soil(&bounds);
        for step in 0..5 {
            fill(&mut cnveg, 0.1 * step as f64);
            NoFire::new().compute_burned_area(
                &bounds,
                &filters,
                &drivers.drivers(),
                &mut cnveg,
                &soil_carbon,
            );
            assert!(cnveg.state.farea_burned.iter().all(|v| *v == 0.0));
            assert!(cnveg.state.lfc.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn pools_and_fluxes_unchanged() {
        let (bounds, drivers, mut cnveg, soil_carbon) = setup();
        cnveg.carbon.leaf = array![100.0, 50.0, 25.0];
        cnveg.carbon.deadstem = array![1000.0, 0.0, 0.0];
        cnveg.nitrogen.leaf = array![2.0, 1.0, 0.5];
        cnveg.fluxes.fire_closs = Array1::from_elem(3, 7.0);
        let carbon = cnveg.carbon.clone();
        let nitrogen = cnveg.nitrogen.clone();
        let fluxes = cnveg.fluxes.clone();

        NoFire::new().compute_burned_area(
            &bounds,
            &FilterSet::all_soil(&bounds),
            &drivers.drivers(),
            &mut cnveg,
            &soil_carbon,
        );

        assert_eq!(cnveg.carbon, carbon);
        assert_eq!(cnveg.nitrogen, nitrogen);
        assert_eq!(cnveg.fluxes, fluxes);
        // The aggregation still runs
        assert_eq!(cnveg.state.leafc_col, array![100.0, 50.0, 25.0]);
    }

    #[test]
    fn empty_filter_is_a_no_op() {
        let (bounds, drivers, mut cnveg, soil_carbon) = setup();
        fill(&mut cnveg, 0.3);
        let before = cnveg.clone();

        NoFire::new().compute_burned_area(
            &bounds,
            &FilterSet::default(),
            &drivers.drivers(),
            &mut cnveg,
            &soil_carbon,
        );

        assert_eq!(cnveg, before);
    }

    #[test]
    fn serialisation_uses_type_tag() {
        let method: Box<dyn FireMethod> = Box::new(NoFire::new());
        let json = serde_json::to_string(&method).unwrap();
        assert_eq!(json, r#"{"type":"NoFire"}"#);

        let parsed: Box<dyn FireMethod> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name(), "NoFire");
    }
}
