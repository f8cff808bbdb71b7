//! Empirical burned-area scheme
//!
//! Burned area is the sum of four sources, each a rate per second:
//!
//! - natural and human-ignited fires outside croplands
//! - agricultural residue burning on crop patches
//! - peat fires
//! - deforestation fires in land-use conversion regions
//!
//! Natural fires follow the product of ignition counts, fuel availability,
//! fuel combustibility and the area burned by a single fire.

use cnfire_core::config::FireEmissions;
use cnfire_core::decomp::{Bounds, FilterSet};
use cnfire_core::errors::{FireError, FireResult};
use cnfire_core::fields::FieldRegistry;
use cnfire_core::method::{
    aggregate_leaf_carbon, apply_fire_losses, init_base, CombustionFactors, FireMethod,
};
use cnfire_core::state::{CnVeg, FireDrivers, SoilCarbon, TFRZ};
use cnfire_core::subgrid::{column_fraction, p2c};
use cnfire_core::FloatValue;
use log::{debug, info, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const SECSPHR: FloatValue = 3600.0;

/// Parameters for the empirical burned-area scheme
///
/// Every field has a default, so a configuration only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiFireParameters {
    /// Latitude poleward of which peat fires follow the boreal formulation
    /// unit: degrees
    pub borealat: FloatValue,
    /// Fuel load below which fires do not spread
    /// unit: gC/m2
    pub lfuel: FloatValue,
    /// Fuel load above which fuel is not limiting
    /// unit: gC/m2
    pub ufuel: FloatValue,
    /// Relative humidity below which fuel is fully combustible
    /// unit: %
    pub rh_low: FloatValue,
    /// Relative humidity above which fuel does not burn
    /// unit: %
    pub rh_hgh: FloatValue,
    /// Root zone wetness below which fuel is fully combustible
    /// unit: dimensionless
    pub bt_min: FloatValue,
    /// Root zone wetness above which fuel does not burn
    /// unit: dimensionless
    pub bt_max: FloatValue,
    /// Potential human ignitions per person
    /// unit: counts/person/month
    pub pot_hmn_ign_counts_alpha: FloatValue,
    /// Fraction of lightning flashes that reach the ground
    /// unit: dimensionless
    pub cg_ratio: FloatValue,
    /// Average lifetime of a fire
    /// unit: s
    pub fire_duration: FloatValue,
    /// Rate of spread of a fire in fully combustible fuel
    /// unit: m/s
    pub max_spread_rate: FloatValue,
    /// unit: 1/hr
    pub boreal_peatfire_c: FloatValue,
    /// unit: 1/hr
    pub non_boreal_peatfire_c: FloatValue,
    /// Residue burning rate on crop patches in their burn window
    /// unit: 1/hr
    pub cropfire_a1: FloatValue,
    /// Time over which the conversion region burns
    /// unit: s
    pub conversion_time: FloatValue,
    /// Precipitation rate at which fire is suppressed by a factor of e
    /// unit: mm/s
    pub precip_scale: FloatValue,
    /// Soil matric potential above which the surface layer suppresses fire
    /// unit: mm
    pub smp_wet: FloatValue,
    /// Soil matric potential below which the surface layer does not limit fire
    /// unit: mm
    pub smp_dry: FloatValue,
    pub combustion_factors: CombustionFactors,
}

impl Default for LiFireParameters {
    fn default() -> Self {
        Self {
            borealat: 40.0,
            lfuel: 75.0,
            ufuel: 650.0,
            rh_low: 30.0,
            rh_hgh: 80.0,
            bt_min: 0.3,
            bt_max: 0.7,
            pot_hmn_ign_counts_alpha: 0.0035,
            cg_ratio: 0.22,
            fire_duration: 86400.0,
            max_spread_rate: 0.2,
            boreal_peatfire_c: 4.2e-5,
            non_boreal_peatfire_c: 0.001,
            cropfire_a1: 0.3,
            conversion_time: 365.0 * 86400.0,
            precip_scale: 1.0e-4,
            smp_wet: -1.0e4,
            smp_dry: -1.5e5,
            combustion_factors: CombustionFactors::default(),
        }
    }
}

fn invalid(parameter: &str, reason: String) -> FireError {
    FireError::InvalidParameter {
        parameter: parameter.to_string(),
        reason,
    }
}

/// Linear ramp from 0 to 1, clamped at both ends
fn ramp(numerator: FloatValue, denominator: FloatValue) -> FloatValue {
    (numerator / denominator).clamp(0.0, 1.0)
}

impl LiFireParameters {
    pub fn validate(&self) -> FireResult<()> {
        for (lower, upper, low, high) in [
            ("lfuel", "ufuel", self.lfuel, self.ufuel),
            ("rh_low", "rh_hgh", self.rh_low, self.rh_hgh),
            ("bt_min", "bt_max", self.bt_min, self.bt_max),
            ("smp_dry", "smp_wet", self.smp_dry, self.smp_wet),
        ] {
            if low >= high {
                return Err(invalid(
                    lower,
                    format!("must be less than {} ({} >= {})", upper, low, high),
                ));
            }
        }
        for (name, value) in [
            ("fire_duration", self.fire_duration),
            ("max_spread_rate", self.max_spread_rate),
            ("conversion_time", self.conversion_time),
            ("precip_scale", self.precip_scale),
        ] {
            if value <= 0.0 {
                return Err(invalid(name, format!("must be positive, got {}", value)));
            }
        }
        for (name, value) in [
            ("cg_ratio", self.cg_ratio),
            ("pot_hmn_ign_counts_alpha", self.pot_hmn_ign_counts_alpha),
            ("boreal_peatfire_c", self.boreal_peatfire_c),
            ("non_boreal_peatfire_c", self.non_boreal_peatfire_c),
            ("cropfire_a1", self.cropfire_a1),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(invalid(
                    name,
                    format!("must be non-negative, got {}", value),
                ));
            }
        }
        self.combustion_factors.validate()
    }

    /// Fraction of the fuel load available to burn
    pub fn fuel_availability(&self, fuelc: FloatValue) -> FloatValue {
        ramp(fuelc - self.lfuel, self.ufuel - self.lfuel)
    }

    /// Potential ignitions from lightning and people
    ///
    /// unit: counts/km2/hr
    pub fn ignitions(&self, lnfm: FloatValue, hdm: FloatValue, lat: FloatValue) -> FloatValue {
        // Intra-cloud to cloud-to-ground ratio varies with latitude
        let ic_cg = 5.16 + 2.16 * (3.0 * lat.abs().min(60.0)).to_radians().cos();
        let lightning = lnfm / ic_cg * self.cg_ratio;
        let human = self.pot_hmn_ign_counts_alpha * 6.8 * hdm.powf(0.43) / 30.0 / 24.0;
        lightning + human
    }

    /// Area burned by one fire during its lifetime
    ///
    /// unit: km2
    pub fn area_per_fire(&self, wind: FloatValue, fire_m: FloatValue) -> FloatValue {
        let lb = 1.0 + 10.0 * (1.0 - (-0.06 * wind).exp());
        let root = (lb * lb - 1.0).max(0.0).sqrt();
        // Head to back ratio of the fire ellipse
        let hb = (lb + root) / (lb - root);
        let spread = self.max_spread_rate * fire_m;
        PI * spread.powi(2) * self.fire_duration.powi(2) / (4.0 * lb)
            * (1.0 + 1.0 / hb).powi(2)
            * 1.0e-6
    }
}

/// Fraction of fires not suppressed by people at population density `hdm`
fn unsuppressed(hdm: FloatValue) -> FloatValue {
    0.01 + 0.98 * (-0.025 * hdm).exp()
}

/// Empirical fire scheme driven by lightning, population density, fuel and
/// moisture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiFire {
    #[serde(default)]
    pub parameters: LiFireParameters,
}

impl LiFire {
    pub fn from_parameters(parameters: LiFireParameters) -> Self {
        Self { parameters }
    }

    /// Combustibility of fuel in local column `ci`
    ///
    /// Returns `(fire_m, fm_bt)`: the overall moisture factor and its root
    /// zone part.
    fn moisture(
        &self,
        ci: usize,
        btran: FloatValue,
        drivers: &FireDrivers<'_>,
    ) -> (FloatValue, FloatValue) {
        let p = &self.parameters;
        let soil = drivers.soilstate;

        let fm_rh = ramp(p.rh_hgh - drivers.atm2lnd.forc_rh[ci], p.rh_hgh - p.rh_low);
        let fm_bt = ramp(p.bt_max - btran, p.bt_max - p.bt_min);

        // Porosity of zero would give 0/0
        let watsat = soil.watsat[[ci, 0]].max(FloatValue::EPSILON);
        let s = (drivers.water_state.h2osoi_vol[[ci, 0]] / watsat).clamp(0.01, 1.0);
        let smp = drivers
            .soil_water_retention_curve
            .soil_suction(soil.sucsat[[ci, 0]], s, soil.bsw[[ci, 0]]);
        let fm_soil = ramp(p.smp_wet - smp, p.smp_wet - p.smp_dry);

        let precip = drivers.water_atm2lnd.forc_rain[ci] + drivers.water_atm2lnd.forc_snow[ci];
        let fm_precip = (-precip / p.precip_scale).exp();

        (fm_rh * (fm_bt + fm_soil) / 2.0 * fm_precip, fm_bt)
    }

    /// Peat fire rate of local column `ci`
    ///
    /// unit: 1/s
    fn peat_fire(
        &self,
        ci: usize,
        drivers: &FireDrivers<'_>,
        soil_carbon: &SoilCarbon,
    ) -> FloatValue {
        let p = &self.parameters;
        let wf2 = drivers.water_diagnostic.wf2[ci];
        let exposed =
            drivers.soilstate.peatf[ci] * (1.0 - drivers.saturated_excess_runoff.fsat[ci]);

        if drivers.subgrid.lat(ci).abs() > p.borealat {
            let thaw = ((soil_carbon.t_soi17cm[ci] - TFRZ) / 10.0).clamp(0.0, 1.0);
            p.boreal_peatfire_c / SECSPHR * (-PI * wf2.max(0.0) / 0.3).exp() * thaw * exposed
        } else {
            p.non_boreal_peatfire_c / SECSPHR * (4.0 - 3.0 * wf2 / 0.3).clamp(0.0, 1.0) * exposed
        }
    }
}

#[typetag::serde]
impl FireMethod for LiFire {
    fn name(&self) -> &'static str {
        "LiFire"
    }

    fn need_lightning_and_population_density(&self) -> bool {
        true
    }

    fn init(
        &self,
        bounds: &Bounds,
        emissions: &FireEmissions,
        registry: &mut dyn FieldRegistry,
    ) -> FireResult<()> {
        self.parameters.validate()?;
        info!(
            "LiFire: parameters valid, {} fire emission mechanisms",
            emissions.count()
        );
        init_base(bounds, registry)
    }

    fn compute_burned_area(
        &self,
        bounds: &Bounds,
        filters: &FilterSet,
        drivers: &FireDrivers<'_>,
        cnveg: &mut CnVeg,
        soil_carbon: &SoilCarbon,
    ) {
        let p = &self.parameters;
        let subgrid = drivers.subgrid;
        let dtime = drivers.dtime;
        let n_columns = bounds.num_columns();

        aggregate_leaf_carbon(bounds, filters, subgrid, cnveg);

        let cropf = column_fraction(bounds, subgrid, &filters.soilc, &filters.soilp, |kind| {
            kind.is_crop()
        });
        let veg_weight =
            column_fraction(bounds, subgrid, &filters.soilc, &filters.exposedvegp, |_| true);
        let mut btran_col = Array1::zeros(n_columns);
        p2c(
            bounds,
            subgrid,
            &filters.soilc,
            &filters.exposedvegp,
            &drivers.energyflux.btran2,
            &mut btran_col,
        );

        let mut fb = Array1::<FloatValue>::zeros(n_columns);
        let mut fm_bt = Array1::<FloatValue>::zeros(n_columns);
        let mut natural = Array1::<FloatValue>::zeros(n_columns);
        let mut in_filter = vec![false; n_columns];

        for c in filters.soilc.iter() {
            let ci = bounds.col(c);
            in_filter[ci] = true;

            // Columns without exposed vegetation are treated as wet
            let btran = if veg_weight[ci] > 0.0 {
                btran_col[ci] / veg_weight[ci]
            } else {
                1.0
            };

            let fuelc = soil_carbon.totlitc[ci] + soil_carbon.cwdc(ci) + cnveg.state.leafc_col[ci];
            fb[ci] = p.fuel_availability(fuelc);

            let (fire_m, bt) = self.moisture(ci, btran, drivers);
            fm_bt[ci] = bt;

            let hdm = drivers.atm2lnd.forc_hdm[ci];
            let ig = p.ignitions(drivers.atm2lnd.forc_lnfm[ci], hdm, subgrid.lat(ci));
            let nfire = ig / SECSPHR * fb[ci] * fire_m * unsuppressed(hdm) * (1.0 - cropf[ci]);

            let state = &mut cnveg.state;
            state.nfire[ci] = nfire;
            natural[ci] = nfire * p.area_per_fire(drivers.atm2lnd.forc_wind[ci], fire_m);
            state.baf_peatf[ci] = self.peat_fire(ci, drivers, soil_carbon);
            state.baf_crop[ci] = 0.0;
        }

        for pt in filters.soilp.iter() {
            let pi = bounds.patch(pt);
            let ci = bounds.col(subgrid.column_of(pi));
            if in_filter[ci]
                && subgrid.is_active(pi)
                && subgrid.kind(pi).is_crop()
                && drivers.cropstate.burn_window[pi]
            {
                cnveg.state.baf_crop[ci] += p.cropfire_a1 / SECSPHR * fb[ci] * subgrid.wtcol(pi);
            }
        }

        let max_rate = 1.0 / dtime;
        let mut clamped = 0;
        let state = &mut cnveg.state;
        for c in filters.soilc.iter() {
            let ci = bounds.col(c);

            let fbac1 = state.lfc[ci] * fb[ci] * fm_bt[ci] / p.conversion_time;
            state.lfc[ci] = (state.lfc[ci] - fbac1 * dtime).max(0.0);
            state.fbac1[ci] = fbac1;
            state.fbac[ci] = fbac1 + natural[ci] * state.lfc[ci];

            let total = natural[ci] + state.baf_crop[ci] + state.baf_peatf[ci] + fbac1;
            if total > max_rate {
                clamped += 1;
            }
            state.farea_burned[ci] = total.min(max_rate);
        }
        if clamped > 0 {
            warn!(
                "LiFire: burned area limited to the whole column on {} columns",
                clamped
            );
        }
        debug!(
            "LiFire: {} columns, total burned area rate {:.3e} /s",
            filters.soilc.count(),
            filters
                .soilc
                .iter()
                .map(|c| state.farea_burned[bounds.col(c)])
                .sum::<FloatValue>()
        );

        apply_fire_losses(
            bounds,
            filters,
            subgrid,
            dtime,
            &p.combustion_factors,
            cnveg,
        );
    }
}
