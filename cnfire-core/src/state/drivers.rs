//! Read-only driver state
//!
//! These bundles are owned by the atmosphere, hydrology and crop modules of the
//! host model.
//! A fire method only reads them.

use crate::decomp::Bounds;
use crate::state::soil::{ClappHornberger1978, SoilState, SoilWaterRetentionCurve};
use crate::subgrid::Subgrid;
use crate::FloatValue;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Atmospheric forcing relevant to fire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atm2Lnd {
    /// Lightning frequency
    /// unit: flashes/km2/hr
    pub forc_lnfm: Array1<FloatValue>,
    /// Population density
    /// unit: counts/km2
    pub forc_hdm: Array1<FloatValue>,
    /// Relative humidity
    /// unit: %
    pub forc_rh: Array1<FloatValue>,
    /// Wind speed
    /// unit: m/s
    pub forc_wind: Array1<FloatValue>,
}

impl Atm2Lnd {
    /// Calm, saturated atmosphere with no lightning and nobody around
    pub fn new(bounds: &Bounds) -> Self {
        let n = bounds.num_columns();
        Self {
            forc_lnfm: Array1::zeros(n),
            forc_hdm: Array1::zeros(n),
            forc_rh: Array1::from_elem(n, 100.0),
            forc_wind: Array1::zeros(n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyFlux {
    /// Root zone soil wetness factor, 0 (dry) to 1 (wet)
    /// unit: dimensionless
    pub btran2: Array1<FloatValue>,
}

impl EnergyFlux {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            btran2: Array1::ones(bounds.num_patches()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturatedExcessRunoff {
    /// Fractional area with the water table at the surface
    /// unit: dimensionless
    pub fsat: Array1<FloatValue>,
}

impl SaturatedExcessRunoff {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            fsat: Array1::zeros(bounds.num_columns()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterDiagnosticBulk {
    /// Soil water as a fraction of water holding capacity in the top 0.17 m
    /// unit: dimensionless
    pub wf2: Array1<FloatValue>,
}

impl WaterDiagnosticBulk {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            wf2: Array1::ones(bounds.num_columns()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterAtm2Lnd {
    /// Rain rate
    /// unit: mm/s
    pub forc_rain: Array1<FloatValue>,
    /// Snow rate
    /// unit: mm/s
    pub forc_snow: Array1<FloatValue>,
}

impl WaterAtm2Lnd {
    pub fn new(bounds: &Bounds) -> Self {
        let n = bounds.num_columns();
        Self {
            forc_rain: Array1::zeros(n),
            forc_snow: Array1::zeros(n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterStateBulk {
    /// Volumetric soil water, column x soil level
    /// unit: m3/m3
    pub h2osoi_vol: Array2<FloatValue>,
}

impl WaterStateBulk {
    pub fn new(bounds: &Bounds, nlevsoi: usize) -> Self {
        Self {
            h2osoi_vol: Array2::zeros((bounds.num_columns(), nlevsoi)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropState {
    /// Whether residue burning may occur on each patch this timestep
    pub burn_window: Vec<bool>,
}

impl CropState {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            burn_window: vec![false; bounds.num_patches()],
        }
    }
}

/// Borrowed view over every read-only bundle a fire method needs
#[derive(Debug, Clone, Copy)]
pub struct FireDrivers<'a> {
    pub subgrid: &'a Subgrid,
    pub atm2lnd: &'a Atm2Lnd,
    pub energyflux: &'a EnergyFlux,
    pub saturated_excess_runoff: &'a SaturatedExcessRunoff,
    pub water_diagnostic: &'a WaterDiagnosticBulk,
    pub water_atm2lnd: &'a WaterAtm2Lnd,
    pub water_state: &'a WaterStateBulk,
    pub soilstate: &'a SoilState,
    pub soil_water_retention_curve: &'a dyn SoilWaterRetentionCurve,
    pub cropstate: &'a CropState,
    /// Timestep length
    /// unit: s
    pub dtime: FloatValue,
}

/// Owned storage for the driver bundles of one partition
///
/// Hosts that already own these bundles can build a [`FireDrivers`] directly.
#[derive(Debug)]
pub struct DriverState {
    pub subgrid: Subgrid,
    pub atm2lnd: Atm2Lnd,
    pub energyflux: EnergyFlux,
    pub saturated_excess_runoff: SaturatedExcessRunoff,
    pub water_diagnostic: WaterDiagnosticBulk,
    pub water_atm2lnd: WaterAtm2Lnd,
    pub water_state: WaterStateBulk,
    pub soilstate: SoilState,
    pub soil_water_retention_curve: Box<dyn SoilWaterRetentionCurve>,
    pub cropstate: CropState,
    pub dtime: FloatValue,
}

impl DriverState {
    /// Wet, calm conditions over `subgrid` using the Clapp and Hornberger curve
    pub fn new(bounds: &Bounds, subgrid: Subgrid, nlevsoi: usize, dtime: FloatValue) -> Self {
        Self {
            subgrid,
            atm2lnd: Atm2Lnd::new(bounds),
            energyflux: EnergyFlux::new(bounds),
            saturated_excess_runoff: SaturatedExcessRunoff::new(bounds),
            water_diagnostic: WaterDiagnosticBulk::new(bounds),
            water_atm2lnd: WaterAtm2Lnd::new(bounds),
            water_state: WaterStateBulk::new(bounds, nlevsoi),
            soilstate: SoilState::new(bounds, nlevsoi),
            soil_water_retention_curve: Box::new(ClappHornberger1978),
            cropstate: CropState::new(bounds),
            dtime,
        }
    }

    pub fn drivers(&self) -> FireDrivers<'_> {
        FireDrivers {
            subgrid: &self.subgrid,
            atm2lnd: &self.atm2lnd,
            energyflux: &self.energyflux,
            saturated_excess_runoff: &self.saturated_excess_runoff,
            water_diagnostic: &self.water_diagnostic,
            water_atm2lnd: &self.water_atm2lnd,
            water_state: &self.water_state,
            soilstate: &self.soilstate,
            soil_water_retention_curve: self.soil_water_retention_curve.as_ref(),
            cropstate: &self.cropstate,
            dtime: self.dtime,
        }
    }
}
