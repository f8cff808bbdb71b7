//! State consumed and produced by fire methods
//!
//! State is split into bundles mirroring the modules that own it:
//!
//! - [`drivers`]: read-only atmosphere, hydrology and crop state, gathered into
//!   a [`FireDrivers`] view for each call
//! - [`soil`]: soil hydraulic properties, the soil water retention curve and the
//!   column soil carbon diagnostics
//! - [`vegetation`]: the read/write vegetation carbon/nitrogen bundle [`CnVeg`]
//!
//! All arrays are dense over the partition [`Bounds`](crate::decomp::Bounds)
//! and addressed by local index.

pub mod drivers;
pub mod soil;
pub mod vegetation;

pub use drivers::{
    Atm2Lnd, CropState, DriverState, EnergyFlux, FireDrivers, SaturatedExcessRunoff,
    WaterAtm2Lnd, WaterDiagnosticBulk, WaterStateBulk,
};
pub use soil::{ClappHornberger1978, SoilCarbon, SoilState, SoilWaterRetentionCurve, TFRZ};
pub use vegetation::{CnVeg, CnVegState, FireFluxes, VegPool, VegPools};
