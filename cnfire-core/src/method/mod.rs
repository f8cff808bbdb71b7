//! Fire methods compute the fraction of each column burned per timestep.
//!
//! Every parameterisation implements [`FireMethod`] and is selected once, at
//! configuration time.
//! The host model then calls [`FireMethod::init`] once and
//! [`FireMethod::compute_burned_area`] every timestep without knowing which
//! variant is active.
//!
//! Behaviour common to all variants lives in free functions that each variant
//! calls explicitly:
//!
//! - [`init_base`] registers the burned-area diagnostic fields
//! - [`aggregate_leaf_carbon`] reduces patch leaf carbon to columns
//! - [`apply_fire_losses`] removes burned carbon and nitrogen from the pools
//!
//! [`NoFire`] is the disabled scheme.
//! Fire-capable schemes live in the `cnfire-components` crate.

mod fluxes;
mod nofire;

pub use fluxes::{apply_fire_losses, CombustionFactors};
pub use nofire::NoFire;

use crate::config::FireEmissions;
use crate::decomp::{Bounds, EntityKind, FilterSet};
use crate::errors::FireResult;
use crate::fields::{FieldDefinition, FieldRegistry};
use crate::state::{CnVeg, FireDrivers, SoilCarbon};
use crate::subgrid::{p2c, Subgrid};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Forcing data streams a driver may need to supply
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForcingStream {
    /// Lightning frequency
    Lightning,
    /// Human population density
    PopulationDensity,
}

/// A fire parameterisation
///
/// Variants are serialised with an internal `type` tag so that the active
/// method can be chosen from a configuration file.
#[typetag::serde(tag = "type")]
pub trait FireMethod: Debug + Send + Sync {
    /// Name of the variant, as used in configuration files
    fn name(&self) -> &'static str;

    /// Whether this method reads lightning and population density forcing
    ///
    /// Must not depend on any state, and may be called before [`init`](Self::init).
    fn need_lightning_and_population_density(&self) -> bool;

    /// One-time validation and setup
    ///
    /// Implementations validate the configuration against their own
    /// capabilities and then call [`init_base`].
    /// An error is fatal to the run.
    fn init(
        &self,
        bounds: &Bounds,
        emissions: &FireEmissions,
        registry: &mut dyn FieldRegistry,
    ) -> FireResult<()>;

    /// Compute burned area for every column in `filters.soilc`
    ///
    /// Only entries of the active filters are written.
    /// All other entries keep their values from the previous timestep.
    fn compute_burned_area(
        &self,
        bounds: &Bounds,
        filters: &FilterSet,
        drivers: &FireDrivers<'_>,
        cnveg: &mut CnVeg,
        soil_carbon: &SoilCarbon,
    );

    /// Forcing streams the driver must provide for this method
    fn required_streams(&self) -> Vec<ForcingStream> {
        if self.need_lightning_and_population_density() {
            vec![ForcingStream::Lightning, ForcingStream::PopulationDensity]
        } else {
            vec![]
        }
    }
}

/// Diagnostic fields shared by all fire methods
pub fn burned_area_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new(
            "FAREA_BURNED",
            "proportion/sec",
            EntityKind::Column,
            "timestep fractional area burned",
        ),
        FieldDefinition::new(
            "BAF_CROP",
            "proportion/sec",
            EntityKind::Column,
            "fractional area burned for crop",
        ),
        FieldDefinition::new(
            "BAF_PEATF",
            "proportion/sec",
            EntityKind::Column,
            "fractional area burned in peatland",
        ),
        FieldDefinition::new(
            "FBAC",
            "proportion/sec",
            EntityKind::Column,
            "total fractional area burned in land-use conversion regions",
        ),
        FieldDefinition::new(
            "FBAC1",
            "proportion/sec",
            EntityKind::Column,
            "fractional area burned by land-use conversion fire",
        ),
        FieldDefinition::new(
            "LFC",
            "proportion",
            EntityKind::Column,
            "conversion area fraction not yet burned",
        ),
        FieldDefinition::new("NFIRE", "counts/km2/sec", EntityKind::Column, "fire counts"),
        FieldDefinition::new(
            "LEAFC_COL",
            "gC/m^2",
            EntityKind::Column,
            "column-level leaf carbon",
        ),
        FieldDefinition::new(
            "FIRE_CLOSS",
            "gC/m^2/s",
            EntityKind::Patch,
            "total patch-level fire C loss",
        ),
        FieldDefinition::new(
            "FIRE_NLOSS",
            "gN/m^2/s",
            EntityKind::Patch,
            "total patch-level fire N loss",
        ),
    ]
}

/// Setup shared by every fire method
///
/// Registers [`burned_area_fields`] sized for the partition.
pub fn init_base(bounds: &Bounds, registry: &mut dyn FieldRegistry) -> FireResult<()> {
    let fields = burned_area_fields();
    let n_fields = fields.len();
    for field in fields {
        let size = bounds.size(field.kind);
        registry.register(field, size)?;
    }
    info!(
        "Registered {} fire diagnostic fields for columns {}..={}",
        n_fields, bounds.begc, bounds.endc
    );
    Ok(())
}

/// Reduce patch leaf carbon to `cnveg.state.leafc_col`
///
/// Every method calls this before its column loop so that all methods
/// share one reduction rule.
pub fn aggregate_leaf_carbon(
    bounds: &Bounds,
    filters: &FilterSet,
    subgrid: &Subgrid,
    cnveg: &mut CnVeg,
) {
    p2c(
        bounds,
        subgrid,
        &filters.soilc,
        &filters.soilp,
        &cnveg.carbon.leaf,
        &mut cnveg.state.leafc_col,
    );
}
