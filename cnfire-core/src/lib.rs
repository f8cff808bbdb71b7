pub mod config;
pub mod decomp;
pub mod fields;
pub mod method;
pub mod python;
pub mod state;
pub mod subgrid;

pub mod errors;

/// Floating point type used for all physical quantities
pub type FloatValue = f64;
