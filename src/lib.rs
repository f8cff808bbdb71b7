//! Python extension module for cnfire
//!
//! Fire methods from every workspace crate are linked here, so any of them can
//! be selected from a configuration loaded through the bindings.

mod python;

pub use cnfire_components;
pub use cnfire_core;
