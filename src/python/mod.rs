use cnfire_components::components::LiFire;
use cnfire_core::method::{FireMethod, NoFire};
use cnfire_core::python::core;
use pyo3::prelude::*;
use pyo3::wrap_pymodule;

#[pymodule]
#[pyo3(name = "_lib")]
fn cnfire(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("FIRE_METHODS", available_methods())?;
    m.add_wrapped(wrap_pymodule!(core))?;

    set_path(m, "cnfire._lib.core", "core")?;

    Ok(())
}

/// Names accepted as `type` in the `[method]` table of a fire configuration
fn available_methods() -> Vec<&'static str> {
    let methods: [Box<dyn FireMethod>; 2] =
        [Box::new(NoFire::new()), Box::new(LiFire::default())];
    methods.iter().map(|method| method.name()).collect()
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
