use crate::config::FireConfig;
use crate::decomp::{Bounds, Filter};
use crate::errors::FireError;
use crate::fields::FieldCatalog;
use crate::subgrid::{p2c, PatchKind, Subgrid};
use crate::FloatValue;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<FireError> for PyErr {
    fn from(err: FireError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass]
#[pyo3(name = "FireConfig")]
pub struct PyFireConfig(pub FireConfig);

#[pymethods]
impl PyFireConfig {
    #[staticmethod]
    fn from_toml(content: &str) -> PyResult<Self> {
        Ok(Self(FireConfig::from_toml_str(content)?))
    }

    fn to_toml(&self) -> PyResult<String> {
        Ok(self.0.to_toml_string()?)
    }

    #[getter]
    fn method_name(&self) -> &'static str {
        self.0.method.name()
    }

    #[getter]
    fn emission_mechanisms(&self) -> Vec<String> {
        self.0.emissions.mechanisms.clone()
    }

    fn need_lightning_and_population_density(&self) -> bool {
        self.0.method.need_lightning_and_population_density()
    }

    fn required_streams(&self) -> Vec<String> {
        self.0
            .method
            .required_streams()
            .iter()
            .map(|stream| format!("{:?}", stream))
            .collect()
    }

    /// Initialise the method for a partition and return the registered field names
    fn initialise(
        &self,
        begc: usize,
        endc: usize,
        begp: usize,
        endp: usize,
    ) -> PyResult<Vec<String>> {
        if endc < begc || endp < begp {
            return Err(PyValueError::new_err("Bounds must not be empty"));
        }
        let bounds = Bounds::new(begc, endc, begp, endp);
        let mut catalog = FieldCatalog::new();
        self.0.initialise(&bounds, &mut catalog)?;
        Ok(catalog.names().into_iter().map(String::from).collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "<FireConfig method={} emissions={}>",
            self.0.method.name(),
            self.0.emissions.count()
        )
    }
}

/// Area-weighted patch-to-column aggregation over every patch of every column
///
/// `patch_column` holds the zero-based column of each patch.
#[pyfunction]
#[pyo3(name = "p2c")]
fn py_p2c<'py>(
    py: Python<'py>,
    values: PyReadonlyArray1<'py, FloatValue>,
    patch_column: Vec<usize>,
    wtcol: PyReadonlyArray1<'py, FloatValue>,
    n_columns: usize,
) -> PyResult<Bound<'py, PyArray1<FloatValue>>> {
    let values = values.as_array().to_owned();
    let n_patches = values.len();
    if n_columns == 0 || n_patches == 0 {
        return Err(PyValueError::new_err(
            "At least one column and one patch are required",
        ));
    }

    let bounds = Bounds::new(0, n_columns - 1, 0, n_patches - 1);
    let subgrid = Subgrid::new(
        &bounds,
        patch_column,
        wtcol.as_array().to_owned(),
        vec![PatchKind::Tree; n_patches],
        ndarray::Array1::zeros(n_columns),
    )?;
    let filter_c: Filter = (0..n_columns).collect();
    let filter_p: Filter = (0..n_patches).collect();

    let mut column_values = ndarray::Array1::zeros(n_columns);
    p2c(
        &bounds,
        &subgrid,
        &filter_c,
        &filter_p,
        &values,
        &mut column_values,
    );
    Ok(column_values.into_pyarray_bound(py))
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFireConfig>()?;
    m.add_function(wrap_pyfunction!(py_p2c, m)?)?;
    Ok(())
}
