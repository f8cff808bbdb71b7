//! Run configuration for fire.
//!
//! A configuration selects exactly one [`FireMethod`] and lists the
//! fire-emission mechanisms enabled in the atmospheric chemistry.
//! It is read once, before initialisation:
//!
//! ```toml
//! [method]
//! type = "NoFire"
//!
//! [emissions]
//! mechanisms = []
//! ```

use crate::decomp::Bounds;
use crate::errors::FireResult;
use crate::fields::FieldRegistry;
use crate::method::FireMethod;
use log::info;
use serde::{Deserialize, Serialize};

/// Fire-emission mechanisms configured in the atmospheric chemistry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireEmissions {
    /// Names of the emission mechanisms
    #[serde(default)]
    pub mechanisms: Vec<String>,
}

impl FireEmissions {
    /// No fire emissions
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(mechanisms: Vec<String>) -> Self {
        Self { mechanisms }
    }

    /// Number of configured mechanisms
    pub fn count(&self) -> usize {
        self.mechanisms.len()
    }
}

/// Fire configuration of a run
#[derive(Debug, Serialize, Deserialize)]
pub struct FireConfig {
    /// The selected fire method
    pub method: Box<dyn FireMethod>,
    #[serde(default)]
    pub emissions: FireEmissions,
}

impl FireConfig {
    pub fn new(method: Box<dyn FireMethod>, emissions: FireEmissions) -> Self {
        Self { method, emissions }
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> FireResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialise the configuration to TOML
    pub fn to_toml_string(&self) -> FireResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate and initialise the selected method
    ///
    /// The returned error must be treated as fatal by the caller.
    pub fn initialise(&self, bounds: &Bounds, registry: &mut dyn FieldRegistry) -> FireResult<()> {
        info!(
            "Initialising fire method {} with {} fire emission mechanisms",
            self.method.name(),
            self.emissions.count()
        );
        if !self.method.need_lightning_and_population_density() {
            info!("Lightning and population density streams are not required");
        }
        self.method.init(bounds, &self.emissions, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FireError;
    use crate::fields::FieldCatalog;
    use crate::method::NoFire;

    #[test]
    fn parse_no_fire() {
        let config = FireConfig::from_toml_str(
            r#"
[method]
type = "NoFire"
"#,
        )
        .unwrap();
        assert_eq!(config.method.name(), "NoFire");
        assert_eq!(config.emissions.count(), 0);
    }

    #[test]
    fn parse_emissions() {
        let config = FireConfig::from_toml_str(
            r#"
[method]
type = "NoFire"

[emissions]
mechanisms = ["bc_a1", "pom_a1"]
"#,
        )
        .unwrap();
        assert_eq!(config.emissions.count(), 2);
    }

    #[test]
    fn unknown_method_rejected() {
        let result = FireConfig::from_toml_str(
            r#"
[method]
type = "NotAFireMethod"
"#,
        );
        assert!(matches!(result, Err(FireError::ConfigParse(_))));
    }

    #[test]
    fn round_trip() {
        let config = FireConfig::new(
            Box::new(NoFire::new()),
            FireEmissions::new(vec!["bc_a1".to_string()]),
        );
        let serialised = config.to_toml_string().unwrap();
        let parsed = FireConfig::from_toml_str(&serialised).unwrap();
        assert_eq!(parsed.method.name(), "NoFire");
        assert_eq!(parsed.emissions, config.emissions);
    }

    #[test]
    fn initialise_escalates_inconsistency() {
        let bounds = Bounds::new(1, 3, 1, 3);
        let config = FireConfig::new(
            Box::new(NoFire::new()),
            FireEmissions::new(vec!["bc_a1".to_string(), "pom_a1".to_string()]),
        );
        let mut catalog = FieldCatalog::new();
        assert!(config.initialise(&bounds, &mut catalog).is_err());

        let config = FireConfig::new(Box::new(NoFire::new()), FireEmissions::none());
        config.initialise(&bounds, &mut catalog).unwrap();
        assert!(catalog.contains("FAREA_BURNED"));
    }
}
