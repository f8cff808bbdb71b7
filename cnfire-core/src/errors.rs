use thiserror::Error;

/// Error type for invalid fire configurations.
///
/// Every variant is raised during configuration or initialisation.
/// The per-timestep computation has no error path.
#[derive(Error, Debug)]
pub enum FireError {
    #[error("Fire emissions require a fire-capable method, but {method} cannot produce fire. Configured emission mechanisms: [{}]", .mechanisms.join(", "))]
    FireEmissionsWithoutFire {
        method: String,
        mechanisms: Vec<String>,
    },
    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter { parameter: String, reason: String },
    #[error("Field {0} is already registered")]
    FieldAlreadyRegistered(String),
    #[error("Could not parse fire configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Could not serialise fire configuration: {0}")]
    ConfigSerialise(#[from] toml::ser::Error),
}

/// Convenience type for `Result<T, FireError>`.
pub type FireResult<T> = Result<T, FireError>;
