//! Error types for assemblies and engine definitions.

use rf_components::ComponentError;
use rf_solver::SolverError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("Component `{name}` rejected: {source}")]
    Component {
        name: String,
        source: ComponentError,
    },

    #[error("Inversion failed: {what}")]
    Inversion { what: String },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type SystemResult<T> = Result<T, SystemError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read engine file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Engine `{name}` has no components")]
    Empty { name: String },

    #[error("Duplicate component name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: String,
    },

    #[error(transparent)]
    System(#[from] SystemError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
