//! rf-system: engine assemblies built from components.
//!
//! A [`PropulsionAssembly`] owns named components and rebuilds one
//! propagation pool from them on every change. On top of the solved pool it
//! offers system metrics, acceptance checks and a printable
//! [`EngineSummary`]. Engines can also be loaded from YAML ([`config`]), and
//! [`inverse`] covers the closed-form inversions the pool cannot do.

pub mod assembly;
pub mod config;
pub mod error;
pub mod inverse;
pub mod reference;
pub mod summary;
pub mod validation;

pub use assembly::{PropulsionAssembly, aggregate_mass};
pub use config::{EngineDef, build_assembly, load_engine};
pub use error::{ConfigError, ConfigResult, SystemError, SystemResult};
pub use inverse::{required_chamber_pressure, required_pump_gain};
pub use summary::{EngineSummary, PumpPower};
pub use validation::{AcceptanceCriteria, Check, ValidationReport};
