//! Error types for component construction.

use rf_core::error::RfError;
use thiserror::Error;

/// Errors raised when a component's parameters are not physical.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] RfError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::numeric::ensure_positive;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical {
            what: "pump efficiency must be in (0,1]",
        };
        assert!(err.to_string().contains("pump efficiency"));
    }

    #[test]
    fn core_errors_convert_with_question_mark() {
        fn density(v: f64) -> ComponentResult<f64> {
            Ok(ensure_positive(v, "density")?)
        }
        let err = density(-2.0).unwrap_err();
        assert_eq!(
            err,
            ComponentError::Core(RfError::OutOfRange {
                what: "density",
                value: -2.0
            })
        );
        assert!(err.to_string().contains("density"));
    }
}
