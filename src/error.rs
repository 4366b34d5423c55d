//! Error types shared by the dispatch optimizer, the forecasters, and the pipeline.

use thiserror::Error;

/// Errors surfaced by a simulation run.
///
/// The computation is deterministic batch work, so none of these are retried:
/// the same inputs would reproduce the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid battery parameters or run parameters.
    #[error("configuration error: {field}: {message}")]
    Configuration {
        /// Parameter name (e.g. `"battery.capacity_mwh"`).
        field: String,
        /// Constraint that was violated.
        message: String,
    },

    /// Series of mismatched length or timestamps.
    #[error("alignment error: {0}")]
    Alignment(String),

    /// Prediction requested before training, or training on unusable data.
    #[error("forecaster not trained: {0}")]
    NotTrained(String),
}

impl SimError {
    pub(crate) fn configuration(field: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results carrying a [`SimError`].
pub type Result<T, E = SimError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_display_names_the_field() {
        let err = SimError::configuration("battery.efficiency", "must be in (0, 1]");
        assert_eq!(
            err.to_string(),
            "configuration error: battery.efficiency: must be in (0, 1]"
        );
    }

    #[test]
    fn alignment_display() {
        let err = SimError::Alignment("net_load has 3 values, price has 4".into());
        assert!(err.to_string().starts_with("alignment error:"));
    }
}
