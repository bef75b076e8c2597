//! Construction-time configuration errors. Runtime conditions degrade to no-ops instead.

use thiserror::Error;

use crate::state::ThresholdKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold {kind:?} = {value} is outside the zoom range [{min}, {max}]")]
    ThresholdOutOfRange { kind: ThresholdKind, value: f64, min: f64, max: f64 },

    #[error("threshold {lower:?} ({lower_value}) must be below {upper:?} ({upper_value})")]
    ThresholdOrder { lower: ThresholdKind, lower_value: f64, upper: ThresholdKind, upper_value: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("invalid viewer config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
