use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Invalid value {value} for parameter \"{name}\": {reason}")]
    InvalidParameterValue {
        name: String,
        value: f64,
        reason: String,
    },

    #[error("Point ({x}, {y}) is outside the envelope: {reason}")]
    PointOutsideEnvelope { x: f64, y: f64, reason: String },

    #[error("No convergence in {context} after {iterations} iterations")]
    NoConvergence {
        context: &'static str,
        iterations: usize,
    },

    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Buffer too short: need {needed} values, got {actual}")]
    BufferLength { needed: usize, actual: usize },

    #[error("Consistency check failed: {0}")]
    ConsistencyCheck(String),
}

impl ProjError {
    pub(crate) fn outside(x: f64, y: f64, reason: impl Into<String>) -> Self {
        ProjError::PointOutsideEnvelope {
            x,
            y,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(name: &str, value: f64, reason: impl Into<String>) -> Self {
        ProjError::InvalidParameterValue {
            name: name.to_string(),
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn no_convergence(context: &'static str, iterations: usize) -> Self {
        ProjError::NoConvergence {
            context,
            iterations,
        }
    }
}
