//! Errors shared by the cycle engine and the transient solver.

use thiserror::Error;

/// Result type for simulation calls.
pub type SimResult<T> = Result<T, SimulationError>;

/// Errors reported by the simulation core.
///
/// All validation happens before any computation starts, so a failed call
/// never returns a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Non-physical input: zero or negative ratios, zero inductance or
    /// capacitance, non-finite values.
    #[error("invalid parameter: {what}")]
    InvalidParameter { what: String },

    /// The ODE integrator could not advance within its tolerance.
    #[error("integration failure: {what}")]
    IntegrationFailure { what: String },
}

impl SimulationError {
    pub(crate) fn invalid(what: impl Into<String>) -> SimulationError {
        SimulationError::InvalidParameter { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SimulationError::invalid("compression ratio must be positive");
        assert!(err.to_string().contains("compression ratio"));

        let err = SimulationError::IntegrationFailure {
            what: "step size underflow".to_string(),
        };
        assert!(err.to_string().contains("step size"));
    }
}
