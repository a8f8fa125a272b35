//! Analysis error types.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors produced by the statistics and rule evaluators.
///
/// Every error is terminal for the single invocation that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Malformed or out-of-range input.
    #[error("Invalid '{field}': {message}")]
    Validation { field: String, message: String },

    /// Degenerate numeric case that would otherwise yield NaN or infinity.
    #[error("Computation error: {0}")]
    Computation(String),
}

impl AnalysisError {
    /// Create a validation error for the given input field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a computation error.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// The offending field, for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::Computation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = AnalysisError::validation("baselineConversionRate", "must be in (0, 1)");
        assert_eq!(err.field(), Some("baselineConversionRate"));
        assert!(err.to_string().contains("baselineConversionRate"));
    }

    #[test]
    fn test_computation_has_no_field() {
        let err = AnalysisError::computation("mean is zero");
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Computation error: mean is zero");
    }
}
