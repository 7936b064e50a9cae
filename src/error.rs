//! Error types for analysis report handling

use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Message shown to the user for any fatal condition
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Unable to process the data. Please check your files and try again.";

/// Conditions that stop a report from being rendered at all
///
/// Missing optional sections and out-of-range numbers are not errors: the
/// normalizer fills the former with defaults and clamps the latter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input is not recognizable as an analysis result
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The remote service reported `status: "error"`
    #[error("Analysis failed: {}", .0.as_deref().unwrap_or("remote service reported an error"))]
    AnalysisFailed(Option<String>),
}

impl AnalysisError {
    /// Create a `MalformedPayload` error for a non-object payload
    #[must_use]
    pub fn not_an_object(kind: &str) -> Self {
        Self::MalformedPayload(format!("Expected a JSON object, got {kind}"))
    }

    /// Create a `MalformedPayload` error for a payload without a `status` field
    #[must_use]
    pub fn missing_status() -> Self {
        Self::MalformedPayload("Missing required field: status".into())
    }

    /// Create a `MalformedPayload` error for a `status` that is not a string
    #[must_use]
    pub fn invalid_status(value: &str) -> Self {
        Self::MalformedPayload(format!("Invalid status value: {value}"))
    }

    /// The single user-facing message for this condition
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::not_an_object("array");
        assert_eq!(
            err.to_string(),
            "Malformed payload: Expected a JSON object, got array"
        );

        let err = AnalysisError::missing_status();
        assert_eq!(
            err.to_string(),
            "Malformed payload: Missing required field: status"
        );

        let err = AnalysisError::AnalysisFailed(None);
        assert_eq!(
            err.to_string(),
            "Analysis failed: remote service reported an error"
        );

        let err = AnalysisError::AnalysisFailed(Some("Prophet fit diverged".into()));
        assert_eq!(err.to_string(), "Analysis failed: Prophet fit diverged");
    }

    #[test]
    fn test_one_message_for_every_fatal_condition() {
        let malformed = AnalysisError::invalid_status("42");
        let failed = AnalysisError::AnalysisFailed(None);

        assert_eq!(malformed.user_message(), failed.user_message());
        assert_eq!(malformed.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
