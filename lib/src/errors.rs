// lib/src/errors.rs

use thiserror::Error;

use models::{HospitalId, RequestId, ValidationError};

/// Everything that can go wrong in the triage flow. None of these are fatal:
/// each one maps to a status the user sees, after which they may retry.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Symptom classifier unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("No {department} coverage in this area")]
    NoCoverage { department: String },

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Admission request {request_id} is no longer pending (status: {status})")]
    InvalidRequestState { request_id: RequestId, status: String },

    #[error("A request to hospital {0} is already pending")]
    DuplicateRequest(HospitalId),

    #[error("Audio capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TriageError {
    /// Short status line shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            TriageError::ClassificationUnavailable(_) => {
                "Could not reach the symptom analyzer. Please type your symptoms.".to_string()
            }
            TriageError::CaptureUnavailable(_) => {
                "Microphone unavailable. Please type your symptoms.".to_string()
            }
            TriageError::LocationUnavailable(_) => "Location signal lost.".to_string(),
            TriageError::NoCoverage { department } => format!("No {} coverage in this sector.", department),
            TriageError::NetworkFailure(_) => "Network offline.".to_string(),
            TriageError::DuplicateRequest(_) => "A request to this hospital is already pending.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;

impl From<reqwest::Error> for TriageError {
    fn from(err: reqwest::Error) -> Self {
        TriageError::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::NetworkFailure(format!("Unexpected response body: {}", err))
    }
}

impl From<ValidationError> for TriageError {
    fn from(err: ValidationError) -> Self {
        TriageError::InvalidInput(err.to_string())
    }
}

impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Configuration(err.to_string())
    }
}

impl From<tokio::task::JoinError> for TriageError {
    fn from(err: tokio::task::JoinError) -> Self {
        TriageError::Internal(format!("Async task join error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_coverage_and_network_failure_read_differently() {
        let none = TriageError::NoCoverage { department: "Cardiology".into() };
        let down = TriageError::NetworkFailure("connection refused".into());
        assert_eq!(none.user_message(), "No Cardiology coverage in this sector.");
        assert_eq!(down.user_message(), "Network offline.");
    }

    #[test]
    fn validation_errors_become_invalid_input() {
        let err: TriageError = ValidationError::EmptySymptomText.into();
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }
}
