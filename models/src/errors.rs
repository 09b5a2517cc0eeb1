// models/src/errors.rs

pub use thiserror::Error;

/// A validation error raised while building domain values, usually right after
/// deserializing something that came over the wire.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Symptom text was empty once surrounding whitespace was removed.
    #[error("symptom description is empty")]
    EmptySymptomText,
    /// A recorded clip contained no audio data.
    #[error("audio clip is empty")]
    EmptyAudioClip,
    /// A recorded clip is longer than the capture window allows.
    #[error("audio clip lasts {actual_ms}ms, longer than the {max_ms}ms capture window")]
    AudioClipTooLong { actual_ms: u128, max_ms: u128 },
    /// An identifier has an invalid length.
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    /// A department name was empty.
    #[error("department name is empty")]
    EmptyDepartment,
    /// Latitude or longitude out of range (or not a finite number).
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// The backend reported a status outside Pending/Accepted/Declined.
    #[error("unknown admission status '{0}'")]
    UnknownAdmissionStatus(String),
    /// A status transition the admission state machine does not allow.
    #[error("illegal admission status transition {from} -> {to}")]
    IllegalTransition { from: String, to: String },
    /// The analyzer payload was missing data or carried an error instead.
    #[error("malformed analysis payload: {0}")]
    MalformedAnalysis(String),
    /// A required field was missing or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
