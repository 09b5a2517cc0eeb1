// models/src/medical/triage.rs

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// The status string the analyzer uses for its critical bucket. Every other
/// value is treated as non-critical.
pub const CRITICAL_FINAL_STATUS: &str = "Critical";

/// Free-text symptom description. Never empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymptomText(String);

impl SymptomText {
    pub fn new(raw: impl AsRef<str>) -> ValidationResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymptomText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SymptomText {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl From<SymptomText> for String {
    fn from(value: SymptomText) -> Self {
        value.0
    }
}

impl fmt::Display for SymptomText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language hint sent along with the symptoms, e.g. "en" or "ta".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTag(pub String);

impl LanguageTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A recorded voice clip, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
    duration: Duration,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, duration: Duration) -> ValidationResult<Self> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyAudioClip);
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: "voice.wav".to_string(),
            duration,
        })
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Rejects clips longer than `max`. Recorders stop at the window, so this
    /// only trips for clips that came from somewhere else.
    pub fn ensure_within(&self, max: Duration) -> ValidationResult<()> {
        if self.duration > max {
            return Err(ValidationError::AudioClipTooLong {
                actual_ms: self.duration.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// What the patient gave us to classify.
#[derive(Debug, Clone, PartialEq)]
pub enum SymptomInput {
    Text { text: SymptomText, language: Option<LanguageTag> },
    Audio { clip: AudioClip, language: Option<LanguageTag> },
}

impl SymptomInput {
    pub fn text(raw: impl AsRef<str>) -> ValidationResult<Self> {
        Ok(SymptomInput::Text { text: SymptomText::new(raw)?, language: None })
    }

    pub fn audio(clip: AudioClip) -> Self {
        SymptomInput::Audio { clip, language: None }
    }

    pub fn with_language(self, tag: LanguageTag) -> Self {
        match self {
            SymptomInput::Text { text, .. } => SymptomInput::Text { text, language: Some(tag) },
            SymptomInput::Audio { clip, .. } => SymptomInput::Audio { clip, language: Some(tag) },
        }
    }

    pub fn language(&self) -> Option<&LanguageTag> {
        match self {
            SymptomInput::Text { language, .. } | SymptomInput::Audio { language, .. } => language.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criticality {
    Critical,
    NonCritical,
}

impl Criticality {
    /// Maps the analyzer's `final_status` onto the closed enum. Only the exact
    /// critical marker counts; "Normal", "Stable" or anything else is non-critical.
    pub fn from_final_status(status: &str) -> Self {
        if status == CRITICAL_FINAL_STATUS {
            Criticality::Critical
        } else {
            Criticality::NonCritical
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Criticality::Critical)
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::Critical => write!(f, "CRITICAL"),
            Criticality::NonCritical => write!(f, "NON-CRITICAL"),
        }
    }
}

/// Specialty name used as the hospital search key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    pub fn new(name: impl AsRef<str>) -> ValidationResult<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDepartment);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Department {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SOS shortcuts that skip classification entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosKind {
    /// Ambulance / trauma.
    Trauma,
    /// Nearest general hospital.
    NearestGeneral,
}

/// Result of classifying a symptom input. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageVerdict {
    condition: String,
    department: Department,
    criticality: Criticality,
    recommended_doctor: Option<String>,
}

impl TriageVerdict {
    pub fn new(condition: impl Into<String>, department: Department, criticality: Criticality) -> Self {
        Self {
            condition: condition.into(),
            department,
            criticality,
            recommended_doctor: None,
        }
    }

    pub fn with_recommended_doctor(mut self, doctor: impl Into<String>) -> Self {
        self.recommended_doctor = Some(doctor.into());
        self
    }

    /// Verdict for an SOS button press. Always critical.
    pub fn sos(kind: SosKind) -> Self {
        let (department, condition) = match kind {
            SosKind::Trauma => ("Emergency", "Emergency Situation"),
            SosKind::NearestGeneral => ("General", "Emergency Situation"),
        };
        Self::new(condition, Department(department.to_string()), Criticality::Critical)
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn department(&self) -> &Department {
        &self.department
    }

    pub fn criticality(&self) -> Criticality {
        self.criticality
    }

    pub fn recommended_doctor(&self) -> Option<&str> {
        self.recommended_doctor.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptom_text_is_trimmed_and_required() {
        assert_eq!(SymptomText::new("  chest pain \n").unwrap().as_str(), "chest pain");
        assert_eq!(SymptomText::new(" \t ").unwrap_err(), ValidationError::EmptySymptomText);
        assert!(SymptomInput::text("").is_err());
    }

    #[test]
    fn only_exact_critical_marker_is_critical() {
        assert_eq!(Criticality::from_final_status("Critical"), Criticality::Critical);
        assert_eq!(Criticality::from_final_status("Stable"), Criticality::NonCritical);
        assert_eq!(Criticality::from_final_status("Normal"), Criticality::NonCritical);
        assert_eq!(Criticality::from_final_status("critical "), Criticality::NonCritical);
    }

    #[test]
    fn sos_verdicts_are_critical() {
        let trauma = TriageVerdict::sos(SosKind::Trauma);
        assert_eq!(trauma.department().as_str(), "Emergency");
        assert!(trauma.criticality().is_critical());

        let general = TriageVerdict::sos(SosKind::NearestGeneral);
        assert_eq!(general.department().as_str(), "General");
        assert!(general.criticality().is_critical());
    }

    #[test]
    fn audio_clip_window_is_enforced() {
        let clip = AudioClip::new(vec![1, 2, 3], "audio/wav", Duration::from_secs(6)).unwrap();
        assert!(clip.ensure_within(Duration::from_secs(5)).is_err());
        assert!(clip.ensure_within(Duration::from_secs(6)).is_ok());
        assert_eq!(
            AudioClip::new(Vec::new(), "audio/wav", Duration::ZERO).unwrap_err(),
            ValidationError::EmptyAudioClip
        );
    }

    #[test]
    fn language_is_carried_on_both_variants() {
        let input = SymptomInput::text("fever").unwrap().with_language(LanguageTag("ta".into()));
        assert_eq!(input.language().map(LanguageTag::as_str), Some("ta"));
    }
}
