// models/src/medical/analysis.rs
// Wire envelope of the symptom analyzer service. Shared by the service that
// produces it and the client that consumes it.

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::medical::triage::{Criticality, Department, TriageVerdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub top_department: String,
    pub disease_prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_doctor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_text: Option<String>,
    pub final_status: String,
    pub disease_info: DiseaseInfo,
}

/// `{"transcribed_text"?, "analysis"}` on success, `{"error"}` on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisEnvelope {
    pub fn success(analysis: Analysis) -> Self {
        Self { analysis: Some(analysis), ..Self::default() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Self::default() }
    }

    pub fn with_transcription(mut self, text: impl Into<String>) -> Self {
        self.transcribed_text = Some(text.into());
        self
    }

    /// Converts the loose wire shape into a typed classification. This is the
    /// one place `final_status` is looked at as a string.
    pub fn into_classification(self) -> ValidationResult<Classification> {
        if let Some(error) = self.error {
            return Err(ValidationError::MalformedAnalysis(error));
        }
        let analysis = self
            .analysis
            .ok_or_else(|| ValidationError::MalformedAnalysis("missing 'analysis' object".to_string()))?;

        let department = Department::new(&analysis.disease_info.top_department)?;
        let criticality = Criticality::from_final_status(&analysis.final_status);
        let mut verdict = TriageVerdict::new(analysis.disease_info.disease_prediction, department, criticality);
        if let Some(doctor) = analysis.disease_info.recommended_doctor {
            verdict = verdict.with_recommended_doctor(doctor);
        }

        Ok(Classification { verdict, transcription: self.transcribed_text })
    }
}

/// A verdict plus whatever the classifier heard, if the input was audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: TriageVerdict,
    pub transcription: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_audio_envelope_with_transcription() {
        let body = r#"{
            "transcribed_text": " I have severe chest pain",
            "analysis": {
                "original_text": " I have severe chest pain",
                "english_text": " I have severe chest pain",
                "final_status": "Critical",
                "disease_info": {
                    "top_department": "Cardiology",
                    "disease_prediction": "Myocardial Infarction",
                    "recommended_doctor": "Cardiologist"
                }
            }
        }"#;
        let envelope: AnalysisEnvelope = serde_json::from_str(body).unwrap();
        let classification = envelope.into_classification().unwrap();
        assert_eq!(classification.verdict.department().as_str(), "Cardiology");
        assert_eq!(classification.verdict.criticality(), Criticality::Critical);
        assert_eq!(classification.verdict.recommended_doctor(), Some("Cardiologist"));
        assert_eq!(classification.transcription.as_deref(), Some(" I have severe chest pain"));
    }

    #[test]
    fn error_body_is_malformed() {
        let envelope: AnalysisEnvelope = serde_json::from_str(r#"{"error": "model not loaded"}"#).unwrap();
        assert_eq!(
            envelope.into_classification().unwrap_err(),
            ValidationError::MalformedAnalysis("model not loaded".to_string())
        );
    }

    #[test]
    fn missing_analysis_or_department_is_malformed() {
        assert!(AnalysisEnvelope::default().into_classification().is_err());

        let body = r#"{"analysis": {"final_status": "Critical",
            "disease_info": {"top_department": " ", "disease_prediction": "x"}}}"#;
        let envelope: AnalysisEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.into_classification().unwrap_err(), ValidationError::EmptyDepartment);
    }

    #[test]
    fn success_envelope_skips_empty_fields() {
        let envelope = AnalysisEnvelope::success(Analysis {
            original_text: None,
            english_text: None,
            final_status: "Normal".into(),
            disease_info: DiseaseInfo {
                top_department: "General".into(),
                disease_prediction: "General Checkup Required".into(),
                recommended_doctor: None,
            },
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("transcribed_text").is_none());
        assert_eq!(json["analysis"]["final_status"], "Normal");
    }
}
