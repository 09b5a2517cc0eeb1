// lib/src/triage/classifier.rs

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use models::{SymptomInput, TriageVerdict};

use crate::connectors::SymptomClassifier;
use crate::errors::{Result, TriageError};

/// A verdict together with the symptom text the user gets to see before any
/// routing happens: what they typed, or what the analyzer transcribed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSymptoms {
    pub verdict: TriageVerdict,
    pub visible_text: Option<String>,
}

/// Front door to the symptom analyzer. Validates the input, makes exactly one
/// attempt, and never caches verdicts.
#[derive(Clone)]
pub struct TriageClassifier {
    classifier: Arc<dyn SymptomClassifier>,
    max_clip: Duration,
}

impl TriageClassifier {
    pub fn new(classifier: Arc<dyn SymptomClassifier>, max_clip: Duration) -> Self {
        Self { classifier, max_clip }
    }

    pub async fn classify(&self, input: &SymptomInput) -> Result<ClassifiedSymptoms> {
        if let SymptomInput::Audio { clip, .. } = input {
            clip.ensure_within(self.max_clip)?;
        }

        let classification = self.classifier.classify(input).await.map_err(|err| {
            warn!("Symptom analyzer unavailable: {}", err);
            match err {
                TriageError::ClassificationUnavailable(_) => err,
                other => TriageError::ClassificationUnavailable(other.to_string()),
            }
        })?;

        let visible_text = match input {
            SymptomInput::Text { text, .. } => Some(text.as_str().to_string()),
            SymptomInput::Audio { .. } => classification.transcription.clone(),
        };
        info!(
            "Triage verdict: {} / {} ({})",
            classification.verdict.condition(),
            classification.verdict.department(),
            classification.verdict.criticality()
        );
        Ok(ClassifiedSymptoms { verdict: classification.verdict, visible_text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::MockSymptomClassifier;
    use models::{AudioClip, Classification, Criticality, Department};

    fn verdict() -> TriageVerdict {
        TriageVerdict::new("Myocardial Infarction", Department::new("Cardiology").unwrap(), Criticality::Critical)
    }

    #[tokio::test]
    async fn audio_transcription_is_surfaced() {
        let mut mock = MockSymptomClassifier::new();
        mock.expect_classify().times(1).returning(|_| {
            Ok(Classification { verdict: verdict(), transcription: Some("my chest hurts".into()) })
        });
        let classifier = TriageClassifier::new(Arc::new(mock), Duration::from_secs(5));

        let clip = AudioClip::new(vec![1, 2, 3], "audio/wav", Duration::from_secs(3)).unwrap();
        let result = classifier.classify(&SymptomInput::audio(clip)).await.unwrap();
        assert_eq!(result.visible_text.as_deref(), Some("my chest hurts"));
        assert!(result.verdict.criticality().is_critical());
    }

    #[tokio::test]
    async fn failure_is_reported_once_without_retry() {
        let mut mock = MockSymptomClassifier::new();
        mock.expect_classify()
            .times(1)
            .returning(|_| Err(TriageError::NetworkFailure("connection refused".into())));
        let classifier = TriageClassifier::new(Arc::new(mock), Duration::from_secs(5));

        let err = classifier.classify(&SymptomInput::text("fever").unwrap()).await.unwrap_err();
        assert!(matches!(err, TriageError::ClassificationUnavailable(_)));
    }

    #[tokio::test]
    async fn overlong_clip_never_reaches_the_analyzer() {
        let mut mock = MockSymptomClassifier::new();
        mock.expect_classify().never();
        let classifier = TriageClassifier::new(Arc::new(mock), Duration::from_secs(5));

        let clip = AudioClip::new(vec![0; 16], "audio/wav", Duration::from_secs(9)).unwrap();
        let err = classifier.classify(&SymptomInput::audio(clip)).await.unwrap_err();
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }
}
