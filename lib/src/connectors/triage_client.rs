// lib/src/connectors/triage_client.rs

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

use models::{AnalysisEnvelope, AudioClip, Classification, LanguageTag, SymptomInput, SymptomText};

use crate::config::TriageServiceConfig;
use crate::connectors::SymptomClassifier;
use crate::errors::{Result, TriageError};

/// HTTP client for the symptom analyzer (`/analyze-text/`, `/analyze-audio/`).
#[derive(Debug, Clone)]
pub struct HttpTriageClient {
    client: Client,
    base_url: String,
}

impl HttpTriageClient {
    pub fn new(config: &TriageServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn classify_text(&self, text: &SymptomText, language: Option<&LanguageTag>) -> Result<Response> {
        let mut fields = vec![("text", text.as_str())];
        if let Some(tag) = language {
            fields.push(("language", tag.as_str()));
        }
        Ok(self.client.post(self.endpoint("analyze-text/")).form(&fields).send().await?)
    }

    async fn classify_audio(&self, clip: &AudioClip, language: Option<&LanguageTag>) -> Result<Response> {
        let part = Part::bytes(clip.bytes().to_vec())
            .file_name(clip.file_name().to_string())
            .mime_str(clip.mime_type())?;
        let mut form = Form::new().part("file", part);
        if let Some(tag) = language {
            form = form.text("language", tag.as_str().to_string());
        }
        Ok(self.client.post(self.endpoint("analyze-audio/")).multipart(form).send().await?)
    }

    async fn attempt(&self, input: &SymptomInput) -> Result<Classification> {
        let response = match input {
            SymptomInput::Text { text, language } => self.classify_text(text, language.as_ref()).await?,
            SymptomInput::Audio { clip, language } => self.classify_audio(clip, language.as_ref()).await?,
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let reason = serde_json::from_str::<AnalysisEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| format!("analyzer answered HTTP {}", status));
            return Err(TriageError::ClassificationUnavailable(reason));
        }

        let envelope: AnalysisEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.into_classification()?)
    }
}

#[async_trait]
impl SymptomClassifier for HttpTriageClient {
    async fn classify(&self, input: &SymptomInput) -> Result<Classification> {
        debug!("Sending symptoms to analyzer at {}", self.base_url);
        self.attempt(input).await.map_err(|err| {
            warn!("Classification failed: {}", err);
            match err {
                TriageError::ClassificationUnavailable(_) => err,
                other => TriageError::ClassificationUnavailable(other.to_string()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_tolerate_trailing_slash() {
        let config = TriageServiceConfig { base_url: "http://127.0.0.1:8000/".into(), timeout_secs: 1 };
        let client = HttpTriageClient::new(&config).unwrap();
        assert_eq!(client.endpoint("analyze-text/"), "http://127.0.0.1:8000/analyze-text/");
    }

    #[tokio::test]
    async fn unreachable_analyzer_is_classification_unavailable() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = TriageServiceConfig { base_url: "http://127.0.0.1:9".into(), timeout_secs: 2 };
        let client = HttpTriageClient::new(&config).unwrap();
        let input = SymptomInput::text("chest pain").unwrap();
        let err = client.classify(&input).await.unwrap_err();
        assert!(matches!(err, TriageError::ClassificationUnavailable(_)));
    }
}
