// rest_api/src/transcriber.rs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::RestApiError;

/// Speech-to-text backend for `/analyze-audio/`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, mime_type: &str) -> Result<String, RestApiError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    text: String,
}

/// Talks to any server exposing the OpenAI-style `/v1/audio/transcriptions`
/// endpoint, such as a local Whisper server.
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: Client,
    url: String,
    model: String,
}

impl HttpTranscriber {
    pub fn new(base_url: &str, model: impl Into<String>, timeout: Duration) -> Result<Self, RestApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/v1/audio/transcriptions", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, mime_type: &str) -> Result<String, RestApiError> {
        debug!("Transcribing {} ({} bytes) with {}", file_name, audio.len(), self.model);
        let part = Part::bytes(audio).file_name(file_name.to_string()).mime_str(mime_type)?;
        let form = Form::new().part("file", part).text("model", self.model.clone());

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RestApiError::Transcription(format!("HTTP {}: {}", status, body.trim())));
        }
        let body: TranscriptionBody = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_built_from_base() {
        let transcriber = HttpTranscriber::new("http://127.0.0.1:9000/", "small", Duration::from_secs(5)).unwrap();
        assert_eq!(transcriber.url, "http://127.0.0.1:9000/v1/audio/transcriptions");
    }
}
