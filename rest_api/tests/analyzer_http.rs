// rest_api/tests/analyzer_http.rs
// Drives a live analyzer through the library's HTTP classifier client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use lib::config::TriageServiceConfig;
use lib::{HttpTriageClient, SymptomClassifier, TriageError};
use models::{AudioClip, Criticality, LanguageTag, SymptomInput};
use rest_api::{AnalyzerState, RestApiError, Transcriber, Translator};

struct FixedTranscriber(&'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, _file_name: &str, _mime_type: &str) -> Result<String, RestApiError> {
        assert!(!audio.is_empty());
        Ok(self.0.to_string())
    }
}

/// Knows one Tamil phrase.
struct PhrasebookTranslator;

#[async_trait]
impl Translator for PhrasebookTranslator {
    async fn to_english(&self, text: &str, source: Option<&str>) -> Result<String, RestApiError> {
        assert_eq!(source, Some("ta"));
        match text {
            "கடுமையான நெஞ்சு வலி" => Ok("severe chest pain".to_string()),
            other => Err(RestApiError::Translation(format!("unknown phrase {}", other))),
        }
    }
}

async fn start(state: AnalyzerState) -> (HttpTriageClient, String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(rest_api::serve(listener, state, shutdown_rx));

    let client = HttpTriageClient::new(&TriageServiceConfig { base_url: base_url.clone(), timeout_secs: 5 }).unwrap();
    (client, base_url, shutdown_tx)
}

fn clip() -> AudioClip {
    AudioClip::new(vec![0u8; 256], "audio/wav", Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn chest_pain_text_comes_back_critical_cardiology() {
    let (client, _, shutdown) = start(AnalyzerState::default()).await;

    let input = SymptomInput::text("I have severe chest pain").unwrap();
    let classification = client.classify(&input).await.unwrap();

    assert_eq!(classification.verdict.criticality(), Criticality::Critical);
    assert_eq!(classification.verdict.department().as_str(), "Cardiology");
    assert_eq!(classification.verdict.condition(), "Myocardial Infarction");
    assert_eq!(classification.verdict.recommended_doctor(), Some("Cardiologist"));
    assert_eq!(classification.transcription, None);
    let _ = shutdown.send(());
}

#[tokio::test]
async fn audio_is_transcribed_and_transcription_returned() {
    let state = AnalyzerState::new(Some(Arc::new(FixedTranscriber("I was in a road accident"))));
    let (client, _, shutdown) = start(state).await;

    let classification = client.classify(&SymptomInput::audio(clip())).await.unwrap();
    assert_eq!(classification.transcription.as_deref(), Some("I was in a road accident"));
    assert_eq!(classification.verdict.department().as_str(), "Emergency");
    let _ = shutdown.send(());
}

#[tokio::test]
async fn audio_without_transcriber_is_classification_unavailable() {
    let (client, base_url, shutdown) = start(AnalyzerState::default()).await;

    let err = client.classify(&SymptomInput::audio(clip())).await.unwrap_err();
    assert!(matches!(err, TriageError::ClassificationUnavailable(ref msg) if msg.contains("not configured")));

    let health: serde_json::Value = reqwest::get(format!("{}/", base_url)).await.unwrap().json().await.unwrap();
    assert_eq!(health["message"], "API Running.");
    let _ = shutdown.send(());
}

#[tokio::test]
async fn blank_text_is_rejected_with_error_body() {
    let (_, base_url, shutdown) = start(AnalyzerState::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/analyze-text/", base_url))
        .form(&[("text", "   ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("must not be empty"));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn tamil_symptoms_are_translated_before_matching() {
    let state = AnalyzerState::default().with_translator(Some(Arc::new(PhrasebookTranslator)));
    let (client, _, shutdown) = start(state).await;

    let input = SymptomInput::text("கடுமையான நெஞ்சு வலி").unwrap().with_language(LanguageTag("ta".into()));
    let classification = client.classify(&input).await.unwrap();
    assert_eq!(classification.verdict.criticality(), Criticality::Critical);
    assert_eq!(classification.verdict.department().as_str(), "Cardiology");

    // An unknown phrase falls back to the original text, which matches nothing.
    let input = SymptomInput::text("தலைவலி").unwrap().with_language(LanguageTag("ta".into()));
    let classification = client.classify(&input).await.unwrap();
    assert_eq!(classification.verdict.criticality(), Criticality::NonCritical);
    let _ = shutdown.send(());
}
