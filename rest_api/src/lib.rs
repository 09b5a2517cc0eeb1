// rest_api/src/lib.rs
// Symptom analyzer HTTP service: text or voice in, keyword triage out.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::FormRejection, DefaultBodyLimit, Multipart, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use lib::config::AnalyzerConfig;
use models::AnalysisEnvelope;

pub mod config;
pub mod pipeline;
pub mod transcriber;
pub mod translator;

pub use crate::transcriber::{HttpTranscriber, Transcriber};
pub use crate::translator::{HttpTranslator, Translator};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Audio transcription is not configured on this server")]
    TranscriberUnavailable,
    #[error("Transcription failed: {0}")]
    Transcription(String),
    #[error("Translation failed: {0}")]
    Translation(String),
    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            RestApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RestApiError::TranscriberUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            RestApiError::Transcription(_) | RestApiError::Translation(_) | RestApiError::Reqwest(_) => {
                StatusCode::BAD_GATEWAY
            }
            RestApiError::Io(_) | RestApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed ({}): {}", status, self);
        (status, Json(AnalysisEnvelope::failure(self.to_string()))).into_response()
    }
}

#[derive(Clone, Default)]
pub struct AnalyzerState {
    transcriber: Option<Arc<dyn Transcriber>>,
    translator: Option<Arc<dyn Translator>>,
}

impl AnalyzerState {
    pub fn new(transcriber: Option<Arc<dyn Transcriber>>) -> Self {
        Self { transcriber, translator: None }
    }

    pub fn with_translator(mut self, translator: Option<Arc<dyn Translator>>) -> Self {
        self.translator = translator;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TextForm {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

async fn home_handler() -> Json<Value> {
    Json(json!({ "message": "API Running." }))
}

async fn analyze_text_handler(
    State(state): State<AnalyzerState>,
    form: Result<Form<TextForm>, FormRejection>,
) -> Result<Json<AnalysisEnvelope>, RestApiError> {
    let Form(form) = form.map_err(|e| RestApiError::InvalidInput(e.body_text()))?;
    let text = form.text.trim();
    if text.is_empty() {
        return Err(RestApiError::InvalidInput("'text' must not be empty".to_string()));
    }
    let language = form.language.as_deref();
    debug!("Analyzing text (language hint: {:?})", language);

    let english = translator::english_text(state.translator.as_deref(), text, language).await;
    let analysis = pipeline::analyze(text, &english);
    info!("Text analysis: {} / {}", analysis.final_status, analysis.disease_info.top_department);
    Ok(Json(AnalysisEnvelope::success(analysis)))
}

async fn analyze_audio_handler(
    State(state): State<AnalyzerState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisEnvelope>, RestApiError> {
    let mut upload = None;
    let mut language = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RestApiError::InvalidInput(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {}
            Some("language") => {
                language = Some(field.text().await.map_err(|e| RestApiError::InvalidInput(e.body_text()))?);
                continue;
            }
            _ => continue,
        }
        let file_name = field.file_name().unwrap_or("voice.wav").to_string();
        let mime_type = field.content_type().unwrap_or("audio/wav").to_string();
        let bytes = field.bytes().await.map_err(|e| RestApiError::InvalidInput(e.body_text()))?;
        upload = Some((bytes.to_vec(), file_name, mime_type));
    }

    let (audio, file_name, mime_type) =
        upload.ok_or_else(|| RestApiError::InvalidInput("multipart field 'file' is required".to_string()))?;
    if audio.is_empty() {
        return Err(RestApiError::InvalidInput("uploaded audio is empty".to_string()));
    }
    let transcriber = state.transcriber.as_ref().ok_or(RestApiError::TranscriberUnavailable)?;

    let text = transcriber.transcribe(audio, &file_name, &mime_type).await?;
    let english = translator::english_text(state.translator.as_deref(), &text, language.as_deref()).await;
    let analysis = pipeline::analyze(&text, &english);
    info!("Audio analysis: {} / {}", analysis.final_status, analysis.disease_info.top_department);
    Ok(Json(AnalysisEnvelope::success(analysis).with_transcription(text)))
}

pub fn router(state: AnalyzerState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/analyze-text/", post(analyze_text_handler))
        .route("/analyze-audio/", post(analyze_audio_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(cors)
}

/// Serves the analyzer on an already bound listener until `shutdown_rx` fires.
pub async fn serve(
    listener: TcpListener,
    state: AnalyzerState,
    shutdown_rx: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!("Symptom analyzer listening on {}", addr);

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(async {
            if shutdown_rx.await.is_ok() {
                info!("Received shutdown signal.");
            }
        })
        .await
        .context("Symptom analyzer failed while serving")?;

    info!("Symptom analyzer stopped.");
    Ok(())
}

pub async fn start_server(config: &AnalyzerConfig, shutdown_rx: oneshot::Receiver<()>) -> anyhow::Result<()> {
    let addr = config::listen_addr(config)?;
    let state = AnalyzerState::new(config::transcriber_from(config)?).with_translator(config::translator_from(config)?);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;
    serve(listener, state, shutdown_rx).await.inspect_err(|e| error!("{:#}", e))
}
