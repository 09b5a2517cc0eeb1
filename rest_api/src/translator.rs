// rest_api/src/translator.rs

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::RestApiError;

/// Renders symptom text in English before keyword matching.
#[async_trait]
pub trait Translator: Send + Sync {
    /// `source` is the caller's language hint; `None` lets the service detect it.
    async fn to_english(&self, text: &str, source: Option<&str>) -> Result<String, RestApiError>;
}

/// Whether `text` should go through translation at all. English hints and
/// plain ASCII text without a hint are matched as given.
pub fn needs_translation(text: &str, language: Option<&str>) -> bool {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(tag) => !tag.eq_ignore_ascii_case("en") && !tag.to_ascii_lowercase().starts_with("en-"),
        None => !text.is_ascii(),
    }
}

/// English text for the matcher. Without a translator, or when translation
/// fails, the input is used unchanged.
pub async fn english_text(translator: Option<&dyn Translator>, text: &str, language: Option<&str>) -> String {
    let Some(translator) = translator else {
        return text.to_string();
    };
    if !needs_translation(text, language) {
        return text.to_string();
    }
    match translator.to_english(text, language).await {
        Ok(english) if !english.trim().is_empty() => {
            debug!("Translated symptoms to: {}", english);
            english
        }
        Ok(_) => text.to_string(),
        Err(err) => {
            warn!("Translation failed, matching original text: {}", err);
            text.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedBody {
    translated_text: String,
}

/// Talks to a LibreTranslate-compatible `/translate` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    url: String,
}

impl HttpTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: format!("{}/translate", base_url.trim_end_matches('/')) })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn to_english(&self, text: &str, source: Option<&str>) -> Result<String, RestApiError> {
        let body = TranslateBody { q: text, source: source.unwrap_or("auto"), target: "en", format: "text" };
        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RestApiError::Translation(format!("HTTP {}: {}", status, body.trim())));
        }
        let body: TranslatedBody = response.json().await?;
        Ok(body.translated_text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    struct Broken;

    #[async_trait]
    impl Translator for Broken {
        async fn to_english(&self, _text: &str, _source: Option<&str>) -> Result<String, RestApiError> {
            Err(RestApiError::Translation("HTTP 503".into()))
        }
    }

    #[test]
    fn english_and_ascii_text_skip_translation() {
        assert!(!needs_translation("chest pain", None));
        assert!(!needs_translation("chest pain", Some("en")));
        assert!(!needs_translation("நெஞ்சு வலி", Some("en-IN")));
        assert!(needs_translation("நெஞ்சு வலி", None));
        assert!(needs_translation("seene mein dard", Some("hi")));
    }

    #[tokio::test]
    async fn failed_translation_falls_back_to_input() {
        let text = english_text(Some(&Broken), "நெஞ்சு வலி", Some("ta")).await;
        assert_eq!(text, "நெஞ்சு வலி");
        assert_eq!(english_text(None, "நெஞ்சு வலி", Some("ta")).await, "நெஞ்சு வலி");
    }

    #[tokio::test]
    async fn http_translator_posts_libretranslate_body() {
        async fn translate(Json(body): Json<Value>) -> Json<Value> {
            assert_eq!(body["source"], "ta");
            assert_eq!(body["target"], "en");
            Json(json!({ "translatedText": " severe chest pain " }))
        }
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/translate", post(translate))).await.unwrap();
        });

        let translator = HttpTranslator::new(&base, Duration::from_secs(5)).unwrap();
        let english = translator.to_english("நெஞ்சு வலி", Some("ta")).await.unwrap();
        assert_eq!(english, "severe chest pain");
    }
}
