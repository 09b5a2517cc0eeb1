// rest_api/src/config.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lib::config::AnalyzerConfig;
use log::info;

use crate::transcriber::{HttpTranscriber, Transcriber};
use crate::translator::{HttpTranslator, Translator};
use crate::RestApiError;

/// Address the analyzer listens on.
pub fn listen_addr(config: &AnalyzerConfig) -> Result<SocketAddr, RestApiError> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| RestApiError::Config(format!("invalid analyzer address {}:{}: {}", config.host, config.port, e)))
}

/// Builds the transcriber named in the configuration, if any.
pub fn transcriber_from(config: &AnalyzerConfig) -> Result<Option<Arc<dyn Transcriber>>, RestApiError> {
    match config.transcriber_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            info!("Audio transcription via {} (model {})", url, config.transcriber_model);
            let transcriber = HttpTranscriber::new(
                url,
                config.transcriber_model.clone(),
                Duration::from_secs(config.transcriber_timeout_secs),
            )?;
            Ok(Some(Arc::new(transcriber)))
        }
        None => {
            info!("No transcriber configured; /analyze-audio/ will answer 503");
            Ok(None)
        }
    }
}

/// Builds the translator named in the configuration, if any.
pub fn translator_from(config: &AnalyzerConfig) -> Result<Option<Arc<dyn Translator>>, RestApiError> {
    match config.translator_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            info!("Symptom translation via {}", url);
            let translator = HttpTranslator::new(url, Duration::from_secs(config.translator_timeout_secs))?;
            Ok(Some(Arc::new(translator)))
        }
        None => {
            info!("No translator configured; non-English symptoms are matched as given");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_loopback_8000() {
        let addr = listen_addr(&AnalyzerConfig::default()).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
        assert!(transcriber_from(&AnalyzerConfig::default()).unwrap().is_none());
        assert!(translator_from(&AnalyzerConfig::default()).unwrap().is_none());
    }

    #[test]
    fn bad_host_is_a_config_error() {
        let config = AnalyzerConfig { host: "not a host".into(), ..AnalyzerConfig::default() };
        assert!(matches!(listen_addr(&config), Err(RestApiError::Config(_))));
    }
}
