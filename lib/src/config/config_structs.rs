// lib/src/config/config_structs.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;
use crate::errors::{Result, TriageError};
use models::{Coordinate, PatientInfo};

/// Where the symptom analyzer lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageServiceConfig {
    #[serde(default = "default_triage_service_url")]
    pub base_url: String,
    #[serde(default = "default_triage_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TriageServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_triage_service_url(),
            timeout_secs: default_triage_timeout_secs(),
        }
    }
}

/// The hospital backend (hospital search and admission requests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,
    /// Development backends run on self-signed certificates.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_backend_timeout_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

/// OSRM-compatible routing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_routing_url")]
    pub base_url: String,
    #[serde(default = "default_routing_profile")]
    pub profile: String,
    #[serde(default = "default_routing_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_url(),
            profile: default_routing_profile(),
            timeout_secs: default_routing_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Name used for critical requests made without logging in.
    #[serde(default = "default_anonymous_patient_name")]
    pub anonymous_patient_name: String,
    #[serde(default = "default_anonymous_contact_number")]
    pub anonymous_contact_number: String,
}

impl AdmissionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn anonymous_patient(&self) -> Result<PatientInfo> {
        Ok(PatientInfo::new(&self.anonymous_patient_name, &self.anonymous_contact_number)?)
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            anonymous_patient_name: default_anonymous_patient_name(),
            anonymous_contact_number: default_anonymous_contact_number(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_max_capture_secs")]
    pub max_capture_secs: u64,
}

impl AudioConfig {
    pub fn max_capture(&self) -> Duration {
        Duration::from_secs(self.max_capture_secs)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { max_capture_secs: default_max_capture_secs() }
    }
}

/// Position reported by the static geolocation provider. Leaving both fields
/// unset means the position is unknown, which discovery treats as denied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl LocationConfig {
    pub fn coordinate(&self) -> Result<Option<Coordinate>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
            (None, None) => Ok(None),
            _ => Err(TriageError::Configuration(
                "location.latitude and location.longitude must be set together".to_string(),
            )),
        }
    }
}

/// Settings for running the symptom analyzer service itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_analyzer_host")]
    pub host: String,
    #[serde(default = "default_analyzer_port")]
    pub port: u16,
    /// OpenAI-compatible speech-to-text endpoint base, e.g. a local Whisper server.
    #[serde(default)]
    pub transcriber_url: Option<String>,
    #[serde(default = "default_transcriber_model")]
    pub transcriber_model: String,
    #[serde(default = "default_transcriber_timeout_secs")]
    pub transcriber_timeout_secs: u64,
    /// LibreTranslate-compatible endpoint base for non-English symptoms.
    #[serde(default)]
    pub translator_url: Option<String>,
    #[serde(default = "default_translator_timeout_secs")]
    pub translator_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            host: default_analyzer_host(),
            port: default_analyzer_port(),
            transcriber_url: None,
            transcriber_model: default_transcriber_model(),
            transcriber_timeout_secs: default_transcriber_timeout_secs(),
            translator_url: None,
            translator_timeout_secs: default_translator_timeout_secs(),
        }
    }
}

/// Represents the entire structure of `suvera.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuveraConfig {
    #[serde(default)]
    pub triage_service: TriageServiceConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl SuveraConfig {
    /// Rejects values that would stall polling or disable the capture cap.
    pub fn validate(&self) -> Result<()> {
        if self.admission.poll_interval_ms == 0 {
            return Err(TriageError::Configuration("admission.poll_interval_ms must be greater than 0".to_string()));
        }
        if self.audio.max_capture_secs == 0 {
            return Err(TriageError::Configuration("audio.max_capture_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}
