// lib/src/config/config_defaults.rs

pub const DEFAULT_CONFIG_FILE_NAME: &str = "suvera.toml";

pub const DEFAULT_TRIAGE_SERVICE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_BACKEND_URL: &str = "https://localhost:7189/api";
pub const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_ROUTING_PROFILE: &str = "driving";

pub const DEFAULT_ANALYZER_HOST: &str = "127.0.0.1";
pub const DEFAULT_ANALYZER_PORT: u16 = 8000;
pub const DEFAULT_TRANSCRIBER_MODEL: &str = "small";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_MAX_CAPTURE_SECS: u64 = 5;

pub const DEFAULT_ANONYMOUS_PATIENT_NAME: &str = "Emergency User";
pub const DEFAULT_ANONYMOUS_CONTACT_NUMBER: &str = "9876543210";

pub fn default_triage_service_url() -> String { DEFAULT_TRIAGE_SERVICE_URL.to_string() }
pub fn default_triage_timeout_secs() -> u64 { 30 }
pub fn default_backend_url() -> String { DEFAULT_BACKEND_URL.to_string() }
pub fn default_backend_timeout_secs() -> u64 { 10 }
pub fn default_accept_invalid_certs() -> bool { false }
pub fn default_routing_url() -> String { DEFAULT_ROUTING_URL.to_string() }
pub fn default_routing_profile() -> String { DEFAULT_ROUTING_PROFILE.to_string() }
pub fn default_routing_timeout_secs() -> u64 { 10 }
pub fn default_poll_interval_ms() -> u64 { DEFAULT_POLL_INTERVAL_MS }
pub fn default_anonymous_patient_name() -> String { DEFAULT_ANONYMOUS_PATIENT_NAME.to_string() }
pub fn default_anonymous_contact_number() -> String { DEFAULT_ANONYMOUS_CONTACT_NUMBER.to_string() }
pub fn default_max_capture_secs() -> u64 { DEFAULT_MAX_CAPTURE_SECS }
pub fn default_analyzer_host() -> String { DEFAULT_ANALYZER_HOST.to_string() }
pub fn default_analyzer_port() -> u16 { DEFAULT_ANALYZER_PORT }
pub fn default_transcriber_model() -> String { DEFAULT_TRANSCRIBER_MODEL.to_string() }
pub fn default_transcriber_timeout_secs() -> u64 { 60 }
pub fn default_translator_timeout_secs() -> u64 { 10 }
