// lib/src/lib.rs
// Triage core for Suvera: classification, the critical bypass decision,
// hospital discovery with routing, and the admission request protocol.

pub mod admission;
pub mod config;
pub mod connectors;
pub mod discovery;
pub mod errors;
pub mod orchestrator;
pub mod routing_decision;
pub mod session;
pub mod triage;

pub use crate::admission::{AdmissionDesk, IncomingQueue, PollHandle, RequestHandle, StatusWatch};
pub use crate::config::{load_config, SuveraConfig};
pub use crate::connectors::{
    AdmissionBackend, Geolocator, HospitalDirectory, HttpBackendClient, HttpTriageClient,
    OsrmRoutingClient, RoutingEngine, StaticGeolocator, SymptomClassifier,
};
pub use crate::discovery::{DiscoverySession, DiscoverySnapshot, DiscoveryStatus, RouteOutcome};
pub use crate::errors::{Result, TriageError};
pub use crate::orchestrator::{EmergencyFlow, FlowOutcome};
pub use crate::routing_decision::{decide, AuthGate, GateOutcome, RoutingDecision};
pub use crate::session::{Identity, Session};
pub use crate::triage::{AudioRecorder, ClassifiedSymptoms, FileAudioSource, TriageClassifier};
