// models/src/lib.rs
// Shared domain types for the triage, discovery and admission flow.

pub mod errors;
pub mod identifiers;
pub mod medical;

pub use errors::{ValidationError, ValidationResult};
pub use identifiers::{HospitalId, RequestId};
pub use medical::{
    AdmissionDecision, AdmissionRequest, AdmissionStatus, Analysis, AnalysisEnvelope, AudioClip,
    Classification, Coordinate, Criticality, Department, DiseaseInfo, HospitalCandidate,
    LanguageTag, NewAdmissionRequest, PatientInfo, RouteInfo, SosKind, SymptomInput,
    SymptomText, TriageVerdict, CRITICAL_FINAL_STATUS,
};
