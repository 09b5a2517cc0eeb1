// models/src/medical/mod.rs

pub mod admission;
pub mod analysis;
pub mod hospital;
pub mod route;
pub mod triage;

pub use admission::{AdmissionDecision, AdmissionRequest, AdmissionStatus, NewAdmissionRequest, PatientInfo};
pub use analysis::{Analysis, AnalysisEnvelope, Classification, DiseaseInfo};
pub use hospital::{Coordinate, HospitalCandidate};
pub use route::RouteInfo;
pub use triage::{
    AudioClip, CRITICAL_FINAL_STATUS, Criticality, Department, LanguageTag, SosKind, SymptomInput, SymptomText,
    TriageVerdict,
};
