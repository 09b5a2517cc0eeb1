// lib/src/connectors/mod.rs
// Seams to the external collaborators. Production code talks HTTP through the
// clients in the submodules; tests substitute the generated mocks.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use models::{
    AdmissionRequest, AdmissionStatus, Classification, Coordinate, Department, HospitalCandidate,
    HospitalId, NewAdmissionRequest, RequestId, RouteInfo, SymptomInput,
};

use crate::errors::Result;

pub mod backend_client;
pub mod geolocation;
pub mod osrm_client;
pub mod triage_client;

pub use backend_client::HttpBackendClient;
pub use geolocation::StaticGeolocator;
pub use osrm_client::OsrmRoutingClient;
pub use triage_client::HttpTriageClient;

/// The symptom analysis AI service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SymptomClassifier: Send + Sync {
    /// One attempt. Every failure comes back as `ClassificationUnavailable`.
    async fn classify(&self, input: &SymptomInput) -> Result<Classification>;
}

/// Hospital search on the backend, scoped to one specialty.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HospitalDirectory: Send + Sync {
    async fn search(&self, department: &Department, origin: Coordinate) -> Result<Vec<HospitalCandidate>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteInfo>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Fails with `LocationUnavailable` when permission is denied or no fix exists.
    async fn current_position(&self) -> Result<Coordinate>;
}

/// Admission requests as stored by the backend. The backend is the only
/// authority on a request's status.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdmissionBackend: Send + Sync {
    async fn create(&self, request: &NewAdmissionRequest) -> Result<RequestId>;

    async fn status(&self, request_id: &RequestId) -> Result<AdmissionStatus>;

    async fn pending_for(&self, hospital_id: &HospitalId) -> Result<Vec<AdmissionRequest>>;

    /// Answers `InvalidRequestState` when the request already left `Pending`.
    async fn update_status(&self, request_id: &RequestId, status: AdmissionStatus) -> Result<()>;
}
