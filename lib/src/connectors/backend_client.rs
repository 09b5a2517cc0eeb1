// lib/src/connectors/backend_client.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use models::{
    AdmissionRequest, AdmissionStatus, Coordinate, Department, HospitalCandidate, HospitalId,
    NewAdmissionRequest, RequestId,
};

use crate::config::BackendConfig;
use crate::connectors::{AdmissionBackend, HospitalDirectory};
use crate::errors::{Result, TriageError};

/// The hospital backend sends coordinates either as numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    fn value(&self) -> Option<f64> {
        match self {
            LenientNumber::Number(n) => Some(*n),
            LenientNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HospitalRecord {
    #[serde(alias = "id")]
    hospital_id: HospitalId,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default, alias = "phone")]
    phone_number: Option<String>,
    latitude: Option<LenientNumber>,
    longitude: Option<LenientNumber>,
    #[serde(default, alias = "isAvailable")]
    is_active: Option<bool>,
}

impl HospitalRecord {
    fn into_candidate(self, department: &Department) -> Option<HospitalCandidate> {
        if self.is_active == Some(false) {
            debug!("Skipping inactive hospital {}", self.hospital_id);
            return None;
        }
        let latitude = self.latitude.as_ref().and_then(LenientNumber::value);
        let longitude = self.longitude.as_ref().and_then(LenientNumber::value);
        let location = match (latitude, longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        };
        let Some(location) = location else {
            warn!("Hospital {} has no usable coordinates, skipping", self.hospital_id);
            return None;
        };
        Some(HospitalCandidate {
            id: self.hospital_id,
            name: self.name,
            address: self.address.unwrap_or_default(),
            phone: self.phone_number.filter(|p| !p.trim().is_empty()),
            location,
            department: department.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateRequestBody<'a> {
    hospital_id: Value,
    patient_name: &'a str,
    contact_number: &'a str,
    symptom_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    #[serde(alias = "requestId")]
    id: RequestId,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: AdmissionStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestRecord {
    #[serde(alias = "requestId")]
    id: RequestId,
    hospital_id: HospitalId,
    patient_name: String,
    #[serde(default)]
    contact_number: String,
    #[serde(default, alias = "symptomSummary")]
    symptom_description: String,
    #[serde(default, alias = "createdAt")]
    request_time: Option<String>,
    status: AdmissionStatus,
}

impl From<RequestRecord> for AdmissionRequest {
    fn from(record: RequestRecord) -> Self {
        AdmissionRequest {
            id: record.id,
            hospital_id: record.hospital_id,
            patient_name: record.patient_name,
            contact_number: record.contact_number,
            symptom_summary: record.symptom_description,
            requested_at: record.request_time.as_deref().and_then(parse_timestamp),
            status: record.status,
        }
    }
}

/// Accepts RFC 3339 and the offset-less form the backend's ORM emits (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Numeric ids go back out as JSON numbers, everything else as strings.
fn wire_id(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

/// REST client for hospital search and the admission request endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TriageError::NetworkFailure(format!("backend answered HTTP {}: {}", status, body.trim())))
    }
}

#[async_trait]
impl HospitalDirectory for HttpBackendClient {
    async fn search(&self, department: &Department, origin: Coordinate) -> Result<Vec<HospitalCandidate>> {
        debug!("Searching {} hospitals near {}", department, origin);
        let response = self
            .client
            .get(self.endpoint("hospitals/search"))
            .query(&[
                ("specialty", department.as_str().to_string()),
                ("lat", origin.latitude.to_string()),
                ("lng", origin.longitude.to_string()),
            ])
            .send()
            .await?;
        let records: Vec<HospitalRecord> = Self::ensure_success(response).await?.json().await?;
        Ok(records.into_iter().filter_map(|record| record.into_candidate(department)).collect())
    }
}

#[async_trait]
impl AdmissionBackend for HttpBackendClient {
    async fn create(&self, request: &NewAdmissionRequest) -> Result<RequestId> {
        let body = CreateRequestBody {
            hospital_id: wire_id(request.hospital_id.as_str()),
            patient_name: &request.patient.name,
            contact_number: &request.patient.contact_number,
            symptom_description: &request.symptom_summary,
        };
        let response = self.client.post(self.endpoint("Requests/create")).json(&body).send().await?;
        let created: CreatedBody = Self::ensure_success(response).await?.json().await?;
        info!("Admission request {} created for hospital {}", created.id, request.hospital_id);
        Ok(created.id)
    }

    async fn status(&self, request_id: &RequestId) -> Result<AdmissionStatus> {
        let url = self.endpoint(&format!("Requests/check-status/{}", request_id));
        let response = self.client.get(url).send().await?;
        let body: StatusBody = Self::ensure_success(response).await?.json().await?;
        Ok(body.status)
    }

    async fn pending_for(&self, hospital_id: &HospitalId) -> Result<Vec<AdmissionRequest>> {
        let url = self.endpoint(&format!("Requests/hospital/{}/pending", hospital_id));
        let response = self.client.get(url).send().await?;
        let records: Vec<RequestRecord> = Self::ensure_success(response).await?.json().await?;
        Ok(records.into_iter().map(AdmissionRequest::from).collect())
    }

    async fn update_status(&self, request_id: &RequestId, status: AdmissionStatus) -> Result<()> {
        let url = self.endpoint(&format!("Requests/update-status/{}", request_id));
        let response = self
            .client
            .put(url)
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let current = response
                .json::<StatusBody>()
                .await
                .map(|body| body.status.to_string())
                .unwrap_or_else(|_| "not pending".to_string());
            return Err(TriageError::InvalidRequestState { request_id: request_id.clone(), status: current });
        }
        Self::ensure_success(response).await?;
        info!("Admission request {} marked {}", request_id, status);
        Ok(())
    }
}
