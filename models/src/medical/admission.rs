// models/src/medical/admission.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::{HospitalId, RequestId};

/// Lifecycle of an admission request. `Pending` is the only non-terminal state
/// and it can be left exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionStatus {
    Pending,
    Accepted,
    Declined,
}

impl AdmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "Pending",
            AdmissionStatus::Accepted => "Accepted",
            AdmissionStatus::Declined => "Declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AdmissionStatus::Pending)
    }

    /// Moves to `next` if the state machine allows it. Re-observing the current
    /// state is allowed (polling sees `Pending` many times, and a terminal
    /// status may be read again); anything else out of a terminal state is not.
    pub fn transition(self, next: AdmissionStatus) -> ValidationResult<AdmissionStatus> {
        match (self, next) {
            (current, next) if current == next => Ok(current),
            (AdmissionStatus::Pending, next) => Ok(next),
            (current, next) => Err(ValidationError::IllegalTransition {
                from: current.to_string(),
                to: next.to_string(),
            }),
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdmissionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AdmissionStatus::Pending),
            "accepted" => Ok(AdmissionStatus::Accepted),
            "declined" => Ok(AdmissionStatus::Declined),
            _ => Err(ValidationError::UnknownAdmissionStatus(s.to_string())),
        }
    }
}

impl Serialize for AdmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AdmissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The hospital's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Accept,
    Decline,
}

impl AdmissionDecision {
    pub fn target_status(&self) -> AdmissionStatus {
        match self {
            AdmissionDecision::Accept => AdmissionStatus::Accepted,
            AdmissionDecision::Decline => AdmissionStatus::Declined,
        }
    }
}

/// Who the request is for, as shown to the hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub contact_number: String,
}

impl PatientInfo {
    pub fn new(name: impl AsRef<str>, contact_number: impl AsRef<str>) -> ValidationResult<Self> {
        let name = name.as_ref().trim();
        let contact_number = contact_number.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("patient name"));
        }
        if contact_number.is_empty() {
            return Err(ValidationError::MissingField("contact number"));
        }
        Ok(Self { name: name.to_string(), contact_number: contact_number.to_string() })
    }
}

/// Payload for creating a request. The backend assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmissionRequest {
    pub hospital_id: HospitalId,
    pub patient: PatientInfo,
    pub symptom_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    pub id: RequestId,
    pub hospital_id: HospitalId,
    pub patient_name: String,
    pub contact_number: String,
    pub symptom_summary: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub status: AdmissionStatus,
}

impl AdmissionRequest {
    /// Applies a hospital decision. Only a pending request can be decided.
    pub fn apply(&mut self, decision: AdmissionDecision) -> ValidationResult<AdmissionStatus> {
        if self.status.is_terminal() {
            return Err(ValidationError::IllegalTransition {
                from: self.status.to_string(),
                to: decision.target_status().to_string(),
            });
        }
        self.status = self.status.transition(decision.target_status())?;
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_request() -> AdmissionRequest {
        AdmissionRequest {
            id: RequestId::new("9").unwrap(),
            hospital_id: HospitalId::new("3").unwrap(),
            patient_name: "Emergency User".into(),
            contact_number: "9876543210".into(),
            symptom_summary: "Cardiology Emergency".into(),
            requested_at: None,
            status: AdmissionStatus::Pending,
        }
    }

    #[test]
    fn pending_leaves_exactly_once() {
        let accepted = AdmissionStatus::Pending.transition(AdmissionStatus::Accepted).unwrap();
        assert_eq!(accepted, AdmissionStatus::Accepted);
        assert!(accepted.transition(AdmissionStatus::Declined).is_err());
        assert!(accepted.transition(AdmissionStatus::Pending).is_err());
        assert_eq!(accepted.transition(AdmissionStatus::Accepted).unwrap(), AdmissionStatus::Accepted);

        let declined = AdmissionStatus::Pending.transition(AdmissionStatus::Declined).unwrap();
        assert!(declined.transition(AdmissionStatus::Accepted).is_err());
    }

    #[test]
    fn status_strings_are_closed() {
        assert_eq!("Pending".parse::<AdmissionStatus>().unwrap(), AdmissionStatus::Pending);
        assert_eq!("accepted".parse::<AdmissionStatus>().unwrap(), AdmissionStatus::Accepted);
        assert_eq!("Declined".parse::<AdmissionStatus>().unwrap(), AdmissionStatus::Declined);
        assert!(matches!(
            "Acepted".parse::<AdmissionStatus>(),
            Err(ValidationError::UnknownAdmissionStatus(_))
        ));
    }

    #[test]
    fn status_round_trips_through_json_as_plain_string() {
        let json = serde_json::to_string(&AdmissionStatus::Declined).unwrap();
        assert_eq!(json, "\"Declined\"");
        assert!(serde_json::from_str::<AdmissionStatus>("\"Maybe\"").is_err());
    }

    #[test]
    fn double_decision_is_rejected() {
        let mut request = pending_request();
        assert_eq!(request.apply(AdmissionDecision::Accept).unwrap(), AdmissionStatus::Accepted);
        assert!(request.apply(AdmissionDecision::Decline).is_err());
        assert!(request.apply(AdmissionDecision::Accept).is_err());
        assert_eq!(request.status, AdmissionStatus::Accepted);
    }

    #[test]
    fn patient_info_requires_name_and_contact() {
        assert!(PatientInfo::new("Asha", "").is_err());
        assert!(PatientInfo::new(" ", "123").is_err());
        assert_eq!(PatientInfo::new(" Asha ", "123").unwrap().name, "Asha");
    }
}
