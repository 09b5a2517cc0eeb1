// lib/src/session.rs

use models::{HospitalId, PatientInfo};

use crate::config::AdmissionConfig;
use crate::errors::Result;

/// Who is using the terminal. Patients and hospital staff authenticate
/// through different flows; the triage core only needs the result.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Patient(PatientInfo),
    Hospital { hospital_id: HospitalId, name: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn patient(info: PatientInfo) -> Self {
        Self { identity: Some(Identity::Patient(info)) }
    }

    pub fn hospital(hospital_id: HospitalId, name: impl Into<String>) -> Self {
        Self { identity: Some(Identity::Hospital { hospital_id, name: name.into() }) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn log_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn hospital_id(&self) -> Option<&HospitalId> {
        match &self.identity {
            Some(Identity::Hospital { hospital_id, .. }) => Some(hospital_id),
            _ => None,
        }
    }

    /// Patient details for an admission request. Anyone who is not a logged-in
    /// patient is sent as the configured anonymous emergency user.
    pub fn patient_info_or_anonymous(&self, admission: &AdmissionConfig) -> Result<PatientInfo> {
        match &self.identity {
            Some(Identity::Patient(info)) => Ok(info.clone()),
            _ => admission.anonymous_patient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn anonymous_session_uses_emergency_user() {
        let session = Session::anonymous();
        let info = assert_ok!(session.patient_info_or_anonymous(&AdmissionConfig::default()));
        assert!(!session.is_authenticated());
        assert_eq!(info.name, "Emergency User");
        assert_eq!(info.contact_number, "9876543210");
    }

    #[test]
    fn logged_in_patient_is_used_verbatim() {
        let info = PatientInfo::new("Asha", "9000000001").unwrap();
        let session = Session::patient(info.clone());
        assert_eq!(session.patient_info_or_anonymous(&AdmissionConfig::default()).unwrap(), info);
        assert_eq!(session.hospital_id(), None);
    }
}
