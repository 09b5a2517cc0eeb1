// lib/src/orchestrator.rs
// The emergency flow end to end: symptoms in, verdict shown, then either
// straight to discovery or held until the user logs in.

use log::info;

use models::{HospitalCandidate, SosKind, SymptomInput, TriageVerdict};

use crate::connectors::Geolocator;
use crate::discovery::DiscoverySession;
use crate::errors::Result;
use crate::routing_decision::{AuthGate, GateOutcome};
use crate::session::Session;
use crate::triage::TriageClassifier;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Go to discovery for the verdict's department now.
    Discover { verdict: TriageVerdict, visible_text: Option<String> },
    /// Non-critical and not logged in; the verdict is kept for after login.
    AwaitingAuth { verdict: TriageVerdict, visible_text: Option<String> },
}

impl FlowOutcome {
    pub fn verdict(&self) -> &TriageVerdict {
        match self {
            FlowOutcome::Discover { verdict, .. } | FlowOutcome::AwaitingAuth { verdict, .. } => verdict,
        }
    }

    pub fn visible_text(&self) -> Option<&str> {
        match self {
            FlowOutcome::Discover { visible_text, .. } | FlowOutcome::AwaitingAuth { visible_text, .. } => {
                visible_text.as_deref()
            }
        }
    }
}

pub struct EmergencyFlow {
    classifier: TriageClassifier,
    gate: AuthGate,
}

impl EmergencyFlow {
    pub fn new(classifier: TriageClassifier) -> Self {
        Self { classifier, gate: AuthGate::new() }
    }

    /// Classifies once and applies the routing decision.
    pub async fn triage(&mut self, input: &SymptomInput, session: &Session) -> Result<FlowOutcome> {
        let classified = self.classifier.classify(input).await?;
        let visible_text = classified.visible_text;
        Ok(match self.gate.admit(classified.verdict.clone(), session) {
            GateOutcome::Proceed(verdict) => FlowOutcome::Discover { verdict, visible_text },
            GateOutcome::AwaitingAuth => FlowOutcome::AwaitingAuth { verdict: classified.verdict, visible_text },
        })
    }

    /// SOS buttons skip classification; their verdicts are always critical.
    pub fn sos(&mut self, kind: SosKind, session: &Session) -> FlowOutcome {
        info!("SOS: {:?}", kind);
        let verdict = TriageVerdict::sos(kind);
        match self.gate.admit(verdict.clone(), session) {
            GateOutcome::Proceed(verdict) => FlowOutcome::Discover { verdict, visible_text: None },
            GateOutcome::AwaitingAuth => FlowOutcome::AwaitingAuth { verdict, visible_text: None },
        }
    }

    /// The verdict held at the login wall, once `session` is authenticated.
    pub fn resume_after_login(&mut self, session: &Session) -> Option<TriageVerdict> {
        self.gate.resume(session)
    }

    pub async fn discover(
        &self,
        discovery: &DiscoverySession,
        geolocator: &dyn Geolocator,
        verdict: &TriageVerdict,
    ) -> Result<Vec<HospitalCandidate>> {
        discovery.start(geolocator, verdict.department()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{
        MockHospitalDirectory, MockRoutingEngine, MockSymptomClassifier, StaticGeolocator,
    };
    use crate::session::Identity;
    use models::{
        Analysis, AnalysisEnvelope, Coordinate, Department, DiseaseInfo, HospitalId, PatientInfo, RouteInfo,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn analyzer_says(final_status: &'static str, department: &'static str, condition: &'static str) -> MockSymptomClassifier {
        let mut mock = MockSymptomClassifier::new();
        mock.expect_classify().times(1).returning(move |_| {
            let envelope = AnalysisEnvelope::success(Analysis {
                original_text: None,
                english_text: None,
                final_status: final_status.to_string(),
                disease_info: DiseaseInfo {
                    top_department: department.to_string(),
                    disease_prediction: condition.to_string(),
                    recommended_doctor: None,
                },
            });
            Ok(envelope.into_classification()?)
        });
        mock
    }

    fn directory_for(department: &'static str) -> MockHospitalDirectory {
        let mut directory = MockHospitalDirectory::new();
        directory
            .expect_search()
            .withf(move |d, _| d.as_str() == department)
            .times(1)
            .returning(move |d, _| {
                Ok(vec![HospitalCandidate {
                    id: HospitalId::new("11").unwrap(),
                    name: "Apollo".into(),
                    address: "Greams Road".into(),
                    phone: Some("044-2829".into()),
                    location: Coordinate::new(13.06, 80.25).unwrap(),
                    department: d.clone(),
                }])
            });
        directory
    }

    fn router() -> MockRoutingEngine {
        let mut router = MockRoutingEngine::new();
        router
            .expect_route()
            .returning(|_, _| Ok(RouteInfo { distance_m: 3_200.0, duration_s: 540.0, geometry: Vec::new() }));
        router
    }

    fn here() -> StaticGeolocator {
        StaticGeolocator::new(Some(Coordinate::new(13.08, 80.27).unwrap()))
    }

    #[tokio::test]
    async fn critical_chest_pain_goes_straight_to_cardiology() {
        let classifier = TriageClassifier::new(
            Arc::new(analyzer_says("Critical", "Cardiology", "Myocardial Infarction")),
            Duration::from_secs(5),
        );
        let mut flow = EmergencyFlow::new(classifier);
        let session = Session::anonymous();

        let input = SymptomInput::text("I have severe chest pain").unwrap();
        let outcome = flow.triage(&input, &session).await.unwrap();
        let FlowOutcome::Discover { verdict, visible_text } = outcome else {
            panic!("critical verdict must bypass the login wall");
        };
        assert_eq!(visible_text.as_deref(), Some("I have severe chest pain"));

        let discovery = DiscoverySession::new(Arc::new(directory_for("Cardiology")), Arc::new(router()));
        let found = flow.discover(&discovery, &here(), &verdict).await.unwrap();
        assert_eq!(found[0].department, Department::new("Cardiology").unwrap());
    }

    #[tokio::test]
    async fn stable_headache_waits_for_login_then_resumes_without_reclassifying() {
        // `times(1)` on the classifier: resuming must reuse the held verdict.
        let classifier = TriageClassifier::new(
            Arc::new(analyzer_says("Stable", "General Medicine", "Tension Headache")),
            Duration::from_secs(5),
        );
        let mut flow = EmergencyFlow::new(classifier);
        let mut session = Session::anonymous();

        let outcome = flow.triage(&SymptomInput::text("mild headache").unwrap(), &session).await.unwrap();
        assert!(matches!(outcome, FlowOutcome::AwaitingAuth { .. }));
        assert!(flow.resume_after_login(&session).is_none());

        session.log_in(Identity::Patient(PatientInfo::new("Meena", "9000000003").unwrap()));
        let verdict = flow.resume_after_login(&session).unwrap();
        assert_eq!(verdict.department().as_str(), "General Medicine");

        let discovery = DiscoverySession::new(Arc::new(directory_for("General Medicine")), Arc::new(router()));
        flow.discover(&discovery, &here(), &verdict).await.unwrap();
    }

    #[test]
    fn sos_never_asks_for_login() {
        let mut flow = EmergencyFlow::new(TriageClassifier::new(
            Arc::new(MockSymptomClassifier::new()),
            Duration::from_secs(5),
        ));
        let outcome = flow.sos(SosKind::NearestGeneral, &Session::anonymous());
        assert!(matches!(outcome, FlowOutcome::Discover { .. }));
        assert_eq!(outcome.verdict().department().as_str(), "General");
    }
}
