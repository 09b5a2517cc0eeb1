// lib/src/routing_decision.rs

use log::info;

use models::TriageVerdict;

use crate::session::Session;

/// Where a verdict sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Straight to hospital discovery.
    Bypass,
    /// Log in first, then discovery with the same verdict.
    RequireAuth,
}

/// A critical verdict is never held behind the login wall.
pub fn decide(verdict: &TriageVerdict, is_authenticated: bool) -> RoutingDecision {
    if verdict.criticality().is_critical() || is_authenticated {
        RoutingDecision::Bypass
    } else {
        RoutingDecision::RequireAuth
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Proceed(TriageVerdict),
    AwaitingAuth,
}

/// Holds a non-critical verdict while the user authenticates, so discovery can
/// resume afterwards without classifying the symptoms again.
#[derive(Debug, Default)]
pub struct AuthGate {
    retained: Option<TriageVerdict>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, verdict: TriageVerdict, session: &Session) -> GateOutcome {
        match decide(&verdict, session.is_authenticated()) {
            RoutingDecision::Bypass => {
                self.retained = None;
                GateOutcome::Proceed(verdict)
            }
            RoutingDecision::RequireAuth => {
                info!("Verdict '{}' held until the user logs in", verdict.condition());
                self.retained = Some(verdict);
                GateOutcome::AwaitingAuth
            }
        }
    }

    /// Releases the retained verdict once the session is authenticated.
    pub fn resume(&mut self, session: &Session) -> Option<TriageVerdict> {
        if !session.is_authenticated() {
            return None;
        }
        self.retained.take()
    }

    pub fn retained(&self) -> Option<&TriageVerdict> {
        self.retained.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Criticality, Department, PatientInfo, SosKind};

    fn verdict(criticality: Criticality, department: &str) -> TriageVerdict {
        TriageVerdict::new("condition", Department::new(department).unwrap(), criticality)
    }

    #[test]
    fn critical_always_bypasses() {
        let critical = verdict(Criticality::Critical, "Cardiology");
        for authenticated in [false, true] {
            assert_eq!(decide(&critical, authenticated), RoutingDecision::Bypass);
        }
        for kind in [SosKind::Trauma, SosKind::NearestGeneral] {
            assert_eq!(decide(&TriageVerdict::sos(kind), false), RoutingDecision::Bypass);
        }
    }

    #[test]
    fn non_critical_requires_auth_only_when_anonymous() {
        let stable = verdict(Criticality::NonCritical, "General Medicine");
        assert_eq!(decide(&stable, false), RoutingDecision::RequireAuth);
        assert_eq!(decide(&stable, true), RoutingDecision::Bypass);
    }

    #[test]
    fn gate_resumes_with_retained_verdict_after_login() {
        let stable = verdict(Criticality::NonCritical, "General Medicine");
        let mut session = Session::anonymous();
        let mut gate = AuthGate::new();

        assert_eq!(gate.admit(stable.clone(), &session), GateOutcome::AwaitingAuth);
        assert_eq!(gate.resume(&session), None);
        assert_eq!(gate.retained(), Some(&stable));

        session.log_in(crate::session::Identity::Patient(PatientInfo::new("Ravi", "9000000002").unwrap()));
        let resumed = gate.resume(&session).unwrap();
        assert_eq!(resumed.department().as_str(), "General Medicine");
        assert_eq!(gate.resume(&session), None);
    }

    #[test]
    fn critical_verdict_passes_gate_for_anonymous_user() {
        let mut gate = AuthGate::new();
        let critical = verdict(Criticality::Critical, "Neurology");
        assert_eq!(gate.admit(critical.clone(), &Session::anonymous()), GateOutcome::Proceed(critical));
        assert!(gate.retained().is_none());
    }
}
