// lib/src/admission/desk.rs
// Patient side of the admission protocol: submit a request to one hospital,
// then poll its status until the hospital decides.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{watch, Mutex};

use models::{
    AdmissionStatus, HospitalCandidate, HospitalId, NewAdmissionRequest, PatientInfo, RequestId,
};

use crate::admission::poller::{spawn_poller, PollControl, PollHandle};
use crate::connectors::AdmissionBackend;
use crate::errors::{Result, TriageError};

/// Identifies a submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestHandle {
    pub request_id: RequestId,
    pub hospital_id: HospitalId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outstanding {
    Submitting,
    Pending(RequestId),
}

#[derive(Default)]
struct DeskState {
    // At most one entry per hospital. Cleared when the request turns terminal
    // or its submission fails.
    outstanding: HashMap<HospitalId, Outstanding>,
    statuses: HashMap<RequestId, AdmissionStatus>,
}

#[derive(Clone)]
pub struct AdmissionDesk {
    backend: Arc<dyn AdmissionBackend>,
    poll_interval: Duration,
    state: Arc<Mutex<DeskState>>,
}

impl AdmissionDesk {
    pub fn new(backend: Arc<dyn AdmissionBackend>, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(TriageError::Configuration("status poll interval must be greater than 0".to_string()));
        }
        Ok(Self { backend, poll_interval, state: Arc::new(Mutex::new(DeskState::default())) })
    }

    /// Whether a new request to `hospital_id` would be accepted right now.
    pub async fn can_submit(&self, hospital_id: &HospitalId) -> bool {
        !self.state.lock().await.outstanding.contains_key(hospital_id)
    }

    /// Sends a request to `candidate`. Rejected with `DuplicateRequest` while
    /// another request to the same hospital is pending or being submitted.
    /// Without `symptoms`, the summary reads "<Department> Emergency".
    pub async fn submit(
        &self,
        candidate: &HospitalCandidate,
        patient: PatientInfo,
        symptoms: Option<String>,
    ) -> Result<RequestHandle> {
        {
            let mut state = self.state.lock().await;
            if state.outstanding.contains_key(&candidate.id) {
                return Err(TriageError::DuplicateRequest(candidate.id.clone()));
            }
            state.outstanding.insert(candidate.id.clone(), Outstanding::Submitting);
        }

        let symptom_summary = symptoms
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{} Emergency", candidate.department));
        let request = NewAdmissionRequest { hospital_id: candidate.id.clone(), patient, symptom_summary };

        match self.backend.create(&request).await {
            Ok(request_id) => {
                let mut state = self.state.lock().await;
                state.outstanding.insert(candidate.id.clone(), Outstanding::Pending(request_id.clone()));
                state.statuses.insert(request_id.clone(), AdmissionStatus::Pending);
                info!("Request {} sent to {} ({})", request_id, candidate.name, candidate.id);
                Ok(RequestHandle { request_id, hospital_id: candidate.id.clone() })
            }
            Err(err) => {
                warn!("Request to {} failed: {}", candidate.id, err);
                self.state.lock().await.outstanding.remove(&candidate.id);
                Err(err)
            }
        }
    }

    pub async fn status(&self, handle: &RequestHandle) -> Option<AdmissionStatus> {
        self.state.lock().await.statuses.get(&handle.request_id).copied()
    }

    /// One status check. A terminal status is final: once seen, it is returned
    /// without asking the backend again.
    pub async fn poll_once(&self, handle: &RequestHandle) -> Result<AdmissionStatus> {
        let current = self
            .status(handle)
            .await
            .ok_or_else(|| TriageError::InvalidInput(format!("unknown request {}", handle.request_id)))?;
        if current.is_terminal() {
            return Ok(current);
        }

        let reported = self.backend.status(&handle.request_id).await?;
        debug!("Request {} reported {}", handle.request_id, reported);

        let mut state = self.state.lock().await;
        let next = match current.transition(reported) {
            Ok(next) => next,
            Err(err) => {
                warn!("Ignoring status for {}: {}", handle.request_id, err);
                current
            }
        };
        state.statuses.insert(handle.request_id.clone(), next);
        if next.is_terminal() {
            info!("Request {} is {}", handle.request_id, next);
            if state.outstanding.get(&handle.hospital_id) == Some(&Outstanding::Pending(handle.request_id.clone())) {
                state.outstanding.remove(&handle.hospital_id);
            }
        }
        Ok(next)
    }

    /// Polls `handle` at the configured interval until it is terminal. Poll
    /// failures are logged and retried on the next tick.
    pub fn watch(&self, handle: RequestHandle) -> StatusWatch {
        let (tx, rx) = watch::channel(AdmissionStatus::Pending);
        let tx = Arc::new(tx);
        let desk = self.clone();
        let poller = spawn_poller(self.poll_interval, move || {
            let desk = desk.clone();
            let handle = handle.clone();
            let tx = tx.clone();
            async move {
                match desk.poll_once(&handle).await {
                    Ok(status) => {
                        tx.send_replace(status);
                        if status.is_terminal() {
                            PollControl::Stop
                        } else {
                            PollControl::Continue
                        }
                    }
                    Err(err) => {
                        warn!("Status check for {} failed: {}", handle.request_id, err.user_message());
                        PollControl::Continue
                    }
                }
            }
        });
        StatusWatch { status: rx, poller }
    }
}

/// Live status of one request. Dropping it stops the polling.
pub struct StatusWatch {
    status: watch::Receiver<AdmissionStatus>,
    poller: PollHandle,
}

impl StatusWatch {
    pub fn current(&self) -> AdmissionStatus {
        *self.status.borrow()
    }

    /// Resolves when the status changes; `None` once polling has ended.
    pub async fn changed(&mut self) -> Option<AdmissionStatus> {
        self.status.changed().await.ok()?;
        Some(*self.status.borrow_and_update())
    }

    /// Resolves with the hospital's decision. Fails if polling ends first,
    /// whether cancelled or because the poll task died.
    pub async fn wait_terminal(&mut self) -> Result<AdmissionStatus> {
        loop {
            let current = self.current();
            if current.is_terminal() {
                return Ok(current);
            }
            if self.changed().await.is_none() {
                let current = self.current();
                if current.is_terminal() {
                    return Ok(current);
                }
                return Err(TriageError::Internal("status polling stopped before the hospital decided".to_string()));
            }
        }
    }

    pub fn cancel(&mut self) {
        self.poller.cancel();
    }

    pub fn is_polling(&self) -> bool {
        !self.poller.is_finished()
    }
}
