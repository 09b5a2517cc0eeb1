// lib/src/admission/queue.rs
// Hospital side: the live list of incoming requests and the accept/decline
// action. Rows are dropped locally once the backend confirms a decision; that
// removal is a display convenience, the backend stays authoritative and the
// next refresh reconciles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::Mutex;

use models::{AdmissionDecision, AdmissionRequest, AdmissionStatus, HospitalId, RequestId};

use crate::admission::poller::{spawn_poller, PollControl, PollHandle};
use crate::connectors::AdmissionBackend;
use crate::errors::{Result, TriageError};
use crate::session::Session;

#[derive(Default)]
struct QueueState {
    rows: Vec<AdmissionRequest>,
    // Decisions the backend listing may still lag behind on. Dropped once the
    // listing stops returning the request.
    decided: HashMap<RequestId, AdmissionStatus>,
}

#[derive(Clone)]
pub struct IncomingQueue {
    backend: Arc<dyn AdmissionBackend>,
    hospital_id: HospitalId,
    state: Arc<Mutex<QueueState>>,
}

impl IncomingQueue {
    pub fn new(backend: Arc<dyn AdmissionBackend>, hospital_id: HospitalId) -> Self {
        Self { backend, hospital_id, state: Arc::new(Mutex::new(QueueState::default())) }
    }

    /// Queue for the hospital logged in on `session`.
    pub fn for_session(backend: Arc<dyn AdmissionBackend>, session: &Session) -> Result<Self> {
        let hospital_id = session
            .hospital_id()
            .cloned()
            .ok_or_else(|| TriageError::InvalidInput("no hospital is logged in".to_string()))?;
        Ok(Self::new(backend, hospital_id))
    }

    pub fn hospital_id(&self) -> &HospitalId {
        &self.hospital_id
    }

    pub async fn rows(&self) -> Vec<AdmissionRequest> {
        self.state.lock().await.rows.clone()
    }

    /// Replaces the rows with the backend's current pending list.
    pub async fn refresh(&self) -> Result<Vec<AdmissionRequest>> {
        let fetched = self.backend.pending_for(&self.hospital_id).await?;
        let mut state = self.state.lock().await;
        let listed: HashSet<&RequestId> = fetched.iter().map(|r| &r.id).collect();
        state.decided.retain(|id, _| listed.contains(id));
        let rows: Vec<AdmissionRequest> = fetched
            .into_iter()
            .filter(|r| r.status == AdmissionStatus::Pending && !state.decided.contains_key(&r.id))
            .collect();
        state.rows = rows;
        debug!("{} pending request(s) for hospital {}", state.rows.len(), self.hospital_id);
        Ok(state.rows.clone())
    }

    /// Accepts or declines one pending request with a single backend call.
    /// The row is removed only after the backend confirms; on failure it
    /// stays and the error is returned.
    pub async fn decide(&self, request_id: &RequestId, decision: AdmissionDecision) -> Result<AdmissionStatus> {
        let mut row = {
            let state = self.state.lock().await;
            if let Some(status) = state.decided.get(request_id) {
                return Err(TriageError::InvalidRequestState {
                    request_id: request_id.clone(),
                    status: status.to_string(),
                });
            }
            state
                .rows
                .iter()
                .find(|r| &r.id == request_id)
                .cloned()
                .ok_or_else(|| TriageError::InvalidInput(format!("request {} is not in the queue", request_id)))?
        };

        let target = row.apply(decision).map_err(|_| TriageError::InvalidRequestState {
            request_id: request_id.clone(),
            status: row.status.to_string(),
        })?;

        match self.backend.update_status(request_id, target).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.rows.retain(|r| &r.id != request_id);
                state.decided.insert(request_id.clone(), target);
                info!("Request {} {} by hospital {}", request_id, target, self.hospital_id);
                Ok(target)
            }
            Err(err @ TriageError::InvalidRequestState { .. }) => {
                // Someone else already decided it; the row is stale.
                warn!("Request {} was no longer pending", request_id);
                self.state.lock().await.rows.retain(|r| &r.id != request_id);
                Err(err)
            }
            Err(err) => {
                warn!("Could not update request {}: {}", request_id, err);
                Err(err)
            }
        }
    }

    /// Refreshes the queue every `period` until the handle is dropped or
    /// cancelled. Failed refreshes are logged and retried on the next tick.
    pub fn spawn_watcher(&self, period: Duration) -> PollHandle {
        let queue = self.clone();
        spawn_poller(period, move || {
            let queue = queue.clone();
            async move {
                if let Err(err) = queue.refresh().await {
                    warn!("Queue refresh for {} failed: {}", queue.hospital_id, err.user_message());
                }
                PollControl::Continue
            }
        })
    }
}
