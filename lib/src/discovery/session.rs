// lib/src/discovery/session.rs

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;

use models::{Coordinate, Department, HospitalCandidate, HospitalId, RouteInfo};

use crate::connectors::{Geolocator, HospitalDirectory, RoutingEngine};
use crate::errors::{Result, TriageError};

#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryStatus {
    Idle,
    Locating,
    Searching,
    Ready,
    LocationUnavailable(String),
    NoCoverage { department: String },
    NetworkFailure(String),
}

/// What a view of the discovery session would render right now.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySnapshot {
    pub status: DiscoveryStatus,
    pub department: Option<Department>,
    pub origin: Option<Coordinate>,
    pub candidates: Vec<HospitalCandidate>,
    pub selected: Option<HospitalId>,
    /// Route for `selected`, and only for it.
    pub route: Option<RouteInfo>,
    pub route_error: Option<String>,
}

/// Result of a selection's route computation.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Rendered(RouteInfo),
    /// Another selection happened while this route was in flight; the result
    /// was thrown away.
    Superseded,
}

struct DiscoveryState {
    status: DiscoveryStatus,
    department: Option<Department>,
    origin: Option<Coordinate>,
    candidates: Vec<HospitalCandidate>,
    selected: Option<HospitalId>,
    route: Option<RouteInfo>,
    route_error: Option<String>,
    // Bumped on every selection; a route result is applied only if the epoch
    // it was requested under is still current.
    selection_epoch: u64,
    // Same guard for searches: only the latest `start` may apply its results.
    search_epoch: u64,
}

impl DiscoveryState {
    fn new() -> Self {
        Self {
            status: DiscoveryStatus::Idle,
            department: None,
            origin: None,
            candidates: Vec::new(),
            selected: None,
            route: None,
            route_error: None,
            selection_epoch: 0,
            search_epoch: 0,
        }
    }

    fn snapshot(&self) -> DiscoverySnapshot {
        DiscoverySnapshot {
            status: self.status.clone(),
            department: self.department.clone(),
            origin: self.origin,
            candidates: self.candidates.clone(),
            selected: self.selected.clone(),
            route: self.route.clone(),
            route_error: self.route_error.clone(),
        }
    }

    fn clear_selection(&mut self) {
        self.selection_epoch += 1;
        self.selected = None;
        self.route = None;
        self.route_error = None;
    }
}

/// One hospital discovery session: locate once, search one department, then
/// let the user move the selection around with at most one live route.
#[derive(Clone)]
pub struct DiscoverySession {
    directory: Arc<dyn HospitalDirectory>,
    router: Arc<dyn RoutingEngine>,
    state: Arc<Mutex<DiscoveryState>>,
    // Held across the position check and the geolocator call.
    locating: Arc<Mutex<()>>,
}

impl DiscoverySession {
    pub fn new(directory: Arc<dyn HospitalDirectory>, router: Arc<dyn RoutingEngine>) -> Self {
        Self {
            directory,
            router,
            state: Arc::new(Mutex::new(DiscoveryState::new())),
            locating: Arc::new(Mutex::new(())),
        }
    }

    pub async fn snapshot(&self) -> DiscoverySnapshot {
        self.state.lock().await.snapshot()
    }

    /// The position is acquired on first use and kept for the whole session.
    async fn origin(&self, geolocator: &dyn Geolocator) -> Result<Coordinate> {
        let _locating = self.locating.lock().await;
        if let Some(origin) = self.state.lock().await.origin {
            return Ok(origin);
        }
        self.state.lock().await.status = DiscoveryStatus::Locating;
        match geolocator.current_position().await {
            Ok(origin) => {
                self.state.lock().await.origin = Some(origin);
                Ok(origin)
            }
            Err(err) => {
                let reason = err.to_string();
                warn!("Discovery halted, no location: {}", reason);
                self.state.lock().await.status = DiscoveryStatus::LocationUnavailable(reason.clone());
                Err(match err {
                    TriageError::LocationUnavailable(_) => err,
                    _ => TriageError::LocationUnavailable(reason),
                })
            }
        }
    }

    /// Searches `department` around the user's position and selects the first
    /// candidate the backend returned. A route failure for that first pick
    /// leaves the list usable and is recorded in the snapshot.
    ///
    /// When a later `start` begins before this search answers, the results are
    /// returned to the caller but never applied to the session.
    pub async fn start(&self, geolocator: &dyn Geolocator, department: &Department) -> Result<Vec<HospitalCandidate>> {
        let origin = self.origin(geolocator).await?;

        let search = {
            let mut state = self.state.lock().await;
            state.search_epoch += 1;
            state.status = DiscoveryStatus::Searching;
            state.department = Some(department.clone());
            state.candidates.clear();
            state.clear_selection();
            state.search_epoch
        };

        let result = self.directory.search(department, origin).await;

        let mut state = self.state.lock().await;
        if state.search_epoch != search {
            debug!("Discarding stale {} search results", department);
            return result;
        }

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("Hospital search for {} failed: {}", department, err);
                state.status = DiscoveryStatus::NetworkFailure(err.to_string());
                return Err(match err {
                    TriageError::NetworkFailure(_) => err,
                    other => TriageError::NetworkFailure(other.to_string()),
                });
            }
        };

        if candidates.is_empty() {
            info!("No {} hospitals near {}", department, origin);
            state.status = DiscoveryStatus::NoCoverage { department: department.to_string() };
            return Err(TriageError::NoCoverage { department: department.to_string() });
        }

        info!("{} {} hospital(s) found", candidates.len(), department);
        let first = candidates[0].id.clone();
        state.candidates = candidates.clone();
        state.status = DiscoveryStatus::Ready;
        drop(state);

        // Fails only when a newer search has already replaced the list.
        if let Err(err) = self.choose(&first).await {
            debug!("Auto-selection of {} skipped: {}", first, err);
        }
        Ok(candidates)
    }

    /// Selects `hospital_id` the way the UI does: a routing failure leaves the
    /// selection in place with `route_error` set. Only an unknown hospital or a
    /// missing position is an error.
    pub async fn choose(&self, hospital_id: &HospitalId) -> Result<Option<RouteOutcome>> {
        match self.select(hospital_id).await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(err @ (TriageError::InvalidInput(_) | TriageError::LocationUnavailable(_))) => Err(err),
            Err(err) => {
                warn!("Route to {} unavailable: {}", hospital_id, err);
                Ok(None)
            }
        }
    }

    /// Makes `hospital_id` the selection. Any previous route is cleared before
    /// the new one is requested.
    pub async fn select(&self, hospital_id: &HospitalId) -> Result<RouteOutcome> {
        let (epoch, origin, destination) = {
            let mut state = self.state.lock().await;
            let destination = state
                .candidates
                .iter()
                .find(|c| &c.id == hospital_id)
                .map(|c| c.location)
                .ok_or_else(|| TriageError::InvalidInput(format!("hospital {} is not in the current results", hospital_id)))?;
            let origin = state
                .origin
                .ok_or_else(|| TriageError::LocationUnavailable("discovery has not located the user".to_string()))?;
            state.clear_selection();
            state.selected = Some(hospital_id.clone());
            (state.selection_epoch, origin, destination)
        };

        let result = self.router.route(origin, destination).await;

        let mut state = self.state.lock().await;
        if state.selection_epoch != epoch {
            debug!("Discarding stale route to {}", hospital_id);
            return Ok(RouteOutcome::Superseded);
        }
        match result {
            Ok(route) => {
                debug!("Route to {}: {}", hospital_id, route.summary());
                state.route = Some(route.clone());
                Ok(RouteOutcome::Rendered(route))
            }
            Err(err) => {
                state.route_error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
