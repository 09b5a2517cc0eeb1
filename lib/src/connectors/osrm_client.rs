// lib/src/connectors/osrm_client.rs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use models::{Coordinate, RouteInfo};

use crate::config::RoutingConfig;
use crate::connectors::RoutingEngine;
use crate::errors::{Result, TriageError};

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
}

/// GeoJSON LineString; positions are `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmResponse {
    fn into_route(self) -> Result<RouteInfo> {
        if self.code != "Ok" {
            return Err(TriageError::NetworkFailure(format!(
                "routing engine answered {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| TriageError::NetworkFailure("routing engine returned no route".to_string()))?;
        let geometry = route
            .geometry
            .map(|g| {
                g.coordinates
                    .into_iter()
                    .filter_map(|[lng, lat]| Coordinate::new(lat, lng).ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(RouteInfo { distance_m: route.distance, duration_s: route.duration, geometry })
    }
}

/// Client for an OSRM `route/v1` service.
#[derive(Debug, Clone)]
pub struct OsrmRoutingClient {
    client: Client,
    base_url: String,
    profile: String,
}

impl OsrmRoutingClient {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
        })
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, self.profile, from.longitude, from.latitude, to.longitude, to.latitude
        )
    }
}

#[async_trait]
impl RoutingEngine for OsrmRoutingClient {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteInfo> {
        let url = self.route_url(from, to);
        debug!("Requesting route {}", url);
        let response = self.client.get(url).send().await?;
        // OSRM reports failures with a JSON body and a 4xx status, so the
        // body is decoded either way.
        let body: OsrmResponse = response.json().await?;
        body.into_route()
    }
}
