// lib/src/connectors/geolocation.rs

use async_trait::async_trait;

use models::Coordinate;

use crate::config::LocationConfig;
use crate::connectors::Geolocator;
use crate::errors::{Result, TriageError};

/// Reports a fixed position, taken from the command line or `[location]`.
/// An unset position behaves like a denied location permission.
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocator {
    position: Option<Coordinate>,
}

impl StaticGeolocator {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        Ok(Self::new(config.coordinate()?))
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_position(&self) -> Result<Coordinate> {
        self.position
            .ok_or_else(|| TriageError::LocationUnavailable("location permission denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn unset_position_is_location_unavailable() {
        let denied = StaticGeolocator::default();
        let err = assert_err!(denied.current_position().await);
        assert!(matches!(err, TriageError::LocationUnavailable(_)));

        let here = Coordinate::new(13.08, 80.27).unwrap();
        assert_eq!(assert_ok!(StaticGeolocator::new(Some(here)).current_position().await), here);
    }
}
