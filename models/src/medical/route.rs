// models/src/medical/route.rs

use serde::{Deserialize, Serialize};

use crate::medical::hospital::Coordinate;

/// Travel estimate from the patient to one candidate hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Metres.
    pub distance_m: f64,
    /// Seconds.
    pub duration_s: f64,
    pub geometry: Vec<Coordinate>,
}

impl RouteInfo {
    pub fn eta_minutes(&self) -> u64 {
        (self.duration_s / 60.0).round().max(0.0) as u64
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Short label such as `12 min (4.3 km)`.
    pub fn summary(&self) -> String {
        format!("{} min ({:.1} km)", self.eta_minutes(), self.distance_km())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_rounds_minutes_and_kilometres() {
        let route = RouteInfo { distance_m: 4_349.0, duration_s: 749.0, geometry: Vec::new() };
        assert_eq!(route.summary(), "12 min (4.3 km)");
    }

    #[test]
    fn zero_length_route() {
        let route = RouteInfo { distance_m: 0.0, duration_s: 0.0, geometry: Vec::new() };
        assert_eq!(route.summary(), "0 min (0.0 km)");
    }
}
