// models/src/medical/hospital.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::HospitalId;
use crate::medical::triage::Department;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> ValidationResult<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ValidationError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// A hospital returned by a discovery query for one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalCandidate {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub location: Coordinate,
    /// The department the search was scoped to when this candidate came back.
    pub department: Department,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_ranges_are_checked() {
        assert!(Coordinate::new(13.0827, 80.2707).is_ok());
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn coordinate_display_is_lat_first() {
        let c = Coordinate::new(12.5, 77.25).unwrap();
        assert_eq!(c.to_string(), "12.50000,77.25000");
    }
}
