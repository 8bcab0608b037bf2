//! Location model for geographic coordinates and timezone metadata

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::SunfallError;

/// Observer location for sunset computations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// City name (informational only)
    pub city: String,
    /// Region or country name (informational only)
    pub region: String,
    /// IANA timezone identifier, e.g. "Europe/Berlin"
    pub timezone: String,
    /// Latitude in decimal degrees (positive = North)
    pub latitude: f64,
    /// Longitude in decimal degrees (positive = East)
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        region: impl Into<String>,
        timezone: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
            timezone: timezone.into(),
            latitude,
            longitude,
        }
    }

    /// Resolve the IANA timezone identifier against the timezone database
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SunfallError::timezone(&self.timezone))
    }

    /// Validate coordinate ranges and the timezone identifier
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SunfallError::ephemeris(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SunfallError::ephemeris(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        self.tz()?;
        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamburg() -> Location {
        Location::new("Hamburg", "Germany", "Europe/Berlin", 53.5511, 9.9937)
    }

    #[test]
    fn test_timezone_resolution() {
        let tz = hamburg().tz().unwrap();
        assert_eq!(tz, chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_unknown_timezone_is_fatal() {
        let mut location = hamburg();
        location.timezone = "Europe/Atlantis".to_string();
        let err = location.tz().unwrap_err();
        assert!(matches!(err, SunfallError::Timezone { .. }));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(hamburg().validate().is_ok());

        let mut location = hamburg();
        location.latitude = 91.0;
        assert!(location.validate().is_err());

        let mut location = hamburg();
        location.longitude = -200.0;
        assert!(location.validate().is_err());
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(hamburg().format_coordinates(), "53.5511, 9.9937");
    }
}
