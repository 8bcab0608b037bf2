//! Configuration management for the `Sunfall` analyzer
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates all settings before the pipeline runs. Dates in
//! the config file are quoted ISO strings, e.g. `dst_spring = "2025-03-30"`.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::SunfallError;
use crate::models::Location;

/// Root configuration for a sunset analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunfallConfig {
    /// Observer location
    #[serde(default)]
    pub location: LocationConfig,
    /// Analysis parameters
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Output artifact settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Observer location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// City name (informational only)
    #[serde(default = "default_city")]
    pub city: String,
    /// Region/country name (informational only)
    #[serde(default = "default_region")]
    pub region: String,
    /// IANA timezone identifier
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Latitude in decimal degrees
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

/// Analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Target calendar year
    #[serde(default = "default_year")]
    pub year: i32,
    /// Spring-forward transition date, used as a plot marker and for the
    /// derivative clock-jump correction
    #[serde(default = "default_dst_spring")]
    pub dst_spring: Option<NaiveDate>,
    /// Fall-back transition date
    #[serde(default = "default_dst_fall")]
    pub dst_fall: Option<NaiveDate>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Output artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the rendered SVG chart
    #[serde(default = "default_plot_path")]
    pub plot_path: String,
}

// Default value functions reproduce the documented Hamburg 2025 scenario
fn default_city() -> String {
    "Hamburg".to_string()
}

fn default_region() -> String {
    "Germany".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_latitude() -> f64 {
    53.5511
}

fn default_longitude() -> f64 {
    9.9937
}

fn default_year() -> i32 {
    2025
}

fn default_dst_spring() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 3, 30)
}

fn default_dst_fall() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 10, 26)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_plot_path() -> String {
    "sunset_analysis.svg".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            region: default_region(),
            timezone: default_timezone(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            dst_spring: default_dst_spring(),
            dst_fall: default_dst_fall(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot_path: default_plot_path(),
        }
    }
}

impl Default for SunfallConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl From<&LocationConfig> for Location {
    fn from(config: &LocationConfig) -> Self {
        Location::new(
            config.city.clone(),
            config.region.clone(),
            config.timezone.clone(),
            config.latitude,
            config.longitude,
        )
    }
}

impl SunfallConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("sunfall.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with SUNFALL_ prefix
        builder = builder.add_source(
            Environment::with_prefix("SUNFALL")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SunfallConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.location.city.is_empty() {
            self.location.city = default_city();
        }
        if self.location.timezone.is_empty() {
            self.location.timezone = default_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.output.plot_path.is_empty() {
            self.output.plot_path = default_plot_path();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_location()?;
        self.validate_analysis()?;
        self.validate_strings()?;
        Ok(())
    }

    fn validate_location(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(SunfallError::config(format!(
                "Latitude must be between -90 and 90 degrees, got {}",
                self.location.latitude
            ))
            .into());
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(SunfallError::config(format!(
                "Longitude must be between -180 and 180 degrees, got {}",
                self.location.longitude
            ))
            .into());
        }

        if self.location.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(SunfallError::config(format!(
                "Unknown timezone identifier '{}'. Use an IANA name such as Europe/Berlin",
                self.location.timezone
            ))
            .into());
        }

        Ok(())
    }

    fn validate_analysis(&self) -> Result<()> {
        if !(1..=9999).contains(&self.analysis.year) {
            return Err(SunfallError::config(format!(
                "Year must be between 1 and 9999, got {}",
                self.analysis.year
            ))
            .into());
        }

        for (name, date) in [
            ("dst_spring", self.analysis.dst_spring),
            ("dst_fall", self.analysis.dst_fall),
        ] {
            if let Some(date) = date {
                if date.year() != self.analysis.year {
                    return Err(SunfallError::config(format!(
                        "{name} marker {date} is outside the target year {}",
                        self.analysis.year
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    fn validate_strings(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SunfallError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if self.output.plot_path.is_empty() {
            return Err(SunfallError::config("Plot output path cannot be empty").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SunfallConfig::default();
        assert_eq!(config.location.city, "Hamburg");
        assert_eq!(config.location.timezone, "Europe/Berlin");
        assert_eq!(config.analysis.year, 2025);
        assert_eq!(
            config.analysis.dst_spring,
            NaiveDate::from_ymd_opt(2025, 3, 30)
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.plot_path, "sunset_analysis.svg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_location_conversion() {
        let config = SunfallConfig::default();
        let location = Location::from(&config.location);
        assert_eq!(location.city, "Hamburg");
        assert_eq!(location.latitude, 53.5511);
        assert!(location.tz().is_ok());
    }

    #[test]
    fn test_config_validation_bad_latitude() {
        let mut config = SunfallConfig::default();
        config.location.latitude = 120.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Latitude"));
    }

    #[test]
    fn test_config_validation_bad_timezone() {
        let mut config = SunfallConfig::default();
        config.location.timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unknown timezone identifier")
        );
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SunfallConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_dst_outside_year() {
        let mut config = SunfallConfig::default();
        config.analysis.year = 2024;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("dst_spring"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_strings() {
        let mut config = SunfallConfig::default();
        config.logging.level = String::new();
        config.output.plot_path = String::new();
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.plot_path, "sunset_analysis.svg");
    }
}
