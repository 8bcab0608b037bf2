//! `Sunfall` - sunset seasonality analysis
//!
//! This library computes daily sunset times for a geographic location over a
//! calendar year, derives the day-over-day rate of change, and reports the
//! seasonal turning points (earliest/latest sunset, steepest change).

pub mod config;
pub mod derivative;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod plot;
pub mod report;
pub mod series;

// Re-export core types for public API
pub use config::SunfallConfig;
pub use derivative::{DerivativeSeries, DstTransition};
pub use ephemeris::SolarOutcome;
pub use error::SunfallError;
pub use models::{Location, SunsetSample, SunsetSeries};
pub use report::SeasonalReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SunfallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
