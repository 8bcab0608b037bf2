//! Error types and handling for the `Sunfall` analysis pipeline

use thiserror::Error;

/// Main error type for the `Sunfall` library
#[derive(Error, Debug)]
pub enum SunfallError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Unknown or malformed IANA timezone identifier
    #[error("Invalid timezone identifier: {name}")]
    Timezone { name: String },

    /// Solar ephemeris failures (out-of-range coordinates, engine errors)
    #[error("Ephemeris error: {message}")]
    Ephemeris { message: String },

    /// Series that cannot be analyzed (empty, gapped, or polar-incomplete)
    #[error("Invalid series: {message}")]
    Series { message: String },

    /// Chart rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SunfallError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new timezone error
    pub fn timezone<S: Into<String>>(name: S) -> Self {
        Self::Timezone { name: name.into() }
    }

    /// Create a new ephemeris error
    pub fn ephemeris<S: Into<String>>(message: S) -> Self {
        Self::Ephemeris {
            message: message.into(),
        }
    }

    /// Create a new series error
    pub fn series<S: Into<String>>(message: S) -> Self {
        Self::Series {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SunfallError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SunfallError::Timezone { name } => {
                format!("Unknown timezone '{name}'. Use an IANA identifier such as Europe/Berlin.")
            }
            SunfallError::Ephemeris { .. } => {
                "Solar position computation failed. Please check the configured coordinates."
                    .to_string()
            }
            SunfallError::Series { message } => {
                format!("Cannot analyze series: {message}")
            }
            SunfallError::Render { .. } => {
                "Chart rendering failed. Please check the output path.".to_string()
            }
            SunfallError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SunfallError::config("missing location");
        assert!(matches!(config_err, SunfallError::Config { .. }));

        let tz_err = SunfallError::timezone("Europe/Atlantis");
        assert!(matches!(tz_err, SunfallError::Timezone { .. }));

        let series_err = SunfallError::series("empty series");
        assert!(matches!(series_err, SunfallError::Series { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SunfallError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let tz_err = SunfallError::timezone("Nowhere/Atlantis");
        assert!(tz_err.user_message().contains("Nowhere/Atlantis"));

        let series_err = SunfallError::series("only 3 samples");
        assert!(series_err.user_message().contains("only 3 samples"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sunfall_err: SunfallError = io_err.into();
        assert!(matches!(sunfall_err, SunfallError::Io { .. }));
    }
}
