//! Error types for Pariksha

use thiserror::Error;

/// Pariksha error type
#[derive(Error, Debug)]
pub enum ParikshaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stage initialization failed: {0}")]
    StageInit(String),

    #[error("Scan failed: {0}")]
    Scan(String),

    #[error("Surface detection failed: {0}")]
    Detection(String),

    #[error("No surfaces found")]
    NoSurfaces,

    #[error("Unsupported {service} action: {code}")]
    UnsupportedAction {
        /// Service that rejected the request
        service: &'static str,
        /// Raw action code carried by the request
        code: u8,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<toml::de::Error> for ParikshaError {
    fn from(e: toml::de::Error) -> Self {
        ParikshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParikshaError>;
