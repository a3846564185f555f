//! Page Analyzer: a single-page web structure analyzer
//!
//! This crate fetches one web page, parses its HTML and reports the HTML
//! version, title, heading histogram, internal/external link counts, the
//! number of external links failing a liveness probe, and whether the page
//! carries a login form.

pub mod analyzer;
pub mod config;
pub mod server;
pub mod url;

use thiserror::Error;

/// Error returned by a failed page analysis
///
/// Exactly one variant describes a failed call; a failed analysis never
/// carries a partial result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Failed to create request for {url}: {source}")]
    RequestBuild { url: String, source: reqwest::Error },

    #[error("Failed to fetch {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status_code}: {description}")]
    UnsuccessfulStatus {
        status_code: u16,
        description: String,
    },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl AnalysisError {
    /// Stable label used in logs and error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::RequestBuild { .. } => "REQUEST_CREATE_ERROR",
            Self::Network { .. } => "URL_FETCH_ERROR",
            Self::UnsuccessfulStatus { .. } => "HTTP_STATUS_ERROR",
            Self::Parse { .. } => "HTML_PARSE_ERROR",
        }
    }

    /// Returns true for failures caused by our own infrastructure rather
    /// than by the submitted URL or the remote site
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::RequestBuild { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{AnalysisResult, Analyzer, HtmlVersion};
pub use config::Config;
pub use crate::url::{validate_url, with_default_scheme, NormalizedUrl};
