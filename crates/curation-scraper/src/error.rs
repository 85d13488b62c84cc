//! Error types for fetching and extraction.
//!
//! Per-URL failures never cross the orchestrator boundary: they are turned
//! into degraded [`PageContent`](crate::types::PageContent) records. These
//! types exist so the failure kind and the offending URL survive until then.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to retrieve HTML for a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("Request timeout after {timeout_secs}s: {url}")]
    Timeout {
        url: String,
        timeout_secs: u64,
        detail: String,
    },

    /// DNS, TCP or TLS failure before a response arrived.
    #[error("Connection error: {url} - {detail}")]
    Connection { url: String, detail: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP error {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    /// The URL could not be parsed.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Any other transport failure (body decoding, redirects, ...).
    #[error("Unexpected error fetching {url}: {detail}")]
    Request { url: String, detail: String },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {detail}")]
    Client { detail: String },
}

impl FetchError {
    /// Classify a reqwest error for `url`.
    pub fn from_reqwest(url: impl Into<String>, timeout_secs: u64, err: reqwest::Error) -> Self {
        let url = url.into();
        let detail = err.to_string();
        if err.is_timeout() {
            Self::Timeout {
                url,
                timeout_secs,
                detail,
            }
        } else if err.is_connect() {
            Self::Connection { url, detail }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                url,
                status: status.as_u16(),
            }
        } else {
            Self::Request { url, detail }
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::HttpStatus { .. } => "http-status",
            Self::InvalidUrl { .. } => "invalid-url",
            Self::Request { .. } => "request",
            Self::Client { .. } => "client",
        }
    }

    /// The URL the failure relates to, when there is one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Timeout { url, .. }
            | Self::Connection { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::InvalidUrl { url }
            | Self::Request { url, .. } => Some(url),
            Self::Client { .. } => None,
        }
    }
}

/// Unexpected failure inside the HTML pipeline.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to extract structured content from {url}: {detail}")]
    Parser { url: String, detail: String },
}

/// Anything that can go wrong while scraping a single URL.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Human-readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown failure".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages_name_the_url() {
        let err = FetchError::HttpStatus {
            url: "https://example.com/x".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP error 404: https://example.com/x");
        assert_eq!(err.kind(), "http-status");
        assert_eq!(err.url(), Some("https://example.com/x"));

        let err = FetchError::Timeout {
            url: "https://slow.example.com".into(),
            timeout_secs: 20,
            detail: "operation timed out".into(),
        };
        assert_eq!(
            err.to_string(),
            "Request timeout after 20s: https://slow.example.com"
        );
    }

    #[test]
    fn test_scrape_error_is_transparent() {
        let err: ScrapeError = FetchError::InvalidUrl {
            url: "nope".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid URL: nope");
    }

    #[test]
    fn test_panic_message_payloads() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 7");
    }
}
