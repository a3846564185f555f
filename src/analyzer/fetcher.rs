//! HTTP fetcher implementation
//!
//! This module handles all outbound HTTP requests made during an analysis:
//! - Building the HTTP client with the identifying user agent
//! - The single GET request for the analyzed page
//! - HEAD liveness probes for external links
//! - Error classification
//!
//! There are no retries. A failed page fetch is reported to the caller; a
//! failed probe only marks that link as inaccessible.

use crate::config::{AnalyzerConfig, UserAgentConfig};
use crate::AnalysisError;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the configured user agent
///
/// Timeouts are applied per request, since the page fetch and the link
/// probes share this client but use different limits.
///
/// # Example
///
/// ```
/// use page_analyzer::analyzer::build_http_client;
/// use page_analyzer::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(user_agent: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues the page GET and the external link probes for one analyzer
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    page_timeout: Duration,
    probe_timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(
        config: &AnalyzerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent)?;
        Ok(Self::with_client(
            client,
            config.page_timeout(),
            config.probe_timeout(),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, page_timeout: Duration, probe_timeout: Duration) -> Self {
        Self {
            client,
            page_timeout,
            probe_timeout,
        }
    }

    /// Fetches the page to analyze
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request cannot be built | `RequestBuild` |
    /// | DNS, connect, TLS, timeout | `Network` |
    /// | Any status other than 200 | `UnsuccessfulStatus` |
    ///
    /// On success the response is returned with its body unread.
    pub async fn fetch_page(&self, url: &Url) -> Result<Response, AnalysisError> {
        let request = self
            .client
            .get(url.clone())
            .timeout(self.page_timeout)
            .build()
            .map_err(|source| {
                tracing::error!(url = %url, error = %source, "Failed to create request");
                AnalysisError::RequestBuild {
                    url: url.to_string(),
                    source,
                }
            })?;

        let response = self.client.execute(request).await.map_err(|source| {
            tracing::error!(
                url = %url,
                kind = transport_error_kind(&source),
                error = %source,
                "Failed to fetch URL"
            );
            AnalysisError::Network {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let description = status_description(status.as_u16());
            tracing::warn!(
                url = %url,
                status_code = status.as_u16(),
                description = %description,
                "Failure status code received"
            );
            return Err(AnalysisError::UnsuccessfulStatus {
                status_code: status.as_u16(),
                description,
            });
        }

        Ok(response)
    }

    /// Sends a HEAD request and reports whether the target answered 200
    ///
    /// Any transport failure, timeout included, counts as not accessible.
    pub async fn probe(&self, url: &Url) -> bool {
        match self
            .client
            .head(url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let accessible = response.status() == StatusCode::OK;
                if !accessible {
                    tracing::debug!(
                        url = %url,
                        status_code = response.status().as_u16(),
                        "Link probe returned non-200 status"
                    );
                }
                accessible
            }
            Err(e) => {
                tracing::debug!(
                    url = %url,
                    kind = transport_error_kind(&e),
                    error = %e,
                    "Link probe failed"
                );
                false
            }
        }
    }
}

/// Short label for the kind of transport failure, used in logs
pub fn transport_error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_builder() {
        "builder"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else {
        "request"
    }
}

/// Human-readable description for an unsuccessful HTTP status
///
/// # Example
///
/// ```
/// use page_analyzer::analyzer::status_description;
///
/// assert!(status_description(404).starts_with("Not Found"));
/// assert!(status_description(418).contains("418"));
/// ```
pub fn status_description(status_code: u16) -> String {
    let description = match status_code {
        400 => "Bad Request - The server cannot process the request due to a client error",
        401 => "Unauthorized - Authentication is required to access this resource",
        403 => "Forbidden - Access to this resource is denied",
        404 => "Not Found - The requested resource was not found on the server",
        500 => "Internal Server Error - The server encountered an unexpected condition",
        502 => "Bad Gateway - The server received an invalid response from an upstream server",
        503 => "Service Unavailable - The server is temporarily unable to handle the request",
        504 => "Gateway Timeout - The server did not receive a timely response from an upstream server",
        other => {
            return format!(
                "An error occurred while processing the request (HTTP status {})",
                other
            )
        }
    };
    description.to_string()
}
