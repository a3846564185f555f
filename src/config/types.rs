use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Page Analyzer
///
/// Every section and key is optional; missing values fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analyzer: AnalyzerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to
    #[serde(rename = "bind-address")]
    pub bind_address: String,

    /// Port to listen on
    pub port: u16,

    /// How long in-flight requests get to finish after a shutdown signal (seconds)
    #[serde(rename = "shutdown-timeout-secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8089,
            shutdown_timeout_secs: 30,
        }
    }
}

/// Page fetch and link probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Overall timeout for the page GET (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for each external link HEAD probe (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Maximum number of liveness probes in flight for one analysis
    #[serde(rename = "max-concurrent-probes")]
    pub max_concurrent_probes: usize,
}

impl AnalyzerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            probe_timeout_secs: 10,
            max_concurrent_probes: 16,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the analyzer
    pub name: String,

    /// Version of the analyzer
    pub version: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Mozilla/5.0 (compatible; Name/Version)`
    pub fn header_value(&self) -> String {
        format!("Mozilla/5.0 (compatible; {}/{})", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "WebPageAnalyzer".to_string(),
            version: "1.0".to_string(),
        }
    }
}
