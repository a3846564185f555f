use crate::config::types::{AnalyzerConfig, Config, ServerConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on concurrent liveness probes per analysis
const MAX_CONCURRENT_PROBES: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_analyzer_config(&config.analyzer)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.bind_address.is_empty() {
        return Err(ConfigError::Validation(
            "bind_address cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "port must be between 1 and 65535".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetch and probe settings
fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "probe_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs > config.page_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs ({}) must not exceed page_timeout_secs ({})",
            config.probe_timeout_secs, config.page_timeout_secs
        )));
    }

    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > MAX_CONCURRENT_PROBES {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_probes must be between 1 and {}, got {}",
            MAX_CONCURRENT_PROBES, config.max_concurrent_probes
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Name: non-empty, alphanumeric + hyphens only
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}
