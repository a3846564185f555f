//! Configuration module for Page Analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so running without a file is equivalent to an
//! empty one.
//!
//! # Example
//!
//! ```no_run
//! use page_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("analyzer.toml")).unwrap();
//! println!("Page timeout: {}s", config.analyzer.page_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalyzerConfig, Config, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
