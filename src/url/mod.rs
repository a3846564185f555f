//! URL handling module for Page Analyzer
//!
//! This module provides scheme defaulting, the strict syntactic validator
//! that gates every fetch, and host extraction for origin comparison.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{has_scheme, same_host, written_host};
pub use normalize::{validate_url, with_default_scheme, NormalizedUrl};
