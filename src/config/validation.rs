//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the key header name is a valid HTTP header name
//! - Reject empty or whitespace-padded exclusion entries (no key getter
//!   produces padded keys, so such an entry would never match)
//! - Check the log level is known
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>

use std::str::FromStr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::{GateConfig, KeySource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid key header name {0:?}")]
    InvalidHeaderName(String),

    #[error("excluded_keys[{0}] is empty")]
    EmptyExcludedKey(usize),

    #[error("excluded_keys[{0}] has leading or trailing whitespace")]
    PaddedExcludedKey(usize),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let KeySource::Header { name } = &config.key {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    for (i, key) in config.excluded_keys.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyExcludedKey(i));
        } else if key.trim() != key {
            errors.push(ValidationError::PaddedExcludedKey(i));
        }
    }

    if tracing::Level::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
