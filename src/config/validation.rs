//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address resolves to an IP address
//! - Validate value ranges (connection limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::IpAddr;

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The listener address is neither `"any"` nor a parseable IP address.
    InvalidAddress(String),
    /// The connection limit is zero, which would reject every connection.
    ZeroConnectionLimit,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidAddress(addr) => {
                write!(f, "invalid listener address: {}", addr)
            }
            ValidationError::ZeroConnectionLimit => {
                write!(f, "listener.max_connections must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let addr = config.listener.address.as_str();
    if addr != "any" && addr.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress(addr.to_string()));
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnectionLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn explicit_ip_validates() {
        let mut config = ServerConfig::default();
        config.listener.address = "127.0.0.1".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bogus_address_collected() {
        let mut config = ServerConfig::default();
        config.listener.address = "not-an-ip".to_string();
        config.listener.max_connections = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ValidationError::InvalidAddress("not-an-ip".to_string())
        );
    }
}
