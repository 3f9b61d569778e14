//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{EventifyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(EventifyError::Config(
            "Server host is required".to_string(),
        ));
    }
    if config.port == 0 {
        return Err(EventifyError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventifyError::Config(
            "Database URL is required".to_string(),
        ));
    }
    if config.max_connections == 0 {
        return Err(EventifyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(EventifyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }
    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(EventifyError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }
    if config.token_ttl_hours <= 0 {
        return Err(EventifyError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
