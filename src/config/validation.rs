use crate::config::types::{
    Config, FetcherConfig, LinkCheckConfig, ServerConfig, StorageConfig, MAX_LINK_SAMPLE,
};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_link_check_config(&config.link_check)?;
    validate_storage_config(&config.storage)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates primary fetch configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    validate_timeout("fetcher.timeout-secs", config.timeout_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.max_body_bytes < 1024 {
        return Err(ConfigError::Validation(format!(
            "max-body-bytes must be >= 1024, got {}",
            config.max_body_bytes
        )));
    }

    Ok(())
}

/// Validates link health check configuration
fn validate_link_check_config(config: &LinkCheckConfig) -> Result<(), ConfigError> {
    validate_timeout("link-check.timeout-secs", config.timeout_secs)?;

    if config.sample_size < 1 || config.sample_size > MAX_LINK_SAMPLE {
        return Err(ConfigError::Validation(format!(
            "sample-size must be between 1 and {}, got {}",
            MAX_LINK_SAMPLE, config.sample_size
        )));
    }

    if config.concurrency < 1 || config.concurrency > config.sample_size {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and sample-size ({}), got {}",
            config.sample_size, config.concurrency
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_addr.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind-addr '{}': {}", config.bind_addr, e))
    })?;

    Ok(())
}

fn validate_timeout(key: &str, secs: u64) -> Result<(), ConfigError> {
    if !(1..=120).contains(&secs) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and 120 seconds, got {}",
            key, secs
        )));
    }
    Ok(())
}
