use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::extract::ExtractionProfile;
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Configuration problems are the only errors fatal to a whole run, so
/// every one of them must surface here, before any worker starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;

    // A profile that cannot compile must fail the run up front
    ExtractionProfile::compile(&config.selectors)?;

    Ok(())
}

/// Validates the seed URL list
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        normalize_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 64, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    if config.structure_wait_seconds > config.request_timeout_seconds {
        return Err(ConfigError::Validation(format!(
            "structure_wait_seconds ({}) must not exceed request_timeout_seconds ({})",
            config.structure_wait_seconds, config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_none() && config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records_path cannot be empty when no database_path is set".to_string(),
        ));
    }

    if let Some(db_path) = &config.database_path {
        if db_path.is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
