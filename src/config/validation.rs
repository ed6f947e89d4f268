use crate::config::types::{Config, FetchConfig, PacingConfig, RunConfig, SourceConfig, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetch_config(&config.fetch)?;
    validate_pacing_config(&config.pacing)?;
    validate_run_config(&config.run)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates the remote endpoint bases
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_base_url("listing-base", &config.listing_base)?;
    validate_base_url("item-base", &config.item_base)?;
    validate_base_url("stats-base", &config.stats_base)?;
    Ok(())
}

/// Validates one endpoint base: absolute http(s), no trailing slash
fn validate_base_url(name: &str, base: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use the http or https scheme, got '{}'",
            name,
            url.scheme()
        )));
    }

    // Endpoint paths are appended with a leading slash
    if base.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must not end with '/', got '{}'",
            name, base
        )));
    }

    Ok(())
}

/// Validates fetch retry and identity settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents must contain at least one entry".to_string(),
        ));
    }

    if config.user_agents.iter().any(|agent| agent.is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents entries cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the pacing delay ranges
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    validate_delay_range("pacing.request", config.request.min_ms, config.request.max_ms)?;
    validate_delay_range("pacing.item", config.item.min_ms, config.item.max_ms)?;
    validate_delay_range("pacing.page", config.page.min_ms, config.page.max_ms)?;
    Ok(())
}

fn validate_delay_range(name: &str, min_ms: u64, max_ms: u64) -> Result<(), ConfigError> {
    if min_ms > max_ms {
        return Err(ConfigError::Validation(format!(
            "{} min-ms must be <= max-ms, got {}..{}",
            name, min_ms, max_ms
        )));
    }
    Ok(())
}

/// Validates run-level bounds
fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.time_budget_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "time_budget_secs must be >= 1, got {}",
            config.time_budget_secs
        )));
    }

    // popularity_floor 0 disables the early stop, which is allowed

    Ok(())
}

/// Validates durable state locations
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation(
            "store root cannot be empty".to_string(),
        ));
    }

    if config.checkpoint.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("listing-base", "https://example.com").is_ok());
        assert!(validate_base_url("listing-base", "https://example.com/films/popular").is_ok());
        assert!(validate_base_url("listing-base", "http://127.0.0.1:8080/films").is_ok());

        assert!(validate_base_url("listing-base", "").is_err());
        assert!(validate_base_url("listing-base", "example.com").is_err());
        assert!(validate_base_url("listing-base", "ftp://example.com").is_err());
        assert!(validate_base_url("listing-base", "https://example.com/").is_err());
    }

    #[test]
    fn test_validate_delay_range() {
        assert!(validate_delay_range("pacing.item", 500, 1500).is_ok());
        assert!(validate_delay_range("pacing.item", 0, 0).is_ok());

        assert!(validate_delay_range("pacing.item", 1500, 500).is_err());
    }

    #[test]
    fn test_validate_fetch_config() {
        let mut config = FetchConfig::default();
        assert!(validate_fetch_config(&config).is_ok());

        config.max_attempts = 0;
        assert!(validate_fetch_config(&config).is_err());

        config.max_attempts = 3;
        config.user_agents.clear();
        assert!(validate_fetch_config(&config).is_err());
    }

    #[test]
    fn test_validate_run_config() {
        let mut config = RunConfig::default();
        assert!(validate_run_config(&config).is_ok());

        config.popularity_floor = 0;
        assert!(validate_run_config(&config).is_ok());

        config.time_budget_secs = 0;
        assert!(validate_run_config(&config).is_err());
    }
}
