use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::Origin;
use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Smallest crawl timeout accepted, in seconds
pub const MIN_CRAWL_TIMEOUT_SECONDS: i64 = 5;

/// Validates the entire configuration, applying clamps in place
///
/// Every problem found is reported, not just the first.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    apply_clamps(&mut config.crawler);

    let mut errors = Vec::new();
    validate_crawler_config(&config.crawler, &mut errors);
    validate_user_agent_config(&config.user_agent, &mut errors);
    validate_output_config(&config.output, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(errors))
    }
}

/// Raises out-of-range numeric settings to their minimums
fn apply_clamps(config: &mut CrawlerConfig) {
    config.num_threads = config.num_threads.max(1);
    config.crawl_timeout_seconds = config.crawl_timeout_seconds.max(MIN_CRAWL_TIMEOUT_SECONDS);
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig, errors: &mut Vec<String>) {
    let starting_url = config.starting_url.trim();
    if starting_url.is_empty() {
        errors.push("starting-url is required".to_string());
        return;
    }

    if let Err(e) = Origin::from_seed(starting_url) {
        errors.push(format!("Invalid starting-url '{}': {}", starting_url, e));
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig, errors: &mut Vec<String>) {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        errors.push("crawler-name cannot be empty".to_string());
    } else if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        errors.push(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        ));
    }

    if !config.contact_url.is_empty() {
        if let Err(e) = Url::parse(&config.contact_url) {
            errors.push(format!("Invalid contact-url: {}", e));
        }
    }

    if !config.contact_email.is_empty() {
        if let Err(e) = validate_email(&config.contact_email) {
            errors.push(e);
        }
    }
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig, errors: &mut Vec<String>) {
    if config.output_path.trim().is_empty() {
        errors.push("output-path is required".to_string());
    } else {
        let path = Path::new(&config.output_path);
        if path.exists() && !path.is_dir() {
            errors.push(format!(
                "output-path '{}' exists but is not a directory",
                config.output_path
            ));
        }
    }

    if config.result_file.trim().is_empty() {
        errors.push("result-file is required".to_string());
    }
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), String> {
    // Basic email format check: must contain @ and have text on both sides
    let Some((local, domain)) = email.split_once('@') else {
        return Err(format!("Invalid email format: '{}'", email));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(format!("Invalid email format: '{}'", email));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(format!("Invalid email domain: '{}'", email));
    }

    Ok(())
}
