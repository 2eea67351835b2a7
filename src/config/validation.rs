use crate::config::types::{Config, FetchConfig, OutputConfig, PageEntry, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_pages(&config.pages, &config.site)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    validate_selector("content-selector", &config.content_selector)?;
    validate_selector("nav-selector", &config.nav_selector)?;

    if let Some(index_path) = &config.index_path {
        if index_path.is_empty() {
            return Err(ConfigError::Validation(
                "index-path cannot be empty when present".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.filename.is_empty() {
        return Err(ConfigError::Validation(
            "output filename cannot be empty".to_string(),
        ));
    }

    if config.title.is_empty() {
        return Err(ConfigError::Validation(
            "output title cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the static page list
///
/// Either a static `[[pages]]` list or an `index-path` for discovery must be
/// present, otherwise there is nothing to scrape.
fn validate_pages(pages: &[PageEntry], site: &SiteConfig) -> Result<(), ConfigError> {
    if pages.is_empty() && site.index_path.is_none() {
        return Err(ConfigError::Validation(
            "either [[pages]] entries or site.index-path must be configured".to_string(),
        ));
    }

    let base = Url::parse(&site.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    for entry in pages {
        if entry.title.is_empty() {
            return Err(ConfigError::Validation(format!(
                "page entry '{}' has an empty title",
                entry.url
            )));
        }

        // Relative entries must resolve against the base URL
        base.join(&entry.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid page URL '{}': {}", entry.url, e)))?;
    }

    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map_err(|_| ConfigError::InvalidSelector(format!("{}: '{}'", name, selector)))?;
    Ok(())
}
