use crate::config::types::{
    Config, OutputConfig, RssConfig, SanitizeConfig, SitesConfig, UserAgentConfig,
};
use crate::url::LocationKind;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_sites_config(&config.sites)?;
    validate_sanitize_config(&config.sanitize)?;
    validate_rss_config(&config.rss)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the reconciled index locations
fn validate_sites_config(config: &SitesConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.canonical_base).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid canonical_base '{}': {}",
            config.canonical_base, e
        ))
    })?;

    if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "canonical_base '{}' must be an http(s) URL with a host",
            config.canonical_base
        )));
    }

    validate_location("cms_index", &config.cms_index)?;
    validate_location("canonical_index", &config.canonical_index)?;
    validate_location("canonical_pages", &config.canonical_pages)?;

    // The mirror is fetched as a child map, so it must be a real URL
    validate_remote_url("pages_mirror", &config.pages_mirror)?;

    if !config.pages_map_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "pages_map_path must start with '/', got '{}'",
            config.pages_map_path
        )));
    }

    for page in &config.synthetic_pages {
        if page.is_empty() || page.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "synthetic page '{}' must be a non-empty path segment",
                page
            )));
        }
    }

    Ok(())
}

/// Validates the sanitizer rule set
fn validate_sanitize_config(config: &SanitizeConfig) -> Result<(), ConfigError> {
    for host in &config.stylesheet_hosts {
        validate_host(host)?;
    }

    for (from, to) in &config.host_rewrites {
        validate_host(from)?;
        validate_host(to)?;

        let reintroduced = config
            .host_rewrites
            .iter()
            .any(|(source, _)| to.contains(source.as_str()));
        let token = !config.vendor_token.is_empty() && to.contains(&config.vendor_token);

        if reintroduced || token {
            return Err(ConfigError::Validation(format!(
                "host rewrite '{}' -> '{}' reintroduces a rewritten pattern",
                from, to
            )));
        }

        // Every rule must shorten the text for sanitizing to reach a fixpoint
        if to.len() >= from.len() {
            return Err(ConfigError::Validation(format!(
                "host rewrite '{}' -> '{}' must shorten the host",
                from, to
            )));
        }
    }

    Ok(())
}

/// Validates RSS configuration
fn validate_rss_config(config: &RssConfig) -> Result<(), ConfigError> {
    // Feed freshness comes from HEAD requests, so both feeds must be URLs
    validate_remote_url("cms_feed", &config.cms_feed)?;
    validate_remote_url("canonical_feed", &config.canonical_feed)?;

    if config.rewrites.iter().any(|(from, _)| from.is_empty()) {
        return Err(ConfigError::Validation(
            "rss rewrites cannot have an empty source pattern".to_string(),
        ));
    }

    if config.generator_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "generator_suffix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("sitemap_dir", &config.sitemap_dir),
        ("parent_path", &config.parent_path),
        ("rss_path", &config.rss_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates a document location: an http(s) URL or a local path
fn validate_location(name: &str, location: &str) -> Result<(), ConfigError> {
    if location.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    if LocationKind::of(location) == LocationKind::Remote {
        Url::parse(location).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, location, e))
        })?;
    }

    Ok(())
}

/// Validates a location that must be fetched over http(s)
fn validate_remote_url(name: &str, location: &str) -> Result<(), ConfigError> {
    if LocationKind::of(location) != LocationKind::Remote {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must be an http(s) URL, got '{}'",
            name, location
        )));
    }

    Url::parse(location).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, location, e))
    })?;

    Ok(())
}

/// Validates a bare host name
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::InvalidHost("Host cannot be empty".to_string()));
    }

    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidHost(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err(ConfigError::InvalidHost(format!(
            "Host '{}' has a misplaced dot",
            host
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}
