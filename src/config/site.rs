//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BlogError, Result};

/// Environment variable overriding `api_endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable overriding `access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub locale: String,
    pub timezone: String,
    pub date_format: String,

    // Content source
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,

    // Listing
    pub page_size: usize,

    // Reading time
    pub words_per_minute: usize,

    // Directory
    pub public_dir: String,
    pub post_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            locale: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            date_format: "dd MMM yyyy".to_string(),

            api_endpoint: String::new(),
            access_token: None,
            document_type: "post".to_string(),

            page_size: 5,

            words_per_minute: 200,

            public_dir: "public".to_string(),
            post_dir: "post".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| BlogError::Config(format!("{:?}: {}", path.as_ref(), e)))?;
        Ok(config)
    }

    /// Apply `PRISMIC_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("Using content endpoint from {}", ENDPOINT_ENV);
            self.api_endpoint = endpoint;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }
    }

    /// Check the settings the content client and renderers depend on
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(BlogError::Config(format!(
                "api_endpoint is not set (use _config.yml or {})",
                ENDPOINT_ENV
            )));
        }
        if !self.api_endpoint.starts_with("http://") && !self.api_endpoint.starts_with("https://")
        {
            return Err(BlogError::Config(format!(
                "api_endpoint must be an http(s) URL: {}",
                self.api_endpoint
            )));
        }
        if self.page_size == 0 {
            return Err(BlogError::Config("page_size must be positive".to_string()));
        }
        if self.words_per_minute == 0 {
            return Err(BlogError::Config(
                "words_per_minute must be positive".to_string(),
            ));
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(BlogError::Config(format!(
                "unknown timezone: {}",
                self.timezone
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.locale, "pt-BR");
        assert_eq!(config.date_format, "dd MMM yyyy");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
api_endpoint: https://blog.cdn.prismic.io/api/v2
page_size: 10
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.api_endpoint, "https://blog.cdn.prismic.io/api/v2");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.words_per_minute, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(|key| match key {
            ENDPOINT_ENV => Some("https://other.cdn.prismic.io/api/v2".to_string()),
            ACCESS_TOKEN_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_endpoint, "https://other.cdn.prismic.io/api/v2");
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_validate_rejects_missing_endpoint() {
        let config = SiteConfig::default();
        assert!(matches!(config.validate(), Err(BlogError::Config(_))));

        let config = SiteConfig {
            api_endpoint: "https://blog.cdn.prismic.io/api/v2".to_string(),
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
