//! spacetraveling: a static blog front-end backed by the Prismic headless CMS
//!
//! Posts are fetched from the content API, rendered with embedded Tera
//! templates and written to a public directory. A small axum server serves
//! the result, paginates the listing and renders unknown posts on demand.

pub mod commands;
pub mod config;
pub mod content;
pub mod controllers;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod prismic;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new instance from a directory, reading `_config.yml` and
    /// the `PRISMIC_*` environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Build the content client for this site
    pub fn client(&self) -> Result<prismic::PrismicClient> {
        Ok(prismic::PrismicClient::from_config(&self.config)?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
