use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::catalog::Catalog;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from `PLANNER_*` environment variables.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Diet service base URL, without trailing slash
    pub base_url: String,
    pub timeout_secs: u64,
    /// Ingredient catalog override; the embedded catalog is used when unset
    pub catalog_path: Option<PathBuf>,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            base_url: std::env::var("PLANNER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: std::env::var("PLANNER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .context("PLANNER_TIMEOUT_SECS must be a whole number of seconds")?,
            catalog_path: std::env::var_os("PLANNER_CATALOG_PATH").map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            bail!("Base URL cannot be empty");
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Base URL must start with http:// or https://, got {}", self.base_url);
        }
        if self.timeout_secs == 0 {
            bail!("Timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display())),
            None => Catalog::embedded().context("Embedded catalog is invalid"),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            catalog_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.load_catalog().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = PlannerConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = PlannerConfig::default();
        config.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = PlannerConfig::default();
        config.base_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let config = PlannerConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/ingredients.json")),
            ..PlannerConfig::default()
        };
        let err = config.load_catalog().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ingredients.json"));
    }
}
