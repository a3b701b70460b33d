use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::quiz::catalog::QuestionCatalog;
use crate::scoring::topk::DEFAULT_TOP_K;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to an external JSON catalog (STYLEQUIZ_CATALOG). When unset the
    /// built-in catalog is used.
    pub catalog_path: Option<PathBuf>,
    /// How many signals to keep in the reduced profile (STYLEQUIZ_TOP_K)
    pub top_k: usize,
    /// HTTP port for `serve` (PORT, default 3000)
    pub port: u16,
    /// Bind address for `serve` (STYLEQUIZ_BIND, default 0.0.0.0)
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            top_k: DEFAULT_TOP_K,
            port: 3000,
            bind: "0.0.0.0".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are an
    /// error rather than being silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let top_k = match env::var("STYLEQUIZ_TOP_K") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("STYLEQUIZ_TOP_K must be a non-negative integer, got {raw:?}"))?,
            Err(_) => defaults.top_k,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            catalog_path: env::var("STYLEQUIZ_CATALOG")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            top_k,
            port,
            bind: env::var("STYLEQUIZ_BIND").unwrap_or(defaults.bind),
        })
    }

    /// The catalog answers are scored against: the external file if one is
    /// configured, otherwise the built-in questionnaire.
    pub fn load_catalog(&self) -> Result<QuestionCatalog> {
        match &self.catalog_path {
            Some(path) => Ok(QuestionCatalog::from_path(path)?),
            None => Ok(QuestionCatalog::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_builtin_catalog() {
        let config = Config::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.port, 3000);
        assert_eq!(&config.load_catalog().unwrap(), QuestionCatalog::builtin());
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..Config::default()
        };
        assert!(config.load_catalog().is_err());
    }
}
