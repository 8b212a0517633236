use super::catalog::Catalog;
use super::price::Locale;
use super::product::Product;
use super::session::Session;
use crate::providers::{CurrencyLayerClient, currency_layer::DEFAULT_BASE_URL};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_source_currency() -> String {
    "USD".to_string()
}

#[derive(Deserialize, Serialize, Clone)]
pub struct CurrencyLayerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub access_key: Option<String>,
}

impl std::fmt::Debug for CurrencyLayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyLayerConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for CurrencyLayerConfig {
    fn default() -> Self {
        CurrencyLayerConfig {
            base_url: default_base_url(),
            access_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub currency_layer: CurrencyLayerConfig,
    /// Currency that product prices are listed in and quotes are relative to.
    #[serde(default = "default_source_currency")]
    pub source_currency: String,
    #[serde(default)]
    pub locale: Locale,
    /// Replaces the built-in catalog when present.
    pub products: Option<Vec<Product>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency_layer: CurrencyLayerConfig::default(),
            source_currency: default_source_currency(),
            locale: Locale::default(),
            products: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if none exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "storefront", "storefront")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn catalog(&self) -> Catalog {
        match &self.products {
            Some(products) => Catalog::new(products.clone()),
            None => Catalog::prototype(),
        }
    }

    /// A fresh session showing prices in the source currency.
    pub fn session(&self) -> Session {
        Session::new(self.locale, &self.source_currency)
    }

    pub fn currency_client(&self) -> Result<CurrencyLayerClient> {
        let access_key = self
            .currency_layer
            .access_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context("No currencylayer access key configured (currency_layer.access_key)")?;
        CurrencyLayerClient::new(
            &self.currency_layer.base_url,
            access_key,
            &self.source_currency,
        )
        .context("Failed to create currencylayer client")
    }
}
