//! Currency data abstractions

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use thiserror::Error;

/// Currency code to display name, e.g. `"EUR" -> "Euro"`.
pub type CurrencyList = BTreeMap<String, String>;

/// Concatenated pair key to rate, e.g. `"USDEUR" -> 0.911404`.
pub type Quotes = BTreeMap<String, f64>;

/// A rate relative to the service's source currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub currency_code: String,
    pub rate: f64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL is stripped since it carries the access key.
    #[error("Request error: {0}")]
    Transport(reqwest::Error),
    #[error("Request failed with status {0}")]
    Status(StatusCode),
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("Service error {code}: {info}")]
    Api { code: i64, info: String },
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("No quote found for {0}")]
    MissingQuote(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

/// A service that can list currencies and provide live rates for them.
#[async_trait]
pub trait CurrencyService: Send + Sync {
    /// Code of the currency every quote is relative to.
    fn source_currency(&self) -> &str;

    async fn fetch_currency_list(&self) -> Result<CurrencyList, FetchError>;

    async fn fetch_realtime_rates(&self, currency_codes: &[&str]) -> Result<Quotes, FetchError>;

    /// Key under which the quote for `target` is reported.
    fn quote_key(&self, target: &str) -> String {
        format!("{}{}", self.source_currency(), target)
    }

    /// Fetches the live rate for a single currency.
    async fn rate_for(&self, target: &str) -> Result<ExchangeRate, FetchError> {
        let quotes = self.fetch_realtime_rates(&[target]).await?;
        let key = self.quote_key(target);
        let rate = quotes
            .get(&key)
            .copied()
            .ok_or(FetchError::MissingQuote(key))?;
        Ok(ExchangeRate {
            currency_code: target.to_string(),
            rate,
        })
    }
}
