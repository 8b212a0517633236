use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, error, instrument};

use crate::core::currency::{CurrencyList, CurrencyService, FetchError, Quotes};

pub const DEFAULT_BASE_URL: &str = "http://apilayer.net";

const LIST_PATH: &str = "/api/list";
const LIVE_PATH: &str = "/api/live";

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    info: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    currencies: Option<BTreeMap<String, String>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    quotes: Option<BTreeMap<String, f64>>,
    error: Option<ApiError>,
}

/// Client for the currencylayer API.
#[derive(Clone)]
pub struct CurrencyLayerClient {
    base_url: String,
    access_key: String,
    source_currency: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for CurrencyLayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyLayerClient")
            .field("base_url", &self.base_url)
            .field("source_currency", &self.source_currency)
            .finish_non_exhaustive()
    }
}

impl CurrencyLayerClient {
    pub fn new(base_url: &str, access_key: &str, source_currency: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            access_key: access_key.to_string(),
            source_currency: source_currency.to_string(),
            client,
        })
    }

    /// Builds `{base}{path}?access_key=..&format=1` plus any extra parameters.
    fn endpoint(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::InvalidEndpoint(format!("{}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(FetchError::InvalidEndpoint(self.base_url.clone()));
        }
        url.set_path(path);
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query
                .append_pair("access_key", &self.access_key)
                .append_pair("format", "1");
            for (name, value) in extra {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse currency response");
            FetchError::Decode(e)
        })
    }
}

#[async_trait]
impl CurrencyService for CurrencyLayerClient {
    fn source_currency(&self) -> &str {
        &self.source_currency
    }

    #[instrument(name = "CurrencyListFetch", skip(self))]
    async fn fetch_currency_list(&self) -> Result<CurrencyList, FetchError> {
        let url = self.endpoint(LIST_PATH, &[])?;
        debug!("Requesting currency list from {}{}", self.base_url, LIST_PATH);

        let data: ListResponse = self.get_json(url).await?;
        if let Some(err) = data.error {
            return Err(FetchError::Api {
                code: err.code,
                info: err.info,
            });
        }
        data.currencies.ok_or(FetchError::MissingField("currencies"))
    }

    #[instrument(name = "RealtimeRatesFetch", skip(self))]
    async fn fetch_realtime_rates(&self, currency_codes: &[&str]) -> Result<Quotes, FetchError> {
        let currencies = currency_codes.join(",");
        let url = self.endpoint(LIVE_PATH, &[("currencies", currencies.as_str())])?;
        debug!(
            "Requesting live rates for {} from {}{}",
            currencies, self.base_url, LIVE_PATH
        );

        let data: LiveResponse = self.get_json(url).await?;
        if let Some(err) = data.error {
            return Err(FetchError::Api {
                code: err.code,
                info: err.info,
            });
        }
        data.quotes.ok_or(FetchError::MissingField("quotes"))
    }
}
