//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    types::{AnalystEstimate, Period, Quote},
};
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::env;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
    as_of: Option<NaiveDate>,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            as_of: None,
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or a `.env`
    /// file exists but cannot be read.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            return Err(e.into());
        }

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Pin the date against which forward fiscal years are chosen.
    ///
    /// Defaults to today (UTC).
    #[must_use]
    pub const fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// The date against which forward fiscal years are chosen.
    #[must_use]
    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint, "FMP request");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // FMP reports some failures as a 200 with an error object.
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Quarterly EPS rows (reported and estimated), newest first.
    ///
    /// Rows stay untyped; the schema adapter maps their fields.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and body decoding failures.
    pub async fn earnings(&self, symbol: &str, limit: Option<u32>) -> Result<Vec<Value>> {
        self.get(&endpoint("earnings", symbol, &[], limit)).await
    }

    /// Consensus EPS estimates per fiscal period.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and body decoding failures.
    pub async fn analyst_estimates(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<AnalystEstimate>> {
        self.get(&endpoint("analyst-estimates", symbol, &[("period", period.as_str())], limit))
            .await
    }

    /// Latest quote, `None` when FMP returns no row.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and body decoding failures.
    pub async fn quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let quotes: Vec<Quote> = self.get(&endpoint("quote", symbol, &[], None)).await?;
        Ok(quotes.into_iter().next())
    }
}

/// `path?symbol=SYM[&k=v...][&limit=n]`, without the API key.
fn endpoint(path: &str, symbol: &str, params: &[(&str, &str)], limit: Option<u32>) -> String {
    let mut query = format!("{path}?symbol={}", symbol.to_uppercase());
    for (key, value) in params {
        query.push_str(&format!("&{key}={value}"));
    }
    if let Some(n) = limit {
        query.push_str(&format!("&limit={n}"));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = FmpClient::new("test_key");
        assert_eq!(
            client.url("quote?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/quote?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("analyst-estimates?symbol=AAPL&period=annual"),
            "https://financialmodelingprep.com/stable/analyst-estimates?symbol=AAPL&period=annual&apikey=test_key"
        );
    }

    #[test]
    fn test_endpoint_query() {
        assert_eq!(endpoint("quote", "msft", &[], None), "quote?symbol=MSFT");
        assert_eq!(
            endpoint("analyst-estimates", "aapl", &[("period", "annual")], Some(4)),
            "analyst-estimates?symbol=AAPL&period=annual&limit=4"
        );
    }

    #[test]
    fn test_pinned_as_of() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let client = FmpClient::new("test_key").with_as_of(date);
        assert_eq!(client.as_of(), date);
    }
}
