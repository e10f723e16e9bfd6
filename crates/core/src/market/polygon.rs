use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::traits::{MarketData, TickerLookup};
use crate::errors::CoreError;
use crate::models::settings::MarketConfig;

/// Polygon.io client for ticker lookups, previous-close prices, and FX.
///
/// - **Free tier**: 5 requests/minute; callers pace their own sweeps.
/// - **Requires**: API key, passed as the `apiKey` query parameter.
/// - **Endpoints**: `/v3/reference/tickers/{symbol}` (details),
///   `/v2/aggs/ticker/{symbol}/prev` (previous close).
/// - Currency pairs are addressed as synthetic tickers `C:{BASE}{QUOTE}`.
///
/// No retries; requests time out after 30 seconds.
pub struct PolygonClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PolygonClient {
    pub fn new(config: &MarketConfig) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn require_api_key(&self) -> Result<(), CoreError> {
        if self.api_key.is_empty() {
            return Err(CoreError::Api {
                provider: "Polygon".into(),
                message: "API key is not configured".into(),
            });
        }
        Ok(())
    }
}

/// The synthetic ticker Polygon uses for a currency pair, e.g.
/// `fx_pair_ticker("eur", "usd")` → `"C:EURUSD"`.
pub fn fx_pair_ticker(base: &str, quote: &str) -> String {
    format!("C:{}{}", base.to_uppercase(), quote.to_uppercase())
}

// ── Polygon API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct TickerDetailsResponse {
    results: Option<TickerDetails>,
}

#[derive(Deserialize)]
struct TickerDetails {
    ticker: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct PrevCloseResponse {
    results: Option<Vec<PrevBar>>,
}

#[derive(Deserialize)]
struct PrevBar {
    /// Close price of the aggregate bar
    c: f64,
}

#[async_trait]
impl MarketData for PolygonClient {
    fn name(&self) -> &str {
        "Polygon"
    }

    async fn lookup_ticker(&self, symbol: &str) -> Result<TickerLookup, CoreError> {
        self.require_api_key()?;
        let symbol = symbol.trim().to_uppercase();
        let url = format!("{}/v3/reference/tickers/{symbol}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        // Unknown symbols come back as 404, not as an error payload
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TickerLookup::not_found());
        }

        let body: TickerDetailsResponse =
            response
                .error_for_status()?
                .json()
                .await
                .map_err(|e| CoreError::Api {
                    provider: "Polygon".into(),
                    message: format!("Failed to parse ticker details for {symbol}: {e}"),
                })?;

        // Exact-match rule: the returned symbol must equal the uppercased input
        match body.results {
            Some(details) if details.ticker == symbol => {
                Ok(TickerLookup::found(details.name))
            }
            _ => Ok(TickerLookup::not_found()),
        }
    }

    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        self.require_api_key()?;
        let symbol = symbol.trim().to_uppercase();
        let url = format!("{}/v2/aggs/ticker/{symbol}/prev", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("adjusted", "true"), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: PrevCloseResponse =
            response
                .error_for_status()?
                .json()
                .await
                .map_err(|e| CoreError::Api {
                    provider: "Polygon".into(),
                    message: format!("Failed to parse previous close for {symbol}: {e}"),
                })?;

        let close = match body.results.and_then(|bars| bars.into_iter().next()) {
            Some(bar) => bar.c,
            None => {
                debug!("no previous-close bar for {symbol}");
                return Ok(None);
            }
        };

        if !close.is_finite() || close < 0.0 {
            return Err(CoreError::Api {
                provider: "Polygon".into(),
                message: format!(
                    "Invalid close returned for {symbol}: {close} (must be finite and non-negative)"
                ),
            });
        }

        Ok(Some(close))
    }

    async fn fx_rate(&self, base: &str, quote: &str) -> Result<f64, CoreError> {
        let base = base.trim().to_uppercase();
        let quote = quote.trim().to_uppercase();

        // Same currency → rate is 1.0, no network call
        if base == quote {
            return Ok(1.0);
        }

        let pair = fx_pair_ticker(&base, &quote);
        match self.previous_close(&pair).await? {
            Some(rate) if rate > 0.0 => Ok(rate),
            // A rate of zero would be meaningless, treat it as missing data
            _ => Err(CoreError::FxUnavailable { base, quote }),
        }
    }
}
