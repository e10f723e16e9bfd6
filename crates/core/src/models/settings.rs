use std::time::Duration;

/// User- and deployment-configurable settings.
///
/// Not persisted by this crate; the host application owns configuration
/// storage and hands a populated `Settings` to the tracker at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Currency portfolio totals are displayed in (3-letter code).
    /// Display-only: stored prices stay in USD.
    pub display_currency: String,

    /// Market data API endpoint and key
    pub market: MarketConfig,

    /// Managed holdings store endpoint and anon key
    pub store: StoreConfig,

    /// Pacing for the sequential price sweep
    pub pacing: FetchPacing,

    /// Settle delay before a ticker edit triggers a lookup
    pub ticker_settle: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: "USD".to_string(),
            market: MarketConfig::default(),
            store: StoreConfig::default(),
            pacing: FetchPacing::default(),
            ticker_settle: Duration::from_secs(1),
        }
    }
}

/// Market data HTTP API configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.polygon.io".to_string(),
            api_key: String::new(),
        }
    }
}

/// Managed record store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
        }
    }
}

/// Pacing for the sequential per-ticker price sweep.
///
/// The free tier of the market data API rate-limits aggressively, so
/// requests are serialized with an idle gap. After a failed request the
/// next gap is stretched by `failure_backoff`. Tests run with zero
/// durations or paused timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPacing {
    /// Idle gap between consecutive requests
    pub interval: Duration,

    /// Extra gap added after a failed request
    pub failure_backoff: Duration,
}

impl Default for FetchPacing {
    fn default() -> Self {
        Self {
            // 5 requests/minute on the free tier
            interval: Duration::from_secs(12),
            failure_backoff: Duration::ZERO,
        }
    }
}

impl FetchPacing {
    /// Pacing with no delays at all, for tests and unmetered endpoints.
    pub fn immediate() -> Self {
        Self {
            interval: Duration::ZERO,
            failure_backoff: Duration::ZERO,
        }
    }
}
