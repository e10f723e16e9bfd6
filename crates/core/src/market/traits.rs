use async_trait::async_trait;

use crate::errors::CoreError;

/// Result of a ticker symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerLookup {
    /// Whether the symbol exists as an exact match
    pub exists: bool,

    /// Display name for the symbol (e.g., "Apple Inc."), when it exists
    pub name: Option<String>,
}

impl TickerLookup {
    /// The canonical "no such symbol" result.
    pub fn not_found() -> Self {
        Self {
            exists: false,
            name: None,
        }
    }

    pub fn found(name: Option<String>) -> Self {
        Self { exists: true, name }
    }
}

/// Trait abstraction for the market data API.
///
/// The production implementation talks to one HTTP vendor; tests substitute
/// mocks. If the vendor changes, only the implementation is replaced and
/// the rest of the codebase is untouched.
///
/// Transport and API failures are reported as `Err` here; it is the calling
/// layer that decides whether to swallow them (the add-holding flow
/// collapses them into "not found", the price sweep into a missing price).
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Human-readable name of this client (for logs/errors).
    fn name(&self) -> &str;

    /// Look up a ticker symbol. `exists` is true only if the API returns an
    /// exact match for the uppercased input.
    async fn lookup_ticker(&self, symbol: &str) -> Result<TickerLookup, CoreError>;

    /// The last completed trading session's closing price, used as the
    /// current-price proxy. `Ok(None)` when the API has no bar for the
    /// symbol, as distinct from a genuine zero close.
    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>, CoreError>;

    /// Exchange rate from `base` to `quote`. Must return `1.0` for equal
    /// currencies without touching the network.
    async fn fx_rate(&self, base: &str, quote: &str) -> Result<f64, CoreError>;
}
