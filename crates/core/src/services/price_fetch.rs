use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::market::traits::MarketData;
use crate::models::holding::Holding;
use crate::models::price::PriceMap;
use crate::models::settings::FetchPacing;

/// Sequential previous-close sweep over a set of tickers.
///
/// Requests are deliberately serialized with an idle gap between them:
/// the market data API's free tier rate-limits per minute, so latency is
/// traded for staying under the limit. A failed ticker yields a `None`
/// entry and the sweep continues; nothing is retried.
pub struct PriceFetcher {
    market: Arc<dyn MarketData>,
    pacing: FetchPacing,
}

impl PriceFetcher {
    pub fn new(market: Arc<dyn MarketData>, pacing: FetchPacing) -> Self {
        Self { market, pacing }
    }

    /// Fetch previous-close prices for each ticker in order, pacing the
    /// requests. The returned map has one entry per input ticker.
    pub async fn fetch_previous_closes(&self, tickers: &[String]) -> PriceMap {
        let mut prices = PriceMap::with_capacity(tickers.len());
        let mut last_failed = false;

        for (i, ticker) in tickers.iter().enumerate() {
            if i > 0 {
                let mut gap = self.pacing.interval;
                if last_failed {
                    gap += self.pacing.failure_backoff;
                }
                if !gap.is_zero() {
                    tokio::time::sleep(gap).await;
                }
            }

            let price = match self.market.previous_close(ticker).await {
                Ok(price) => {
                    if price.is_none() {
                        debug!("no previous close available for {ticker}");
                    }
                    last_failed = false;
                    price
                }
                Err(e) => {
                    warn!("previous close for {ticker} failed: {e}");
                    last_failed = true;
                    None
                }
            };
            prices.insert(ticker.clone(), price);
        }

        prices
    }
}

/// The distinct tickers of a holdings list, in first-appearance order.
/// The store returns holdings ordered by ticker, so multiple lots of the
/// same symbol collapse into one fetch.
pub fn distinct_tickers(holdings: &[Holding]) -> Vec<String> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .filter_map(|h| {
            if seen.insert(h.ticker.clone()) {
                Some(h.ticker.clone())
            } else {
                None
            }
        })
        .collect()
}
