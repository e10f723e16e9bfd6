use std::collections::HashMap;

/// Latest known previous-close price per ticker.
///
/// Keys are the distinct tickers of the user's current holdings; the map is
/// rebuilt from scratch on every refresh (no incremental caching). `None`
/// records "no data" explicitly (a ticker whose fetch failed or returned
/// nothing), so a genuine close of `Some(0.0)` stays distinguishable.
pub type PriceMap = HashMap<String, Option<f64>>;
