use serde::Serialize;

use super::holding::Holding;

/// One table row of the portfolio view. Derived, never persisted:
/// recomputed on every refresh, lifetime of one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// The underlying holding
    pub holding: Holding,

    /// Previous-close price, or `None` when no data was available.
    /// `Some(0.0)` means the market genuinely closed at zero.
    pub current_price: Option<f64>,

    /// quantity × current price (0 when the price is unavailable)
    pub market_value: f64,

    /// quantity × canonical purchase price
    pub cost_basis: f64,

    /// market value − cost basis
    pub gain_loss: f64,

    /// gain/loss as a percentage of cost basis; 0 when cost basis is 0
    pub gain_loss_pct: f64,
}

/// Aggregate totals over all rows, already converted into the display
/// currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub market_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    pub gain_loss_pct: f64,
}

/// The full output of one valuation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Valuation {
    pub rows: Vec<DisplayRow>,
    pub totals: PortfolioTotals,
}
