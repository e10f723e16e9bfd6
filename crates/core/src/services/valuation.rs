use crate::models::holding::Holding;
use crate::models::price::PriceMap;
use crate::models::valuation::{DisplayRow, PortfolioTotals, Valuation};

/// Compute display rows and aggregate totals for a set of holdings.
///
/// Pure: no I/O, no API calls, never fails. A holding whose ticker is
/// missing from the price map (or mapped to `None`) gets a market value of
/// zero while `current_price` stays `None`, so the view can tell "no data"
/// apart from a genuine zero close.
///
/// Rows are valued in USD; the totals are each multiplied by
/// `display_fx_rate`. Converting before summing vs. after is equivalent
/// since the rate is a scalar multiplier.
pub fn value_portfolio(
    holdings: &[Holding],
    prices: &PriceMap,
    display_fx_rate: f64,
) -> Valuation {
    let mut rows = Vec::with_capacity(holdings.len());
    let mut market_value_usd = 0.0;
    let mut cost_basis_usd = 0.0;

    for holding in holdings {
        let current_price = prices.get(&holding.ticker).copied().flatten();
        let market_value = holding.quantity * current_price.unwrap_or(0.0);
        let cost_basis = holding.quantity * holding.purchase_price_usd;
        let gain_loss = market_value - cost_basis;

        market_value_usd += market_value;
        cost_basis_usd += cost_basis;

        rows.push(DisplayRow {
            holding: holding.clone(),
            current_price,
            market_value,
            cost_basis,
            gain_loss,
            gain_loss_pct: percent_of(gain_loss, cost_basis),
        });
    }

    let market_value = market_value_usd * display_fx_rate;
    let cost_basis = cost_basis_usd * display_fx_rate;
    let gain_loss = market_value - cost_basis;

    Valuation {
        rows,
        totals: PortfolioTotals {
            market_value,
            cost_basis,
            gain_loss,
            gain_loss_pct: percent_of(gain_loss, cost_basis),
        },
    }
}

/// Gain/loss as a percentage of cost basis. A cost basis of zero yields
/// 0, not NaN or infinity.
fn percent_of(gain_loss: f64, cost_basis: f64) -> f64 {
    if cost_basis == 0.0 {
        0.0
    } else {
        gain_loss / cost_basis * 100.0
    }
}
