use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::InputCurrency;
use crate::errors::CoreError;

/// One recorded purchase lot of a ticker, as persisted in the `portfolios`
/// table of the managed store.
///
/// **Invariant**: `purchase_price_usd` is always the USD-converted value,
/// regardless of the currency the user entered at input time. The original
/// input currency is not retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier, assigned by the store
    pub id: Uuid,

    /// Owner reference; rows are queried and inserted per user
    pub user_id: Uuid,

    /// Exchange symbol, uppercased (e.g., "AAPL")
    pub ticker: String,

    /// Number of shares (always positive)
    pub quantity: f64,

    /// Purchase price per share in the canonical storage currency (USD)
    #[serde(rename = "purchase_price")]
    pub purchase_price_usd: f64,

    /// Date of purchase (no time component, daily granularity)
    pub purchase_date: NaiveDate,
}

/// A holding about to be inserted: everything but the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHolding {
    pub user_id: Uuid,
    pub ticker: String,
    pub quantity: f64,
    #[serde(rename = "purchase_price")]
    pub purchase_price_usd: f64,
    pub purchase_date: NaiveDate,
}

/// Partial update for an existing holding. `None` fields are left untouched.
/// Prices here are already in USD; the edit form does not re-convert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoldingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(rename = "purchase_price", skip_serializing_if = "Option::is_none")]
    pub purchase_price_usd: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

impl HoldingPatch {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.purchase_price_usd.is_none()
            && self.purchase_date.is_none()
    }

    /// Validate the fields that are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation {
                field: "patch",
                message: "no fields to update".into(),
            });
        }
        if let Some(q) = self.quantity {
            if !q.is_finite() || q < 1.0 {
                return Err(CoreError::Validation {
                    field: "quantity",
                    message: "must be at least 1".into(),
                });
            }
        }
        if let Some(p) = self.purchase_price_usd {
            if !p.is_finite() || p < 0.01 {
                return Err(CoreError::Validation {
                    field: "price",
                    message: "must be at least 0.01".into(),
                });
            }
        }
        Ok(())
    }
}

/// Raw add-holding form input, validated before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingDraft {
    /// Ticker as typed (trimmed and uppercased on normalization)
    pub ticker: String,

    /// Number of shares
    pub quantity: f64,

    /// Purchase price per share in `currency`
    pub price: f64,

    /// Currency the price was entered in
    pub currency: InputCurrency,

    /// Purchase date, required for submission
    pub purchase_date: Option<NaiveDate>,
}

impl HoldingDraft {
    /// Field-level validation. Returns the first failing field.
    ///
    /// Rules: ticker non-empty, quantity ≥ 1, price ≥ 0.01, date present.
    /// Currency is constrained by the `InputCurrency` type itself.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ticker.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "ticker",
                message: "ticker is required".into(),
            });
        }
        if !self.quantity.is_finite() || self.quantity < 1.0 {
            return Err(CoreError::Validation {
                field: "quantity",
                message: "must be at least 1".into(),
            });
        }
        if !self.price.is_finite() || self.price < 0.01 {
            return Err(CoreError::Validation {
                field: "price",
                message: "must be at least 0.01".into(),
            });
        }
        if self.purchase_date.is_none() {
            return Err(CoreError::Validation {
                field: "purchase_date",
                message: "purchase date is required".into(),
            });
        }
        Ok(())
    }

    /// The ticker as it will be stored and sent to the market data API.
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }
}
