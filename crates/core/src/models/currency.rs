use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Currency a purchase price may be entered in.
///
/// Storage is always USD; an EUR price is converted at submission time
/// and the original currency is not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputCurrency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl InputCurrency {
    /// The ISO 4217 code for this currency.
    pub fn code(&self) -> &'static str {
        match self {
            InputCurrency::Usd => "USD",
            InputCurrency::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for InputCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for InputCurrency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(InputCurrency::Usd),
            "EUR" => Ok(InputCurrency::Eur),
            other => Err(CoreError::Validation {
                field: "currency",
                message: format!("'{other}' is not supported, use USD or EUR"),
            }),
        }
    }
}
