pub mod price_fetch;
pub mod ticker_check;
pub mod valuation;
