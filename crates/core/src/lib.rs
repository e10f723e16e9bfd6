pub mod auth;
pub mod errors;
pub mod market;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use uuid::Uuid;

use auth::traits::SessionProvider;
use errors::CoreError;
use market::polygon::PolygonClient;
use market::traits::MarketData;
use models::currency::InputCurrency;
use models::holding::{Holding, HoldingDraft, HoldingPatch, NewHolding};
use models::price::PriceMap;
use models::session::Session;
use models::settings::Settings;
use models::valuation::{DisplayRow, PortfolioTotals, Valuation};
use services::price_fetch::{distinct_tickers, PriceFetcher};
use services::ticker_check::TickerValidator;
use services::valuation::value_portfolio;
use store::rest::RestHoldingsStore;
use store::traits::HoldingsStore;

/// Main entry point for the portfolio tracker core.
///
/// Owns the trait-object clients for market data, the holdings store, and
/// the session provider, plus the in-memory render state of one browser
/// session's portfolio view: the last-fetched holdings, the price map,
/// the display FX rate, and the computed valuation.
///
/// All state is confined to this one value; there is no process-wide
/// client handle. The session is resolved from the provider and passed
/// explicitly into every store call.
#[must_use]
pub struct PortfolioTracker {
    settings: Settings,
    auth: Arc<dyn SessionProvider>,
    store: Arc<dyn HoldingsStore>,
    market: Arc<dyn MarketData>,
    fetcher: PriceFetcher,
    ticker_check: Arc<TickerValidator>,
    holdings: Vec<Holding>,
    prices: PriceMap,
    display_fx_rate: f64,
    valuation: Valuation,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.holdings.len())
            .field("display_currency", &self.settings.display_currency)
            .field("display_fx_rate", &self.display_fx_rate)
            .finish()
    }
}

impl PortfolioTracker {
    /// Build a tracker from explicit clients. Tests inject mocks here.
    ///
    /// `settings.display_currency` is taken as the initial display
    /// currency with a rate of 1.0; for a non-USD start the host should
    /// call [`set_display_currency`](Self::set_display_currency) once
    /// after construction to fetch the actual rate.
    pub fn new(
        settings: Settings,
        auth: Arc<dyn SessionProvider>,
        store: Arc<dyn HoldingsStore>,
        market: Arc<dyn MarketData>,
    ) -> Self {
        let fetcher = PriceFetcher::new(market.clone(), settings.pacing);
        let ticker_check = Arc::new(TickerValidator::new(
            market.clone(),
            settings.ticker_settle,
        ));
        Self {
            settings,
            auth,
            store,
            market,
            fetcher,
            ticker_check,
            holdings: Vec::new(),
            prices: PriceMap::new(),
            display_fx_rate: 1.0,
            valuation: Valuation::default(),
        }
    }

    /// Build a tracker with the production HTTP clients configured from
    /// `settings`.
    pub fn with_default_clients(settings: Settings, auth: Arc<dyn SessionProvider>) -> Self {
        let market: Arc<dyn MarketData> = Arc::new(PolygonClient::new(&settings.market));
        let store: Arc<dyn HoldingsStore> = Arc::new(RestHoldingsStore::new(&settings.store));
        Self::new(settings, auth, store, market)
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Full refresh sequence: load holdings for the current user, sweep
    /// previous-close prices for the distinct tickers, recompute the
    /// valuation, and replace the displayed rows.
    ///
    /// Individual price failures degrade to missing prices; only a store
    /// or session failure aborts the refresh.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let session = self.session().await?;
        let holdings = self.store.list(&session).await?;

        let tickers = distinct_tickers(&holdings);
        let prices = self.fetcher.fetch_previous_closes(&tickers).await;

        self.holdings = holdings;
        self.prices = prices;
        self.revalue();
        Ok(())
    }

    // ── Display currency ────────────────────────────────────────────

    /// Switch the currency portfolio totals are displayed in.
    ///
    /// Display-only: stored prices stay in USD. Fetches a single FX rate
    /// (none for USD) and recomputes the valuation from the cached
    /// holdings and prices, with no price re-fetch. On FX failure the
    /// previous display state is kept and the error returned.
    pub async fn set_display_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let code = currency.trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::Validation {
                field: "currency",
                message: format!(
                    "invalid currency code '{currency}': must be exactly 3 ASCII letters"
                ),
            });
        }

        let rate = self.market.fx_rate("USD", &code).await?;
        self.settings.display_currency = code;
        self.display_fx_rate = rate;
        self.revalue();
        Ok(())
    }

    // ── Add-holding flow ────────────────────────────────────────────

    /// The ticker field validator backing the add-holding form. The host
    /// drives it directly: `note_edit` + `run` on field changes, and
    /// `check_now` from the check button.
    pub fn ticker_check(&self) -> Arc<TickerValidator> {
        self.ticker_check.clone()
    }

    /// Submit the add-holding form.
    ///
    /// Blocked unless the draft passes field validation and the ticker
    /// validator is in the Valid state. An EUR price is converted to the
    /// canonical USD storage price at the current EUR→USD rate; an FX
    /// failure aborts the submission. An insert failure is surfaced and
    /// leaves the form state intact; on success the validator is reset
    /// and a full refresh runs.
    pub async fn add_holding(&mut self, draft: &HoldingDraft) -> Result<Holding, CoreError> {
        draft.validate()?;
        if !self.ticker_check.state().is_valid() {
            return Err(CoreError::Validation {
                field: "ticker",
                message: "ticker must be verified before submitting".into(),
            });
        }
        let purchase_date = draft.purchase_date.ok_or(CoreError::Validation {
            field: "purchase_date",
            message: "purchase date is required".into(),
        })?;

        let session = self.session().await?;

        let purchase_price_usd = match draft.currency {
            InputCurrency::Usd => draft.price,
            InputCurrency::Eur => {
                let rate = self.market.fx_rate("EUR", "USD").await?;
                draft.price * rate
            }
        };

        let inserted = self
            .store
            .insert(
                &session,
                NewHolding {
                    user_id: session.user_id,
                    ticker: draft.normalized_ticker(),
                    quantity: draft.quantity,
                    purchase_price_usd,
                    purchase_date,
                },
            )
            .await?;

        self.ticker_check.reset();
        self.refresh().await?;
        Ok(inserted)
    }

    // ── Edit / Delete ───────────────────────────────────────────────

    /// Apply a partial update to a holding, then re-run the full refresh.
    /// Patch prices are already USD; the edit form does not re-convert.
    pub async fn update_holding(&mut self, id: Uuid, patch: HoldingPatch) -> Result<(), CoreError> {
        patch.validate()?;
        let session = self.session().await?;
        self.store.update(&session, id, patch).await?;
        self.refresh().await
    }

    /// Delete a holding, then re-run the full refresh.
    pub async fn delete_holding(&mut self, id: Uuid) -> Result<(), CoreError> {
        let session = self.session().await?;
        self.store.delete(&session, id).await?;
        self.refresh().await
    }

    // ── Session ─────────────────────────────────────────────────────

    /// End the current session and drop all cached portfolio state.
    pub async fn sign_out(&mut self) -> Result<(), CoreError> {
        self.auth.sign_out().await?;
        self.holdings.clear();
        self.prices.clear();
        self.valuation = Valuation::default();
        Ok(())
    }

    async fn session(&self) -> Result<Session, CoreError> {
        self.auth
            .current_session()
            .await?
            .ok_or(CoreError::SignedOut)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The rows of the portfolio table, as of the last refresh.
    #[must_use]
    pub fn rows(&self) -> &[DisplayRow] {
        &self.valuation.rows
    }

    /// Aggregate totals in the display currency.
    #[must_use]
    pub fn totals(&self) -> &PortfolioTotals {
        &self.valuation.totals
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    #[must_use]
    pub fn prices(&self) -> &PriceMap {
        &self.prices
    }

    #[must_use]
    pub fn display_currency(&self) -> &str {
        &self.settings.display_currency
    }

    #[must_use]
    pub fn display_fx_rate(&self) -> f64 {
        self.display_fx_rate
    }

    // ── Internal ────────────────────────────────────────────────────

    fn revalue(&mut self) {
        self.valuation = value_portfolio(&self.holdings, &self.prices, self.display_fx_rate);
    }
}
