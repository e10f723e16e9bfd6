use log::warn;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::market::traits::MarketData;

/// Validation state of the ticker field in the add-holding form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerState {
    /// Nothing entered, or the field was cleared
    Unchecked,
    /// A lookup is in flight
    Checking,
    /// The symbol exists; display name recorded when the API provides one
    Valid { name: Option<String> },
    /// The symbol is unknown, or the lookup failed
    Invalid { error: String },
}

impl TickerState {
    pub fn is_valid(&self) -> bool {
        matches!(self, TickerState::Valid { .. })
    }
}

/// Token for a scheduled ticker check. Each field edit rotates the
/// validator's generation, so a token from an earlier edit resolves as a
/// no-op.
#[derive(Debug)]
pub struct PendingCheck {
    symbol: String,
    generation: u64,
}

/// Debounced ticker validation as one cancellable asynchronous operation.
///
/// Every edit of the ticker field calls [`note_edit`](Self::note_edit);
/// the returned token is resolved with [`run`](Self::run), which waits out
/// the settle delay before performing the lookup. An edit made while a
/// token is settling (or while its lookup is in flight) supersedes it, so
/// at most one lookup result ever lands: the one for the latest input.
/// The check button bypasses the delay via [`check_now`](Self::check_now).
pub struct TickerValidator {
    market: Arc<dyn MarketData>,
    settle: Duration,
    generation: AtomicU64,
    state: Mutex<TickerState>,
}

impl TickerValidator {
    pub fn new(market: Arc<dyn MarketData>, settle: Duration) -> Self {
        Self {
            market,
            settle,
            generation: AtomicU64::new(0),
            state: Mutex::new(TickerState::Unchecked),
        }
    }

    /// Current state of the ticker field.
    pub fn state(&self) -> TickerState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Record a field edit. Cancels any pending check. An empty input
    /// resets to `Unchecked` (clearing errors) and schedules nothing;
    /// otherwise the returned token should be passed to [`run`](Self::run).
    pub fn note_edit(&self, input: &str) -> Option<PendingCheck> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            self.set_state(TickerState::Unchecked);
            return None;
        }
        Some(PendingCheck { symbol, generation })
    }

    /// Reset the field to `Unchecked`, cancelling any pending check.
    /// Called when the form is cleared after a successful submission.
    pub fn reset(&self) {
        let _ = self.note_edit("");
    }

    /// Wait out the settle delay, then perform the lookup, unless a later
    /// edit has superseded this token. Returns the state after resolution.
    pub async fn run(&self, pending: PendingCheck) -> TickerState {
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }
        self.finish(pending).await
    }

    /// Check immediately, pre-empting any pending debounced check.
    pub async fn check_now(&self, input: &str) -> TickerState {
        match self.note_edit(input) {
            Some(pending) => self.finish(pending).await,
            None => self.state(),
        }
    }

    async fn finish(&self, pending: PendingCheck) -> TickerState {
        if self.is_superseded(pending.generation) {
            return self.state();
        }
        self.set_state(TickerState::Checking);

        let result = self.market.lookup_ticker(&pending.symbol).await;

        // The user may have kept typing while the request was in flight;
        // a stale result must not clobber the newer check's state.
        if self.is_superseded(pending.generation) {
            return self.state();
        }

        let state = match result {
            Ok(lookup) if lookup.exists => TickerState::Valid { name: lookup.name },
            Ok(_) => TickerState::Invalid {
                error: format!("Ticker '{}' not found", pending.symbol),
            },
            Err(e) => {
                warn!("ticker lookup for {} failed: {e}", pending.symbol);
                TickerState::Invalid {
                    error: format!("Could not verify ticker '{}'", pending.symbol),
                }
            }
        };
        self.set_state(state.clone());
        state
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn set_state(&self, state: TickerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}
