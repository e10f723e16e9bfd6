use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingPatch, NewHolding};
use crate::models::session::Session;

/// Trait abstraction for the managed holdings store.
///
/// Every call takes the session explicitly: the store client holds no
/// ambient user state, so the same client serves any number of sessions
/// and tests can exercise it without global setup.
///
/// The store owns the rows; this crate only ever holds a transient copy
/// per fetch.
#[async_trait]
pub trait HoldingsStore: Send + Sync {
    /// All holdings owned by the session's user, ordered by ticker.
    async fn list(&self, session: &Session) -> Result<Vec<Holding>, CoreError>;

    /// Insert a new holding and return it with its store-assigned id.
    async fn insert(&self, session: &Session, holding: NewHolding) -> Result<Holding, CoreError>;

    /// Apply a partial update to the holding with the given id.
    async fn update(
        &self,
        session: &Session,
        id: Uuid,
        patch: HoldingPatch,
    ) -> Result<(), CoreError>;

    /// Delete the holding with the given id.
    async fn delete(&self, session: &Session, id: Uuid) -> Result<(), CoreError>;
}
