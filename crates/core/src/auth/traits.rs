use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::session::Session;

/// Trait abstraction for the external identity/session provider.
///
/// Authentication itself (sign-in flows, cookie persistence, token
/// refresh) lives entirely outside this crate. The core only consumes the
/// current session's user id as the owner key for store calls, and gates
/// every operation on a session being present.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when nobody is signed in.
    async fn current_session(&self) -> Result<Option<Session>, CoreError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), CoreError>;
}
