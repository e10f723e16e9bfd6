use uuid::Uuid;

/// The identity context the core consumes from the external session
/// provider. Passed explicitly into every store call, so there is no
/// process-wide implicit client handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owner key for holdings queries and inserts
    pub user_id: Uuid,

    /// Bearer token forwarded to the managed store
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }
}
