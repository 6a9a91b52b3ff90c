use async_trait::async_trait;
use thiserror::Error;
use weeklog_common::model::{
    ModelValidationError,
    auth::{AuthTokenDecodeError, AuthTokenHashError},
    entry::Entry,
    user::Username,
};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("The provided auth token could not be decoded: {0}")]
    Decode(#[from] AuthTokenDecodeError),
    #[error("The auth token could not be hashed: {0}")]
    Hash(#[from] AuthTokenHashError),
    #[error("Provided token was invalid")]
    InvalidToken,
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Storage capability for journal entries.
///
/// The rest of the service only ever reads and projects entries; the
/// datastore owns them and enforces the one-entry-per-author-per-date
/// invariant on write.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Every username known to the service.
    async fn users(&self) -> Result<Vec<Username>>;

    /// The full entry collection of one user. Unknown users yield an
    /// empty collection, not an error.
    async fn all_entries(&self, username: &Username) -> Result<Vec<Entry>>;

    /// Insert an entry, or rewrite its markdown and `last_modified` if an
    /// entry for (`author`, `date`) already exists.
    async fn insert_entry(&self, entry: &Entry) -> Result<()>;
}

/// Token verification capability.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer token string to the user it belongs to.
    async fn user_from_token(&self, token: &str) -> Result<Username, AuthError>;
}
