use crate::record::{AuthRecord, EntryRecord};
use crate::store::{AuthError, Authenticator, Datastore, DbError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, query, query_as, query_scalar};
use time::OffsetDateTime;
use weeklog_common::model::{
    ModelValidationError, auth::AuthToken, entry::Entry, user::Username,
};

/// Postgres-backed implementation of both service capabilities.
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Datastore for DbClient {
    async fn users(&self) -> Result<Vec<Username>> {
        let usernames: Vec<String> = query_scalar(
            "
            SELECT username
            FROM users
            ORDER BY username
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        usernames
            .into_iter()
            .map(|username| Ok(Username::new(username).map_err(ModelValidationError::from)?))
            .collect()
    }

    async fn all_entries(&self, username: &Username) -> Result<Vec<Entry>> {
        let records: Vec<EntryRecord> = query_as(
            "
            SELECT author, entry_date, last_modified, markdown
            FROM entries
            WHERE author = $1
            ORDER BY entry_date
            ",
        )
        .bind(username.get())
        .fetch_all(&self.pool)
        .await?;

        records
            .into_iter()
            .map(|record| Ok(Entry::try_from(record)?))
            .collect()
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<()> {
        query(
            "
            INSERT INTO entries (author, entry_date, last_modified, markdown)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (author, entry_date)
            DO UPDATE SET last_modified = EXCLUDED.last_modified,
                          markdown = EXCLUDED.markdown
            ",
        )
        .bind(entry.author.get())
        .bind(entry.date.get())
        .bind(entry.last_modified)
        .bind(&entry.markdown)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Authenticator for DbClient {
    async fn user_from_token(&self, token: &str) -> Result<Username, AuthError> {
        let token: AuthToken = token.parse()?;
        let token_hash = token.hash()?;

        let record: Option<AuthRecord> = query_as(
            "
            SELECT username, expires_at
            FROM auth_tokens
            WHERE token_hash = $1
            ",
        )
        .bind(token_hash.0.as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        let record = record.ok_or(AuthError::InvalidToken)?;

        if record.username != token.username.get() {
            return Err(AuthError::InvalidToken);
        }

        if let Some(expires_at) = record.expires_at
            && expires_at < OffsetDateTime::now_utc()
        {
            return Err(AuthError::InvalidToken);
        }

        Ok(token.username)
    }
}
