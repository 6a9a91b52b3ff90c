use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use weeklog_common::model::{
    ModelValidationError,
    date::EntryDate,
    entry::Entry,
    user::Username,
};

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub struct EntryRecord {
    pub author: String,
    pub entry_date: Date,
    pub last_modified: OffsetDateTime,
    pub markdown: String,
}

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub struct AuthRecord {
    pub username: String,
    pub expires_at: Option<OffsetDateTime>,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = ModelValidationError;

    fn try_from(value: EntryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            author: Username::new(value.author)?,
            date: EntryDate::new(value.entry_date),
            last_modified: value.last_modified,
            markdown: value.markdown,
        })
    }
}
