use crate::model::{date::EntryDate, user::Username};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One weekly journal submission, keyed by (`author`, `date`).
///
/// `author` and `date` never change once the entry is stored; editing an
/// entry rewrites `markdown` in place and bumps `last_modified`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub author: Username,
    pub date: EntryDate,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
    pub markdown: String,
}
