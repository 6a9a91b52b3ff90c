use serde::Serialize;
use time::OffsetDateTime;
use weeklog_common::model::{date::EntryDate, user::Username};
use weeklog_db::store::{Datastore, DbError};

/// Entries with less markdown than this are left out of the recent feed.
/// Drops placeholder, test, and other low-effort posts.
pub const MIN_RELEVANT_MARKDOWN_LEN: usize = 30;

/// Upper bound on the recent feed's length.
pub const MAX_FEED_ENTRIES: usize = 15;

/// One entry in the cross-user recent feed.
///
/// `last_modified` only breaks ordering ties between entries sharing a
/// date; it is not part of the serialized feed.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct RecentFeedItem {
    pub author: Username,
    pub date: EntryDate,
    #[serde(skip)]
    pub last_modified: OffsetDateTime,
    pub markdown: String,
}

/// Merge every user's entries into one feed: newest date first, newer
/// edits first within a date, at most [`MAX_FEED_ENTRIES`] items.
///
/// Any datastore failure aborts the whole build; there is no partial
/// feed.
pub async fn build_recent_feed(datastore: &dyn Datastore) -> Result<Vec<RecentFeedItem>, DbError> {
    let users = datastore.users().await?;

    let mut items = Vec::new();
    for username in users {
        let entries = datastore.all_entries(&username).await?;

        for entry in entries {
            if entry.markdown.len() < MIN_RELEVANT_MARKDOWN_LEN {
                continue;
            }
            items.push(RecentFeedItem {
                author: entry.author,
                date: entry.date,
                last_modified: entry.last_modified,
                markdown: entry.markdown,
            });
        }
    }

    items.sort_by(|a, b| (a.date, a.last_modified).cmp(&(b.date, b.last_modified)));
    items.reverse();
    items.truncate(MAX_FEED_ENTRIES);

    Ok(items)
}

#[cfg(test)]
mod tests {
    use crate::server::feed::{MAX_FEED_ENTRIES, MIN_RELEVANT_MARKDOWN_LEN, build_recent_feed};
    use async_trait::async_trait;
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime};
    use weeklog_common::model::{
        ModelValidationError, date::EntryDate, entry::Entry, user::Username,
    };
    use weeklog_db::store::{Datastore, DbError, Result};

    struct FakeDatastore {
        entries: Vec<Entry>,
        fail_users: bool,
        fail_entries_for: Option<Username>,
    }

    impl FakeDatastore {
        fn new(entries: Vec<Entry>) -> Self {
            Self {
                entries,
                fail_users: false,
                fail_entries_for: None,
            }
        }
    }

    #[async_trait]
    impl Datastore for FakeDatastore {
        async fn users(&self) -> Result<Vec<Username>> {
            if self.fail_users {
                return Err(store_error());
            }

            let mut users = Vec::new();
            for entry in &self.entries {
                if !users.contains(&entry.author) {
                    users.push(entry.author.clone());
                }
            }
            Ok(users)
        }

        async fn all_entries(&self, username: &Username) -> Result<Vec<Entry>> {
            if self.fail_entries_for.as_ref() == Some(username) {
                return Err(store_error());
            }

            Ok(self
                .entries
                .iter()
                .filter(|entry| &entry.author == username)
                .cloned()
                .collect())
        }

        async fn insert_entry(&self, _entry: &Entry) -> Result<()> {
            Ok(())
        }
    }

    fn store_error() -> DbError {
        DbError::Data(ModelValidationError::from(
            Username::new(String::new()).unwrap_err(),
        ))
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_owned()).unwrap()
    }

    fn entry(
        author: &str,
        date: EntryDate,
        last_modified: OffsetDateTime,
        markdown: &str,
    ) -> Entry {
        Entry {
            author: username(author),
            date,
            last_modified,
            markdown: markdown.to_owned(),
        }
    }

    fn long_markdown(seed: &str) -> String {
        format!("{seed}: {}", "x".repeat(MIN_RELEVANT_MARKDOWN_LEN))
    }

    #[tokio::test]
    async fn short_markdown_is_filtered_at_the_threshold() {
        let noon = datetime!(2024-01-05 12:00 UTC);
        let datastore = FakeDatastore::new(vec![
            entry(
                "alice",
                EntryDate::new(date!(2024 - 01 - 05)),
                noon,
                &"a".repeat(MIN_RELEVANT_MARKDOWN_LEN - 1),
            ),
            entry(
                "bob",
                EntryDate::new(date!(2024 - 01 - 05)),
                noon,
                &"b".repeat(MIN_RELEVANT_MARKDOWN_LEN),
            ),
        ]);

        let feed = build_recent_feed(&datastore).await.unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].author, username("bob"));
    }

    #[tokio::test]
    async fn feed_is_ordered_newest_date_first() {
        let noon = datetime!(2024-01-12 12:00 UTC);
        let datastore = FakeDatastore::new(vec![
            entry(
                "alice",
                EntryDate::new(date!(2024 - 01 - 05)),
                noon,
                &long_markdown("older"),
            ),
            entry(
                "bob",
                EntryDate::new(date!(2024 - 01 - 12)),
                noon,
                &long_markdown("newer"),
            ),
        ]);

        let feed = build_recent_feed(&datastore).await.unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].date, EntryDate::new(date!(2024 - 01 - 12)));
        assert_eq!(feed[1].date, EntryDate::new(date!(2024 - 01 - 05)));
    }

    #[tokio::test]
    async fn date_ties_break_on_last_modified() {
        let date = EntryDate::new(date!(2024 - 01 - 05));
        let datastore = FakeDatastore::new(vec![
            entry(
                "alice",
                date,
                datetime!(2024-01-05 09:00 UTC),
                &long_markdown("earlier edit"),
            ),
            entry(
                "bob",
                date,
                datetime!(2024-01-05 17:00 UTC),
                &long_markdown("later edit"),
            ),
        ]);

        let feed = build_recent_feed(&datastore).await.unwrap();

        assert_eq!(feed[0].author, username("bob"));
        assert_eq!(feed[1].author, username("alice"));
    }

    #[tokio::test]
    async fn feed_is_truncated_to_the_most_recent_entries() {
        let first_friday = date!(2024 - 01 - 05);
        let entries: Vec<Entry> = (0..20)
            .map(|week| {
                let author = if week % 2 == 0 { "alice" } else { "bob" };
                entry(
                    author,
                    EntryDate::new(first_friday + Duration::weeks(week)),
                    datetime!(2024-01-05 12:00 UTC),
                    &long_markdown("weekly update"),
                )
            })
            .collect();
        let datastore = FakeDatastore::new(entries);

        let feed = build_recent_feed(&datastore).await.unwrap();

        assert_eq!(feed.len(), MAX_FEED_ENTRIES);
        assert_eq!(
            feed[0].date,
            EntryDate::new(first_friday + Duration::weeks(19))
        );
        assert_eq!(
            feed[MAX_FEED_ENTRIES - 1].date,
            EntryDate::new(first_friday + Duration::weeks(5))
        );
    }

    #[tokio::test]
    async fn feed_is_idempotent_for_an_unchanged_datastore() {
        let datastore = FakeDatastore::new(vec![
            entry(
                "alice",
                EntryDate::new(date!(2024 - 01 - 05)),
                datetime!(2024-01-05 09:00 UTC),
                &long_markdown("one"),
            ),
            entry(
                "bob",
                EntryDate::new(date!(2024 - 01 - 12)),
                datetime!(2024-01-12 09:00 UTC),
                &long_markdown("two"),
            ),
            entry(
                "carol",
                EntryDate::new(date!(2024 - 01 - 12)),
                datetime!(2024-01-12 10:00 UTC),
                &long_markdown("three"),
            ),
        ]);

        let first = build_recent_feed(&datastore).await.unwrap();
        let second = build_recent_feed(&datastore).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_datastore_yields_an_empty_feed() {
        let datastore = FakeDatastore::new(Vec::new());

        let feed = build_recent_feed(&datastore).await.unwrap();

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn users_fetch_failure_aborts_the_feed() {
        let mut datastore = FakeDatastore::new(vec![entry(
            "alice",
            EntryDate::new(date!(2024 - 01 - 05)),
            datetime!(2024-01-05 12:00 UTC),
            &long_markdown("fine"),
        )]);
        datastore.fail_users = true;

        assert!(build_recent_feed(&datastore).await.is_err());
    }

    #[tokio::test]
    async fn single_user_fetch_failure_aborts_the_feed() {
        let noon = datetime!(2024-01-05 12:00 UTC);
        let mut datastore = FakeDatastore::new(vec![
            entry(
                "alice",
                EntryDate::new(date!(2024 - 01 - 05)),
                noon,
                &long_markdown("fine"),
            ),
            entry(
                "bob",
                EntryDate::new(date!(2024 - 01 - 05)),
                noon,
                &long_markdown("also fine"),
            ),
        ]);
        datastore.fail_entries_for = Some(username("bob"));

        assert!(build_recent_feed(&datastore).await.is_err());
    }

    #[tokio::test]
    async fn feed_items_serialize_without_last_modified() {
        let datastore = FakeDatastore::new(vec![entry(
            "alice",
            EntryDate::new(date!(2024 - 01 - 05)),
            datetime!(2024-01-05 12:00 UTC),
            &long_markdown("serialized"),
        )]);

        let feed = build_recent_feed(&datastore).await.unwrap();
        let json = serde_json::to_value(&feed[0]).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys, ["author", "date", "markdown"]);
    }
}
