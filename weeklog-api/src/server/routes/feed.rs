use crate::server::feed::{RecentFeedItem, build_recent_feed};
use crate::server::{Result, ServerRouter, json::Json};
use axum::{Router, extract::State};
use axum_extra::routing::{RouterExt, TypedPath};
use std::sync::Arc;
use weeklog_db::store::Datastore;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(recent_entries)
}

#[derive(TypedPath)]
#[typed_path("/api/recentEntries")]
struct RecentEntriesPath;

async fn recent_entries(
    _: RecentEntriesPath,
    State(datastore): State<Arc<dyn Datastore>>,
) -> Result<Json<Vec<RecentFeedItem>>> {
    let feed = build_recent_feed(datastore.as_ref()).await?;

    Ok(Json(feed))
}
