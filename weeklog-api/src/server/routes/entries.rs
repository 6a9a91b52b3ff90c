use crate::server::{Result, ServerError, ServerRouter, ServerState};
use crate::server::{auth::AuthenticatedUser, json::Json};
use axum::{Router, extract::State};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use weeklog_common::model::{date::EntryDate, entry::Entry, user::Username};
use weeklog_db::store::Datastore;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(get_entries).typed_post(submit)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/entries/{username}", rejection(ServerError))]
struct GetEntriesPath {
    username: Username,
}

async fn get_entries(
    GetEntriesPath { username }: GetEntriesPath,
    State(datastore): State<Arc<dyn Datastore>>,
) -> Result<Json<Vec<Entry>>> {
    let entries = datastore.all_entries(&username).await?;

    Ok(Json(entries))
}

#[derive(TypedPath)]
#[typed_path("/api/submit")]
struct SubmitPath;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct SubmitRequest {
    date: String,
    markdown: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct SubmitResponse {
    ok: bool,
    path: String,
}

#[axum::debug_handler(state = ServerState)]
async fn submit(
    _: SubmitPath,
    user: AuthenticatedUser,
    State(datastore): State<Arc<dyn Datastore>>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>> {
    let now = OffsetDateTime::now_utc();

    let date: EntryDate = request
        .date
        .parse()
        .map_err(|_| ServerError::IneligibleDate(request.date.clone()))?;
    if !date.is_eligible(now.date()) {
        return Err(ServerError::IneligibleDate(request.date));
    }

    let entry = Entry {
        author: user.into_username(),
        date,
        last_modified: now,
        markdown: request.markdown,
    };
    datastore.insert_entry(&entry).await?;

    Ok(Json(SubmitResponse {
        ok: true,
        path: format!("/{}/{}", entry.author, entry.date),
    }))
}
