use crate::server::{Result, ServerRouter};
use crate::server::{auth::AuthenticatedUser, json::Json};
use axum::Router;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Serialize;
use weeklog_common::model::user::Username;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(user_me)
}

#[derive(TypedPath)]
#[typed_path("/api/user/me")]
struct UserMePath;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct UserMeResponse {
    username: Username,
}

async fn user_me(_: UserMePath, user: AuthenticatedUser) -> Result<Json<UserMeResponse>> {
    Ok(Json(UserMeResponse {
        username: user.into_username(),
    }))
}
