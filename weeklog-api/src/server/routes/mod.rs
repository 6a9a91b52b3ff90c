use crate::server::ServerRouter;
use axum::Router;

mod entries;
mod feed;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(entries::routes())
        .merge(feed::routes())
        .merge(users::routes())
}
