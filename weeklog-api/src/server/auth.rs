use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use weeklog_common::model::user::Username;
use weeklog_db::store::Authenticator;

type AuthorizationHeader = TypedHeader<Authorization<Bearer>>;

/// The user a request's bearer token resolves to.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct AuthenticatedUser {
    username: Username,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn into_username(self) -> Username {
        self.username
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<dyn Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = AuthorizationHeader::from_request_parts(parts, state)
            .await
            .map_err(ServerError::InvalidAuthorizationHeader)?;

        let username = Arc::<dyn Authenticator>::from_ref(state)
            .user_from_token(bearer.token())
            .await?;

        Ok(Self { username })
    }
}
