pub mod auth;
pub mod date;
pub mod entry;
pub mod user;

use crate::model::user::InvalidUsernameError;
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    Username(#[from] InvalidUsernameError),
}
