use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::Display;
use thiserror::Error;

pub const USERNAME_MAX_LEN: usize = 50;

/// Opaque identity key for a journal author.
///
/// Usernames are non-empty, at most [`USERNAME_MAX_LEN`] characters, and
/// restricted to ASCII alphanumerics plus `-` and `_`. The literal string
/// `"undefined"` is rejected outright: a broken JavaScript client sends it
/// when its username variable was never set.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The username is invalid: {0:?}")]
pub struct InvalidUsernameError(String);

impl Username {
    pub fn new(username: String) -> Result<Self, InvalidUsernameError> {
        let acceptable = !username.is_empty()
            && username.chars().count() <= USERNAME_MAX_LEN
            && username != "undefined"
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if acceptable {
            Ok(Username(username))
        } else {
            Err(InvalidUsernameError(username))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Username::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Username"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::user::{USERNAME_MAX_LEN, Username};

    #[test]
    fn accepts_ordinary_usernames() {
        for name in ["alice", "bob-42", "under_score", "X"] {
            assert!(Username::new(name.to_owned()).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_bad_usernames() {
        let too_long = "a".repeat(USERNAME_MAX_LEN + 1);
        for name in ["", "undefined", "has space", "semi;colon", too_long.as_str()] {
            assert!(Username::new(name.to_owned()).is_err(), "{name:?}");
        }
    }

    #[test]
    fn max_length_username_is_accepted() {
        let name = "a".repeat(USERNAME_MAX_LEN);
        assert!(Username::new(name).is_ok());
    }
}
