//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// User session.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`user::Role`] of the [`User`] this [`Session`] belongs to.
    ///
    /// Carried in the claims, so permission gating needs no extra lookup.
    #[serde(with = "role")]
    pub role: user::Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

mod role {
    //! Serialization of [`user::Role`] claims by their names.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

    use crate::domain::user;

    /// Serializes the [`user::Role`] as its name.
    pub(super) fn serialize<S: Serializer>(
        role: &user::Role,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&role.to_string())
    }

    /// Deserializes a [`user::Role`] from its name.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<user::Role, D::Error> {
        let name = String::deserialize(deserializer)?;
        user::Role::from_str(&name).map_err(D::Error::custom)
    }
}
