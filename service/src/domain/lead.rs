//! [`Lead`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{plot, user};

/// Contact request captured from a visitor.
///
/// A [`Lead`] is never deleted by the normal flow: its [`Status`] is the
/// only thing the back office mutates, and its [`Note`] history is
/// append-only.
#[derive(Clone, Debug)]
pub struct Lead {
    /// ID of this [`Lead`].
    pub id: Id,

    /// [`Plot`] this [`Lead`] is interested in, if any.
    ///
    /// [`Plot`]: plot::Plot
    pub plot: Option<plot::Id>,

    /// [`Name`] the visitor introduced themselves with.
    pub name: Name,

    /// [`Phone`] to reach the visitor at.
    ///
    /// [`Phone`]: user::Phone
    pub phone: user::Phone,

    /// [`Email`] of the visitor, if provided.
    ///
    /// [`Email`]: user::Email
    pub email: Option<user::Email>,

    /// Free-form [`Message`] left by the visitor, if any.
    pub message: Option<Message>,

    /// Processing [`Status`] of this [`Lead`].
    pub status: Status,

    /// [`Note`]s accumulated while working this [`Lead`].
    pub notes: Vec<Note>,

    /// [`DateTime`] when this [`Lead`] was captured.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Lead`] was last updated.
    pub updated_at: UpdateDateTime,
}

/// ID of a [`Lead`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// Name a [`Lead`] introduced themselves with.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Free-form message left by a [`Lead`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `message` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Creates a new [`Message`] if the given `message` is valid.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        Self::check(&message).then_some(Self(message))
    }

    /// Checks whether the given `message` is a valid [`Message`].
    fn check(message: impl AsRef<str>) -> bool {
        let message = message.as_ref();
        !message.trim().is_empty() && message.len() <= 4096
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// Note left on a [`Lead`] by the back office.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `note` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        Self::check(&note).then_some(Self(note))
    }

    /// Checks whether the given `note` is a valid [`Note`].
    fn check(note: impl AsRef<str>) -> bool {
        let note = note.as_ref();
        !note.trim().is_empty() && note.len() <= 1024
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

define_kind! {
    #[doc = "Processing status of a [`Lead`]."]
    enum Status {
        #[doc = "Captured, not yet worked."]
        New = 1,

        #[doc = "Contacted by the back office."]
        Contacted = 2,

        #[doc = "Qualified as a serious buyer."]
        Qualified = 3,

        #[doc = "Converted into a sale."]
        Converted = 4,

        #[doc = "Lost."]
        Lost = 5,
    }
}

/// [`DateTime`] when a [`Lead`] was captured.
pub type CreationDateTime = DateTimeOf<(Lead, unit::Creation)>;

/// [`DateTime`] when a [`Lead`] was last updated.
pub type UpdateDateTime = DateTimeOf<(Lead, unit::Update)>;
