//! [`Poi`] definitions.

use std::str::FromStr;

use common::define_kind;
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::Location;

/// Point of interest shown on the map.
///
/// Purely presentational reference data, managed by the back office.
#[derive(Clone, Debug)]
pub struct Poi {
    /// ID of this [`Poi`].
    pub id: Id,

    /// [`Name`] of this [`Poi`].
    pub name: Name,

    /// [`Kind`] of this [`Poi`].
    pub kind: Kind,

    /// [`Icon`] this [`Poi`] is rendered with.
    pub icon: Icon,

    /// Geographic [`Location`] of this [`Poi`].
    pub location: Location,

    /// [`Description`] of this [`Poi`], if any.
    pub description: Option<Description>,
}

/// ID of a [`Poi`].
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

/// Name of a [`Poi`].
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

/// Icon identifier of a [`Poi`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Icon(String);

impl Icon {
    /// Creates a new [`Icon`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `icon` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(icon: impl Into<String>) -> Self {
        Self(icon.into())
    }

    /// Creates a new [`Icon`] if the given `icon` is valid.
    #[must_use]
    pub fn new(icon: impl Into<String>) -> Option<Self> {
        let icon = icon.into();
        Self::check(&icon).then_some(Self(icon))
    }

    /// Checks whether the given `icon` is a valid [`Icon`].
    fn check(icon: impl AsRef<str>) -> bool {
        let icon = icon.as_ref();
        icon.trim() == icon && !icon.is_empty() && icon.len() <= 64
    }
}

impl FromStr for Icon {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Icon`")
    }
}

/// Description of a [`Poi`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        !description.trim().is_empty() && description.len() <= 2048
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Poi`]."]
    enum Kind {
        #[doc = "A beach."]
        Beach = 1,

        #[doc = "A park."]
        Park = 2,

        #[doc = "A hospital."]
        Hospital = 3,

        #[doc = "A school."]
        School = 4,

        #[doc = "A shopping center."]
        Shopping = 5,

        #[doc = "A marina."]
        Marina = 6,
    }
}
