//! [`Poi`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A point of interest shown on the map.
#[derive(Clone, Debug, From)]
pub struct Poi(domain::Poi);

/// A point of interest shown on the map.
#[graphql_object(context = Context)]
impl Poi {
    /// Unique identifier of this `Poi`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Poi`.
    #[must_use]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Kind of this `Poi`.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Icon this `Poi` is rendered with.
    #[must_use]
    pub fn icon(&self) -> Icon {
        self.0.icon.clone().into()
    }

    /// Geographic location of this `Poi`.
    #[must_use]
    pub fn location(&self) -> api::geo::Location {
        self.0.location.into()
    }

    /// Description of this `Poi`, if any.
    #[must_use]
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }
}

/// Unique identifier of a `Poi`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::poi::Id)]
#[into(domain::poi::Id)]
#[graphql(name = "PoiId", transparent)]
pub struct Id(Uuid);

/// Name of a `Poi`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PoiName",
    with = scalar::Via::<domain::poi::Name>,
)]
pub struct Name(domain::poi::Name);

/// Icon identifier of a `Poi`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PoiIcon",
    with = scalar::Via::<domain::poi::Icon>,
)]
pub struct Icon(domain::poi::Icon);

/// Description of a `Poi`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PoiDescription",
    with = scalar::Via::<domain::poi::Description>,
)]
pub struct Description(domain::poi::Description);

/// Kind of a `Poi`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PoiKind")]
pub enum Kind {
    /// A beach.
    Beach,

    /// A park.
    Park,

    /// A hospital.
    Hospital,

    /// A school.
    School,

    /// A shopping center.
    Shopping,

    /// A marina.
    Marina,
}

impl From<domain::poi::Kind> for Kind {
    fn from(kind: domain::poi::Kind) -> Self {
        use domain::poi::Kind as K;
        match kind {
            K::Beach => Self::Beach,
            K::Park => Self::Park,
            K::Hospital => Self::Hospital,
            K::School => Self::School,
            K::Shopping => Self::Shopping,
            K::Marina => Self::Marina,
        }
    }
}

impl From<Kind> for domain::poi::Kind {
    fn from(kind: Kind) -> Self {
        use Kind as K;
        match kind {
            K::Beach => Self::Beach,
            K::Park => Self::Park,
            K::Hospital => Self::Hospital,
            K::School => Self::School,
            K::Shopping => Self::Shopping,
            K::Marina => Self::Marina,
        }
    }
}
