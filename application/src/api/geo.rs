//! Geographic GraphQL definitions.

use juniper::{GraphQLInputObject, GraphQLObject};
use service::domain::geo;

use crate::api::scalar;

/// Geographic point in decimal degrees.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "Location")]
pub struct Location {
    /// Latitude of this `Location`.
    pub latitude: scalar::Decimal,

    /// Longitude of this `Location`.
    pub longitude: scalar::Decimal,
}

impl From<geo::Location> for Location {
    fn from(location: geo::Location) -> Self {
        Self {
            latitude: location.latitude.into(),
            longitude: location.longitude.into(),
        }
    }
}

/// Geographic point in decimal degrees.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "LocationInput")]
pub struct LocationInput {
    /// Latitude of the point.
    pub latitude: scalar::Decimal,

    /// Longitude of the point.
    pub longitude: scalar::Decimal,
}

impl From<LocationInput> for geo::Location {
    fn from(input: LocationInput) -> Self {
        Self {
            latitude: input.latitude.into(),
            longitude: input.longitude.into(),
        }
    }
}

/// Rectangular geographic viewport.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ViewportInput")]
pub struct ViewportInput {
    /// Southern boundary of the viewport.
    pub south: scalar::Decimal,

    /// Western boundary of the viewport.
    pub west: scalar::Decimal,

    /// Northern boundary of the viewport.
    pub north: scalar::Decimal,

    /// Eastern boundary of the viewport.
    pub east: scalar::Decimal,
}

impl From<ViewportInput> for geo::Viewport {
    fn from(input: ViewportInput) -> Self {
        Self {
            south: input.south.into(),
            west: input.west.into(),
            north: input.north.into(),
            east: input.east.into(),
        }
    }
}
