//! Geographic primitives.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Location {
    /// Latitude of this [`Location`].
    pub latitude: Decimal,

    /// Longitude of this [`Location`].
    pub longitude: Decimal,
}

impl Location {
    /// Returns the squared planar distance to the `other` [`Location`].
    ///
    /// Good enough for ordering nearby points, not for measuring: at the
    /// scale of a single coastal region the equirectangular error is
    /// negligible, and ordering only needs monotonicity.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> Decimal {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        dlat * dlat + dlon * dlon
    }
}

/// Rectangular geographic viewport.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Viewport {
    /// Southern boundary of this [`Viewport`].
    pub south: Decimal,

    /// Western boundary of this [`Viewport`].
    pub west: Decimal,

    /// Northern boundary of this [`Viewport`].
    pub north: Decimal,

    /// Eastern boundary of this [`Viewport`].
    pub east: Decimal,
}

impl Viewport {
    /// Indicates whether the provided [`Location`] lies inside this
    /// [`Viewport`].
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        location.latitude >= self.south
            && location.latitude <= self.north
            && location.longitude >= self.west
            && location.longitude <= self.east
    }
}

#[cfg(test)]
mod spec {
    use super::{Location, Viewport};

    fn location(latitude: &str, longitude: &str) -> Location {
        Location {
            latitude: latitude.parse().unwrap(),
            longitude: longitude.parse().unwrap(),
        }
    }

    #[test]
    fn viewport_contains_inner_and_boundary_points() {
        let viewport = Viewport {
            south: "32.0".parse().unwrap(),
            west: "34.5".parse().unwrap(),
            north: "32.5".parse().unwrap(),
            east: "35.0".parse().unwrap(),
        };

        assert!(viewport.contains(&location("32.25", "34.75")));
        assert!(viewport.contains(&location("32.0", "34.5")));
        assert!(!viewport.contains(&location("31.99", "34.75")));
        assert!(!viewport.contains(&location("32.25", "35.01")));
    }

    #[test]
    fn distance_squared_orders_by_proximity() {
        let origin = location("32.0", "34.8");
        let near = location("32.1", "34.8");
        let far = location("33.0", "35.5");

        assert!(
            origin.distance_squared(&near) < origin.distance_squared(&far),
        );
    }
}
