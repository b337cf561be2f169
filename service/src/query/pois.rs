//! [`Query`] collection related to the multiple [`Poi`]s.

use common::operations::By;

use crate::domain::Poi;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Poi`]s.
///
/// Reference data is small and map overlays need it whole, so there is no
/// pagination here.
pub type All = DatabaseQuery<By<Vec<Poi>, ()>>;
