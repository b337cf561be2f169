//! [`Query`] collection related to a single [`Plot`].

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{plot, Plot};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Plot`] by its [`plot::Id`].
pub type ById = DatabaseQuery<By<Option<Plot>, plot::Id>>;

/// Queries a set of [`Plot`]s by their [`plot::Id`]s.
///
/// Feeds the comparison view, which resolves a shortlist of IDs at once.
pub type ByIds =
    DatabaseQuery<By<HashMap<plot::Id, Plot>, Vec<plot::Id>>>;
