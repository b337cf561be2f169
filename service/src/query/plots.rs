//! [`Query`] collection related to the multiple [`Plot`]s.

use common::operations::By;

use crate::{domain::Plot, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Plot`]s.
pub type List =
    DatabaseQuery<By<read::plot::list::Page, read::plot::list::Selector>>;

/// Queries total count of [`Plot`] list items.
pub type TotalCount = DatabaseQuery<By<read::plot::list::TotalCount, ()>>;

/// Queries the whole-catalog snapshot the analysis pipeline runs over.
pub type Snapshot =
    DatabaseQuery<By<Vec<Plot>, read::plot::snapshot::Filter>>;
