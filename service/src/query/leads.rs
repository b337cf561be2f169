//! [`Query`] collection related to the multiple [`Lead`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Lead, Query};

use super::DatabaseQuery;

/// Queries a list of [`Lead`]s.
pub type List =
    DatabaseQuery<By<read::lead::list::Page, read::lead::list::Selector>>;

/// Queries total count of [`Lead`] list items.
pub type TotalCount = DatabaseQuery<By<read::lead::list::TotalCount, ()>>;
