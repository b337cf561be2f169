//! Investment analysis over [`Plot`]s.
//!
//! Everything in here is a pure, synchronous function of its inputs:
//! derived metrics and scores, market-wide aggregation, and the catalog
//! filter/sort pipeline. Callers may memoize any of it keyed by the input
//! set and parameters. No function in this module panics on degenerate
//! input: empty sets and zero denominators resolve to sentinels.
//!
//! [`Plot`]: crate::domain::Plot

pub mod catalog;
pub mod market;
pub mod mortgage;
pub mod score;
pub mod shortlist;

pub use self::{
    catalog::{Filter, SortKey},
    market::{CityStats, Histogram, Summary},
    score::{Grade, Heat, Ripeness, Score},
    shortlist::{CompareSet, Favorites},
};
