//! Market analytics definitions.

use common::Money;
use juniper::{graphql_object, GraphQLEnum};
use service::{analysis, domain};

use crate::{api, api::scalar, Context};

/// Result of exploring the catalog with filters applied.
///
/// Carries the visible plots together with the aggregates derived from
/// exactly that set, so the map, the summary bar, and the histogram never
/// disagree with each other.
#[derive(Clone, Debug)]
pub struct Explore {
    /// Visible [`domain::Plot`]s, in display order.
    plots: Vec<domain::Plot>,

    /// [`analysis::Summary`] of the visible plots.
    summary: Option<analysis::Summary>,

    /// [`analysis::Histogram`] of the visible plots.
    histogram: Option<analysis::Histogram>,

    /// IDs of the best-value plots among the visible ones.
    best_value: Vec<domain::plot::Id>,
}

impl Explore {
    /// Creates a new [`Explore`] result out of the visible
    /// [`domain::Plot`]s.
    #[must_use]
    pub fn new(
        plots: Vec<domain::Plot>,
        config: &analysis::score::Config,
    ) -> Self {
        let summary = analysis::Summary::of(&plots, config);
        let histogram = analysis::Histogram::of(&plots);
        let best_value = analysis::market::best_value_ids(&plots, config);
        Self {
            plots,
            summary,
            histogram,
            best_value,
        }
    }
}

/// Result of exploring the catalog with filters applied.
#[graphql_object(context = Context)]
impl Explore {
    /// Visible `Plot`s, in display order.
    #[must_use]
    pub fn plots(&self) -> Vec<api::Plot> {
        self.plots.iter().cloned().map(Into::into).collect()
    }

    /// Aggregates over the visible `Plot`s, absent when nothing matches.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.summary.map(Into::into)
    }

    /// Price distribution of the visible `Plot`s, absent when nothing
    /// matches.
    #[must_use]
    pub fn histogram(&self) -> Option<Histogram> {
        self.histogram.clone().map(Into::into)
    }

    /// IDs of the best-value `Plot`s among the visible ones.
    #[must_use]
    pub fn best_value(&self) -> Vec<api::plot::Id> {
        self.best_value.iter().copied().map(Into::into).collect()
    }
}

/// Aggregate figures over a set of `Plot`s.
#[derive(Clone, Copy, Debug, derive_more::From)]
pub struct Summary(analysis::Summary);

/// Aggregate figures over a set of `Plot`s.
#[graphql_object(name = "MarketSummary", context = Context)]
impl Summary {
    /// Number of `Plot`s aggregated.
    #[must_use]
    pub fn count(&self) -> i32 {
        i32::try_from(self.0.count).unwrap_or(i32::MAX)
    }

    /// Average asking price.
    #[must_use]
    pub fn avg_price(&self) -> Money {
        self.0.avg_price
    }

    /// Lowest asking price.
    #[must_use]
    pub fn min_price(&self) -> Money {
        self.0.min_price
    }

    /// Highest asking price.
    #[must_use]
    pub fn max_price(&self) -> Money {
        self.0.max_price
    }

    /// Average area in square meters.
    #[must_use]
    pub fn avg_area(&self) -> scalar::Decimal {
        self.0.avg_area.into()
    }

    /// Average price per square meter.
    #[must_use]
    pub fn avg_price_per_area(&self) -> scalar::Decimal {
        self.0.avg_price_per_area.into()
    }

    /// Average investment score.
    #[must_use]
    pub fn avg_score(&self) -> scalar::Decimal {
        self.0.avg_score.into()
    }
}

/// Price distribution of a set of `Plot`s.
#[derive(Clone, Debug, derive_more::From)]
pub struct Histogram(analysis::Histogram);

/// Price distribution of a set of `Plot`s.
#[graphql_object(name = "PriceHistogram", context = Context)]
impl Histogram {
    /// Buckets of this `PriceHistogram`, ordered by price ascending.
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket> {
        self.0.buckets.iter().copied().map(Into::into).collect()
    }
}

/// Single bucket of a `PriceHistogram`.
#[derive(Clone, Copy, Debug, derive_more::From)]
pub struct Bucket(analysis::market::Bucket);

/// Single bucket of a `PriceHistogram`.
#[graphql_object(name = "PriceHistogramBucket", context = Context)]
impl Bucket {
    /// Lowest price falling into this bucket.
    #[must_use]
    pub fn floor(&self) -> scalar::Decimal {
        self.0.floor.into()
    }

    /// Highest price falling into this bucket.
    #[must_use]
    pub fn ceiling(&self) -> scalar::Decimal {
        self.0.ceiling.into()
    }

    /// Number of `Plot`s in this bucket.
    #[must_use]
    pub fn count(&self) -> i32 {
        i32::try_from(self.0.count).unwrap_or(i32::MAX)
    }

    /// Bar height of this bucket, normalized to the tallest one.
    #[must_use]
    pub fn height(&self) -> scalar::Decimal {
        self.0.height.into()
    }
}

/// Per-city aggregate of the market.
#[derive(Clone, Debug, derive_more::From)]
pub struct CityStats(analysis::CityStats);

/// Per-city aggregate of the market.
#[graphql_object(context = Context)]
impl CityStats {
    /// City these figures describe.
    #[must_use]
    pub fn city(&self) -> api::plot::City {
        self.0.city.clone().into()
    }

    /// Aggregates over the city's `Plot`s.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.0.summary.into()
    }
}

/// Ordering of the visible catalog.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotSortKey")]
pub enum SortKey {
    /// Score blended with recency.
    Recommended,

    /// Cheapest first.
    PriceAsc,

    /// Most expensive first.
    PriceDesc,

    /// Highest projected return first.
    RoiDesc,

    /// Most recently listed first.
    Newest,

    /// Closest to the visitor first.
    Nearest,
}

impl From<SortKey> for analysis::SortKey {
    fn from(sort: SortKey) -> Self {
        use SortKey as K;
        match sort {
            K::Recommended => Self::Recommended,
            K::PriceAsc => Self::PriceAsc,
            K::PriceDesc => Self::PriceDesc,
            K::RoiDesc => Self::RoiDesc,
            K::Newest => Self::Newest,
            K::Nearest => Self::Nearest,
        }
    }
}
