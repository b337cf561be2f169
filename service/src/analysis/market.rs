//! Market-wide aggregation over [`Plot`]s.

use std::collections::HashMap;

use common::Money;
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::domain::{plot, Plot};

use super::score::{self, Score};

/// Aggregate figures over a set of [`Plot`]s.
///
/// Every constructor in this module returns [`None`] for an empty input:
/// the UI renders a "no data" placeholder instead of dividing by zero.
#[derive(Clone, Copy, Debug)]
pub struct Summary {
    /// Number of [`Plot`]s aggregated.
    pub count: usize,

    /// Average asking price.
    pub avg_price: Money,

    /// Lowest asking price.
    pub min_price: Money,

    /// Highest asking price.
    pub max_price: Money,

    /// Average [`plot::Area`].
    pub avg_area: Decimal,

    /// Average price per square meter.
    pub avg_price_per_area: Decimal,

    /// Average investment [`Score`].
    pub avg_score: Decimal,
}

impl Summary {
    /// Aggregates the provided [`Plot`]s into a [`Summary`].
    ///
    /// [`None`] is returned for an empty input.
    pub fn of<'p, I>(plots: I, config: &score::Config) -> Option<Self>
    where
        I: IntoIterator<Item = &'p Plot>,
        I::IntoIter: Clone,
    {
        let plots = plots.into_iter();

        let market = average_price_per_area(plots.clone());

        let mut count = 0_usize;
        let mut price_sum = Decimal::ZERO;
        let mut min_price: Option<Money> = None;
        let mut max_price: Option<Money> = None;
        let mut area_sum = Decimal::ZERO;
        let mut score_sum = Decimal::ZERO;
        for plot in plots {
            count += 1;
            price_sum += plot.price.amount;
            area_sum += plot.area.as_decimal();
            score_sum +=
                Score::calculate(plot, market, config).as_decimal();

            if min_price.map_or(true, |m| plot.price.amount < m.amount) {
                min_price = Some(plot.price);
            }
            if max_price.map_or(true, |m| plot.price.amount > m.amount) {
                max_price = Some(plot.price);
            }
        }

        let min_price = min_price?;
        let divisor = Decimal::from(count);
        Some(Self {
            count,
            avg_price: Money {
                amount: price_sum / divisor,
                currency: min_price.currency,
            },
            min_price,
            max_price: max_price?,
            avg_area: area_sum / divisor,
            avg_price_per_area: market,
            avg_score: score_sum / divisor,
        })
    }
}

/// Returns the average price per square meter over the provided [`Plot`]s,
/// or zero for an empty input.
pub(crate) fn average_price_per_area<'p>(
    plots: impl IntoIterator<Item = &'p Plot>,
) -> Decimal {
    let mut count = 0_usize;
    let mut sum = Decimal::ZERO;
    for plot in plots {
        count += 1;
        sum += plot.price_per_area();
    }
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// Number of buckets in a [`Histogram`].
pub const HISTOGRAM_BUCKETS: usize = 5;

/// Fixed-bucket price distribution of a set of [`Plot`]s.
#[derive(Clone, Debug)]
pub struct Histogram {
    /// [`Bucket`]s of this [`Histogram`], ordered by price ascending.
    pub buckets: Vec<Bucket>,
}

/// Single bucket of a [`Histogram`].
#[derive(Clone, Copy, Debug)]
pub struct Bucket {
    /// Lowest price falling into this [`Bucket`].
    pub floor: Decimal,

    /// Highest price falling into this [`Bucket`].
    pub ceiling: Decimal,

    /// Number of [`Plot`]s in this [`Bucket`].
    pub count: usize,

    /// Bar height of this [`Bucket`], normalized to the tallest one
    /// (`0..=1`).
    pub height: Decimal,
}

impl Histogram {
    /// Builds a [`Histogram`] over the prices of the provided [`Plot`]s.
    ///
    /// [`None`] is returned for an empty input. When every price is equal
    /// the whole set collapses into the first bucket.
    #[must_use]
    pub fn of(plots: &[Plot]) -> Option<Self> {
        let min = plots
            .iter()
            .map(|p| p.price.amount)
            .min()?;
        let max = plots
            .iter()
            .map(|p| p.price.amount)
            .max()?;
        let width = (max - min) / Decimal::from(HISTOGRAM_BUCKETS);

        let mut counts = [0_usize; HISTOGRAM_BUCKETS];
        for plot in plots {
            let idx = if width.is_zero() {
                0
            } else {
                let offset = (plot.price.amount - min) / width;
                // The maximum lands exactly on the upper bound, it belongs
                // to the last bucket.
                offset
                    .floor()
                    .to_usize()
                    .unwrap_or(0)
                    .min(HISTOGRAM_BUCKETS - 1)
            };
            counts[idx] += 1;
        }

        let tallest = counts.iter().copied().max().unwrap_or(0).max(1);
        let buckets = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Bucket {
                floor: min + width * Decimal::from(i),
                ceiling: min + width * Decimal::from(i + 1),
                count,
                height: Decimal::from(count) / Decimal::from(tallest),
            })
            .collect();

        Some(Self { buckets })
    }
}

/// Returns IDs of the "best value" [`Plot`]s: those priced per square
/// meter below the cross-set average while scoring at or above the median.
///
/// Badge material, not a formal optimum.
#[must_use]
pub fn best_value_ids(
    plots: &[Plot],
    config: &score::Config,
) -> Vec<plot::Id> {
    if plots.is_empty() {
        return Vec::new();
    }

    let market = average_price_per_area(plots);
    let scores = plots
        .iter()
        .map(|p| Score::calculate(p, market, config))
        .collect::<Vec<_>>();

    let mut sorted = scores.clone();
    sorted.sort_unstable();
    let median = sorted[(sorted.len() - 1) / 2];

    plots
        .iter()
        .zip(scores)
        .filter(|(p, score)| {
            p.price_per_area() < market && *score >= median
        })
        .map(|(p, _)| p.id)
        .collect()
}

/// Per-city aggregate of a market.
#[derive(Clone, Debug)]
pub struct CityStats {
    /// [`plot::City`] these figures describe.
    pub city: plot::City,

    /// [`Summary`] of the [`Plot`]s in the city.
    pub summary: Summary,
}

/// Rolls the provided [`Plot`]s up into per-city [`CityStats`], sorted by
/// average score descending.
#[must_use]
pub fn compare_cities(
    plots: &[Plot],
    config: &score::Config,
) -> Vec<CityStats> {
    let mut by_city: HashMap<&plot::City, Vec<&Plot>> = HashMap::new();
    for plot in plots {
        by_city.entry(&plot.city).or_default().push(plot);
    }

    let mut stats = by_city
        .into_iter()
        .filter_map(|(city, plots)| {
            Summary::of(plots.iter().copied(), config).map(|summary| {
                CityStats {
                    city: city.clone(),
                    summary,
                }
            })
        })
        .collect::<Vec<_>>();
    stats.sort_by(|a, b| {
        b.summary.avg_score.cmp(&a.summary.avg_score).then_with(|| {
            let (a, b): (&str, &str) = (a.city.as_ref(), b.city.as_ref());
            a.cmp(b)
        })
    });
    stats
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{
        average_price_per_area, best_value_ids, compare_cities, Histogram,
        Summary,
    };
    use crate::{
        analysis::score,
        domain::{
            plot::{self, Amenities, Area, Stage, Status},
            Plot,
        },
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn plot(city: &str, price: &str, area: &str) -> Plot {
        let city = plot::City::new(city).unwrap();
        let block = plot::Block::new("7701").unwrap();
        let parcel_num = plot::ParcelNum::new("1").unwrap();
        Plot {
            id: plot::Id::new(),
            hash: plot::Hash::new(&city, &block, &parcel_num),
            city,
            block,
            parcel_num,
            price: Money {
                amount: decimal(price),
                currency: Currency::Eur,
            },
            projected_value: None,
            area: Area::new(decimal(area)).unwrap(),
            stage: Stage::MasterPlanApproved,
            status: Status::Available,
            location: None,
            amenities: Amenities::default(),
            views: None,
            created_at: DateTime::now().coerce(),
            reserved_at: None,
        }
    }

    #[test]
    fn empty_input_yields_no_data_everywhere() {
        let config = score::Config::default();
        let empty: [Plot; 0] = [];

        assert!(Summary::of(&empty, &config).is_none());
        assert!(Histogram::of(&empty).is_none());
        assert!(best_value_ids(&empty, &config).is_empty());
        assert!(compare_cities(&empty, &config).is_empty());
        assert_eq!(average_price_per_area(&empty), Decimal::ZERO);
    }

    #[test]
    fn summary_aggregates_prices_and_areas() {
        let config = score::Config::default();
        let plots = [
            plot("Netanya", "100000", "500"),
            plot("Netanya", "300000", "1500"),
        ];

        let summary = Summary::of(plots.iter(), &config).unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_price.amount, decimal("200000"));
        assert_eq!(summary.min_price.amount, decimal("100000"));
        assert_eq!(summary.max_price.amount, decimal("300000"));
        assert_eq!(summary.avg_area, decimal("1000"));
        assert_eq!(summary.avg_price_per_area, decimal("200"));
    }

    #[test]
    fn histogram_spreads_prices_into_five_buckets() {
        let plots = [
            plot("Netanya", "100000", "500"),
            plot("Netanya", "150000", "500"),
            plot("Netanya", "300000", "500"),
            plot("Netanya", "600000", "500"),
        ];

        let histogram = Histogram::of(&plots).unwrap();

        assert_eq!(histogram.buckets.len(), 5);
        // Width is (600000 - 100000) / 5 = 100000.
        assert_eq!(histogram.buckets[0].count, 2);
        assert_eq!(histogram.buckets[2].count, 1);
        // The maximum belongs to the last bucket, not one past it.
        assert_eq!(histogram.buckets[4].count, 1);
        assert_eq!(histogram.buckets[0].height, Decimal::ONE);
        assert_eq!(
            histogram.buckets[2].height,
            decimal("0.5"),
        );
    }

    #[test]
    fn histogram_collapses_equal_prices_into_first_bucket() {
        let plots = [
            plot("Netanya", "250000", "500"),
            plot("Netanya", "250000", "600"),
        ];

        let histogram = Histogram::of(&plots).unwrap();

        assert_eq!(histogram.buckets[0].count, 2);
        assert!(histogram.buckets[1..].iter().all(|b| b.count == 0));
    }

    #[test]
    fn best_value_requires_below_average_price_rate() {
        let config = score::Config::default();
        // Rates 100 and 400: only the first sits below the average of 250.
        let plots = [
            plot("Netanya", "100000", "1000"),
            plot("Netanya", "400000", "1000"),
        ];

        let ids = best_value_ids(&plots, &config);

        assert_eq!(ids, vec![plots[0].id]);
    }

    #[test]
    fn city_comparison_ranks_by_average_score() {
        let config = score::Config::default();
        let plots = [
            plot("Netanya", "100000", "1000"),
            plot("Caesarea", "900000", "300"),
            plot("Netanya", "120000", "1100"),
        ];

        let stats = compare_cities(&plots, &config);

        assert_eq!(stats.len(), 2);
        assert!(stats[0].summary.avg_score >= stats[1].summary.avg_score);
        assert_eq!(
            stats.iter().map(|s| s.summary.count).sum::<usize>(),
            3,
        );
    }
}
