//! Catalog filtering and ordering of [`Plot`]s.

use std::{cmp::Reverse, str::FromStr as _};

use common::define_kind;
use rust_decimal::Decimal;

use crate::domain::{
    geo::{Location, Viewport},
    plot::{self, Stage},
    Plot,
};

use super::{
    market,
    score::{self, Ripeness, Score},
};

/// Predicates narrowing the visible catalog down.
///
/// All predicates are optional and AND-combined.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// [`plot::City`] to show exclusively.
    pub city: Option<plot::City>,

    /// Lowest asking price to show.
    pub min_price: Option<Decimal>,

    /// Highest asking price to show.
    pub max_price: Option<Decimal>,

    /// Smallest area (in square meters) to show.
    pub min_area: Option<Decimal>,

    /// Largest area (in square meters) to show.
    pub max_area: Option<Decimal>,

    /// Lowest ROI (in percent) to show.
    pub min_roi: Option<Decimal>,

    /// [`Ripeness`] bucket to show exclusively.
    pub ripeness: Option<Ripeness>,

    /// Planning [`Stage`] to show exclusively.
    pub stage: Option<Stage>,

    /// Substring to search for across city, block and parcel number,
    /// case-insensitively.
    pub search: Option<String>,

    /// [`Viewport`] to show exclusively ("search in this area" on the
    /// map). [`Plot`]s without a location never match it.
    pub viewport: Option<Viewport>,

    /// Indicator whether only [`Plot`]s priced per square meter strictly
    /// below the average of the otherwise-filtered set are shown.
    pub below_average: bool,
}

impl Filter {
    /// Checks whether the provided [`Plot`] passes every predicate of this
    /// [`Filter`], except the [`below_average`] one.
    ///
    /// [`below_average`]: Filter::below_average
    fn matches(
        &self,
        plot: &Plot,
        market_price_per_area: Decimal,
        needle: Option<&str>,
        config: &score::Config,
    ) -> bool {
        if let Some(city) = &self.city {
            if plot.city != *city {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if plot.price.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if plot.price.amount > max {
                return false;
            }
        }
        if let Some(min) = self.min_area {
            if plot.area.as_decimal() < min {
                return false;
            }
        }
        if let Some(max) = self.max_area {
            if plot.area.as_decimal() > max {
                return false;
            }
        }
        if let Some(min) = self.min_roi {
            if plot.roi() < min {
                return false;
            }
        }
        if let Some(stage) = self.stage {
            if plot.stage != stage {
                return false;
            }
        }
        if let Some(ripeness) = self.ripeness {
            let score =
                Score::calculate(plot, market_price_per_area, config);
            if score.ripeness() != ripeness {
                return false;
            }
        }
        if let Some(needle) = needle {
            let haystack = format!(
                "{} {} {}",
                plot.city, plot.block, plot.parcel_num,
            )
            .to_lowercase();
            if !haystack.contains(needle) {
                return false;
            }
        }
        if let Some(viewport) = &self.viewport {
            let Some(location) = &plot.location else {
                return false;
            };
            if !viewport.contains(location) {
                return false;
            }
        }
        true
    }
}

define_kind! {
    #[doc = "Ordering of the visible catalog."]
    enum SortKey {
        #[doc = "Score blended with recency."]
        Recommended = 1,

        #[doc = "Cheapest first."]
        PriceAsc = 2,

        #[doc = "Most expensive first."]
        PriceDesc = 3,

        #[doc = "Highest projected return first."]
        RoiDesc = 4,

        #[doc = "Most recently listed first."]
        Newest = 5,

        #[doc = "Closest to the visitor first."]
        Nearest = 6,
    }
}

/// Derives the visible catalog from the provided [`Plot`]s.
///
/// A single idempotent transform: predicates are applied first, then the
/// [below-average toggle] against the average of the already-narrowed set,
/// then a stable sort by the provided [`SortKey`]. Re-running the
/// transform over its own output changes nothing, and equal inputs always
/// produce the same order, so downstream list diffing stays quiet.
///
/// `origin` feeds the [`SortKey::Nearest`] ordering; without it that
/// ordering keeps the incoming order.
///
/// [below-average toggle]: Filter::below_average
#[must_use]
pub fn visible(
    plots: &[Plot],
    filter: &Filter,
    sort: SortKey,
    origin: Option<Location>,
    config: &score::Config,
) -> Vec<Plot> {
    let market = market::average_price_per_area(plots);
    let needle = filter.search.as_ref().map(|s| s.to_lowercase());

    let mut passed = plots
        .iter()
        .filter(|p| filter.matches(p, market, needle.as_deref(), config))
        .cloned()
        .collect::<Vec<_>>();

    if filter.below_average {
        // The average is taken over the set the other predicates have
        // already narrowed down, not over the whole market.
        let narrowed = market::average_price_per_area(&passed);
        passed.retain(|p| p.price_per_area() < narrowed);
    }

    sort_plots(&mut passed, sort, origin, config);
    passed
}

/// Stable-sorts the provided [`Plot`]s by the provided [`SortKey`].
fn sort_plots(
    plots: &mut [Plot],
    sort: SortKey,
    origin: Option<Location>,
    config: &score::Config,
) {
    match sort {
        SortKey::Recommended => {
            let market = market::average_price_per_area(plots.iter());
            plots.sort_by_cached_key(|p| {
                (
                    Reverse(Score::calculate(p, market, config)),
                    Reverse(p.created_at),
                )
            });
        }
        SortKey::PriceAsc => plots.sort_by_key(|p| p.price.amount),
        SortKey::PriceDesc => {
            plots.sort_by_key(|p| Reverse(p.price.amount));
        }
        SortKey::RoiDesc => plots.sort_by_cached_key(|p| Reverse(p.roi())),
        SortKey::Newest => plots.sort_by_key(|p| Reverse(p.created_at)),
        SortKey::Nearest => {
            if let Some(origin) = origin {
                plots.sort_by_key(|p| {
                    (
                        p.location.is_none(),
                        p.location.map(|l| origin.distance_squared(&l)),
                    )
                });
            }
        }
    }
}

impl Filter {
    /// Mirrors this [`Filter`] and the provided [`SortKey`] into URL query
    /// pairs, for shareable catalog links.
    ///
    /// Values matching the defaults are omitted, so untouched filters keep
    /// URLs clean. The [`Viewport`] is owned by the map and is not
    /// mirrored.
    #[must_use]
    pub fn to_query_pairs(
        &self,
        sort: SortKey,
    ) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = &self.city {
            pairs.push(("city", city.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("priceMin", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("priceMax", max.to_string()));
        }
        if let Some(min) = self.min_area {
            pairs.push(("sizeMin", min.to_string()));
        }
        if let Some(max) = self.max_area {
            pairs.push(("sizeMax", max.to_string()));
        }
        if let Some(ripeness) = self.ripeness {
            pairs.push(("ripeness", ripeness.to_string()));
        }
        if let Some(min) = self.min_roi {
            pairs.push(("minRoi", min.to_string()));
        }
        if let Some(stage) = self.stage {
            pairs.push(("zoning", stage.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if self.below_average {
            pairs.push(("belowAvg", "true".to_owned()));
        }
        if !matches!(sort, SortKey::Recommended) {
            pairs.push(("sort", sort.to_string()));
        }
        pairs
    }

    /// Reconstructs a [`Filter`] and [`SortKey`] from URL query pairs.
    ///
    /// Unknown keys and unparseable values are ignored: query strings are
    /// user-editable, and a mangled parameter must degrade into a wider
    /// catalog, not an error.
    pub fn from_query_pairs<'p>(
        pairs: impl IntoIterator<Item = (&'p str, &'p str)>,
    ) -> (Self, SortKey) {
        let mut filter = Self::default();
        let mut sort = SortKey::Recommended;
        for (key, value) in pairs {
            match key {
                "city" => filter.city = plot::City::new(value),
                "priceMin" => {
                    filter.min_price = Decimal::from_str(value).ok();
                }
                "priceMax" => {
                    filter.max_price = Decimal::from_str(value).ok();
                }
                "sizeMin" => {
                    filter.min_area = Decimal::from_str(value).ok();
                }
                "sizeMax" => {
                    filter.max_area = Decimal::from_str(value).ok();
                }
                "ripeness" => {
                    filter.ripeness = Ripeness::from_str(value).ok();
                }
                "minRoi" => filter.min_roi = Decimal::from_str(value).ok(),
                "zoning" => filter.stage = Stage::from_str(value).ok(),
                "search" => {
                    filter.search =
                        (!value.is_empty()).then(|| value.to_owned());
                }
                "belowAvg" => {
                    filter.below_average = matches!(value, "true" | "1");
                }
                "sort" => {
                    sort = SortKey::from_str(value)
                        .unwrap_or(SortKey::Recommended);
                }
                _ => {}
            }
        }
        (filter, sort)
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{visible, Filter, SortKey};
    use crate::{
        analysis::score,
        domain::{
            geo::Location,
            plot::{self, Amenities, Area, Stage, Status},
            Plot,
        },
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn plot(city: &str, block: &str, price: &str, area: &str) -> Plot {
        let city = plot::City::new(city).unwrap();
        let block = plot::Block::new(block).unwrap();
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

    fn ids(plots: &[Plot]) -> Vec<plot::Id> {
        plots.iter().map(|p| p.id).collect()
    }

    #[test]
    fn below_average_is_strict() {
        let config = score::Config::default();
        // Both plots sit exactly on the 1000-per-sqm average, so neither
        // is strictly below it.
        let plots = [
            plot("Netanya", "8871", "1000000", "1000"),
            plot("Netanya", "8872", "2000000", "2000"),
        ];
        let filter = Filter {
            below_average: true,
            ..Filter::default()
        };

        let shown =
            visible(&plots, &filter, SortKey::PriceAsc, None, &config);

        assert!(shown.is_empty());
    }

    #[test]
    fn below_average_uses_the_narrowed_set() {
        let config = score::Config::default();
        // Hadera rates: 100 and 300 (average 200). The Caesarea outlier
        // drags the whole-market average up to 466.67, under which both
        // Hadera plots would pass.
        let plots = [
            plot("Hadera", "7701", "100000", "1000"),
            plot("Hadera", "7702", "300000", "1000"),
            plot("Caesarea", "10622", "1000000", "1000"),
        ];
        let filter = Filter {
            city: plot::City::new("Hadera"),
            below_average: true,
            ..Filter::default()
        };

        let shown =
            visible(&plots, &filter, SortKey::PriceAsc, None, &config);

        assert_eq!(ids(&shown), vec![plots[0].id]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let config = score::Config::default();
        let plots = [
            plot("Netanya", "8871", "100000", "500"),
            plot("Hadera", "7701", "400000", "800"),
            plot("Netanya", "8872", "250000", "700"),
        ];
        let filter = Filter {
            city: plot::City::new("Netanya"),
            max_price: Some(decimal("300000")),
            ..Filter::default()
        };

        let once =
            visible(&plots, &filter, SortKey::PriceAsc, None, &config);
        let twice =
            visible(&once, &filter, SortKey::PriceAsc, None, &config);

        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn sorting_is_stable_and_deterministic() {
        let config = score::Config::default();
        // Equal prices: stable sort must keep the incoming order.
        let plots = [
            plot("Netanya", "8871", "200000", "500"),
            plot("Netanya", "8872", "200000", "900"),
            plot("Hadera", "7701", "100000", "400"),
        ];

        let first = visible(
            &plots,
            &Filter::default(),
            SortKey::PriceAsc,
            None,
            &config,
        );
        let second = visible(
            &plots,
            &Filter::default(),
            SortKey::PriceAsc,
            None,
            &config,
        );

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(
            ids(&first),
            vec![plots[2].id, plots[0].id, plots[1].id],
        );
    }

    #[test]
    fn nearest_without_origin_keeps_the_incoming_order() {
        let config = score::Config::default();
        let mut far = plot("Hadera", "7701", "100000", "400");
        far.location = Some(Location {
            latitude: decimal("32.9"),
            longitude: decimal("35.0"),
        });
        let mut near = plot("Netanya", "8871", "200000", "500");
        near.location = Some(Location {
            latitude: decimal("32.3"),
            longitude: decimal("34.9"),
        });
        let plots = [far, near];

        let unordered = visible(
            &plots,
            &Filter::default(),
            SortKey::Nearest,
            None,
            &config,
        );
        assert_eq!(ids(&unordered), ids(&plots));

        let origin = Location {
            latitude: decimal("32.3"),
            longitude: decimal("34.9"),
        };
        let ordered = visible(
            &plots,
            &Filter::default(),
            SortKey::Nearest,
            Some(origin),
            &config,
        );
        assert_eq!(ids(&ordered), vec![plots[1].id, plots[0].id]);
    }

    #[test]
    fn search_matches_city_block_and_parcel() {
        let config = score::Config::default();
        let plots = [
            plot("Netanya", "8871", "100000", "500"),
            plot("Hadera", "7701", "400000", "800"),
        ];
        let filter = Filter {
            search: Some("887".to_owned()),
            ..Filter::default()
        };

        let shown =
            visible(&plots, &filter, SortKey::Recommended, None, &config);

        assert_eq!(ids(&shown), vec![plots[0].id]);
    }

    #[test]
    fn query_pairs_round_trip() {
        let filter = Filter {
            city: plot::City::new("Netanya"),
            min_price: Some(decimal("50000")),
            max_price: Some(decimal("900000")),
            min_roi: Some(decimal("20")),
            stage: Some(Stage::DetailedPlanApproved),
            search: Some("8871".to_owned()),
            below_average: true,
            ..Filter::default()
        };

        let pairs = filter.to_query_pairs(SortKey::RoiDesc);
        let (parsed, sort) = Filter::from_query_pairs(
            pairs.iter().map(|(k, v)| (*k, v.as_str())),
        );

        assert_eq!(parsed, filter);
        assert_eq!(sort, SortKey::RoiDesc);
    }

    #[test]
    fn mangled_query_values_widen_instead_of_failing() {
        let (filter, sort) = Filter::from_query_pairs([
            ("priceMin", "not-a-number"),
            ("zoning", "SKYSCRAPER"),
            ("utm_source", "newsletter"),
            ("sort", "PRICE_ASC"),
        ]);

        assert_eq!(filter.min_price, None);
        assert_eq!(filter.stage, None);
        assert_eq!(sort, SortKey::PriceAsc);
    }
}
