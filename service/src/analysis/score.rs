//! Investment scoring of [`Plot`]s.

use common::define_kind;
use rust_decimal::Decimal;
use smart_default::SmartDefault;
use xxhash_rust::xxh3;

use crate::domain::{plot, Plot};

/// Investment score of a [`Plot`], on a `0..=10` scale.
///
/// Blends the projected return, the price position against the visible
/// market, and the planning-approval progress into a single ranking
/// scalar.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Score(Decimal);

impl Score {
    /// Calculates the [`Score`] of the provided [`Plot`].
    ///
    /// `market_price_per_area` is the average price per square meter of the
    /// set the [`Plot`] is ranked within. A zero market average (no
    /// comparable data) scores the price position as neutral.
    #[must_use]
    pub fn calculate(
        plot: &Plot,
        market_price_per_area: Decimal,
        config: &Config,
    ) -> Self {
        let half = Decimal::new(5, 1);

        let roi = if config.roi_cap <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            clamp_unit(plot.roi() / config.roi_cap)
        };

        let price_per_area = plot.price_per_area();
        let price = if price_per_area <= Decimal::ZERO {
            Decimal::ZERO
        } else if market_price_per_area <= Decimal::ZERO {
            half
        } else {
            // At the market average this lands on 0.5, at half the market
            // price on 1.0.
            clamp_unit(market_price_per_area / price_per_area * half)
        };

        let stage = plot.stage.progress();

        let total = config.roi_weight * roi
            + config.price_weight * price
            + config.stage_weight * stage;
        let weights =
            config.roi_weight + config.price_weight + config.stage_weight;
        if weights <= Decimal::ZERO {
            return Self(Decimal::ZERO);
        }

        Self(total / weights * Decimal::TEN)
    }

    /// Returns this [`Score`] as its [`Decimal`] value (in `0..=10`).
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns the letter [`Grade`] of this [`Score`].
    #[must_use]
    pub fn grade(&self) -> Grade {
        match self.0 {
            s if s >= Decimal::new(8, 0) => Grade::A,
            s if s >= Decimal::new(65, 1) => Grade::B,
            s if s >= Decimal::new(5, 0) => Grade::C,
            s if s >= Decimal::new(35, 1) => Grade::D,
            _ => Grade::F,
        }
    }

    /// Returns the [`Ripeness`] bucket of this [`Score`].
    #[must_use]
    pub fn ripeness(&self) -> Ripeness {
        match self.0 {
            s if s >= Decimal::new(75, 1) => Ripeness::Prime,
            s if s >= Decimal::new(5, 0) => Ripeness::Developing,
            _ => Ripeness::Early,
        }
    }
}

/// Clamps the provided value into `0..=1`.
fn clamp_unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

define_kind! {
    #[doc = "Letter grade of a [`Score`]."]
    enum Grade {
        #[doc = "Excellent investment."]
        A = 1,

        #[doc = "Good investment."]
        B = 2,

        #[doc = "Fair investment."]
        C = 3,

        #[doc = "Below average investment."]
        D = 4,

        #[doc = "Poor investment."]
        F = 5,
    }
}

define_kind! {
    #[doc = "Readiness bucket of a [`Plot`], derived from its [`Score`]."]
    enum Ripeness {
        #[doc = "Early-stage opportunity."]
        Early = 1,

        #[doc = "Developing opportunity."]
        Developing = 2,

        #[doc = "Prime opportunity."]
        Prime = 3,
    }
}

define_kind! {
    #[doc = "Demand estimate of a [`Plot`] listing."]
    enum Heat {
        #[doc = "Heavily viewed listing."]
        Hot = 1,

        #[doc = "Steadily viewed listing."]
        Warm = 2,

        #[doc = "Recently listed."]
        New = 3,

        #[doc = "Rarely viewed listing."]
        Quiet = 4,
    }
}

impl Heat {
    /// Estimates the [`Heat`] of the provided [`Plot`] at the given moment.
    ///
    /// When the listing carries no tracked view count, a deterministic
    /// stand-in is derived from the [`plot::Id`], so repeated renders of
    /// the same listing never disagree.
    #[must_use]
    pub fn estimate(plot: &Plot, now: common::DateTime, config: &Config) -> Self {
        let days = plot.days_on_market(now);
        if days <= u64::from(config.new_listing_days) {
            return Self::New;
        }

        let views = u64::from(
            plot.views.unwrap_or_else(|| synthetic_views(plot.id, config)),
        );
        let daily = views / days.max(1);
        if daily >= u64::from(config.hot_daily_views) {
            Self::Hot
        } else if daily >= u64::from(config.warm_daily_views) {
            Self::Warm
        } else {
            Self::Quiet
        }
    }

    /// Returns the display label of this [`Heat`].
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hot => "High demand",
            Self::Warm => "Steady interest",
            Self::New => "Just listed",
            Self::Quiet => "Quiet listing",
        }
    }

    /// Returns the display color of this [`Heat`], as a hex RGB code.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Hot => "#e5484d",
            Self::Warm => "#f5a623",
            Self::New => "#30a46c",
            Self::Quiet => "#8b8d98",
        }
    }
}

/// Derives a deterministic stand-in view count for a [`Plot`] without a
/// tracked one.
fn synthetic_views(id: plot::Id, config: &Config) -> plot::ViewCount {
    let digest = xxh3::xxh3_64(uuid::Uuid::from(id).as_bytes());
    let span = u64::from(config.synthetic_views_max)
        .saturating_sub(u64::from(config.synthetic_views_min))
        .max(1);
    #[expect(clippy::cast_possible_truncation, reason = "bounded by `span`")]
    let offset = (digest % span) as plot::ViewCount;
    config.synthetic_views_min + offset
}

/// Configuration of the scoring and demand heuristics.
///
/// The defaults are empirically chosen, not derived; everything a product
/// owner may want to tune lives here instead of being inlined at call
/// sites.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Weight of the projected return component.
    #[default(Decimal::new(45, 2))]
    pub roi_weight: Decimal,

    /// Weight of the price-position component.
    #[default(Decimal::new(35, 2))]
    pub price_weight: Decimal,

    /// Weight of the planning-stage component.
    #[default(Decimal::new(2, 1))]
    pub stage_weight: Decimal,

    /// ROI (in percent) at which the return component saturates.
    #[default(Decimal::new(60, 0))]
    pub roi_cap: Decimal,

    /// Age (in days) under which a listing counts as new.
    #[default(7)]
    pub new_listing_days: u16,

    /// Daily views at which a listing counts as hot.
    #[default(15)]
    pub hot_daily_views: u32,

    /// Daily views at which a listing counts as warm.
    #[default(5)]
    pub warm_daily_views: u32,

    /// Lower bound of the synthetic view count stand-in.
    #[default(40)]
    pub synthetic_views_min: u32,

    /// Upper bound of the synthetic view count stand-in.
    #[default(400)]
    pub synthetic_views_max: u32,
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{Config, Grade, Heat, Score};
    use crate::domain::{
        plot::{self, Amenities, Area, Stage, Status},
        Plot,
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn plot(price: &str, projected: Option<&str>, area: &str) -> Plot {
        let city = plot::City::new("Caesarea").unwrap();
        let block = plot::Block::new("10622").unwrap();
        let parcel_num = plot::ParcelNum::new("4").unwrap();
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
            projected_value: projected.map(|p| Money {
                amount: decimal(p),
                currency: Currency::Eur,
            }),
            area: Area::new(decimal(area)).unwrap(),
            stage: Stage::DetailedPlanApproved,
            status: Status::Available,
            location: None,
            amenities: Amenities::default(),
            views: None,
            created_at: DateTime::now().coerce(),
            reserved_at: None,
        }
    }

    #[test]
    fn score_stays_within_scale() {
        let config = Config::default();
        let p = plot("100000", Some("500000"), "1");

        let score = Score::calculate(&p, decimal("1"), &config);

        assert!(score.as_decimal() >= Decimal::ZERO);
        assert!(score.as_decimal() <= Decimal::TEN);
    }

    #[test]
    fn cheaper_than_market_scores_higher() {
        let config = Config::default();
        let cheap = plot("50000", Some("80000"), "1000");
        let pricey = plot("200000", Some("320000"), "1000");
        let market = decimal("150");

        assert!(
            Score::calculate(&cheap, market, &config)
                > Score::calculate(&pricey, market, &config),
        );
    }

    #[test]
    fn zero_denominators_never_panic() {
        let config = Config::default();
        let broken = plot("0", None, "0");

        let score = Score::calculate(&broken, Decimal::ZERO, &config);

        assert!(score.as_decimal() >= Decimal::ZERO);
        assert_eq!(score.grade(), Grade::F);
    }

    #[test]
    fn fresh_listing_is_new_regardless_of_views() {
        let config = Config::default();
        let mut p = plot("100000", None, "500");
        p.views = Some(100_000);

        assert_eq!(Heat::estimate(&p, DateTime::now(), &config), Heat::New);
    }

    #[test]
    fn heat_is_deterministic_without_tracked_views() {
        let config = Config::default();
        let mut p = plot("100000", None, "500");
        p.created_at =
            (DateTime::now() - std::time::Duration::from_secs(30 * 86400))
                .coerce();

        let now = DateTime::now();
        assert_eq!(
            Heat::estimate(&p, now, &config),
            Heat::estimate(&p, now, &config),
        );
    }
}
