//! [`Plot`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, MathematicalOps as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

use crate::domain::geo::Location;

/// Land plot offered for investment.
#[derive(Clone, Debug)]
pub struct Plot {
    /// ID of this [`Plot`].
    pub id: Id,

    /// [`Hash`] of this [`Plot`] used for deduplication.
    ///
    /// [`Hash`]: struct@Hash
    pub hash: Hash,

    /// [`City`] this [`Plot`] is located in.
    pub city: City,

    /// Cadastral [`Block`] of this [`Plot`].
    pub block: Block,

    /// [`ParcelNum`] of this [`Plot`] within its [`Block`].
    pub parcel_num: ParcelNum,

    /// Asking price of this [`Plot`].
    pub price: Money,

    /// Projected value of this [`Plot`] once its [`Stage`] completes, if
    /// estimated.
    pub projected_value: Option<Money>,

    /// [`Area`] of this [`Plot`].
    pub area: Area,

    /// Planning-approval [`Stage`] of this [`Plot`].
    pub stage: Stage,

    /// Sale [`Status`] of this [`Plot`].
    pub status: Status,

    /// Geographic [`Location`] of this [`Plot`], if known.
    pub location: Option<Location>,

    /// Distances from this [`Plot`] to nearby [`Amenities`].
    pub amenities: Amenities,

    /// Number of times this [`Plot`] was viewed, if tracked.
    pub views: Option<ViewCount>,

    /// [`DateTime`] when this [`Plot`] was listed.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Plot`] was reserved, while its [`Status`] is
    /// [`Status::Reserved`].
    pub reserved_at: Option<ReservationDateTime>,
}

impl Plot {
    /// Returns the price of this [`Plot`] per square meter of its [`Area`].
    ///
    /// Returns `0` when the [`Area`] is zero, so a malformed record renders
    /// as a zero rate instead of aborting the whole listing.
    #[must_use]
    pub fn price_per_area(&self) -> Decimal {
        let area = self.area.as_decimal();
        if area <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.price.amount / area
    }

    /// Returns the projected return on investment of this [`Plot`], as a
    /// percentage.
    ///
    /// Returns `0` when no projected value is estimated or the price is
    /// zero.
    #[must_use]
    pub fn roi(&self) -> Decimal {
        let Some(projected) = self.projected_value else {
            return Decimal::ZERO;
        };
        if self.price.amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (projected.amount - self.price.amount) / self.price.amount
            * Decimal::ONE_HUNDRED
    }

    /// Returns the compound annual growth rate of this [`Plot`], as a
    /// percentage.
    ///
    /// The holding period is estimated from the [`Stage`]: the further the
    /// planning approval, the sooner the projected value is expected to
    /// materialize. Returns `0` when no growth can be compounded.
    #[must_use]
    pub fn cagr(&self) -> Decimal {
        let years = self.stage.holding_years();
        if years <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let growth = Decimal::ONE + self.roi() / Decimal::ONE_HUNDRED;
        if growth <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        (growth.powd(Decimal::ONE / years) - Decimal::ONE)
            * Decimal::ONE_HUNDRED
    }

    /// Returns the number of whole days this [`Plot`] has been on the
    /// market at the provided moment.
    #[must_use]
    pub fn days_on_market(&self, now: common::DateTime) -> u64 {
        let listed_at = self.created_at.coerce::<()>();
        if now < listed_at {
            return 0;
        }
        (now - listed_at).as_secs() / (60 * 60 * 24)
    }
}

/// ID of a [`Plot`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// Hash of a [`Plot`] used for deduplication.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Hash(Uuid);

impl Hash {
    /// Calculates a new [`Hash`] for a [`Plot`].
    ///
    /// [`Hash`]: struct@Hash
    #[must_use]
    pub fn new(city: &City, block: &Block, parcel_num: &ParcelNum) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the order of the fields in the hasher,
        //          because it will be a breaking change requiring to migrate
        //          all existing hashes in the database to the new format.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        city.hash(&mut hasher);
        block.hash(&mut hasher);
        parcel_num.hash(&mut hasher);

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// City a [`Plot`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 128
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Cadastral block number of a [`Plot`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Block(String);

impl Block {
    /// Creates a new [`Block`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `block` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(block: impl Into<String>) -> Self {
        Self(block.into())
    }

    /// Creates a new [`Block`] if the given `block` is valid.
    #[must_use]
    pub fn new(block: impl Into<String>) -> Option<Self> {
        let block = block.into();
        Self::check(&block).then_some(Self(block))
    }

    /// Checks whether the given `block` is a valid [`Block`].
    fn check(block: impl AsRef<str>) -> bool {
        let block = block.as_ref();
        block.trim() == block && !block.is_empty() && block.len() <= 64
    }
}

impl FromStr for Block {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Block`")
    }
}

/// Parcel number of a [`Plot`] within its [`Block`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ParcelNum(String);

impl ParcelNum {
    /// Creates a new [`ParcelNum`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `num` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(num: impl Into<String>) -> Self {
        Self(num.into())
    }

    /// Creates a new [`ParcelNum`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: impl Into<String>) -> Option<Self> {
        let num = num.into();
        Self::check(&num).then_some(Self(num))
    }

    /// Checks whether the given `num` is a valid [`ParcelNum`].
    fn check(num: impl AsRef<str>) -> bool {
        let num = num.as_ref();
        num.trim() == num && !num.is_empty() && num.len() <= 64
    }
}

impl FromStr for ParcelNum {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ParcelNum`")
    }
}

/// Area of a [`Plot`] in square meters.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Area(Decimal);

impl Area {
    /// Creates a new [`Area`] if the given `area` is non-negative.
    #[must_use]
    pub fn new(area: Decimal) -> Option<Self> {
        (area >= Decimal::ZERO).then_some(Self(area))
    }

    /// Returns this [`Area`] as its [`Decimal`] value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Area`")
    }
}

define_kind! {
    #[doc = "Planning-approval stage of a [`Plot`]."]
    enum Stage {
        #[doc = "Agricultural land without planning."]
        Agricultural = 1,

        #[doc = "Master plan deposited for approval."]
        MasterPlanDeposit = 2,

        #[doc = "Master plan approved."]
        MasterPlanApproved = 3,

        #[doc = "Detailed plan under preparation."]
        DetailedPlanPreparation = 4,

        #[doc = "Detailed plan approved."]
        DetailedPlanApproved = 5,

        #[doc = "Building permit issued."]
        BuildingPermit = 6,
    }
}

impl Stage {
    /// Returns the estimated number of years until a [`Plot`] at this
    /// [`Stage`] realizes its projected value.
    #[must_use]
    pub fn holding_years(self) -> Decimal {
        Decimal::from(match self {
            Self::Agricultural => 7_u8,
            Self::MasterPlanDeposit => 5,
            Self::MasterPlanApproved => 4,
            Self::DetailedPlanPreparation => 3,
            Self::DetailedPlanApproved => 2,
            Self::BuildingPermit => 1,
        })
    }

    /// Returns the approval progress of this [`Stage`] as a `0..=1`
    /// fraction.
    #[must_use]
    pub fn progress(self) -> Decimal {
        Decimal::from(self.u8()) / Decimal::from(Self::BuildingPermit.u8())
    }
}

define_kind! {
    #[doc = "Sale status of a [`Plot`]."]
    enum Status {
        #[doc = "Offered for sale."]
        Available = 1,

        #[doc = "Reserved by a buyer."]
        Reserved = 2,

        #[doc = "Sold."]
        Sold = 3,
    }
}

/// Distance to an amenity, in meters.
pub type Distance = u32;

/// Distances from a [`Plot`] to nearby amenities.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Amenities {
    /// [`Distance`] to the sea, if known.
    pub sea: Option<Distance>,

    /// [`Distance`] to the nearest park, if known.
    pub park: Option<Distance>,

    /// [`Distance`] to the nearest hospital, if known.
    pub hospital: Option<Distance>,
}

/// Number of times a [`Plot`] was viewed.
pub type ViewCount = u32;

/// [`DateTime`] when a [`Plot`] was listed.
pub type CreationDateTime = DateTimeOf<(Plot, unit::Creation)>;

/// [`DateTime`] when a [`Plot`] was reserved.
pub type ReservationDateTime = DateTimeOf<(Plot, unit::Reservation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{Amenities, Area, City, Hash, Id, Plot, Stage, Status};
    use crate::domain::plot::{Block, ParcelNum};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn eur(amount: &str) -> Money {
        Money {
            amount: decimal(amount),
            currency: Currency::Eur,
        }
    }

    fn plot(price: &str, area: &str) -> Plot {
        let city = City::new("Netanya").unwrap();
        let block = Block::new("8871").unwrap();
        let parcel_num = ParcelNum::new("12").unwrap();
        Plot {
            id: Id::new(),
            hash: Hash::new(&city, &block, &parcel_num),
            city,
            block,
            parcel_num,
            price: eur(price),
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
    fn price_per_area_guards_zero_area() {
        assert_eq!(plot("1000000", "1000").price_per_area(), decimal("1000"));
        assert_eq!(plot("1000000", "0").price_per_area(), Decimal::ZERO);
    }

    #[test]
    fn roi_guards_missing_projection_and_zero_price() {
        let mut p = plot("100000", "500");
        assert_eq!(p.roi(), Decimal::ZERO);

        p.projected_value = Some(eur("150000"));
        assert_eq!(p.roi(), decimal("50"));

        p.price = eur("0");
        assert_eq!(p.roi(), Decimal::ZERO);
    }

    #[test]
    fn roi_grows_with_projected_value() {
        let mut p = plot("100000", "500");

        p.projected_value = Some(eur("120000"));
        let lower = p.roi();
        p.projected_value = Some(eur("180000"));
        let higher = p.roi();

        assert!(lower < higher);
    }

    #[test]
    fn cagr_compounds_over_estimated_holding_period() {
        let mut p = plot("100000", "500");
        p.projected_value = Some(eur("200000"));
        p.stage = Stage::BuildingPermit;

        // One year to a doubled value: CAGR equals ROI.
        assert_eq!(p.cagr().round_dp(4), decimal("100"));

        p.stage = Stage::DetailedPlanApproved;
        // Two years: sqrt(2) - 1 per year.
        assert_eq!(p.cagr().round_dp(4), decimal("41.4214"));
    }

    #[test]
    fn days_on_market_never_underflows() {
        let p = plot("100000", "500");
        assert_eq!(p.days_on_market(DateTime::now()), 0);
    }
}
