//! [`Plot`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{analysis, domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A land plot offered for investment.
#[derive(Clone, Debug, From)]
pub struct Plot {
    /// ID of this [`Plot`].
    id: Id,

    /// Underlying [`domain::Plot`].
    plot: OnceCell<domain::Plot>,
}

impl From<domain::Plot> for Plot {
    fn from(plot: domain::Plot) -> Self {
        Self {
            id: plot.id.into(),
            plot: OnceCell::new_with(Some(plot)),
        }
    }
}

impl Plot {
    /// Creates a new [`Plot`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Plot`] with the provided ID exists,
    /// otherwise accessing this [`Plot`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            plot: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Plot`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Plot`] doesn't exist.
    async fn plot(&self, ctx: &Context) -> Result<&domain::Plot, Error> {
        let id = self.id.into();
        self.plot
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::plot::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::PlotError::NotExists.into()
                        }))
                    })
            })
            .await
    }

    /// Returns the investment [`Score`] of the underlying [`domain::Plot`]
    /// against the whole visible catalog.
    ///
    /// [`Score`]: analysis::Score
    async fn calculate_score(
        &self,
        ctx: &Context,
    ) -> Result<analysis::Score, Error> {
        let plot = self.plot(ctx).await?;
        let snapshot = ctx
            .service()
            .execute(query::plots::Snapshot::by(
                read::plot::snapshot::Filter::default(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let market = analysis::market::Summary::of(
            &snapshot,
            &ctx.service().config().scoring,
        )
        .map_or_else(
            || rust_decimal::Decimal::ZERO,
            |s| s.avg_price_per_area,
        );
        Ok(analysis::Score::calculate(
            plot,
            market,
            &ctx.service().config().scoring,
        ))
    }
}

/// A land plot offered for investment.
#[graphql_object(context = Context)]
impl Plot {
    /// Unique identifier of this `Plot`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// City this `Plot` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.city",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn city(&self, ctx: &Context) -> Result<City, Error> {
        Ok(self.plot(ctx).await?.city.clone().into())
    }

    /// Cadastral block number of this `Plot`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.block",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn block(&self, ctx: &Context) -> Result<Block, Error> {
        Ok(self.plot(ctx).await?.block.clone().into())
    }

    /// Parcel number of this `Plot` within its block.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.parcelNum",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn parcel_num(&self, ctx: &Context) -> Result<ParcelNum, Error> {
        Ok(self.plot(ctx).await?.parcel_num.clone().into())
    }

    /// Asking price of this `Plot`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.plot(ctx).await?.price)
    }

    /// Projected value of this `Plot` once its planning stage completes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.projectedValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn projected_value(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.plot(ctx).await?.projected_value)
    }

    /// Area of this `Plot` in square meters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.area",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn area(&self, ctx: &Context) -> Result<Area, Error> {
        Ok(self.plot(ctx).await?.area.into())
    }

    /// Planning-approval stage of this `Plot`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.stage",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn stage(&self, ctx: &Context) -> Result<Stage, Error> {
        Ok(self.plot(ctx).await?.stage.into())
    }

    /// Sale status of this `Plot`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.plot(ctx).await?.status.into())
    }

    /// Geographic location of this `Plot`, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::geo::Location>, Error> {
        Ok(self.plot(ctx).await?.location.map(Into::into))
    }

    /// Distance from this `Plot` to the sea, in meters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.seaDistance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sea_distance(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        self.plot(ctx)
            .await?
            .amenities
            .sea
            .map(i32::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Distance from this `Plot` to the nearest park, in meters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.parkDistance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn park_distance(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        self.plot(ctx)
            .await?
            .amenities
            .park
            .map(i32::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Distance from this `Plot` to the nearest hospital, in meters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.hospitalDistance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hospital_distance(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        self.plot(ctx)
            .await?
            .amenities
            .hospital
            .map(i32::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `DateTime` when this `Plot` was listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.plot(ctx).await?.created_at.coerce())
    }

    /// Price of this `Plot` per square meter of its area.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.pricePerArea",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price_per_area(
        &self,
        ctx: &Context,
    ) -> Result<scalar::Decimal, Error> {
        Ok(self.plot(ctx).await?.price_per_area().into())
    }

    /// Projected return on investment of this `Plot`, in percent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.roi",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn roi(&self, ctx: &Context) -> Result<scalar::Decimal, Error> {
        Ok(self.plot(ctx).await?.roi().into())
    }

    /// Compound annual growth rate of this `Plot`, in percent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.cagr",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cagr(&self, ctx: &Context) -> Result<scalar::Decimal, Error> {
        Ok(self.plot(ctx).await?.cagr().into())
    }

    /// Number of whole days this `Plot` has been on the market.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.daysOnMarket",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn days_on_market(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.plot(ctx).await?.days_on_market(DateTime::now()))
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Demand estimate of this `Plot` listing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.heat",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn heat(&self, ctx: &Context) -> Result<Heat, Error> {
        Ok(Heat(analysis::Heat::estimate(
            self.plot(ctx).await?,
            DateTime::now(),
            &ctx.service().config().scoring,
        )))
    }

    /// Investment score of this `Plot` on a 0 to 10 scale, ranked against
    /// the whole catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.score",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn score(
        &self,
        ctx: &Context,
    ) -> Result<scalar::Decimal, Error> {
        Ok(self.calculate_score(ctx).await?.as_decimal().into())
    }

    /// Letter grade of this `Plot`'s investment score.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Plot.grade",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn grade(&self, ctx: &Context) -> Result<Grade, Error> {
        Ok(self.calculate_score(ctx).await?.grade().into())
    }
}

/// Unique identifier of a `Plot`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::plot::Id)]
#[into(domain::plot::Id)]
#[graphql(name = "PlotId", transparent)]
pub struct Id(Uuid);

/// City of a `Plot`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PlotCity",
    with = scalar::Via::<domain::plot::City>,
)]
pub struct City(domain::plot::City);

/// Cadastral block number of a `Plot`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PlotBlock",
    with = scalar::Via::<domain::plot::Block>,
)]
pub struct Block(domain::plot::Block);

/// Parcel number of a `Plot`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PlotParcelNum",
    with = scalar::Via::<domain::plot::ParcelNum>,
)]
pub struct ParcelNum(domain::plot::ParcelNum);

/// Area of a `Plot` in square meters.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PlotArea",
    with = scalar::Via::<domain::plot::Area>,
)]
pub struct Area(domain::plot::Area);

/// Planning-approval stage of a `Plot`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotStage")]
pub enum Stage {
    /// Agricultural land without planning.
    Agricultural,

    /// Master plan deposited for approval.
    MasterPlanDeposit,

    /// Master plan approved.
    MasterPlanApproved,

    /// Detailed plan under preparation.
    DetailedPlanPreparation,

    /// Detailed plan approved.
    DetailedPlanApproved,

    /// Building permit issued.
    BuildingPermit,
}

impl From<domain::plot::Stage> for Stage {
    fn from(stage: domain::plot::Stage) -> Self {
        use domain::plot::Stage as S;
        match stage {
            S::Agricultural => Self::Agricultural,
            S::MasterPlanDeposit => Self::MasterPlanDeposit,
            S::MasterPlanApproved => Self::MasterPlanApproved,
            S::DetailedPlanPreparation => Self::DetailedPlanPreparation,
            S::DetailedPlanApproved => Self::DetailedPlanApproved,
            S::BuildingPermit => Self::BuildingPermit,
        }
    }
}

impl From<Stage> for domain::plot::Stage {
    fn from(stage: Stage) -> Self {
        use Stage as S;
        match stage {
            S::Agricultural => Self::Agricultural,
            S::MasterPlanDeposit => Self::MasterPlanDeposit,
            S::MasterPlanApproved => Self::MasterPlanApproved,
            S::DetailedPlanPreparation => Self::DetailedPlanPreparation,
            S::DetailedPlanApproved => Self::DetailedPlanApproved,
            S::BuildingPermit => Self::BuildingPermit,
        }
    }
}

/// Sale status of a `Plot`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotStatus")]
pub enum Status {
    /// Offered for sale.
    Available,

    /// Reserved by a buyer.
    Reserved,

    /// Sold.
    Sold,
}

impl From<domain::plot::Status> for Status {
    fn from(status: domain::plot::Status) -> Self {
        use domain::plot::Status as S;
        match status {
            S::Available => Self::Available,
            S::Reserved => Self::Reserved,
            S::Sold => Self::Sold,
        }
    }
}

impl From<Status> for domain::plot::Status {
    fn from(status: Status) -> Self {
        use Status as S;
        match status {
            S::Available => Self::Available,
            S::Reserved => Self::Reserved,
            S::Sold => Self::Sold,
        }
    }
}

/// Letter grade of a `Plot`'s investment score.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotGrade")]
pub enum Grade {
    /// Excellent investment.
    A,

    /// Good investment.
    B,

    /// Fair investment.
    C,

    /// Below average investment.
    D,

    /// Poor investment.
    F,
}

impl From<analysis::Grade> for Grade {
    fn from(grade: analysis::Grade) -> Self {
        use analysis::Grade as G;
        match grade {
            G::A => Self::A,
            G::B => Self::B,
            G::C => Self::C,
            G::D => Self::D,
            G::F => Self::F,
        }
    }
}

/// Readiness bucket of a `Plot`, derived from its investment score.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotRipeness")]
pub enum Ripeness {
    /// Early-stage opportunity.
    Early,

    /// Developing opportunity.
    Developing,

    /// Prime opportunity.
    Prime,
}

impl From<Ripeness> for analysis::Ripeness {
    fn from(ripeness: Ripeness) -> Self {
        use Ripeness as R;
        match ripeness {
            R::Early => Self::Early,
            R::Developing => Self::Developing,
            R::Prime => Self::Prime,
        }
    }
}

/// Demand estimate of a `Plot` listing.
#[derive(Clone, Copy, Debug, From)]
pub struct Heat(analysis::Heat);

/// Demand estimate of a `Plot` listing.
#[graphql_object(name = "PlotHeat", context = Context)]
impl Heat {
    /// Kind of this `PlotHeat`.
    #[must_use]
    pub fn kind(&self) -> HeatKind {
        self.0.into()
    }

    /// Display label of this `PlotHeat`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.0.label()
    }

    /// Display color of this `PlotHeat`, as a hex RGB code.
    #[must_use]
    pub fn color(&self) -> &'static str {
        self.0.color()
    }
}

/// Kind of a `PlotHeat` demand estimate.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PlotHeatKind")]
pub enum HeatKind {
    /// Heavily viewed listing.
    Hot,

    /// Steadily viewed listing.
    Warm,

    /// Recently listed.
    New,

    /// Rarely viewed listing.
    Quiet,
}

impl From<analysis::Heat> for HeatKind {
    fn from(heat: analysis::Heat) -> Self {
        use analysis::Heat as H;
        match heat {
            H::Hot => Self::Hot,
            H::Warm => Self::Warm,
            H::New => Self::New,
            H::Quiet => Self::Quiet,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Plot`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Plot};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Plot` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::plot::list::Cursor)]
    #[graphql(
        name = "PlotListCursor",
        with = scalar::Via::<read::plot::list::Cursor>,
    )]
    pub struct Cursor(pub read::plot::list::Cursor);

    /// Edge in the [`Plot`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::plot::list::Edge);

    /// Edge in the `Plot` list.
    #[graphql_object(name = "PlotListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PlotListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PlotListEdge`.
        #[must_use]
        pub fn node(&self) -> Plot {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Plot` \
                          existence"
            )]
            unsafe {
                Plot::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Plot`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::plot::list::Connection);

    /// Connection of the `Plot` list.
    #[graphql_object(name = "PlotListConnection", context = Context)]
    impl Connection {
        /// Edges of this `PlotListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::plot::list::PageInfo`].
        info: read::plot::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `PlotListConnection` page.
    #[graphql_object(name = "PlotListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Plot` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::plots::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
