//! GraphQL [`Query`]s definitions.

use common::{Money, Percent};
use juniper::graphql_object;
use service::{analysis, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Plot` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PLOT_NOT_EXISTS` - the `Plot` with the specified ID does not
    ///                       exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "plot",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn plot(
        id: api::plot::Id,
        ctx: &Context,
    ) -> Result<api::Plot, Error> {
        ctx.service()
            .execute(query::plot::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PlotError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Plot`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            city = ?city.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "plots",
            last = ?last,
            search = ?search,
            status = ?status,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn plots(
        first: Option<i32>,
        after: Option<api::plot::list::Cursor>,
        last: Option<i32>,
        before: Option<api::plot::list::Cursor>,
        city: Option<api::plot::City>,
        status: Option<api::plot::Status>,
        search: Option<String>,
        ctx: &Context,
    ) -> Result<api::plot::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::plots::List::by(read::plot::list::Selector {
                arguments: read::plot::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::plot::list::Filter {
                    city: city.map(Into::into),
                    status: status.map(Into::into),
                    search,
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Explores the catalog: applies the provided filters, orders the
    /// result, and derives market aggregates from exactly the visible set.
    #[tracing::instrument(
        skip_all,
        fields(
            below_average = ?below_average,
            city = ?city.as_ref().map(ToString::to_string),
            gql.name = "explore",
            otel.name = Self::SPAN_NAME,
            search = ?search,
            sort = ?sort,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn explore(
        city: Option<api::plot::City>,
        min_price: Option<api::scalar::Decimal>,
        max_price: Option<api::scalar::Decimal>,
        min_area: Option<api::scalar::Decimal>,
        max_area: Option<api::scalar::Decimal>,
        min_roi: Option<api::scalar::Decimal>,
        ripeness: Option<api::plot::Ripeness>,
        stage: Option<api::plot::Stage>,
        search: Option<String>,
        viewport: Option<api::geo::ViewportInput>,
        below_average: Option<bool>,
        sort: Option<api::market::SortKey>,
        origin: Option<api::geo::LocationInput>,
        ctx: &Context,
    ) -> Result<api::market::Explore, Error> {
        let snapshot = ctx
            .service()
            .execute(query::plots::Snapshot::by(
                read::plot::snapshot::Filter::default(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        let filter = analysis::Filter {
            city: city.map(Into::into),
            min_price: min_price.map(Into::into),
            max_price: max_price.map(Into::into),
            min_area: min_area.map(Into::into),
            max_area: max_area.map(Into::into),
            min_roi: min_roi.map(Into::into),
            ripeness: ripeness.map(Into::into),
            stage: stage.map(Into::into),
            search,
            viewport: viewport.map(Into::into),
            below_average: below_average.unwrap_or(false),
        };
        let scoring = ctx.service().config().scoring;
        let visible = analysis::catalog::visible(
            &snapshot,
            &filter,
            sort.map_or(analysis::SortKey::Recommended, Into::into),
            origin.map(Into::into),
            &scoring,
        );

        Ok(api::market::Explore::new(visible, &scoring))
    }

    /// Returns the `Plot`s picked for side-by-side comparison, in the
    /// order they were picked.
    ///
    /// At most three `Plot`s are compared at once; extra IDs and IDs of
    /// `Plot`s that no longer exist are skipped silently, since the
    /// shortlist is reconstructed from whatever the browser persisted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "compare",
            ids = ?ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn compare(
        ids: Vec<api::plot::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Plot>, Error> {
        let mut ids = ids
            .into_iter()
            .map(service::domain::plot::Id::from)
            .collect::<Vec<_>>();
        ids.truncate(analysis::CompareSet::MAX);

        let mut by_id = ctx
            .service()
            .execute(query::plot::ByIds::by(ids.clone()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        Ok(ids
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .map(Into::into)
            .collect())
    }

    /// Compares cities of the catalog by their average investment score,
    /// best first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cityComparison",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn city_comparison(
        ctx: &Context,
    ) -> Result<Vec<api::market::CityStats>, Error> {
        let snapshot = ctx
            .service()
            .execute(query::plots::Snapshot::by(
                read::plot::snapshot::Filter::default(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        Ok(analysis::market::compare_cities(
            &snapshot,
            &ctx.service().config().scoring,
        )
        .into_iter()
        .map(Into::into)
        .collect())
    }

    /// Calculates the fixed monthly mortgage payment for buying at the
    /// provided price.
    ///
    /// Returns nothing when the term is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "monthlyPayment",
            ltv = %ltv,
            otel.name = Self::SPAN_NAME,
            price = %price,
            rate = %annual_rate,
            term_months = %term_months,
        ),
    )]
    pub fn monthly_payment(
        price: Money,
        ltv: Percent,
        annual_rate: Percent,
        term_months: i32,
    ) -> Option<Money> {
        let months = u32::try_from(term_months).ok()?;
        analysis::mortgage::monthly_payment(
            &price,
            &analysis::mortgage::Terms {
                ltv,
                annual_rate,
                months,
            },
        )
    }

    /// Returns all the points of interest for the map overlay.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pois",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pois(ctx: &Context) -> Result<Vec<api::Poi>, Error> {
        ctx.service()
            .execute(query::pois::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|pois| pois.into_iter().map(Into::into).collect())
    }

    /// Returns the `Lead` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEAD_NOT_EXISTS` - the `Lead` with the specified ID does not
    ///                       exist;
    /// - `ADMIN_REQUIRED` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "lead",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn lead(
        id: api::lead::Id,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        drop(ctx.current_admin_session().await?);

        ctx.service()
            .execute(query::lead::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| LeadError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Lead`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `ADMIN_REQUIRED` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "leads",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            plot_id = ?plot_id.as_ref().map(ToString::to_string),
            status = ?status,
        ),
    )]
    pub async fn leads(
        first: Option<i32>,
        after: Option<api::lead::list::Cursor>,
        last: Option<i32>,
        before: Option<api::lead::list::Cursor>,
        status: Option<api::lead::Status>,
        plot_id: Option<api::plot::Id>,
        ctx: &Context,
    ) -> Result<api::lead::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        drop(ctx.current_admin_session().await?);

        ctx.service()
            .execute(query::leads::List::by(read::lead::list::Selector {
                arguments: read::lead::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::lead::list::Filter {
                    status: status.map(Into::into),
                    plot: plot_id.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum PlotError {
        #[code = "PLOT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Plot` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LeadError {
        #[code = "LEAD_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Lead` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
