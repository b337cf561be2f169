//! [`Lead`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A captured contact request.
#[derive(Clone, Debug, From)]
pub struct Lead {
    /// ID of this [`Lead`].
    id: Id,

    /// Underlying [`domain::Lead`].
    lead: OnceCell<domain::Lead>,
}

impl From<domain::Lead> for Lead {
    fn from(lead: domain::Lead) -> Self {
        Self {
            id: lead.id.into(),
            lead: OnceCell::new_with(Some(lead)),
        }
    }
}

impl Lead {
    /// Creates a new [`Lead`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Lead`] with the provided ID exists,
    /// otherwise accessing this [`Lead`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            lead: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Lead`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Lead`] doesn't exist.
    async fn lead(&self, ctx: &Context) -> Result<&domain::Lead, Error> {
        let id = self.id.into();
        self.lead
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::lead::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.ok_or_else(|| {
                            api::query::LeadError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A captured contact request.
#[graphql_object(context = Context)]
impl Lead {
    /// Unique identifier of this `Lead`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Plot` this `Lead` is interested in, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.plot",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn plot(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Plot>, Error> {
        Ok(self.lead(ctx).await?.plot.map(|id| {
            #[expect(
                unsafe_code,
                reason = "`Lead` references only existing `Plot`s"
            )]
            unsafe {
                api::Plot::new_unchecked(id)
            }
        }))
    }

    /// Name the visitor introduced themselves with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.lead(ctx).await?.name.clone().into())
    }

    /// Phone number to reach the visitor at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<api::user::Phone, Error> {
        Ok(self.lead(ctx).await?.phone.clone().into())
    }

    /// Email address of the visitor, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Email>, Error> {
        Ok(self.lead(ctx).await?.email.clone().map(Into::into))
    }

    /// Free-form message left by the visitor, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.message",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn message(
        &self,
        ctx: &Context,
    ) -> Result<Option<Message>, Error> {
        Ok(self.lead(ctx).await?.message.clone().map(Into::into))
    }

    /// Processing status of this `Lead`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.lead(ctx).await?.status.into())
    }

    /// Notes accumulated while working this `Lead`, oldest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn notes(&self, ctx: &Context) -> Result<Vec<Note>, Error> {
        Ok(self
            .lead(ctx)
            .await?
            .notes
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when this `Lead` was captured.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.lead(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Lead` was last updated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.lead(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Lead`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::lead::Id)]
#[into(domain::lead::Id)]
#[graphql(name = "LeadId", transparent)]
pub struct Id(Uuid);

/// Name a `Lead` introduced themselves with.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadName",
    with = scalar::Via::<domain::lead::Name>,
)]
pub struct Name(domain::lead::Name);

/// Free-form message left by a `Lead`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadMessage",
    with = scalar::Via::<domain::lead::Message>,
)]
pub struct Message(domain::lead::Message);

/// Note left on a `Lead` by the back office.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadNote",
    with = scalar::Via::<domain::lead::Note>,
)]
pub struct Note(domain::lead::Note);

/// Processing status of a `Lead`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "LeadStatus")]
pub enum Status {
    /// Captured, not yet worked.
    New,

    /// Contacted by the back office.
    Contacted,

    /// Qualified as a serious buyer.
    Qualified,

    /// Converted into a sale.
    Converted,

    /// Lost.
    Lost,
}

impl From<domain::lead::Status> for Status {
    fn from(status: domain::lead::Status) -> Self {
        use domain::lead::Status as S;
        match status {
            S::New => Self::New,
            S::Contacted => Self::Contacted,
            S::Qualified => Self::Qualified,
            S::Converted => Self::Converted,
            S::Lost => Self::Lost,
        }
    }
}

impl From<Status> for domain::lead::Status {
    fn from(status: Status) -> Self {
        use Status as S;
        match status {
            S::New => Self::New,
            S::Contacted => Self::Contacted,
            S::Qualified => Self::Qualified,
            S::Converted => Self::Converted,
            S::Lost => Self::Lost,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Lead`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Lead};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Lead` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::lead::list::Cursor)]
    #[graphql(
        name = "LeadListCursor",
        with = scalar::Via::<read::lead::list::Cursor>,
    )]
    pub struct Cursor(pub read::lead::list::Cursor);

    /// Edge in the [`Lead`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::lead::list::Edge);

    /// Edge in the `Lead` list.
    #[graphql_object(name = "LeadListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `LeadListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `LeadListEdge`.
        #[must_use]
        pub fn node(&self) -> Lead {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Lead` \
                          existence"
            )]
            unsafe {
                Lead::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Lead`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::lead::list::Connection);

    /// Connection of the `Lead` list.
    #[graphql_object(name = "LeadListConnection", context = Context)]
    impl Connection {
        /// Edges of this `LeadListConnection`.
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
        /// Underlying [`read::lead::list::PageInfo`].
        info: read::lead::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `LeadListConnection` page.
    #[graphql_object(name = "LeadListPageInfo", context = Context)]
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

        /// Total `Lead` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::leads::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
