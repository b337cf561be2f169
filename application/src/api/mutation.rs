//! GraphQL [`Mutation`]s definitions.

use common::Money;
use juniper::graphql_object;
use service::{command, domain::plot, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Captures a new `Lead` from a public contact form.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PLOT_NOT_EXISTS` - the referenced `Plot` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createLead",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
            plot_id = ?plot_id.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn create_lead(
        plot_id: Option<api::plot::Id>,
        name: api::lead::Name,
        phone: api::user::Phone,
        email: Option<api::user::Email>,
        message: Option<api::lead::Message>,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        ctx.service()
            .execute(command::CreateLead {
                plot: plot_id.map(Into::into),
                name: name.into(),
                phone: phone.into(),
                email: email.map(Into::into),
                message: message.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Lead`'s status, optionally appending a note.
    ///
    /// Re-applying the current status without a note is a no-op: the
    /// `Lead` is returned unchanged. Existing notes are never lost.
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
            gql.name = "updateLeadStatus",
            id = %id,
            note = ?note,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_lead_status(
        id: api::lead::Id,
        status: api::lead::Status,
        note: Option<api::lead::Note>,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        drop(ctx.current_admin_session().await?);

        ctx.service()
            .execute(command::UpdateLeadStatus {
                lead_id: id.into(),
                status: status.into(),
                note: note.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Plot` listing.
    ///
    /// Creating the same parcel twice returns the existing `Plot`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NEGATIVE_PRICE` - the provided price is negative;
    /// - `ADMIN_REQUIRED` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            block = %block,
            city = %city,
            gql.name = "createPlot",
            otel.name = Self::SPAN_NAME,
            parcel_num = %parcel_num,
            price = %price,
            stage = ?stage,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_plot(
        city: api::plot::City,
        block: api::plot::Block,
        parcel_num: api::plot::ParcelNum,
        price: Money,
        projected_value: Option<Money>,
        area: api::plot::Area,
        stage: api::plot::Stage,
        location: Option<api::geo::LocationInput>,
        sea_distance: Option<i32>,
        park_distance: Option<i32>,
        hospital_distance: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Plot, Error> {
        drop(ctx.current_admin_session().await?);

        let amenities = plot::Amenities {
            sea: sea_distance
                .map(u32::try_from)
                .transpose()
                .map_err(AsError::into_error)
                .map_err(ctx.error())?,
            park: park_distance
                .map(u32::try_from)
                .transpose()
                .map_err(AsError::into_error)
                .map_err(ctx.error())?,
            hospital: hospital_distance
                .map(u32::try_from)
                .transpose()
                .map_err(AsError::into_error)
                .map_err(ctx.error())?,
        };

        ctx.service()
            .execute(command::CreatePlot {
                city: city.into(),
                block: block.into(),
                parcel_num: parcel_num.into(),
                price,
                projected_value,
                area: area.into(),
                stage: stage.into(),
                location: location.map(Into::into),
                amenities,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Plot`'s sale status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PLOT_NOT_EXISTS` - the `Plot` with the specified ID does not
    ///                       exist;
    /// - `ADMIN_REQUIRED` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePlotStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_plot_status(
        id: api::plot::Id,
        status: api::plot::Status,
        ctx: &Context,
    ) -> Result<api::Plot, Error> {
        drop(ctx.current_admin_session().await?);

        ctx.service()
            .execute(command::UpdatePlotStatus {
                plot_id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new point of interest for the map overlay.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ADMIN_REQUIRED` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createPoi",
            kind = ?kind,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_poi(
        name: api::poi::Name,
        kind: api::poi::Kind,
        icon: api::poi::Icon,
        location: api::geo::LocationInput,
        description: Option<api::poi::Description>,
        ctx: &Context,
    ) -> Result<api::Poi, Error> {
        drop(ctx.current_admin_session().await?);

        ctx.service()
            .execute(command::CreatePoi {
                name: name.into(),
                kind: kind.into(),
                icon: icon.into(),
                location: location.into(),
                description: description.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `User` with the provided credentials and contact info.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another
    ///                      `User`;
    /// - `NO_CONTACT_INFO` - either `UserEmail` or `UserPhone` must be
    ///                       provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = ?email,
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        email: Option<api::user::Email>,
        phone: Option<api::user::Phone>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                role: service::domain::user::Role::User,
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any
    ///                         `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }
}

impl AsError for command::create_lead::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PlotNotExists(_) => {
                Some(api::query::PlotError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_lead_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LeadNotExists(_) => {
                Some(api::query::LeadError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_plot::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NegativePrice => Some(PlotInputError::NegativePrice.into()),
        }
    }
}

impl AsError for command::update_plot_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PlotNotExists(_) => {
                Some(api::query::PlotError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_poi::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoginOccupied(_) => Some(UserInputError::LoginOccupied.into()),
            Self::NoContactInfo => Some(UserInputError::NoContactInfo.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) | Self::UserNotExists(_) => None,
            Self::WrongCredentials => {
                Some(SessionError::WrongCredentials.into())
            }
        }
    }
}

define_error! {
    enum PlotInputError {
        #[code = "NEGATIVE_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "`Plot` price cannot be negative"]
        NegativePrice,
    }
}

define_error! {
    enum UserInputError {
        #[code = "LOGIN_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Provided `UserLogin` is occupied by another `User`"]
        LoginOccupied,

        #[code = "NO_CONTACT_INFO"]
        #[status = BAD_REQUEST]
        #[message = "Either `UserEmail` or `UserPhone` must be provided"]
        NoContactInfo,
    }
}

define_error! {
    enum SessionError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Provided credentials do not match any `User`"]
        WrongCredentials,
    }
}
