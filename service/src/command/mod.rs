//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_lead;
pub mod create_plot;
pub mod create_poi;
pub mod create_user;
pub mod create_user_session;
pub mod update_lead_status;
pub mod update_plot_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession, create_lead::CreateLead,
    create_plot::CreatePlot, create_poi::CreatePoi, create_user::CreateUser,
    create_user_session::CreateUserSession,
    update_lead_status::UpdateLeadStatus,
    update_plot_status::UpdatePlotStatus,
};
