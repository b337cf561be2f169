//! [`Command`] for capturing a new [`Lead`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::lead::{Message, Name};
use crate::{
    domain::{lead, plot, user, Lead, Plot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for capturing a new [`Lead`].
#[derive(Clone, Debug)]
pub struct CreateLead {
    /// [`Plot`] the new [`Lead`] is interested in, if any.
    pub plot: Option<plot::Id>,

    /// [`Name`] the visitor introduced themselves with.
    pub name: lead::Name,

    /// [`user::Phone`] to reach the visitor at.
    pub phone: user::Phone,

    /// [`user::Email`] of the visitor, if provided.
    pub email: Option<user::Email>,

    /// Free-form [`Message`] left by the visitor, if any.
    pub message: Option<lead::Message>,
}

impl<Db> Command<CreateLead> for Service<Db>
where
    Db: Database<
            Select<By<Option<Plot>, plot::Id>>,
            Ok = Option<Plot>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Lead>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Lead;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLead) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLead {
            plot,
            name,
            phone,
            email,
            message,
        } = cmd;

        if let Some(plot_id) = plot {
            let existing = self
                .database()
                .execute(Select(By::<Option<Plot>, _>::new(plot_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if existing.is_none() {
                return Err(tracerr::new!(E::PlotNotExists(plot_id)));
            }
        }

        let now = DateTime::now();
        let lead = Lead {
            id: lead::Id::new(),
            plot,
            name,
            phone,
            email,
            message,
            status: lead::Status::New,
            notes: Vec::new(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(lead.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(lead)
    }
}

/// Error of [`CreateLead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Referenced [`Plot`] doesn't exist.
    #[display("`Plot(id: {_0})` does not exist")]
    #[from(ignore)]
    PlotNotExists(#[error(not(source))] plot::Id),
}
