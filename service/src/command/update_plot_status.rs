//! [`Command`] for updating a [`plot::Status`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::plot::Status;
use crate::{
    domain::{plot, Plot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`plot::Status`].
#[derive(Clone, Copy, Debug, From)]
pub struct UpdatePlotStatus {
    /// ID of the [`Plot`] which [`Status`] should be updated.
    pub plot_id: plot::Id,

    /// New [`Status`] of the [`Plot`].
    pub status: plot::Status,
}

impl<Db> Command<UpdatePlotStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Plot>, plot::Id>>,
            Ok = Option<Plot>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Plot, plot::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Plot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Plot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePlotStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePlotStatus { plot_id, status } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Plot`.
        tx.execute(Lock(By::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut plot = tx
            .execute(Select(By::<Option<Plot>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PlotNotExists(plot_id))
            .map_err(tracerr::wrap!())?;
        if plot.status == status {
            return Ok(plot);
        }

        plot.status = status;
        plot.reserved_at = match status {
            plot::Status::Reserved => Some(DateTime::now().coerce()),
            plot::Status::Available | plot::Status::Sold => None,
        };
        tx.execute(Update(plot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(plot)
    }
}

/// Error of [`UpdatePlotStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Plot`] doesn't exist.
    #[display("`Plot(id: {_0})` does not exist")]
    #[from(ignore)]
    PlotNotExists(#[error(not(source))] plot::Id),
}
