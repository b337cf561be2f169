//! [`ReleaseStaleReservations`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start, Update};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{plot, Plot},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`ReleaseStaleReservations`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between reservation sweeps.
    pub interval: time::Duration,

    /// Timeout after which a reservation is considered abandoned.
    pub timeout: time::Duration,
}

/// [`Task`] flipping [`Plot`]s whose reservation went stale back to being
/// available.
///
/// Reservations are informal holds placed by the back office while talking
/// to a buyer; nobody remembers to release them, so the sweep does.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseStaleReservations<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<ReleaseStaleReservations<Self>, Config>>>
    for Service<Db>
where
    ReleaseStaleReservations<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ReleaseStaleReservations<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ReleaseStaleReservations {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::ReleaseStaleReservations` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for ReleaseStaleReservations<Service<Db>>
where
    Db: Database<
        Update<By<Plot, plot::ReservationDateTime>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = plot::ReservationDateTime::now() - self.config.timeout;
        self.service
            .database()
            .execute(Update(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`ReleaseStaleReservations`] execution.
pub type ExecutionError = Traced<database::Error>;
