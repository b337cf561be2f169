//! [`Command`] for creating a new [`Poi`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::poi::{Description, Icon, Kind, Name};
use crate::{
    domain::{geo::Location, poi, Poi},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Poi`].
#[derive(Clone, Debug)]
pub struct CreatePoi {
    /// [`Name`] of a new [`Poi`].
    pub name: poi::Name,

    /// [`Kind`] of a new [`Poi`].
    pub kind: poi::Kind,

    /// [`Icon`] of a new [`Poi`].
    pub icon: poi::Icon,

    /// [`Location`] of a new [`Poi`].
    pub location: Location,

    /// [`Description`] of a new [`Poi`].
    pub description: Option<poi::Description>,
}

impl<Db> Command<CreatePoi> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Poi>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Poi;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePoi) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePoi {
            name,
            kind,
            icon,
            location,
            description,
        } = cmd;

        let poi = Poi {
            id: poi::Id::new(),
            name,
            kind,
            icon,
            location,
            description,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(poi.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(poi)
    }
}

/// Error of [`CreatePoi`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
