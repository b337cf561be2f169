//! [`Command`] for creating a new [`Plot`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::plot::{Area, Block, City, ParcelNum, Stage};
use crate::{
    domain::{geo::Location, plot, Plot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Plot`].
#[derive(Clone, Debug)]
pub struct CreatePlot {
    /// [`City`] of a new [`Plot`].
    pub city: plot::City,

    /// [`Block`] of a new [`Plot`].
    pub block: plot::Block,

    /// [`ParcelNum`] of a new [`Plot`].
    pub parcel_num: plot::ParcelNum,

    /// Asking price of a new [`Plot`].
    pub price: Money,

    /// Projected value of a new [`Plot`].
    pub projected_value: Option<Money>,

    /// [`Area`] of a new [`Plot`].
    pub area: plot::Area,

    /// [`Stage`] of a new [`Plot`].
    pub stage: plot::Stage,

    /// [`Location`] of a new [`Plot`].
    pub location: Option<Location>,

    /// Distances to nearby amenities of a new [`Plot`].
    pub amenities: plot::Amenities,
}

impl<Db> Command<CreatePlot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Plot>, plot::Hash>>,
            Ok = Option<Plot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Plot>, Err = Traced<database::Error>>
        + Database<Lock<By<Plot, plot::Hash>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Plot;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePlot {
            city,
            block,
            parcel_num,
            price,
            projected_value,
            area,
            stage,
            location,
            amenities,
        } = cmd;

        if price.amount < Decimal::ZERO {
            return Err(tracerr::new!(E::NegativePrice));
        }

        let hash = plot::Hash::new(&city, &block, &parcel_num);

        let new_plot = Plot {
            id: plot::Id::new(),
            hash,
            city,
            block,
            parcel_num,
            price,
            projected_value,
            area,
            stage,
            status: plot::Status::Available,
            location,
            amenities,
            views: None,
            created_at: DateTime::now().coerce(),
            reserved_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent creation of the same `Plot`.
        tx.execute(Lock(By::new(hash)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::new(hash)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(existing) = existing {
            // The same parcel is listed already.
            return Ok(existing);
        }

        tx.execute(Insert(new_plot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(new_plot)
    }
}

/// Error of [`CreatePlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Provided price is negative.
    #[display("`Plot` price cannot be negative")]
    NegativePrice,
}
