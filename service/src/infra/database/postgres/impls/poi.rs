//! [`Poi`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{geo::Location, Poi},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<Poi>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Poi>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Poi>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name, kind, icon, \
                   latitude, longitude, \
                   description \
            FROM pois \
            ORDER BY name ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Poi {
                id: row.get("id"),
                name: row.get("name"),
                kind: row.get("kind"),
                icon: row.get("icon"),
                location: Location {
                    latitude: row.get("latitude"),
                    longitude: row.get("longitude"),
                },
                description: row.get("description"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Poi>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(poi): Insert<Poi>,
    ) -> Result<Self::Ok, Self::Err> {
        let Poi {
            id,
            name,
            kind,
            icon,
            location,
            description,
        } = poi;

        const SQL: &str = "\
            INSERT INTO pois (\
                id, name, kind, icon, \
                latitude, longitude, \
                description \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, $4::VARCHAR, \
                $5::NUMERIC, $6::NUMERIC, \
                $7::VARCHAR \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &kind,
                &icon,
                &location.latitude,
                &location.longitude,
                &description,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
