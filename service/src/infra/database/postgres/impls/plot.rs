//! [`Plot`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{geo::Location, plot, Plot},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Reconstructs a [`Plot`] from the provided [`Row`].
fn from_row(row: &Row) -> Plot {
    let latitude: Option<Decimal> = row.get("latitude");
    let longitude: Option<Decimal> = row.get("longitude");
    Plot {
        id: row.get("id"),
        hash: row.get("hash"),
        city: row.get("city"),
        block: row.get("block"),
        parcel_num: row.get("parcel_num"),
        price: Money {
            amount: row.get("price"),
            currency: row.get("price_currency"),
        },
        projected_value: row
            .get::<_, Option<Decimal>>("projected_value")
            .map(|amount| Money {
                amount,
                currency: row.get("projected_value_currency"),
            }),
        area: row.get("area"),
        stage: row.get("stage"),
        status: row.get("status"),
        location: latitude.zip(longitude).map(|(latitude, longitude)| {
            Location {
                latitude,
                longitude,
            }
        }),
        amenities: plot::Amenities {
            sea: row
                .get::<_, Option<i32>>("sea_distance")
                .map(u32::try_from)
                .transpose()
                .expect("`sea_distance` overflow"),
            park: row
                .get::<_, Option<i32>>("park_distance")
                .map(u32::try_from)
                .transpose()
                .expect("`park_distance` overflow"),
            hospital: row
                .get::<_, Option<i32>>("hospital_distance")
                .map(u32::try_from)
                .transpose()
                .expect("`hospital_distance` overflow"),
        },
        views: row
            .get::<_, Option<i32>>("views")
            .map(u32::try_from)
            .transpose()
            .expect("`views` overflow"),
        created_at: row.get("created_at"),
        reserved_at: row.get("reserved_at"),
    }
}

/// Columns of the `plots` table, in [`from_row`] order.
const COLUMNS: &str = "\
    id, hash, city, block, parcel_num, \
    price, price_currency, \
    projected_value, projected_value_currency, \
    area, stage, status, \
    latitude, longitude, \
    sea_distance, park_distance, hospital_distance, \
    views, created_at, reserved_at";

impl<C, IDs> Database<Select<By<HashMap<plot::Id, Plot>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[plot::Id]>,
{
    type Ok = HashMap<plot::Id, Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<plot::Id, Plot>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[plot::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM plots \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let plot = from_row(&row);
                (plot.id, plot)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Plot>, plot::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<plot::Id, Plot>, [plot::Id; 1]>>,
        Ok = HashMap<plot::Id, Plot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Plot>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Plot>, plot::Hash>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Plot>, plot::Id>>,
        Ok = Option<Plot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Plot>, plot::Hash>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hash: plot::Hash = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM plots \
            WHERE hash = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&hash])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get::<_, plot::Id>("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Plot>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Plot>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(plot): Insert<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(plot)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Plot>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(plot): Update<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        let Plot {
            id,
            hash,
            city,
            block,
            parcel_num,
            price,
            projected_value,
            area,
            stage,
            status,
            location,
            amenities,
            views,
            created_at,
            reserved_at,
        } = plot;

        let projected_amount = projected_value.map(|m| m.amount);
        let projected_currency = projected_value.map(|m| m.currency);
        let latitude = location.map(|l| l.latitude);
        let longitude = location.map(|l| l.longitude);
        let sea = amenities
            .sea
            .map(i32::try_from)
            .transpose()
            .expect("`sea_distance` overflow");
        let park = amenities
            .park
            .map(i32::try_from)
            .transpose()
            .expect("`park_distance` overflow");
        let hospital = amenities
            .hospital
            .map(i32::try_from)
            .transpose()
            .expect("`hospital_distance` overflow");
        let views = views
            .map(i32::try_from)
            .transpose()
            .expect("`views` overflow");

        const SQL: &str = "\
            INSERT INTO plots (\
                id, hash, city, block, parcel_num, \
                price, price_currency, \
                projected_value, projected_value_currency, \
                area, stage, status, \
                latitude, longitude, \
                sea_distance, park_distance, hospital_distance, \
                views, created_at, reserved_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::NUMERIC, $7::INT2, \
                $8::NUMERIC, $9::INT2, \
                $10::NUMERIC, $11::INT2, $12::INT2, \
                $13::NUMERIC, $14::NUMERIC, \
                $15::INT4, $16::INT4, $17::INT4, \
                $18::INT4, $19::TIMESTAMPTZ, $20::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET hash = EXCLUDED.hash, \
                city = EXCLUDED.city, \
                block = EXCLUDED.block, \
                parcel_num = EXCLUDED.parcel_num, \
                price = EXCLUDED.price, \
                price_currency = EXCLUDED.price_currency, \
                projected_value = EXCLUDED.projected_value, \
                projected_value_currency = \
                    EXCLUDED.projected_value_currency, \
                area = EXCLUDED.area, \
                stage = EXCLUDED.stage, \
                status = EXCLUDED.status, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                sea_distance = EXCLUDED.sea_distance, \
                park_distance = EXCLUDED.park_distance, \
                hospital_distance = EXCLUDED.hospital_distance, \
                views = EXCLUDED.views, \
                created_at = EXCLUDED.created_at, \
                reserved_at = EXCLUDED.reserved_at";
        self.exec(
            SQL,
            &[
                &id,
                &hash,
                &city,
                &block,
                &parcel_num,
                &price.amount,
                &price.currency,
                &projected_amount,
                &projected_currency,
                &area,
                &stage,
                &status,
                &latitude,
                &longitude,
                &sea,
                &park,
                &hospital,
                &views,
                &created_at,
                &reserved_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Plot, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Plot, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: plot::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO plots_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Plot, plot::Hash>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Plot, plot::Hash>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hash: plot::Hash = by.into_inner();

        const SQL: &str = "\
            INSERT INTO plots_creation_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (hash) DO NOTHING";
        self.query(SQL, &[&hash])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::plot::list::Page, read::plot::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::plot::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::plot::list::Page, read::plot::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::plot::list::Selector {
            arguments,
            filter:
                read::plot::list::Filter {
                    city,
                    status,
                    search,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let city_idx = city.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let search_pattern = search.as_ref().map(|s| FuzzPattern::new(s));
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM plots \
             WHERE true \
                   {cursor} \
                   {city_filtering} \
                   {status_filtering} \
                   {search_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            city_filtering =
                city_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND city = ${idx}::VARCHAR"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            search_filtering =
                search_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(city || ' ' || block || ' ' || \
                         parcel_num) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id: plot::Id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::plot::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::plot::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::plot::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::plot::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM plots";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Select<By<Vec<Plot>, read::plot::snapshot::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Plot>, read::plot::snapshot::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::plot::snapshot::Filter { city, status } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let city_idx = city.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM plots \
             WHERE true \
                   {city_filtering} \
                   {status_filtering} \
             ORDER BY created_at ASC, id ASC",
            city_filtering =
                city_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND city = ${idx}::VARCHAR"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Update<By<Plot, plot::ReservationDateTime>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Plot, plot::ReservationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline: plot::ReservationDateTime = by.into_inner();

        const SQL: &str = "\
            UPDATE plots \
            SET status = $1::INT2, \
                reserved_at = NULL \
            WHERE status = $2::INT2 \
              AND reserved_at < $3::TIMESTAMPTZ";
        self.exec(
            SQL,
            &[
                &plot::Status::Available,
                &plot::Status::Reserved,
                &deadline,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
