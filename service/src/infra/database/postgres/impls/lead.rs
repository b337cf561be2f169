//! [`Lead`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{lead, Lead},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Reconstructs a [`Lead`] from the provided [`Row`].
fn from_row(row: &Row) -> Lead {
    Lead {
        id: row.get("id"),
        plot: row.get("plot_id"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        message: row.get("message"),
        status: row.get("status"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Columns of the `leads` table, in [`from_row`] order.
const COLUMNS: &str = "\
    id, plot_id, name, phone, email, message, \
    status, notes, created_at, updated_at";

impl<C> Database<Select<By<Option<Lead>, lead::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Lead>, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: lead::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leads \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Lead>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Lead>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(lead)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Lead>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(lead): Update<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        let Lead {
            id,
            plot,
            name,
            phone,
            email,
            message,
            status,
            notes,
            created_at,
            updated_at,
        } = lead;

        const SQL: &str = "\
            INSERT INTO leads (\
                id, plot_id, name, phone, email, message, \
                status, notes, created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, $8::VARCHAR[], \
                $9::TIMESTAMPTZ, $10::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET plot_id = EXCLUDED.plot_id, \
                name = EXCLUDED.name, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                message = EXCLUDED.message, \
                status = EXCLUDED.status, \
                notes = EXCLUDED.notes, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &plot,
                &name,
                &phone,
                &email,
                &message,
                &status,
                &notes,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Lead, lead::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Lead, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: lead::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO leads_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::lead::list::Page, read::lead::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::lead::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::lead::list::Page, read::lead::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::lead::list::Selector {
            arguments,
            filter: read::lead::list::Filter { status, plot },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let plot_idx = plot.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM leads \
             WHERE true \
                   {cursor} \
                   {status_filtering} \
                   {plot_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            plot_filtering =
                plot_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND plot_id = ${idx}::UUID"))
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
                let id: lead::Id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::lead::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::lead::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::lead::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::lead::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM leads";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
