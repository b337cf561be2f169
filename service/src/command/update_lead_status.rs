//! [`Command`] for updating a [`lead::Status`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::lead::Status;
use crate::{
    domain::{lead, Lead},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`lead::Status`].
///
/// Idempotent: re-applying the current [`Status`] without a note returns
/// the [`Lead`] untouched. The [`lead::Note`] history is append-only and
/// never lost by a status change.
#[derive(Clone, Debug, From)]
pub struct UpdateLeadStatus {
    /// ID of the [`Lead`] which [`Status`] should be updated.
    pub lead_id: lead::Id,

    /// New [`Status`] of the [`Lead`].
    pub status: lead::Status,

    /// [`lead::Note`] to append along with the change, if any.
    pub note: Option<lead::Note>,
}

impl<Db> Command<UpdateLeadStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Lead>, lead::Id>>,
            Ok = Option<Lead>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Lead, lead::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Lead>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Lead;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateLeadStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateLeadStatus {
            lead_id,
            status,
            note,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Lead`.
        tx.execute(Lock(By::new(lead_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut lead = tx
            .execute(Select(By::<Option<Lead>, _>::new(lead_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LeadNotExists(lead_id))
            .map_err(tracerr::wrap!())?;
        if lead.status == status && note.is_none() {
            return Ok(lead);
        }

        lead.status = status;
        lead.notes.extend(note);
        lead.updated_at = DateTime::now().coerce();
        tx.execute(Update(lead.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(lead)
    }
}

/// Error of [`UpdateLeadStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Lead`] doesn't exist.
    #[display("`Lead(id: {_0})` does not exist")]
    #[from(ignore)]
    LeadNotExists(#[error(not(source))] lead::Id),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{By, Commit, Lock, Select, Transact, Update},
        DateTime,
    };
    use tracerr::Traced;

    use crate::{
        analysis,
        domain::{lead, plot, user, Lead, Plot},
        infra::{database, Database},
        task, Command as _, Config, Service,
    };

    use super::UpdateLeadStatus;

    /// In-memory stand-in for the database, holding a single [`Lead`].
    #[derive(Clone, Debug)]
    struct Store(Arc<Mutex<Lead>>);

    impl Database<Transact> for Store {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Commit> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Lock<By<Lead, lead::Id>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Lead, lead::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Select<By<Option<Lead>, lead::Id>>> for Store {
        type Ok = Option<Lead>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Lead>, lead::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let lead = self.0.lock().unwrap().clone();
            Ok((lead.id == by.into_inner()).then_some(lead))
        }
    }

    impl Database<Update<Lead>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(lead): Update<Lead>,
        ) -> Result<Self::Ok, Self::Err> {
            *self.0.lock().unwrap() = lead;
            Ok(())
        }
    }

    impl Database<Update<By<Plot, plot::ReservationDateTime>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Update<By<Plot, plot::ReservationDateTime>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    fn lead() -> Lead {
        let now = DateTime::now();
        Lead {
            id: lead::Id::new(),
            plot: None,
            name: lead::Name::new("Dana Peretz").unwrap(),
            phone: user::Phone::new("050-123-4567").unwrap(),
            email: None,
            message: None,
            status: lead::Status::New,
            notes: Vec::new(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    fn service(lead: Lead) -> (Service<Store>, task::Background) {
        let config = Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
            scoring: analysis::score::Config::default(),
            release_stale_reservations:
                task::release_stale_reservations::Config {
                    interval: std::time::Duration::from_secs(3600),
                    timeout: std::time::Duration::from_secs(3600),
                },
        };
        Service::new(config, Store(Arc::new(Mutex::new(lead))))
    }

    #[tokio::test]
    async fn appends_notes_without_losing_history() {
        let initial = lead();
        let (svc, _bg) = service(initial.clone());

        let updated = svc
            .execute(UpdateLeadStatus {
                lead_id: initial.id,
                status: lead::Status::Contacted,
                note: Some(lead::Note::new("called once").unwrap()),
            })
            .await
            .unwrap();
        assert_eq!(updated.status, lead::Status::Contacted);
        assert_eq!(updated.notes.len(), 1);

        let updated = svc
            .execute(UpdateLeadStatus {
                lead_id: initial.id,
                status: lead::Status::Qualified,
                note: Some(lead::Note::new("ready to buy").unwrap()),
            })
            .await
            .unwrap();
        assert_eq!(updated.status, lead::Status::Qualified);
        assert_eq!(
            updated.notes,
            vec![
                lead::Note::new("called once").unwrap(),
                lead::Note::new("ready to buy").unwrap(),
            ],
        );
    }

    #[tokio::test]
    async fn same_status_without_note_changes_nothing() {
        let initial = lead();
        let (svc, _bg) = service(initial.clone());

        let updated = svc
            .execute(UpdateLeadStatus {
                lead_id: initial.id,
                status: lead::Status::New,
                note: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, initial.status);
        assert_eq!(updated.notes, initial.notes);
        assert_eq!(updated.updated_at, initial.updated_at);
    }

    #[tokio::test]
    async fn missing_lead_is_reported() {
        let (svc, _bg) = service(lead());

        let result = svc
            .execute(UpdateLeadStatus {
                lead_id: lead::Id::new(),
                status: lead::Status::Contacted,
                note: None,
            })
            .await;

        assert!(matches!(
            result.as_ref().map_err(AsRef::as_ref),
            Err(super::ExecutionError::LeadNotExists(_)),
        ));
    }
}
