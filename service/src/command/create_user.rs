//! [`Command`] registering a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Login, Name, Password, Phone, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] registering a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Name`] the [`User`] signs up with.
    pub name: user::Name,

    /// [`Login`] the [`User`] signs up with.
    pub login: user::Login,

    /// [`Password`] the [`User`] signs up with.
    pub password: SecretBox<user::Password>,

    /// [`Role`] assigned to the [`User`].
    pub role: user::Role,

    /// Contact [`Email`], if provided.
    pub email: Option<user::Email>,

    /// Contact [`Phone`], if provided.
    pub phone: Option<user::Phone>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Login>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            login,
            password,
            role,
            email,
            phone,
        } = cmd;

        // Sales staff must be able to reach the user somehow.
        if email.is_none() && phone.is_none() {
            return Err(tracerr::new!(E::NoContactInfo));
        }

        let occupied = self
            .database()
            .execute(Select(By::new(&login)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some();
        if occupied {
            return Err(tracerr::new!(E::LoginOccupied(login)));
        }

        let user = User {
            id: user::Id::new(),
            name,
            login,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            role,
            email,
            phone,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of a [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Another [`User`] already signed up with the provided [`Login`].
    #[display("`Login({_0})` is occupied already")]
    #[from(ignore)]
    LoginOccupied(#[error(not(source))] user::Login),

    /// Neither [`Email`] nor [`Phone`] was provided.
    #[display("either `Email` or `Phone` must be provided")]
    NoContactInfo,
}
