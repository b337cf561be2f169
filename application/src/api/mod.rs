//! GraphQL API definitions.

pub mod geo;
pub mod lead;
pub mod market;
mod mutation;
pub mod plot;
pub mod poi;
mod query;
pub mod scalar;
mod subscription;
pub mod user;

use crate::define_error;

pub use self::{
    lead::Lead,
    mutation::Mutation,
    plot::Plot,
    poi::Poi,
    query::Query,
    subscription::Subscription,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
