//! Background [`Task`]s definitions.

mod background;
pub mod release_stale_reservations;

pub use common::Handler as Task;

pub use self::{
    background::Background,
    release_stale_reservations::ReleaseStaleReservations,
};
