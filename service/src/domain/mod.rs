//! Domain definitions.

pub mod geo;
pub mod lead;
pub mod plot;
pub mod poi;
pub mod user;

pub use self::{lead::Lead, plot::Plot, poi::Poi, user::User};
