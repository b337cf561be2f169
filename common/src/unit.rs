//! Markers naming the moments an entity lives through.

/// Moment an entity came into existence.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Moment an entity was last touched.
#[derive(Clone, Copy, Debug)]
pub struct Update;

/// Moment an entity was put on hold.
#[derive(Clone, Copy, Debug)]
pub struct Reservation;

/// Moment an entity stops being valid.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
