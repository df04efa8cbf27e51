//! Presence data and the weekday aggregation built on top of it.
//! The basic idea is:
//!  - [source::PresenceSource] produces a [entities::PresenceTable] once per request.
//!  - [aggregation] turns a single user's schedule into weekday grouped values.
//!  - Nothing here is cached or mutated, every call works on freshly loaded data.

pub mod aggregation;
pub mod entities;
pub mod source;
