//! Domain models. These are the types services reason about; the wire
//! representations live in the `shared` crate and are produced by the REST
//! mappers.

pub mod child;
pub mod content;
pub mod daily_log;
pub mod growth;
pub mod milestone;
pub mod user;
