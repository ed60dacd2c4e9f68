//! # Storage Module
//!
//! Persistence for the LittleSteps backend. Domain services depend only on
//! the traits in [`traits`]; the SQLite repositories are wired in at startup.
//!
//! ## Layout
//!
//! - **traits.rs** - storage abstractions, one per aggregate
//! - **sqlite/** - SQLx-backed implementations and connection handling
//! - **seed.rs** - default milestone, tip and article catalog
//!
//! Timestamps are stored as sortable RFC 3339 UTC strings, dates as
//! `YYYY-MM-DD`, and structured values (log payloads, preferences, tags) as
//! JSON text.

pub mod seed;
pub mod sqlite;
pub mod traits;

pub use sqlite::DbConnection;
pub use traits::*;
