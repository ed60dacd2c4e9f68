//! # SQLite Storage Module
//!
//! - **connection.rs** - pool setup and schema creation
//! - **repositories/** - one repository per aggregate, each implementing the
//!   matching trait from [`crate::storage::traits`]

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    ChildRepository, ContentRepository, DailyLogRepository, GrowthRepository, MilestoneRepository,
    UserRepository,
};
