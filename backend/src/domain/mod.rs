//! # Domain Module
//!
//! Business logic of the LittleSteps backend. Services depend on the storage
//! traits and a [`calendar::LocalCalendar`], never on HTTP types, so every
//! rule can be exercised with an in-memory database and a pinned clock.
//!
//! ## Module Organization
//!
//! - **child_service**: child profiles and age-in-months
//! - **milestone_service**: achievements, upcoming templates, progress
//! - **tracking_service**: growth records, daily logs, daily summary
//! - **content_service**: tips and articles
//! - **user_service**: token authentication and profiles
//! - **calendar**: clock injection and local-day arithmetic
//! - **commands**: service inputs and results
//! - **models**: domain entities
//! - **error**: the `DomainError` taxonomy
//!
//! ## Ownership
//!
//! Children belong to exactly one user. Milestones, growth records and daily
//! logs are only reachable through a child the caller owns; a child owned by
//! someone else is reported as not found.

pub mod calendar;
pub mod child_service;
pub mod commands;
pub mod content_service;
pub mod error;
pub mod milestone_service;
pub mod models;
pub mod tracking_service;
pub mod user_service;

pub use child_service::ChildService;
pub use content_service::ContentService;
pub use error::{DomainError, DomainResult};
pub use milestone_service::MilestoneService;
pub use tracking_service::TrackingService;
pub use user_service::UserService;
