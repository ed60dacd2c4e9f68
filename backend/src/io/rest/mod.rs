//! # REST API Interface Layer
//!
//! HTTP endpoints of the LittleSteps backend.
//!
//! - **auth**: bearer-token extractor resolving the calling user
//! - **error**: translation of domain errors into HTTP responses
//! - **mappers/**: conversions between `shared` DTOs and domain types
//! - ***_apis**: handlers, one module per resource

pub mod auth;
pub mod child_apis;
pub mod content_apis;
pub mod error;
pub mod health_apis;
pub mod mappers;
pub mod milestone_apis;
pub mod tracking_apis;
pub mod user_apis;

pub use auth::AuthUser;
pub use error::{ApiError, ApiResult};
