//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers
//! decode the `shared` DTOs, map them to domain commands, call a service and
//! map the result back. No business rule lives here.
//!
//! ## Design Patterns
//!
//! - **Handler Pattern**: one async handler per endpoint, grouped by resource
//! - **Dependency Injection**: services reach handlers through axum `State`
//! - **Result Mapping**: `DomainError` becomes a JSON error body with a
//!   matching status code
//! - **Request/Response DTOs**: wire types from the `shared` crate

pub mod rest;
