//! # LittleSteps Backend
//!
//! REST service behind the LittleSteps parenting tracker: child profiles,
//! developmental milestones, growth measurements, daily care logs and
//! age-based content.
//!
//! ## Architecture
//!
//! - **io**: axum handlers, bearer-token auth, DTO mappers
//! - **domain**: services holding every business rule
//! - **storage**: storage traits with SQLite repositories behind them
//!
//! [`initialize_backend`] wires the layers together and [`create_router`]
//! exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::calendar::{LocalCalendar, SharedClock};
use crate::domain::{ChildService, ContentService, MilestoneService, TrackingService, UserService};
use crate::io::rest::{child_apis, content_apis, health_apis, milestone_apis, tracking_apis, user_apis};
use crate::storage::seed::seed_catalog;
use crate::storage::sqlite::{
    ChildRepository, ContentRepository, DailyLogRepository, DbConnection, GrowthRepository,
    MilestoneRepository, UserRepository,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub child_service: ChildService,
    pub milestone_service: MilestoneService,
    pub tracking_service: TrackingService,
    pub content_service: ContentService,
    pub user_service: UserService,
}

impl AppState {
    /// Build every service on top of one database connection
    pub fn new(db: DbConnection, calendar: LocalCalendar) -> Self {
        let users = Arc::new(UserRepository::new(db.clone()));
        let children = Arc::new(ChildRepository::new(db.clone()));
        let milestones = Arc::new(MilestoneRepository::new(db.clone()));
        let growth = Arc::new(GrowthRepository::new(db.clone()));
        let logs = Arc::new(DailyLogRepository::new(db.clone()));
        let content = Arc::new(ContentRepository::new(db.clone()));

        Self {
            child_service: ChildService::new(
                children.clone(),
                milestones.clone(),
                growth.clone(),
                calendar.clone(),
            ),
            milestone_service: MilestoneService::new(
                children.clone(),
                milestones.clone(),
                milestones,
                calendar.clone(),
            ),
            tracking_service: TrackingService::new(children, growth, logs, calendar.clone()),
            content_service: ContentService::new(content, calendar.clone()),
            user_service: UserService::new(users, calendar),
            db,
        }
    }
}

/// Connect storage, seed the catalog and provision configured users
pub async fn initialize_backend(config: &AppConfig, clock: SharedClock) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let calendar = LocalCalendar::new(clock, config.utc_offset()?);
    let state = AppState::new(db.clone(), calendar);

    if config.seed_catalog {
        let catalog = MilestoneRepository::new(db.clone());
        let content = ContentRepository::new(db);
        seed_catalog(&catalog, &content).await?;
    }

    state
        .user_service
        .bootstrap_users(&config.users)
        .await
        .context("Failed to provision configured users")?;
    if config.users.is_empty() {
        warn!("No users configured; every authenticated endpoint will answer 401");
    }

    Ok(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let child_routes = Router::new()
        .route("/", get(child_apis::list_children).post(child_apis::create_child))
        .route(
            "/:id",
            get(child_apis::get_child)
                .patch(child_apis::update_child)
                .delete(child_apis::delete_child),
        );

    let milestone_routes = Router::new()
        .route("/templates", get(milestone_apis::list_templates))
        .route(
            "/child/:child_id",
            get(milestone_apis::list_milestones).post(milestone_apis::create_milestone),
        )
        .route("/child/:child_id/upcoming", get(milestone_apis::upcoming_milestones))
        .route("/child/:child_id/progress", get(milestone_apis::milestone_progress))
        .route("/:id/achieve", patch(milestone_apis::achieve_milestone));

    let tracking_routes = Router::new()
        .route(
            "/growth/:child_id",
            get(tracking_apis::list_growth_records).post(tracking_apis::create_growth_record),
        )
        .route("/growth/:child_id/latest", get(tracking_apis::latest_growth_record))
        .route(
            "/logs/:child_id",
            get(tracking_apis::list_daily_logs).post(tracking_apis::create_daily_log),
        )
        .route("/logs/:child_id/summary", get(tracking_apis::daily_summary));

    let content_routes = Router::new()
        .route("/tip-of-the-day", get(content_apis::tip_of_the_day))
        .route("/tips", get(content_apis::list_tips))
        .route("/articles", get(content_apis::list_articles))
        .route("/articles/:slug", get(content_apis::get_article));

    Router::new()
        .route("/health", get(health_apis::health))
        .route("/users/profile", get(user_apis::get_profile).patch(user_apis::update_profile))
        .nest("/children", child_routes)
        .nest("/milestones", milestone_routes)
        .nest("/tracking", tracking_routes)
        .nest("/content", content_routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
