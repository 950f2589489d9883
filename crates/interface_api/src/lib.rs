//! HTTP API Layer
//!
//! This crate provides the REST API for the claims portal using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, dashboard, fleet setup, and runs
//! - **Runner**: Registry of live simulator runs and their timer tasks
//! - **Middleware**: Tracing, CORS, access logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(store, Arc::new(RuntimeClock::new()), config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod runner;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use core_kernel::Clock;
use domain_claims::{ClaimRecordPort, SubmissionService};

use crate::config::PortalConfig;
use crate::middleware::access_log_middleware;
use crate::handlers::{claims, dashboard, fleet, health, runs};
use crate::runner::RunRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClaimRecordPort>,
    pub clock: Arc<dyn Clock>,
    pub runs: RunRegistry,
    pub config: PortalConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ClaimRecordPort>, clock: Arc<dyn Clock>, config: PortalConfig) -> Self {
        Self {
            store,
            clock,
            runs: RunRegistry::new(config.run_idle_ttl()),
            config,
        }
    }

    pub fn submissions(&self) -> SubmissionService {
        SubmissionService::new(self.store.clone(), self.clock.clone())
            .with_commercial_redirect_millis(self.config.commercial_redirect_millis())
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Store, clock, run registry, and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claim submission and lookup
    let claims_routes = Router::new()
        .route("/quick", post(claims::submit_quick))
        .route("/guided", post(claims::submit_guided))
        .route("/commercial", post(claims::submit_commercial))
        .route("/track", get(claims::track))
        .route("/:id", get(claims::get_claim));

    // Commercial fleet setup
    let fleet_routes = Router::new()
        .route("/schedule", post(fleet::upload_schedule))
        .route("/policy", post(fleet::upload_policy));

    // Simulator runs
    let run_routes = Router::new()
        .route("/", post(runs::create_run))
        .route("/:id", get(runs::get_run).delete(runs::delete_run))
        .route("/:id/start", post(runs::start_run))
        .route("/:id/pause", post(runs::pause_run))
        .route("/:id/resume", post(runs::resume_run))
        .route("/:id/reset", post(runs::reset_run))
        .route("/:id/stages/:stage/result", put(runs::save_stage_result));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/fleet", fleet_routes)
        .nest("/runs", run_routes)
        .route("/dashboard", get(dashboard::get_dashboard))
        .layer(axum_middleware::from_fn(access_log_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
