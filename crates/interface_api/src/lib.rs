//! HTTP API Layer
//!
//! This crate provides the REST API for the region scaffold using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: One generic CRUD handler set mounted per entity type, plus health checks
//! - **Middleware**: Authentication, tracing, audit logging
//! - **Response**: Rendering of operation outcomes with alert and pagination headers
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, Stores};
//!
//! let app = create_router(Stores::postgres(pool), config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod response;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware as axum_middleware,
};
use core_kernel::{EntityStore, StoreProbe};
use domain_region::Region;
use infra_db::{DatabasePool, InMemoryEntityStore, PgEntityStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{entity_routes, health, EntityState};
use crate::middleware::{audit_middleware, auth_middleware};

/// Collection path regions are served under
pub const REGIONS_PATH: &str = "/api/regions";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub probe: Arc<dyn StoreProbe>,
}

/// The stores behind every mounted entity, plus the probe used for readiness
#[derive(Clone)]
pub struct Stores {
    pub regions: Arc<dyn EntityStore<Region>>,
    pub probe: Arc<dyn StoreProbe>,
}

impl Stores {
    /// Stores backed by PostgreSQL
    pub fn postgres(pool: DatabasePool) -> Self {
        let regions = PgEntityStore::<Region>::new(pool);
        Self {
            probe: Arc::new(regions.clone()),
            regions: Arc::new(regions),
        }
    }

    /// Stores backed by process memory
    pub fn memory(regions: InMemoryEntityStore<Region>) -> Self {
        Self {
            probe: Arc::new(regions.clone()),
            regions: Arc::new(regions),
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `stores` - Entity stores
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(stores: Stores, config: ApiConfig) -> Router {
    let regions = EntityState::new(stores.regions, &config, REGIONS_PATH);
    let state = AppState {
        probe: stores.probe,
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/regions", entity_routes::<Region, AppState>(regions))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
