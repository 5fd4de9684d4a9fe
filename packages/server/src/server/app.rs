//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::common::{Actor, ApiError};
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    create_handler, delete_handler, download_handler, get_handler, health_handler, list_handler,
    schema_handler, schema_index_handler, update_handler, upload_handler,
};

/// Multipart framing allowance on top of the upload size cap.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Per-IP token bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

/// Router knobs that come from configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub require_admin_writes: bool,
    pub rate_limit: Option<RateLimit>,
    pub max_body_bytes: usize,
    pub max_upload_bytes: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            require_admin_writes: true,
            rate_limit: None,
            max_body_bytes: 25 * 1024 * 1024,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    pub require_admin_writes: bool,
    pub max_upload_bytes: usize,
}

impl AxumAppState {
    /// Writes are open when protection is disabled.
    pub fn authorize_write(&self, actor: &Actor) -> Result<(), ApiError> {
        if self.require_admin_writes {
            let subject = actor.require_admin()?;
            tracing::debug!(subject = %subject, "Authorized write");
        }
        Ok(())
    }
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Build the Axum application router
pub fn build_app(deps: Arc<ServerDeps>, options: AppOptions) -> Result<Router> {
    let app_state = AxumAppState {
        deps: deps.clone(),
        require_admin_writes: options.require_admin_writes,
        max_upload_bytes: options.max_upload_bytes,
    };

    // CORS configuration - public site and admin console run on other origins
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let jwt_service_for_middleware = deps.jwt_service.clone();

    let api = Router::new()
        .route("/api/schema", get(schema_index_handler))
        .route("/api/schema/:resource", get(schema_handler))
        .route(
            "/api/files",
            post(upload_handler).layer(DefaultBodyLimit::max(
                options.max_upload_bytes + MULTIPART_OVERHEAD,
            )),
        )
        .route("/api/files/:id", get(download_handler))
        .route("/api/:resource", get(list_handler).post(create_handler))
        .route(
            "/api/:resource/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .layer(DefaultBodyLimit::max(options.max_body_bytes));

    let api = match options.rate_limit {
        Some(limit) => {
            // Keyed on X-Forwarded-For / X-Real-IP / Forwarded, then the peer address
            let config = GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .per_second(limit.per_second)
                .burst_size(limit.burst)
                .use_headers()
                .finish()
                .context("Invalid rate limit configuration")?;
            api.layer(GovernorLayer {
                config: Arc::new(config),
            })
        }
        None => api,
    };

    let app = api
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        .fallback(route_not_found)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
