//! Web application router and middleware setup.

use crate::alarm::AlarmController;
use crate::web::config::WebConfig;
use crate::web::handlers::{self, AppState};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the axum application with all routes and middleware.
///
/// Paths without a route of their own behave like `/`, and a POST to any
/// path is handled as the arm/disarm form.
pub fn create_app(config: &WebConfig, controller: Arc<AlarmController>) -> Router {
    for asset in ["styles.css", "script.js"] {
        let path = config.asset_path(asset);
        if !path.is_file() {
            warn!("{} not found, it will be served as 404", path.display());
        }
    }

    let state = AppState::new(controller, config.static_path.clone());

    // Every path accepts the arm/disarm form POST.
    let mut app = Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/styles.css", get(handlers::styles).post(handlers::submit))
        .route("/script.js", get(handlers::script).post(handlers::submit))
        // API routes
        .route("/api/status", get(handlers::get_status).post(handlers::submit))
        .route("/api/health", get(handlers::health_check).post(handlers::submit))
        .fallback(get(handlers::index).post(handlers::submit))
        .with_state(state);

    // Add CORS if enabled
    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
