//! Web control surface for the gas alarm.
//!
//! Serves the status page with its arm/disarm form, the page's stylesheet and
//! script, and a small JSON API.

pub mod config;
pub mod handlers;
pub mod page;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use handlers::AppState;
pub use router::create_app;

use crate::alarm::AlarmController;
use crate::error::{AlarmError, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Start the web server and serve until `shutdown` resolves.
pub async fn start_web_server<F>(
    config: WebConfig,
    controller: Arc<AlarmController>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let app = create_app(&config, controller);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AlarmError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Gas sentinel web server listening on http://{}", addr);
    info!("Control page available at http://{}/", addr);
    info!("API endpoint: http://{}/api/status", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AlarmError::web_server_error(format!("Server error: {}", e)))?;

    info!("Web server stopped");
    Ok(())
}
