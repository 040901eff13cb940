//! HTTP handlers for the status page, the control form and the JSON API.

use crate::alarm::{AlarmController, ArmCommand, StatusReport};
use crate::web::page::render_status_page;
use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect},
};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

/// Shared state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<AlarmController>,
    pub static_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(controller: Arc<AlarmController>, static_path: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            static_path: Arc::new(static_path.into()),
        }
    }

    fn status(&self) -> Result<StatusReport, StatusCode> {
        self.controller.status().map_err(|e| {
            error!("Failed to read gas sensor: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// Body of the arm/disarm form.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub submit: String,
}

/// Render the status page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let report = state.status()?;
    Ok(Html(render_status_page(&report)))
}

/// Apply an arm/disarm request and send the browser back to the page.
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Redirect, StatusCode> {
    let command = ArmCommand::from_form_value(&form.submit);
    state.controller.apply_command(command).map_err(|e| {
        error!("Failed to apply {:?}: {}", command, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Redirect::to("/"))
}

/// Serve `styles.css` from the static directory.
pub async fn styles(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    serve_asset(&state, "styles.css", "text/css").await
}

/// Serve `script.js` from the static directory.
pub async fn script(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    serve_asset(&state, "script.js", "application/javascript").await
}

async fn serve_asset(
    state: &AppState,
    name: &str,
    content_type: &'static str,
) -> Result<impl IntoResponse, StatusCode> {
    let path = state.static_path.join(name);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok(([(header::CONTENT_TYPE, content_type)], content)),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Current status as JSON.
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusReport>, StatusCode> {
    state.status().map(Json)
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "gas-sentinel",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
