//! HTTP Server
//!
//! Routes for the dashboard page, saving the forwarding config and
//! redirecting to signed download URLs. Every route sits behind Basic auth.

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AuthConfig;
use crate::dashboard::DashboardService;
use crate::error::{Error, Result};
use super::auth::require_auth;
use super::render::render_dashboard;

/// Shared application state
pub struct AppState {
    /// Dashboard operations
    pub service: DashboardService,
    /// Operator credentials
    pub auth: AuthConfig,
}

/// HTTP server
pub struct HttpServer {
    bind_address: String,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(bind_address: String, service: DashboardService, auth: AuthConfig) -> Self {
        let state = Arc::new(AppState { service, auth });
        Self {
            bind_address,
            state,
        }
    }

    /// Get the state for sharing with other components
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Create the router
    pub fn create_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", get(handle_index))
            .route("/save", post(handle_save))
            .route("/presign", get(handle_presign))
            .route("/api/dashboard", get(handle_dashboard_json))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn_with_state(Arc::clone(&state), require_auth)),
            )
            .with_state(state)
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let app = Self::create_router(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        tracing::info!("Dashboard listening on {}", self.bind_address);

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

// ============ Request Types ============

/// Forwarding config form submitted from the dashboard
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(rename = "rtmpUrl")]
    pub rtmp_url: Option<String>,
    #[serde(rename = "streamKey")]
    pub stream_key: Option<String>,
}

/// Presign query string
#[derive(Debug, Deserialize)]
pub struct PresignQuery {
    pub key: Option<String>,
}

// ============ Handlers ============

async fn handle_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.service.view_dashboard().await;
    Html(render_dashboard(&view))
}

async fn handle_dashboard_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.view_dashboard().await)
}

async fn handle_save(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveForm>,
) -> Response {
    match state
        .service
        .save_config(form.rtmp_url.as_deref(), form.stream_key.as_deref())
    {
        Ok(_) => found("/"),
        Err(e) => {
            tracing::error!("Failed to save forwarding config: {}", e);
            error_response(&e)
        }
    }
}

async fn handle_presign(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresignQuery>,
) -> Response {
    match state.service.presign_redirect(query.key.as_deref()).await {
        Ok(url) => found(&url),
        Err(Error::InvalidArgument(_)) => {
            (StatusCode::BAD_REQUEST, "missing key").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to sign {:?}: {}", query.key, e);
            error_response(&e)
        }
    }
}

/// 302 redirect
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Map an error to a plain-text response
fn error_response(error: &Error) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if error.is_backend() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, error.to_string()).into_response()
}
