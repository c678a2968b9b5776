//! HTTP Basic authentication
//!
//! A single operator account guards every route. Any failure produces the
//! same 401 so clients cannot tell a wrong username from a wrong password.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};

use crate::config::AuthConfig;
use super::http::AppState;

/// Challenge sent with every 401
pub const WWW_AUTHENTICATE: &str = "Basic realm=\"Cleanfeed Dashboard\"";

/// Decode a `Basic` Authorization header into username and password
pub fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = general_purpose::STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Validate an Authorization header against the operator credentials
pub fn check_auth(auth_header: Option<&str>, credentials: &AuthConfig) -> bool {
    match auth_header.and_then(parse_basic) {
        Some((username, password)) => {
            username == credentials.username && password == credentials.password
        }
        None => false,
    }
}

/// Middleware rejecting requests without valid operator credentials
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if check_auth(auth_header, &state.auth) {
        return next.run(request).await;
    }

    tracing::debug!("Rejected unauthenticated request to {}", request.uri().path());
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, WWW_AUTHENTICATE)],
        "Authentication required",
    )
        .into_response()
}
