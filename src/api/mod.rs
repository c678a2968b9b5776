//! HTTP API Module
//!
//! Serves the dashboard page and its form and download routes behind
//! operator Basic auth.

mod auth;
mod http;
mod render;

pub use auth::{check_auth, parse_basic, WWW_AUTHENTICATE};
pub use http::{AppState, HttpServer, PresignQuery, SaveForm};
pub use render::render_dashboard;
