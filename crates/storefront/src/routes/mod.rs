//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page, default locale
//! GET  /{locale}         - Home page for a locale segment such as `fr-ca`
//! GET  /health           - Liveness check
//! GET  /static/*         - Stylesheet and other assets
//! ```

pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/{locale}", get(home::home_localized))
}
