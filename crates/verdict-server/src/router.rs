//! Router configuration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{api, health, pages};

/// Create the application router: JSON API, health, and pages.
///
/// Pages and API share one origin, so no CORS headers are sent.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/create-order", post(api::create_order))
        .route("/verify-payment", post(api::verify_payment))
        .route("/generate-verdict", post(api::generate_verdict));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health_check))
        // Pages
        .route("/", get(pages::landing))
        .route("/select", get(pages::select))
        .route("/input", get(pages::input))
        .route("/payment", get(pages::payment))
        .route("/callback", get(pages::callback))
        .route("/loading", get(pages::loading))
        .route("/verdict", get(pages::verdict))
        .route("/about", get(pages::about))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
