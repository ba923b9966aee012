//! Chat API router.
//!
//! Returns a composable `Router`: the chat page at `/`, JSON routes nested
//! under `/api/`.

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the chat API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn chat_api_router(ctx: ApiContext) -> Router {
    // Conversation history is per user; never cache it.
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/assessment/form", get(endpoints::assessment::form))
        .route("/sessions", post(endpoints::sessions::create))
        .route(
            "/sessions/:id/messages",
            get(endpoints::sessions::history).post(endpoints::sessions::send),
        )
        .route(
            "/sessions/:id/assessment",
            post(endpoints::assessment::submit),
        )
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(endpoints::page::index))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}
