//! HTTP layer
//!
//! Thin request/response plumbing around the booking engine: bearer auth,
//! per-client rate limits, and the booking/chat/health routes. All mutable
//! state here is per-process and never reaches the engine.

pub mod auth;
pub mod rate_limit;
pub mod response;
pub mod routes;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::{Config, Result};
use crate::llm::ChatClient;
use auth::ApiKeySet;
use rate_limit::RateLimiter;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: ChatClient,
    pub api_keys: Arc<ApiKeySet>,
    pub booking_limits: RateLimiter,
    pub chat_limits: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let chat = ChatClient::from_config(&config.openai);
        let api_keys = Arc::new(ApiKeySet::new(&config.server.api_keys));
        Self {
            config: Arc::new(config),
            chat,
            api_keys,
            booking_limits: RateLimiter::for_bookings(),
            chat_limits: RateLimiter::for_chat(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    let protected = Router::new()
        .route("/book-room", post(routes::book_room))
        .route("/chat", post(routes::chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr();
    if config.server.auth_disabled() {
        tracing::warn!(
            "no API keys or JWT secret configured, /book-room and /chat accept unauthenticated requests"
        );
    }
    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("roombook listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origin = if allowed_origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
