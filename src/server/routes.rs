//! Request handlers for the booking service

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::booking;
use crate::core::types::{BookingRequest, ChatReply, ChatRequest};
use crate::server::auth::ClientIdentity;
use crate::server::response::ApiError;
use crate::server::AppState;

/// Health check endpoint
pub async fn health() -> Json<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Json(json!({"status": "healthy", "timestamp": timestamp}))
}

/// Book a meeting room through the portal automation engine.
pub async fn book_room(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, ApiError> {
    if !state.booking_limits.allow(&client.0) {
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Try again later.",
        ));
    }

    let debug_errors = state.config.server.debug_errors;
    request
        .validate()
        .map_err(|err| ApiError::from_error(err, debug_errors))?;

    tracing::info!(client = %client.0, date = %request.date, "booking requested");

    let result = booking::book(&state.config.portal, &request)
        .await
        .map_err(|err| ApiError::from_error(err, debug_errors))?;

    Ok(Json(json!({
        "success": true,
        "message": result.summary(),
        "room_details": result,
    })))
}

/// Forward a chat message to the completion API.
pub async fn chat(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if !state.chat_limits.allow(&client.0) {
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Try again later.",
        ));
    }

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing 'message'"));
    }

    let debug_errors = state.config.server.debug_errors;
    let response = state
        .chat
        .reply(message)
        .await
        .map_err(|err| ApiError::from_error(err, debug_errors))?;

    let reply = ChatReply {
        response,
        agent_id: request.agent_id.unwrap_or_else(|| "default".to_string()),
        conversation_id: request
            .conversation_id
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
    };

    let mut body = serde_json::to_value(&reply)?;
    body["success"] = json!(true);
    Ok(Json(body))
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Serialization error: {}", err),
        )
    }
}
