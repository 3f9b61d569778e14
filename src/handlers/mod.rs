//! HTTP handlers module
//!
//! Route definitions and the JSON response envelope shared by all
//! endpoints.

pub mod auth;
pub mod clubs;
pub mod events;
pub mod health;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Standard response envelope: `{"success", "message", "data"}`
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Success with a data payload
    pub fn ok(message: impl Into<String>, data: serde_json::Value) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }

    /// Success with no payload
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth::routes())
        .nest("/api/events", events::routes())
        .nest("/api/clubs", clubs::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let Json(response) = ApiResponse::ok("done", serde_json::json!({"n": 1}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "done");
        assert_eq!(value["data"]["n"], 1);

        let Json(response) = ApiResponse::message("done");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("data").is_none());
    }
}
