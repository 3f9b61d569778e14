//! Health check endpoint

use axum::extract::State;
use axum::response::IntoResponse;

use crate::database;
use crate::handlers::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    database::health_check(&state.database.pool).await?;
    Ok(ApiResponse::message("ok"))
}
