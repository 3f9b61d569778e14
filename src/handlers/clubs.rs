//! Club endpoints

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::json;

use crate::handlers::ApiResponse;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::utils::errors::Result;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clubs))
        .route("/mine", get(my_clubs))
        .route("/:id/join", post(join_club))
        .route("/:id/leave", delete(leave_club))
}

async fn list_clubs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let clubs = state.services.club_service.list().await?;
    Ok(ApiResponse::ok(
        "Clubs retrieved successfully",
        json!({ "clubs": clubs }),
    ))
}

async fn my_clubs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let clubs = state
        .services
        .club_service
        .list_for_user(auth.user_id)
        .await?;
    Ok(ApiResponse::ok(
        "Clubs retrieved successfully",
        json!({ "clubs": clubs }),
    ))
}

async fn join_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(club_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let member = state
        .services
        .club_service
        .join(club_id, auth.user_id)
        .await?;
    Ok(ApiResponse::ok(
        "Joined club successfully",
        json!({ "membership": member }),
    ))
}

async fn leave_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(club_id): Path<i64>,
) -> Result<impl IntoResponse> {
    state
        .services
        .club_service
        .leave(club_id, auth.user_id)
        .await?;
    Ok(ApiResponse::message("Left club successfully"))
}
