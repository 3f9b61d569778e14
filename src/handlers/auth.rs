//! Authentication endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::ApiResponse;
use crate::middleware::AuthUser;
use crate::models::user::{CreateUserRequest, UpdateProfileRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
        .route("/change-password", put(change_password))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    let (user, token) = state.services.auth_service.register(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Account created successfully",
            json!({ "user": user, "token": token }),
        ),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (user, token) = state
        .services
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(ApiResponse::ok(
        "Logged in successfully",
        json!({ "user": user, "token": token }),
    ))
}

async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.services.auth_service.profile(auth.user_id).await?;
    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        json!({ "user": user }),
    ))
}

async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .services
        .auth_service
        .update_profile(auth.user_id, request)
        .await?;
    Ok(ApiResponse::ok(
        "Profile updated successfully",
        json!({ "user": user }),
    ))
}

async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    state
        .services
        .auth_service
        .change_password(auth.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}
