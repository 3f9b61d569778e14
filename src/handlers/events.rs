//! Event endpoints
//!
//! Public discovery routes, the student registration surface, and the
//! club-admin management surface, matching the resource layout:
//!
//! - `GET  /api/events`                     list upcoming events
//! - `GET  /api/events/:id`                 event detail
//! - `GET  /api/events/student/registered`  caller's registrations
//! - `POST /api/events/:id/register`        register
//! - `DELETE /api/events/:id/register`      unregister
//! - `POST /api/events/admin`               create event
//! - `GET  /api/events/admin/my-events`     own events
//! - `PUT  /api/events/admin/:id`           update event
//! - `DELETE /api/events/admin/:id`         soft-delete event
//! - `GET  /api/events/admin/:id/attendees` attendee list
//! - `DELETE /api/events/admin/:id/attendees/:student_id` remove attendee

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::ApiResponse;
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::event::{CreateEventRequest, UpdateEventRequest};
use crate::models::registration::RegistrationStatus;
use crate::state::AppState;
use crate::utils::errors::{EventifyError, Result};
use crate::utils::helpers;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/:id", get(get_event))
        .route("/student/registered", get(student_registrations))
        .route("/:id/register", post(register).delete(unregister))
        .route("/admin", post(create_event))
        .route("/admin/my-events", get(my_events))
        .route("/admin/:id", put(update_event).delete(delete_event))
        .route("/admin/:id/attendees", get(attendees))
        .route("/admin/:id/attendees/:student_id", delete(remove_attendee))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    category: Option<String>,
    search: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RegistrationsQuery {
    status: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit, helpers::calculate_offset(page, limit))
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (page, limit, offset) = page_params(query.page, query.limit);
    let result = state
        .services
        .event_service
        .list_upcoming(query.category, query.search, limit, offset)
        .await?;

    let returned = result.events.len() as i64;
    Ok(ApiResponse::ok(
        "Events retrieved successfully",
        json!({
            "events": result.events,
            "pagination": {
                "currentPage": page,
                "totalPages": helpers::total_pages(result.total, limit),
                "totalEvents": result.total,
                "hasNextPage": offset + returned < result.total,
                "hasPrevPage": page > 1,
            },
        }),
    ))
}

async fn get_event(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let viewer = auth.0.map(|user| user.user_id);
    let (event, registration) = state
        .services
        .event_service
        .get_event(event_id, viewer)
        .await?;

    let mut event_json = serde_json::to_value(&event)?;
    if viewer.is_some() {
        event_json["userRegistration"] = serde_json::to_value(&registration)?;
    }

    Ok(ApiResponse::ok(
        "Event retrieved successfully",
        json!({ "event": event_json }),
    ))
}

async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_student()?;

    let outcome = state
        .services
        .registration_service
        .register(event_id, auth.user_id)
        .await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Successfully registered for the event")
    } else {
        (StatusCode::OK, "Successfully re-registered for the event")
    };

    Ok((
        status,
        ApiResponse::ok(message, json!({ "registration": outcome.registration })),
    ))
}

async fn unregister(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_student()?;

    let registration = state
        .services
        .registration_service
        .unregister(event_id, auth.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Successfully unregistered from the event",
        json!({ "registration": registration }),
    ))
}

async fn student_registrations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RegistrationsQuery>,
) -> Result<impl IntoResponse> {
    auth.require_student()?;

    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(value) => Some(value.parse::<RegistrationStatus>().map_err(|_| {
            EventifyError::InvalidInput("Please select a valid status".to_string())
        })?),
    };
    let (page, limit, offset) = page_params(query.page, query.limit);

    let (registrations, total) = state
        .services
        .registration_service
        .list_for_student(auth.user_id, status, limit, offset)
        .await?;

    let returned = registrations.len() as i64;
    Ok(ApiResponse::ok(
        "Registered events retrieved successfully",
        json!({
            "registrations": registrations,
            "pagination": {
                "currentPage": page,
                "totalPages": helpers::total_pages(total, limit),
                "totalRegistrations": total,
                "hasNextPage": offset + returned < total,
                "hasPrevPage": page > 1,
            },
        }),
    ))
}

async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    let admin = state
        .database
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or(EventifyError::UserNotFound {
            user_id: auth.user_id,
        })?;

    let event = state.services.event_service.create(&admin, request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Event created successfully", json!({ "event": event })),
    ))
}

async fn my_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    let events = state
        .services
        .event_service
        .list_for_admin(auth.user_id)
        .await?;
    Ok(ApiResponse::ok(
        "Admin events retrieved successfully",
        json!({ "events": events }),
    ))
}

async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    let event = state
        .services
        .event_service
        .update(auth.user_id, event_id, request)
        .await?;
    Ok(ApiResponse::ok(
        "Event updated successfully",
        json!({ "event": event }),
    ))
}

async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    state
        .services
        .event_service
        .soft_delete(auth.user_id, event_id)
        .await?;
    Ok(ApiResponse::message("Event deleted successfully"))
}

async fn attendees(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    let attendees = state
        .services
        .registration_service
        .list_attendees(event_id, auth.user_id)
        .await?;
    Ok(ApiResponse::ok(
        "Attendees retrieved successfully",
        json!({ "attendees": attendees }),
    ))
}

async fn remove_attendee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((event_id, student_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    auth.require_club_admin()?;

    state
        .services
        .registration_service
        .remove_registration(event_id, student_id, auth.user_id)
        .await?;
    Ok(ApiResponse::message("Attendee removed successfully"))
}
