//! Event service implementation
//!
//! Public listing/detail reads and club-admin event management. Reads
//! consult the cached attendee counter directly; this service never
//! mutates it.

use chrono::Utc;
use tracing::{debug, info};

use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::event::{
    CreateEventRequest, Event, EventFilter, EventView, UpdateEventRequest,
};
use crate::models::registration::Registration;
use crate::models::user::User;
use crate::utils::errors::{EventifyError, Result};
use crate::utils::helpers;
use crate::utils::logging::log_admin_action;

/// A page of events plus the total match count
#[derive(Debug, Clone)]
pub struct EventPage {
    pub events: Vec<EventView>,
    pub total: i64,
}

/// Event service for listings, detail views, and admin management
#[derive(Debug, Clone)]
pub struct EventService {
    events: EventRepository,
    registrations: RegistrationRepository,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(events: EventRepository, registrations: RegistrationRepository) -> Self {
        Self {
            events,
            registrations,
        }
    }

    /// List upcoming active events with filters and pagination
    pub async fn list_upcoming(
        &self,
        category: Option<String>,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<EventPage> {
        debug!(?category, ?search, limit, offset, "Listing upcoming events");

        let filter = EventFilter {
            // "all" is the frontend's no-filter sentinel
            category: category.filter(|c| c != "all"),
            search: search.filter(|s| !s.trim().is_empty()),
            limit,
            offset,
        };

        let total = self.events.count_upcoming(&filter).await?;
        let events = self.events.list_upcoming(&filter).await?;
        let now = Utc::now();

        Ok(EventPage {
            events: events.into_iter().map(|e| e.into_view(now)).collect(),
            total,
        })
    }

    /// Event detail with derived flags; includes the viewer's current
    /// registration when a caller identity is supplied
    pub async fn get_event(
        &self,
        event_id: i64,
        viewer: Option<i64>,
    ) -> Result<(EventView, Option<Registration>)> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;

        if !event.is_active {
            return Err(EventifyError::EventInactive { event_id });
        }

        let registration = match viewer {
            Some(student_id) => {
                self.registrations
                    .find_current_by_pair(event_id, student_id)
                    .await?
            }
            None => None,
        };

        Ok((event.into_view(Utc::now()), registration))
    }

    /// Create a new event owned by the acting club admin
    pub async fn create(&self, admin: &User, request: CreateEventRequest) -> Result<Event> {
        validate_event_fields(
            Some(&request.title),
            Some(&request.description),
            Some(&request.category),
            Some(&request.start_time),
            Some(&request.end_time),
            Some(request.max_attendees),
        )?;
        if request.registration_deadline > request.date {
            return Err(EventifyError::InvalidInput(
                "Registration deadline must not be after the event date".to_string(),
            ));
        }
        if request.date <= Utc::now() {
            return Err(EventifyError::InvalidInput(
                "Event date must be in the future".to_string(),
            ));
        }

        let club_name = admin.club_name.clone().ok_or_else(|| {
            EventifyError::InvalidInput(
                "Club admin account has no club name configured".to_string(),
            )
        })?;

        let event = self
            .events
            .create(request, admin.id, club_name, admin.department.clone())
            .await?;

        log_admin_action(admin.id, Some(event.id), "create_event");
        info!(event_id = event.id, admin_id = admin.id, "Event created");
        Ok(event)
    }

    /// Update an event; only its creator may do so
    pub async fn update(
        &self,
        admin_id: i64,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        self.owned_event(admin_id, event_id, "update").await?;

        validate_event_fields(
            request.title.as_deref(),
            request.description.as_deref(),
            request.category.as_deref(),
            request.start_time.as_deref(),
            request.end_time.as_deref(),
            request.max_attendees,
        )?;

        let event = self.events.update(event_id, request).await?;
        log_admin_action(admin_id, Some(event_id), "update_event");
        Ok(event)
    }

    /// Soft-delete an event; only its creator may do so
    pub async fn soft_delete(&self, admin_id: i64, event_id: i64) -> Result<()> {
        self.owned_event(admin_id, event_id, "delete").await?;

        self.events.soft_delete(event_id).await?;
        log_admin_action(admin_id, Some(event_id), "delete_event");
        Ok(())
    }

    /// Events created by the acting club admin, newest first
    pub async fn list_for_admin(&self, admin_id: i64) -> Result<Vec<EventView>> {
        let events = self.events.list_by_creator(admin_id).await?;
        let now = Utc::now();
        Ok(events.into_iter().map(|e| e.into_view(now)).collect())
    }

    async fn owned_event(&self, admin_id: i64, event_id: i64, action: &str) -> Result<Event> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;
        if event.created_by != admin_id {
            return Err(EventifyError::PermissionDenied(format!(
                "You can only {action} your own events"
            )));
        }
        Ok(event)
    }
}

/// Shared field checks for create and update payloads. `None` means the
/// field is not being set.
fn validate_event_fields(
    title: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    start_time: Option<&str>,
    end_time: Option<&str>,
    max_attendees: Option<i32>,
) -> Result<()> {
    if let Some(title) = title {
        let len = title.trim().chars().count();
        if !(3..=100).contains(&len) {
            return Err(EventifyError::InvalidInput(
                "Event title must be between 3 and 100 characters".to_string(),
            ));
        }
    }
    if let Some(description) = description {
        let len = description.trim().chars().count();
        if !(10..=1000).contains(&len) {
            return Err(EventifyError::InvalidInput(
                "Event description must be between 10 and 1000 characters".to_string(),
            ));
        }
    }
    if let Some(category) = category {
        if !helpers::is_valid_category(category) {
            return Err(EventifyError::InvalidInput(
                "Please select a valid category".to_string(),
            ));
        }
    }
    for time in [start_time, end_time].into_iter().flatten() {
        if !helpers::is_valid_time_of_day(time) {
            return Err(EventifyError::InvalidInput(
                "Times must use 24h HH:MM format".to_string(),
            ));
        }
    }
    if let Some(max_attendees) = max_attendees {
        if max_attendees < 1 {
            return Err(EventifyError::InvalidInput(
                "Maximum attendees must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}
