//! Event model
//!
//! `current_attendees` is a cached count of registrations in status
//! `registered`. Only the registration subsystem writes it; admin updates
//! and the read paths treat it as read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_attendees: i32,
    pub current_attendees: i32,
    pub category: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub registration_deadline: DateTime<Utc>,
    pub created_by: i64,
    pub club_name: String,
    pub department: Option<String>,
    pub tags: Vec<String>,
    pub requirements: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_attendees >= self.max_attendees
    }

    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        now < self.registration_deadline
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        now < self.date
    }

    /// Attach the derived flags the read surfaces expose
    pub fn into_view(self, now: DateTime<Utc>) -> EventView {
        EventView {
            is_full: self.is_full(),
            is_registration_open: self.is_registration_open(now),
            is_upcoming: self.is_upcoming(now),
            event: self,
        }
    }
}

/// Event plus derived flags, as serialized on every read path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub is_full: bool,
    pub is_registration_open: bool,
    pub is_upcoming: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_attendees: i32,
    pub category: String,
    pub registration_deadline: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub requirements: Option<String>,
    pub image: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub category: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub requirements: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for the public upcoming-events listing
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_event(now: DateTime<Utc>) -> Event {
        Event {
            id: 1,
            title: "Rust Workshop".to_string(),
            description: "Intro to ownership".to_string(),
            date: now + Duration::days(7),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            location: "Lab 3".to_string(),
            max_attendees: 30,
            current_attendees: 0,
            category: "workshop".to_string(),
            image: None,
            is_active: true,
            registration_deadline: now + Duration::days(6),
            created_by: 42,
            club_name: "Programming Club".to_string(),
            department: None,
            tags: vec![],
            requirements: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_full_boundary() {
        let now = Utc::now();
        let mut event = sample_event(now);
        event.current_attendees = event.max_attendees - 1;
        assert!(!event.is_full());
        event.current_attendees = event.max_attendees;
        assert!(event.is_full());
    }

    #[test]
    fn test_derived_flags() {
        let now = Utc::now();
        let mut event = sample_event(now);
        assert!(event.is_registration_open(now));
        assert!(event.is_upcoming(now));

        event.registration_deadline = now - Duration::hours(1);
        assert!(!event.is_registration_open(now));

        event.date = now - Duration::hours(1);
        assert!(!event.is_upcoming(now));
    }

    #[test]
    fn test_into_view_flags_match() {
        let now = Utc::now();
        let mut event = sample_event(now);
        event.current_attendees = event.max_attendees;
        let view = event.into_view(now);
        assert!(view.is_full);
        assert!(view.is_registration_open);
        assert!(view.is_upcoming);
    }
}
