//! Registration model
//!
//! One record per (event, student) pair; the unique constraint lives in the
//! schema. `registration_date` is set at creation and never changed by
//! status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::models::event::{Event, EventView};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub student_id: i64,
    pub registration_date: DateTime<Utc>,
    pub status: String,
    pub attended: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn status(&self) -> Option<RegistrationStatus> {
        self.status.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Registered.as_str()
    }
}

/// A student's relationship to an event. Only `Registered` counts toward
/// the event's attendee counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[serde(rename = "registered")]
    Registered,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "attended")]
    Attended,
    #[serde(rename = "no-show")]
    NoShow,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Attended => "attended",
            RegistrationStatus::NoShow => "no-show",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegistrationStatus::Registered),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            "attended" => Ok(RegistrationStatus::Attended),
            "no-show" => Ok(RegistrationStatus::NoShow),
            other => Err(format!("unknown registration status: {other}")),
        }
    }
}

/// Registration joined with its event, for the student listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: EventView,
}

impl RegistrationWithEvent {
    pub fn new(registration: Registration, event: Event, now: DateTime<Utc>) -> Self {
        Self {
            registration,
            event: event.into_view(now),
        }
    }
}

/// Registration joined with student identity, for the admin attendee list
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub registration_id: i64,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_number: Option<String>,
    pub department: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub status: String,
    pub attended: bool,
}
