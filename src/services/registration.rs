//! Registration service implementation
//!
//! Owns the event capacity / registration consistency mechanism: every
//! mutation of a registration record and its matching attendee-counter
//! update happen here, inside one database transaction. The precondition
//! chain and the counter arithmetic are pure functions so the rules are
//! testable without a database.
//!
//! The counter rules, per status transition:
//!
//! - none -> registered (new record): +1
//! - registered -> cancelled: -1
//! - cancelled -> registered (re-registration, same record): +1
//! - physical delete while registered: -1
//! - everything else: no change

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::event::Event;
use crate::models::registration::{
    EventAttendee, Registration, RegistrationStatus, RegistrationWithEvent,
};
use crate::utils::errors::{EventifyError, Result};
use crate::utils::logging::log_registration_action;

/// What the register operation must do for a given (event, student) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAction {
    /// No record exists for the pair; insert one in status `registered`
    CreateNew,
    /// A cancelled record exists; flip it back to `registered`
    Reactivate(i64),
}

/// Outcome of a successful register call
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub registration: Registration,
    /// false when an existing cancelled record was reactivated
    pub created: bool,
}

/// Counter delta for a status transition. `previous` is `None` for a newly
/// created record.
pub fn attendee_delta(
    previous: Option<RegistrationStatus>,
    next: RegistrationStatus,
) -> i32 {
    match (previous, next) {
        (None, RegistrationStatus::Registered) => 1,
        (Some(RegistrationStatus::Registered), RegistrationStatus::Cancelled) => -1,
        (Some(RegistrationStatus::Cancelled), RegistrationStatus::Registered) => 1,
        _ => 0,
    }
}

/// Counter delta for physically deleting a record in the given status
pub fn removal_delta(status: RegistrationStatus) -> i32 {
    match status {
        RegistrationStatus::Registered => -1,
        _ => 0,
    }
}

/// Check the register preconditions in order, failing fast with a distinct
/// error kind at the first violation: event active, event not full,
/// deadline not passed, no active registration for the pair.
///
/// The capacity check here is advisory (it produces the right error before
/// any write happens); the transactional conditional increment is what
/// holds the invariant under concurrency.
pub fn check_can_register(
    event: &Event,
    existing: Option<&Registration>,
    now: DateTime<Utc>,
) -> Result<RegisterAction> {
    if !event.is_active {
        return Err(EventifyError::EventInactive { event_id: event.id });
    }
    if event.is_full() {
        return Err(EventifyError::EventFull { event_id: event.id });
    }
    if !event.is_registration_open(now) {
        return Err(EventifyError::DeadlinePassed { event_id: event.id });
    }

    match existing {
        None => Ok(RegisterAction::CreateNew),
        Some(registration) => match registration.status() {
            Some(RegistrationStatus::Cancelled) => {
                Ok(RegisterAction::Reactivate(registration.id))
            }
            // registered, attended, no-show: the pair already holds its
            // one record and it is not re-registrable
            _ => Err(EventifyError::AlreadyRegistered { event_id: event.id }),
        },
    }
}

/// Check the unregister preconditions: an active registration must exist
/// and the event must not have started yet. Returns the registration id.
pub fn check_can_unregister(
    event: &Event,
    registration: Option<&Registration>,
    now: DateTime<Utc>,
) -> Result<i64> {
    let registration = registration
        .filter(|r| r.is_active())
        .ok_or(EventifyError::NotRegistered { event_id: event.id })?;

    if !event.is_upcoming(now) {
        return Err(EventifyError::EventAlreadyStarted { event_id: event.id });
    }

    Ok(registration.id)
}

/// Registration service for student event registration
#[derive(Debug, Clone)]
pub struct RegistrationService {
    pool: PgPool,
    events: EventRepository,
    registrations: RegistrationRepository,
}

impl RegistrationService {
    /// Create a new RegistrationService. The event store is an explicit
    /// dependency here; nothing is resolved at call time.
    pub fn new(
        pool: PgPool,
        events: EventRepository,
        registrations: RegistrationRepository,
    ) -> Self {
        Self {
            pool,
            events,
            registrations,
        }
    }

    /// Register a student for an event.
    ///
    /// A cancelled registration for the same pair is reactivated instead of
    /// inserting a second row. The record write and the counter increment
    /// share a transaction, and the increment only matches while the event
    /// has a free slot, so two racing requests cannot overfill the event.
    pub async fn register(&self, event_id: i64, student_id: i64) -> Result<RegisterOutcome> {
        debug!(event_id = event_id, student_id = student_id, "Registering for event");

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;
        let existing = self
            .registrations
            .find_by_pair(event_id, student_id)
            .await?;

        let action = check_can_register(&event, existing.as_ref(), Utc::now())?;

        let mut tx = self.pool.begin().await?;

        let (registration, created) = match action {
            RegisterAction::CreateNew => {
                let registration = match self
                    .registrations
                    .create(&mut tx, event_id, student_id)
                    .await
                {
                    Ok(registration) => registration,
                    // A concurrent first-time registration for the same pair
                    // hit the unique constraint first.
                    Err(err) if is_unique_violation(&err) => {
                        return Err(EventifyError::AlreadyRegistered { event_id });
                    }
                    Err(err) => return Err(err),
                };
                (registration, true)
            }
            RegisterAction::Reactivate(id) => {
                let registration = self
                    .registrations
                    .transition(
                        &mut tx,
                        id,
                        RegistrationStatus::Cancelled,
                        RegistrationStatus::Registered,
                    )
                    .await?
                    .ok_or(EventifyError::AlreadyRegistered { event_id })?;
                (registration, false)
            }
        };

        if !self.events.try_increment_attendees(&mut tx, event_id).await? {
            tx.rollback().await?;
            return Err(EventifyError::EventFull { event_id });
        }

        tx.commit().await?;

        log_registration_action(event_id, student_id, if created { "register" } else { "re-register" });
        info!(
            event_id = event_id,
            student_id = student_id,
            registration_id = registration.id,
            created = created,
            "Student registered for event"
        );

        Ok(RegisterOutcome { registration, created })
    }

    /// Cancel a student's registration for an upcoming event. The record is
    /// retained in status `cancelled`; the counter gives back one slot.
    pub async fn unregister(&self, event_id: i64, student_id: i64) -> Result<Registration> {
        debug!(event_id = event_id, student_id = student_id, "Unregistering from event");

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;
        let existing = self
            .registrations
            .find_by_pair(event_id, student_id)
            .await?;

        let registration_id = check_can_unregister(&event, existing.as_ref(), Utc::now())?;

        let mut tx = self.pool.begin().await?;

        let registration = self
            .registrations
            .transition(
                &mut tx,
                registration_id,
                RegistrationStatus::Registered,
                RegistrationStatus::Cancelled,
            )
            .await?
            .ok_or(EventifyError::NotRegistered { event_id })?;

        self.events.decrement_attendees(&mut tx, event_id).await?;

        tx.commit().await?;

        log_registration_action(event_id, student_id, "unregister");

        Ok(registration)
    }

    /// Physically remove a registration record (club admin, own event only).
    /// Only a record that still held a slot gives one back.
    pub async fn remove_registration(
        &self,
        event_id: i64,
        student_id: i64,
        admin_id: i64,
    ) -> Result<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;
        if event.created_by != admin_id {
            return Err(EventifyError::PermissionDenied(
                "You can only manage attendees of your own events".to_string(),
            ));
        }

        let registration = self
            .registrations
            .find_by_pair(event_id, student_id)
            .await?
            .ok_or(EventifyError::NotRegistered { event_id })?;

        let mut tx = self.pool.begin().await?;

        let status = self
            .registrations
            .delete(&mut tx, registration.id)
            .await?
            .ok_or(EventifyError::NotRegistered { event_id })?;

        let delta = status
            .parse::<RegistrationStatus>()
            .map(removal_delta)
            .unwrap_or(0);
        if delta < 0 {
            self.events.decrement_attendees(&mut tx, event_id).await?;
        }

        tx.commit().await?;

        log_registration_action(event_id, student_id, "remove");

        Ok(())
    }

    /// A student's registrations with event details, newest first
    pub async fn list_for_student(
        &self,
        student_id: i64,
        status: Option<RegistrationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RegistrationWithEvent>, i64)> {
        let registrations = self
            .registrations
            .list_for_student(student_id, status, limit, offset)
            .await?;
        let total = self
            .registrations
            .count_for_student(student_id, status)
            .await?;

        let event_ids: Vec<i64> = registrations.iter().map(|r| r.event_id).collect();
        let events = self.events.find_by_ids(&event_ids).await?;
        let now = Utc::now();

        let items = registrations
            .into_iter()
            .filter_map(|registration| {
                events
                    .iter()
                    .find(|e| e.id == registration.event_id)
                    .cloned()
                    .map(|event| RegistrationWithEvent::new(registration, event, now))
            })
            .collect();

        Ok((items, total))
    }

    /// Active attendees of an event, for its owning club admin
    pub async fn list_attendees(
        &self,
        event_id: i64,
        admin_id: i64,
    ) -> Result<Vec<EventAttendee>> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventifyError::EventNotFound { event_id })?;
        if event.created_by != admin_id {
            return Err(EventifyError::PermissionDenied(
                "You can only view attendees of your own events".to_string(),
            ));
        }

        self.registrations.list_attendees(event_id).await
    }
}

fn is_unique_violation(err: &EventifyError) -> bool {
    match err {
        EventifyError::Database(sqlx::Error::Database(db)) => {
            db.code().as_deref() == Some("23505")
        }
        _ => false,
    }
}
