//! Event repository implementation
//!
//! All reads return the full event row. The two counter mutations are
//! transaction-scoped and guarded so the attendee count can never leave the
//! `0..=max_attendees` range, whatever the callers interleave.

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::event::{CreateEventRequest, Event, EventFilter, UpdateEventRequest};
use crate::utils::errors::EventifyError;

const EVENT_COLUMNS: &str = "id, title, description, date, start_time, end_time, location, \
     max_attendees, current_attendees, category, image, is_active, registration_deadline, \
     created_by, club_name, department, tags, requirements, contact_name, contact_email, \
     contact_phone, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(
        &self,
        request: CreateEventRequest,
        created_by: i64,
        club_name: String,
        department: Option<String>,
    ) -> Result<Event, EventifyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, date, start_time, end_time, location,
                                max_attendees, category, image, registration_deadline,
                                created_by, club_name, department, tags, requirements,
                                contact_name, contact_email, contact_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location)
        .bind(request.max_attendees)
        .bind(request.category)
        .bind(request.image)
        .bind(request.registration_deadline)
        .bind(created_by)
        .bind(club_name)
        .bind(department)
        .bind(request.tags)
        .bind(request.requirements)
        .bind(request.contact_name)
        .bind(request.contact_email)
        .bind(request.contact_phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventifyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find several events at once, for joining registrations with details
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, EventifyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Update event fields; `current_attendees` is deliberately not settable here
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event, EventifyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                location = COALESCE($7, location),
                max_attendees = COALESCE($8, max_attendees),
                category = COALESCE($9, category),
                registration_deadline = COALESCE($10, registration_deadline),
                tags = COALESCE($11, tags),
                requirements = COALESCE($12, requirements),
                image = COALESCE($13, image),
                is_active = COALESCE($14, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location)
        .bind(request.max_attendees)
        .bind(request.category)
        .bind(request.registration_deadline)
        .bind(request.tags)
        .bind(request.requirements)
        .bind(request.image)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Soft-delete an event; the row is retained
    pub async fn soft_delete(&self, id: i64) -> Result<(), EventifyError> {
        sqlx::query("UPDATE events SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List upcoming active events with optional category/search filters
    pub async fn list_upcoming(&self, filter: &EventFilter) -> Result<Vec<Event>, EventifyError> {
        let mut query = self.upcoming_query(EVENT_COLUMNS, filter);
        query
            .push(" ORDER BY date ASC, start_time ASC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let events = query
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Count events matching the listing filters, for pagination
    pub async fn count_upcoming(&self, filter: &EventFilter) -> Result<i64, EventifyError> {
        let mut query = self.upcoming_query("COUNT(*)", filter);
        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    fn upcoming_query<'a>(
        &self,
        selection: &str,
        filter: &'a EventFilter,
    ) -> QueryBuilder<'a, Postgres> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {selection} FROM events \
             WHERE is_active = TRUE AND date >= NOW() AND registration_deadline >= NOW()"
        ));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR club_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query
    }

    /// Get events created by a club admin, newest first
    pub async fn list_by_creator(&self, user_id: i64) -> Result<Vec<Event>, EventifyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Atomically take one attendee slot.
    ///
    /// Returns false when the event is already at capacity; combined with
    /// the surrounding transaction this is what keeps concurrent
    /// registrations from driving the counter past `max_attendees`.
    pub async fn try_increment_attendees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<bool, EventifyError> {
        let result = sqlx::query(
            "UPDATE events \
             SET current_attendees = current_attendees + 1, updated_at = NOW() \
             WHERE id = $1 AND current_attendees < max_attendees",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Release one attendee slot; a no-op at zero so the counter stays non-negative
    pub async fn decrement_attendees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<bool, EventifyError> {
        let result = sqlx::query(
            "UPDATE events \
             SET current_attendees = current_attendees - 1, updated_at = NOW() \
             WHERE id = $1 AND current_attendees > 0",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, EventifyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
