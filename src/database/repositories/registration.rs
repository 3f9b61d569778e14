//! Registration repository implementation
//!
//! Writes that participate in the counter bookkeeping are transaction-scoped
//! so the registration service can pair them with the event-counter update.

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::registration::{EventAttendee, Registration, RegistrationStatus};
use crate::utils::errors::EventifyError;

const REGISTRATION_COLUMNS: &str = "id, event_id, student_id, registration_date, status, \
     attended, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the registration for a (event, student) pair, whatever its status
    pub async fn find_by_pair(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<Option<Registration>, EventifyError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations \
             WHERE event_id = $1 AND student_id = $2"
        ))
        .bind(event_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find a pair's registration when it still counts as participation
    /// (registered or attended), for the event detail view
    pub async fn find_current_by_pair(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<Option<Registration>, EventifyError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations \
             WHERE event_id = $1 AND student_id = $2 AND status IN ('registered', 'attended')"
        ))
        .bind(event_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Insert a new registration in status `registered`
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        student_id: i64,
    ) -> Result<Registration, EventifyError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO event_registrations (event_id, student_id, status, registration_date)
            VALUES ($1, $2, $3, NOW())
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(student_id)
        .bind(RegistrationStatus::Registered.as_str())
        .fetch_one(&mut **tx)
        .await?;

        Ok(registration)
    }

    /// Move a registration from one status to another.
    ///
    /// The `from` guard makes the transition atomic: of two concurrent
    /// identical transitions only one matches a row, so the caller applies
    /// the counter delta at most once. `registration_date` is left untouched.
    pub async fn transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        from: RegistrationStatus,
        to: RegistrationStatus,
    ) -> Result<Option<Registration>, EventifyError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE event_registrations
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        Ok(registration)
    }

    /// Physically delete a registration record, returning the status it had
    /// at deletion time so the caller can settle the counter
    pub async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<String>, EventifyError> {
        let status: Option<(String,)> =
            sqlx::query_as("DELETE FROM event_registrations WHERE id = $1 RETURNING status")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(status.map(|(s,)| s))
    }

    /// List a student's registrations, optionally filtered by status
    pub async fn list_for_student(
        &self,
        student_id: i64,
        status: Option<RegistrationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Registration>, EventifyError> {
        let mut query = self.student_query(REGISTRATION_COLUMNS, student_id, status);
        query
            .push(" ORDER BY registration_date DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let registrations = query
            .build_query_as::<Registration>()
            .fetch_all(&self.pool)
            .await?;

        Ok(registrations)
    }

    /// Count a student's registrations, for pagination
    pub async fn count_for_student(
        &self,
        student_id: i64,
        status: Option<RegistrationStatus>,
    ) -> Result<i64, EventifyError> {
        let mut query = self.student_query("COUNT(*)", student_id, status);
        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    fn student_query(
        &self,
        selection: &str,
        student_id: i64,
        status: Option<RegistrationStatus>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {selection} FROM event_registrations WHERE student_id = "
        ));
        query.push_bind(student_id);
        if let Some(status) = status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query
    }

    /// Active attendees for an event, joined with student identity
    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<EventAttendee>, EventifyError> {
        let attendees = sqlx::query_as::<_, EventAttendee>(
            r#"
            SELECT r.id AS registration_id, r.student_id, u.first_name, u.last_name,
                   u.email, u.student_number, u.department, r.registration_date,
                   r.status, r.attended
            FROM event_registrations r
            INNER JOIN users u ON u.id = r.student_id
            WHERE r.event_id = $1 AND r.status = 'registered'
            ORDER BY r.registration_date ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    /// Count registrations for an event in a given status
    pub async fn count_by_status(
        &self,
        event_id: i64,
        status: RegistrationStatus,
    ) -> Result<i64, EventifyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
