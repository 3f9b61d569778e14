//! Test data helpers for seeding users and events

use chrono::{DateTime, Duration, Utc};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use sqlx::PgPool;
use uuid::Uuid;

use eventify::services::auth::hash_password;

/// Insert a student account and return its id
pub async fn create_student(pool: &PgPool) -> i64 {
    create_user(pool, "student", Some("S12345"), None).await
}

/// Insert a club admin account and return its id
pub async fn create_club_admin(pool: &PgPool, club_name: &str) -> i64 {
    create_user(pool, "club_admin", None, Some(club_name)).await
}

async fn create_user(
    pool: &PgPool,
    role: &str,
    student_number: Option<&str>,
    club_name: Option<&str>,
) -> i64 {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email = format!("{}@test.university.edu", Uuid::new_v4().simple());

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (first_name, last_name, email, password_hash, role,
                           student_number, club_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(hash_password("Passw0rd"))
    .bind(role)
    .bind(student_number)
    .bind(club_name)
    .fetch_one(pool)
    .await
    .expect("failed to insert test user");

    id
}

/// Knobs for seeding an event; defaults describe an open, upcoming event
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub max_attendees: i32,
    pub starts_in: Duration,
    pub deadline_in: Duration,
    pub is_active: bool,
}

impl Default for EventSpec {
    fn default() -> Self {
        Self {
            max_attendees: 30,
            starts_in: Duration::days(7),
            deadline_in: Duration::days(6),
            is_active: true,
        }
    }
}

/// Insert an event and return its id
pub async fn create_event(pool: &PgPool, created_by: i64, spec: EventSpec) -> i64 {
    let now = Utc::now();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO events (title, description, date, start_time, end_time, location,
                            max_attendees, category, is_active, registration_deadline,
                            created_by, club_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind("Test Event")
    .bind("An event seeded by the integration tests")
    .bind(now + spec.starts_in)
    .bind("18:00")
    .bind("20:00")
    .bind("Main Hall")
    .bind(spec.max_attendees)
    .bind("workshop")
    .bind(spec.is_active)
    .bind(now + spec.deadline_in)
    .bind(created_by)
    .bind("Test Club")
    .fetch_one(pool)
    .await
    .expect("failed to insert test event");

    id
}

/// Read an event's cached attendee counter
pub async fn current_attendees(pool: &PgPool, event_id: i64) -> i32 {
    let (count,): (i32,) =
        sqlx::query_as("SELECT current_attendees FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await
            .expect("failed to read attendee counter");

    count
}

/// Move an event's start (and keep the deadline earlier) to a given instant
pub async fn set_event_date(pool: &PgPool, event_id: i64, date: DateTime<Utc>) {
    sqlx::query("UPDATE events SET date = $2 WHERE id = $1")
        .bind(event_id)
        .bind(date)
        .execute(pool)
        .await
        .expect("failed to update event date");
}

/// Count registration rows for a pair, whatever their status
pub async fn registration_rows(pool: &PgPool, event_id: i64, student_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND student_id = $2",
    )
    .bind(event_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .expect("failed to count registrations");

    count
}
