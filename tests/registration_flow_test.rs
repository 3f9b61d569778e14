//! End-to-end registration flow tests against a real PostgreSQL instance.
//!
//! These cover the capacity/registration consistency behavior: the attendee
//! counter tracks active registrations across register, unregister,
//! re-register, and attendee removal, and never leaves `0..=max_attendees`.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serial_test::serial;

use eventify::database::repositories::{EventRepository, RegistrationRepository};
use eventify::models::registration::RegistrationStatus;
use eventify::services::RegistrationService;
use eventify::EventifyError;

use helpers::test_data::{
    create_club_admin, create_event, create_student, current_attendees, registration_rows,
    set_event_date, EventSpec,
};
use helpers::TestDatabase;

fn service(db: &TestDatabase) -> RegistrationService {
    RegistrationService::new(
        db.pool.clone(),
        EventRepository::new(db.pool.clone()),
        RegistrationRepository::new(db.pool.clone()),
    )
}

#[tokio::test]
#[serial]
async fn capacity_one_event_admits_exactly_one_student() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(
        &db.pool,
        admin,
        EventSpec {
            max_attendees: 1,
            ..Default::default()
        },
    )
    .await;
    let s1 = create_student(&db.pool).await;
    let s2 = create_student(&db.pool).await;

    let outcome = service.register(event, s1).await.unwrap();
    assert!(outcome.created);
    assert_eq!(current_attendees(&db.pool, event).await, 1);

    let err = service.register(event, s2).await.unwrap_err();
    assert_matches!(err, EventifyError::EventFull { .. });
    assert_eq!(current_attendees(&db.pool, event).await, 1);
}

#[tokio::test]
#[serial]
async fn register_unregister_reregister_reuses_the_record() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    let first = service.register(event, student).await.unwrap();
    assert!(first.created);
    assert_eq!(current_attendees(&db.pool, event).await, 1);

    let cancelled = service.unregister(event, student).await.unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.id, first.registration.id);
    assert_eq!(current_attendees(&db.pool, event).await, 0);

    let second = service.register(event, student).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.registration.id, first.registration.id);
    assert_eq!(second.registration.status, "registered");
    assert_eq!(
        second.registration.registration_date,
        first.registration.registration_date
    );
    assert_eq!(current_attendees(&db.pool, event).await, 1);

    // the uniqueness constraint held: one row for the pair throughout
    assert_eq!(registration_rows(&db.pool, event, student).await, 1);
}

#[tokio::test]
#[serial]
async fn duplicate_registration_is_rejected_with_one_net_increment() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    service.register(event, student).await.unwrap();
    let err = service.register(event, student).await.unwrap_err();
    assert_matches!(err, EventifyError::AlreadyRegistered { .. });

    assert_eq!(current_attendees(&db.pool, event).await, 1);
    assert_eq!(registration_rows(&db.pool, event, student).await, 1);
}

#[tokio::test]
#[serial]
async fn registration_past_deadline_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(
        &db.pool,
        admin,
        EventSpec {
            deadline_in: Duration::hours(-1),
            ..Default::default()
        },
    )
    .await;
    let student = create_student(&db.pool).await;

    let err = service.register(event, student).await.unwrap_err();
    assert_matches!(err, EventifyError::DeadlinePassed { .. });
    assert_eq!(current_attendees(&db.pool, event).await, 0);
    assert_eq!(registration_rows(&db.pool, event, student).await, 0);
}

#[tokio::test]
#[serial]
async fn unregister_after_event_start_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    service.register(event, student).await.unwrap();
    set_event_date(&db.pool, event, Utc::now() - Duration::hours(1)).await;

    let err = service.unregister(event, student).await.unwrap_err();
    assert_matches!(err, EventifyError::EventAlreadyStarted { .. });

    // nothing moved: record still active, counter untouched
    let registrations = RegistrationRepository::new(db.pool.clone());
    let registration = registrations
        .find_by_pair(event, student)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registration.status, "registered");
    assert_eq!(current_attendees(&db.pool, event).await, 1);
}

#[tokio::test]
#[serial]
async fn unregister_without_registration_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    let err = service.unregister(event, student).await.unwrap_err();
    assert_matches!(err, EventifyError::NotRegistered { .. });
}

#[tokio::test]
#[serial]
async fn inactive_event_rejects_registration() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(
        &db.pool,
        admin,
        EventSpec {
            is_active: false,
            ..Default::default()
        },
    )
    .await;
    let student = create_student(&db.pool).await;

    let err = service.register(event, student).await.unwrap_err();
    assert_matches!(err, EventifyError::EventInactive { .. });
}

#[tokio::test]
#[serial]
async fn missing_event_rejects_registration() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let student = create_student(&db.pool).await;
    let err = service.register(99_999, student).await.unwrap_err();
    assert_matches!(err, EventifyError::EventNotFound { .. });
}

#[tokio::test]
#[serial]
async fn counter_reaches_capacity_exactly() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(
        &db.pool,
        admin,
        EventSpec {
            max_attendees: 3,
            ..Default::default()
        },
    )
    .await;

    for _ in 0..3 {
        let student = create_student(&db.pool).await;
        service.register(event, student).await.unwrap();
    }
    assert_eq!(current_attendees(&db.pool, event).await, 3);

    let late = create_student(&db.pool).await;
    let err = service.register(event, late).await.unwrap_err();
    assert_matches!(err, EventifyError::EventFull { .. });
    assert_eq!(current_attendees(&db.pool, event).await, 3);

    // the counter agrees with the set of active registrations
    let registrations = RegistrationRepository::new(db.pool.clone());
    let active = registrations
        .count_by_status(event, RegistrationStatus::Registered)
        .await
        .unwrap();
    assert_eq!(active, 3);
}

#[tokio::test]
#[serial]
async fn concurrent_registrations_cannot_overfill() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(
        &db.pool,
        admin,
        EventSpec {
            max_attendees: 1,
            ..Default::default()
        },
    )
    .await;
    let s1 = create_student(&db.pool).await;
    let s2 = create_student(&db.pool).await;

    let (r1, r2) = tokio::join!(service.register(event, s1), service.register(event, s2));
    let successes = [r1.is_ok(), r2.is_ok()].into_iter().filter(|ok| *ok).count();
    assert_eq!(successes, 1);
    assert_eq!(current_attendees(&db.pool, event).await, 1);
}

#[tokio::test]
#[serial]
async fn removing_an_attendee_releases_the_slot() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let other_admin = create_club_admin(&db.pool, "Debate Society").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    service.register(event, student).await.unwrap();
    assert_eq!(current_attendees(&db.pool, event).await, 1);

    // only the owning admin may remove attendees
    let err = service
        .remove_registration(event, student, other_admin)
        .await
        .unwrap_err();
    assert_matches!(err, EventifyError::PermissionDenied(_));

    service
        .remove_registration(event, student, admin)
        .await
        .unwrap();
    assert_eq!(current_attendees(&db.pool, event).await, 0);
    assert_eq!(registration_rows(&db.pool, event, student).await, 0);
}

#[tokio::test]
#[serial]
async fn removing_a_cancelled_registration_leaves_the_counter_alone() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = service(&db);

    let admin = create_club_admin(&db.pool, "Chess Club").await;
    let event = create_event(&db.pool, admin, EventSpec::default()).await;
    let student = create_student(&db.pool).await;

    service.register(event, student).await.unwrap();
    service.unregister(event, student).await.unwrap();
    assert_eq!(current_attendees(&db.pool, event).await, 0);

    service
        .remove_registration(event, student, admin)
        .await
        .unwrap();
    assert_eq!(current_attendees(&db.pool, event).await, 0);
}
