use std::sync::Arc;

use chrono_tz::Tz;
use shared::models::{AvailabilityQuery, ReservationCreate, ReservationStatus, ReservationUpdate, Role};
use surrealdb::RecordId;

use super::instant::requested_instant;
use super::memory::{MemoryStore, RecordingNotifier, context};
use super::*;
use crate::auth::policy::{DenyReason, Requester};
use crate::db::models::Reservation;

const TZ: Tz = chrono_tz::Europe::Madrid;

struct Fixture {
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    resolver: AvailabilityResolver,
}

fn fixture() -> Fixture {
    fixture_with(RecordingNotifier::default())
}

fn fixture_with(notifier: RecordingNotifier) -> Fixture {
    let store = MemoryStore::new();
    let notifier = Arc::new(notifier);
    let resolver = AvailabilityResolver::new(context(&store, notifier.clone(), TZ));
    Fixture {
        store,
        notifier,
        resolver,
    }
}

fn at(date: &str, time: &str) -> i64 {
    requested_instant(date, time, TZ).unwrap()
}

fn query(date: &str, time: &str, party_size: i32) -> AvailabilityQuery {
    AvailabilityQuery {
        date: Some(date.to_string()),
        time: Some(time.to_string()),
        party_size: Some(party_size),
    }
}

fn booking(table: &RecordId, date: &str, time: &str, guests: i32) -> ReservationCreate {
    ReservationCreate {
        table_id: table.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        guests,
    }
}

fn seeded(
    store: &MemoryStore,
    key: &str,
    table: &RecordId,
    user: &RecordId,
    reserved_at: i64,
    status: ReservationStatus,
) -> RecordId {
    let id = RecordId::from_table_key("reservation", key);
    store.seed_reservation(Reservation {
        id: id.clone(),
        table_id: table.clone(),
        user_id: user.clone(),
        reserved_at,
        guests: 2,
        status,
        created_at: 0,
    });
    id
}

fn numbers(tables: &[crate::db::models::DiningTable]) -> Vec<i32> {
    let mut n: Vec<i32> = tables.iter().map(|t| t.table_number).collect();
    n.sort();
    n
}

// ========================================================================
// find_available_tables
// ========================================================================

#[tokio::test]
async fn test_capacity_band() {
    let f = fixture();
    f.store.add_table("t2", 1, 2, true);
    f.store.add_table("t4", 2, 4, true);
    f.store.add_table("t6", 3, 6, true);
    f.store.add_table("t7", 4, 7, true);
    f.store.add_table("t8", 5, 8, true);
    f.store.add_table("off", 6, 4, false);

    let tables = f
        .resolver
        .find_available_tables(&query("2024-06-01", "19:30", 4))
        .await
        .unwrap();

    // 4 <= capacity <= 7, in service only
    assert_eq!(numbers(&tables), vec![2, 3, 4]);
}

#[tokio::test]
async fn test_exact_instant_conflict_excludes_table() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    f.store.add_table("t2", 2, 4, true);
    let user = f.store.add_user("ana", Role::Client);
    seeded(&f.store, "r1", &t1, &user, at("2024-06-01", "19:30"), ReservationStatus::Pending);

    let tables = f
        .resolver
        .find_available_tables(&query("2024-06-01", "19:30", 2))
        .await
        .unwrap();
    assert_eq!(numbers(&tables), vec![2]);

    // 不同时刻不冲突
    let tables = f
        .resolver
        .find_available_tables(&query("2024-06-01", "19:31", 2))
        .await
        .unwrap();
    assert_eq!(numbers(&tables), vec![1, 2]);
}

#[tokio::test]
async fn test_cancelled_reservation_does_not_block() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);
    seeded(&f.store, "r1", &t1, &user, at("2024-06-01", "20:00"), ReservationStatus::Cancelled);

    let tables = f
        .resolver
        .find_available_tables(&query("2024-06-01", "20:00", 3))
        .await
        .unwrap();
    assert_eq!(numbers(&tables), vec![1]);
}

#[tokio::test]
async fn test_missing_query_parameters() {
    let f = fixture();
    let mut q = query("2024-06-01", "19:30", 2);
    q.time = None;
    let err = f.resolver.find_available_tables(&q).await.unwrap_err();
    assert!(matches!(err, BookingError::Validation(ref m) if m == "Missing required query parameters"));

    let mut q = query("2024-06-01", "19:30", 2);
    q.date = Some("  ".to_string());
    assert!(matches!(
        f.resolver.find_available_tables(&q).await,
        Err(BookingError::Validation(_))
    ));

    let err = f
        .resolver
        .find_available_tables(&query("2024-06-01", "19:30", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));

    let err = f
        .resolver
        .find_available_tables(&query("2024-13-01", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}

// ========================================================================
// create_reservation
// ========================================================================

#[tokio::test]
async fn test_create_inserts_attaches_and_notifies() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);

    let receipt = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 3))
        .await
        .unwrap();

    assert_eq!(receipt.message, CONFIRMATION_MESSAGE);
    let r = &receipt.reservation;
    assert_eq!(r.status, ReservationStatus::Pending);
    assert_eq!(r.table_id, t1);
    assert_eq!(r.user_id, user);
    assert_eq!(r.reserved_at, at("2024-06-01", "19:30"));

    assert_eq!(f.store.reservation(&r.id).as_ref(), Some(r));
    assert_eq!(f.store.table(&t1).unwrap().reservations, vec![r.id.clone()]);
    assert_eq!(*f.notifier.sent.lock(), vec![r.id.clone()]);

    let commits = f.store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].len(), 2);
    assert!(matches!(commits[0].ops()[0], WriteOp::InsertReservation(_)));
    assert!(matches!(commits[0].ops()[1], WriteOp::AttachToTable { .. }));
}

#[tokio::test]
async fn test_create_same_instant_conflicts() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);

    f.resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 2))
        .await
        .unwrap();
    let err = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::AlreadyReserved)));
    assert_eq!(f.store.reservation_count(), 1);

    // one minute later is fine
    f.resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:31", 2))
        .await
        .unwrap();
    assert_eq!(f.store.reservation_count(), 2);
}

#[tokio::test]
async fn test_create_after_cancel_reuses_slot() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);
    seeded(&f.store, "old", &t1, &user, at("2024-06-01", "21:00"), ReservationStatus::Cancelled);

    assert!(f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "21:00", 2))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_create_check_order() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 2, true);
    let off = f.store.add_table("off", 2, 8, false);
    let user = f.store.add_user("ana", Role::Client);
    let ghost = RecordId::from_table_key("user", "ghost");

    // unknown user wins over an unusable table
    let err = f
        .resolver
        .create_reservation(&ghost, &booking(&off, "2024-06-01", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(Entity::User)));

    // out of service
    let err = f
        .resolver
        .create_reservation(&user, &booking(&off, "2024-06-01", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::TableUnavailable)));

    // too small
    let err = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 3))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::TableUnavailable)));

    // unknown table id
    let mut input = booking(&t1, "2024-06-01", "19:30", 2);
    input.table_id = "dining_table:nope".to_string();
    let err = f.resolver.create_reservation(&user, &input).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::TableUnavailable)));

    // malformed input is rejected before anything is read
    let err = f
        .resolver
        .create_reservation(&ghost, &booking(&t1, "June 1st", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));

    assert!(f.store.commits().is_empty());
}

#[tokio::test]
async fn test_create_survives_notifier_failure() {
    let f = fixture_with(RecordingNotifier {
        fail: true,
        ..Default::default()
    });
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);

    let receipt = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 2))
        .await
        .unwrap();
    assert!(f.store.reservation(&receipt.reservation.id).is_some());
    assert!(f.notifier.sent.lock().is_empty());
}

#[tokio::test]
async fn test_create_partial_failure_is_inconsistent() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);

    // insert applied, attach fails
    f.store.fail_commit_at(1);
    let err = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 2))
        .await
        .unwrap_err();
    match err {
        BookingError::Inconsistent(e) => {
            assert_eq!(e.applied, 1);
            assert!(e.failed_op.starts_with("attach"));
        }
        other => panic!("expected Inconsistent, got {other:?}"),
    }
    assert_eq!(f.store.reservation_count(), 1);
    assert!(f.store.table(&t1).unwrap().reservations.is_empty());
    assert!(f.notifier.sent.lock().is_empty());
}

#[tokio::test]
async fn test_create_failure_before_any_write_is_store_error() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let user = f.store.add_user("ana", Role::Client);

    f.store.fail_commit_at(0);
    let err = f
        .resolver
        .create_reservation(&user, &booking(&t1, "2024-06-01", "19:30", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Store(_)));
    assert_eq!(f.store.reservation_count(), 0);
}

// ========================================================================
// update / cancel / delete / confirm
// ========================================================================

#[tokio::test]
async fn test_update_is_owner_only() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let admin = f.store.add_user("boss", Role::Admin);
    let other = f.store.add_user("eve", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Pending);

    let update = ReservationUpdate {
        guests: Some(3),
        ..Default::default()
    };
    for who in [Requester::new(admin, Role::Admin), Requester::new(other, Role::Client)] {
        let err = f.resolver.update_reservation(&who, &id, &update).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Forbidden {
                reason: DenyReason::NotOwner,
                ..
            }
        ));
    }
    assert_eq!(f.store.reservation(&id).unwrap().guests, 2);

    let updated = f
        .resolver
        .update_reservation(&Requester::new(owner, Role::Client), &id, &update)
        .await
        .unwrap();
    assert_eq!(updated.guests, 3);
    assert_eq!(f.store.reservation(&id).unwrap().guests, 3);
}

#[tokio::test]
async fn test_update_moves_between_tables() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let t2 = f.store.add_table("t2", 2, 6, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Pending);

    let update = ReservationUpdate {
        table_id: Some(t2.to_string()),
        time: Some("20:15".to_string()),
        guests: Some(5),
        ..Default::default()
    };
    let updated = f
        .resolver
        .update_reservation(&Requester::new(owner, Role::Client), &id, &update)
        .await
        .unwrap();

    assert_eq!(updated.table_id, t2);
    assert_eq!(updated.reserved_at, at("2024-06-01", "20:15"));
    assert!(f.store.table(&t1).unwrap().reservations.is_empty());
    assert_eq!(f.store.table(&t2).unwrap().reservations, vec![id]);
}

#[tokio::test]
async fn test_update_validates_target_for_effective_guests() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 6, true);
    let small = f.store.add_table("small", 2, 2, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = RecordId::from_table_key("reservation", "r1");
    f.store.seed_reservation(Reservation {
        id: id.clone(),
        table_id: t1.clone(),
        user_id: owner.clone(),
        reserved_at: at("2024-06-01", "19:30"),
        guests: 5,
        status: ReservationStatus::Pending,
        created_at: 0,
    });

    let update = ReservationUpdate {
        table_id: Some(small.to_string()),
        ..Default::default()
    };
    let err = f
        .resolver
        .update_reservation(&Requester::new(owner, Role::Client), &id, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::TableUnavailable)));
    assert_eq!(f.store.table(&t1).unwrap().reservations, vec![id]);
}

#[tokio::test]
async fn test_update_cancelled_is_rejected() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Cancelled);

    let err = f
        .resolver
        .update_reservation(
            &Requester::new(owner, Role::Client),
            &id,
            &ReservationUpdate {
                guests: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::AlreadyCancelled)));
}

#[tokio::test]
async fn test_cancel_detaches_and_keeps_record() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Confirmed);
    let requester = Requester::new(owner, Role::Client);

    let cancelled = f.resolver.cancel_reservation(&requester, &id).await.unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert!(f.store.table(&t1).unwrap().reservations.is_empty());
    assert_eq!(f.store.reservation(&id).unwrap().status, ReservationStatus::Cancelled);

    let err = f.resolver.cancel_reservation(&requester, &id).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::AlreadyCancelled)));
}

#[tokio::test]
async fn test_delete_by_admin_and_not_by_stranger() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let admin = f.store.add_user("boss", Role::Admin);
    let other = f.store.add_user("eve", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Pending);

    let err = f
        .resolver
        .delete_reservation(&Requester::new(other, Role::Client), &id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Forbidden { .. }));

    f.resolver
        .delete_reservation(&Requester::new(admin, Role::Admin), &id)
        .await
        .unwrap();
    assert!(f.store.reservation(&id).is_none());
    assert!(f.store.table(&t1).unwrap().reservations.is_empty());
}

#[tokio::test]
async fn test_delete_cancelled_skips_detach() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Cancelled);

    f.resolver
        .delete_reservation(&Requester::new(owner, Role::Client), &id)
        .await
        .unwrap();
    let commits = f.store.commits();
    assert_eq!(commits[0].ops(), &[WriteOp::DeleteReservation(id)]);
}

#[tokio::test]
async fn test_delete_partial_failure_is_inconsistent() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let id = seeded(&f.store, "r1", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Pending);

    f.store.fail_commit_at(1);
    let err = f
        .resolver
        .delete_reservation(&Requester::new(owner, Role::Client), &id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Inconsistent(_)));
    // detached but still on record
    assert!(f.store.reservation(&id).is_some());
    assert!(f.store.table(&t1).unwrap().reservations.is_empty());
}

#[tokio::test]
async fn test_confirm_transitions() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let owner = f.store.add_user("ana", Role::Client);
    let admin = Requester::new(f.store.add_user("boss", Role::Admin), Role::Admin);
    let pending = seeded(&f.store, "p", &t1, &owner, at("2024-06-01", "19:30"), ReservationStatus::Pending);
    let cancelled = seeded(&f.store, "c", &t1, &owner, at("2024-06-01", "20:30"), ReservationStatus::Cancelled);

    let err = f
        .resolver
        .confirm_reservation(&Requester::new(owner, Role::Client), &pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Forbidden {
            reason: DenyReason::AdminRequired,
            ..
        }
    ));

    let confirmed = f.resolver.confirm_reservation(&admin, &pending).await.unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    // idempotent
    let again = f.resolver.confirm_reservation(&admin, &pending).await.unwrap();
    assert_eq!(again.status, ReservationStatus::Confirmed);
    assert_eq!(f.store.commits().len(), 1);

    let err = f.resolver.confirm_reservation(&admin, &cancelled).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(Conflict::InvalidTransition)));
}

#[tokio::test]
async fn test_reads_respect_ownership() {
    let f = fixture();
    let t1 = f.store.add_table("t1", 1, 4, true);
    let ana = f.store.add_user("ana", Role::Client);
    let eve = f.store.add_user("eve", Role::Client);
    let admin = Requester::new(f.store.add_user("boss", Role::Admin), Role::Admin);
    let mine = seeded(&f.store, "a", &t1, &ana, at("2024-06-01", "19:30"), ReservationStatus::Pending);
    seeded(&f.store, "e", &t1, &eve, at("2024-06-01", "20:30"), ReservationStatus::Pending);

    let ana = Requester::new(ana, Role::Client);
    let eve = Requester::new(eve, Role::Client);

    assert_eq!(f.resolver.list_user_reservations(&ana).await.unwrap().len(), 1);
    assert!(f.resolver.get_reservation(&ana, &mine).await.is_ok());
    assert!(f.resolver.get_reservation(&admin, &mine).await.is_ok());
    assert!(matches!(
        f.resolver.get_reservation(&eve, &mine).await,
        Err(BookingError::Forbidden { .. })
    ));

    assert_eq!(f.resolver.list_reservations(&admin).await.unwrap().len(), 2);
    assert!(f.resolver.list_reservations(&eve).await.is_err());

    let missing = RecordId::from_table_key("reservation", "nope");
    assert!(matches!(
        f.resolver.get_reservation(&ana, &missing).await,
        Err(BookingError::NotFound(Entity::Reservation))
    ));
}
