//! In-memory store for resolver tests
//!
//! Implements every store seam plus [`WorkCommitter`]. `fail_commit_at(n)`
//! makes the next commit apply `n` ops and then fail, which is how partial
//! writes are simulated.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared::models::Role;
use surrealdb::RecordId;

use super::resolver::BookingContext;
use super::store::{ReservationStore, TableStore, UserStore};
use super::unit_of_work::{CommitError, UnitOfWork, WorkCommitter, WriteOp};
use crate::db::models::{DiningTable, Reservation, User};
use crate::db::repository::{RepoError, RepoResult};
use crate::notify::{Notifier, NotifyError};

#[derive(Default)]
struct Inner {
    tables: Vec<DiningTable>,
    reservations: Vec<Reservation>,
    users: Vec<User>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    fail_at: Mutex<Option<usize>>,
    commits: Mutex<Vec<UnitOfWork>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_table(&self, key: &str, table_number: i32, capacity: i32, available: bool) -> RecordId {
        let id = RecordId::from_table_key("dining_table", key);
        self.inner.write().tables.push(DiningTable {
            id: id.clone(),
            table_number,
            capacity,
            available,
            reservations: vec![],
            created_at: 0,
        });
        id
    }

    pub fn add_user(&self, key: &str, role: Role) -> RecordId {
        let id = RecordId::from_table_key("user", key);
        self.inner.write().users.push(User {
            id: id.clone(),
            name: key.to_string(),
            email: format!("{key}@example.com"),
            hash_pass: String::new(),
            role,
            created_at: 0,
        });
        id
    }

    /// Store a reservation directly, attached to its table
    pub fn seed_reservation(&self, reservation: Reservation) {
        let mut inner = self.inner.write();
        if reservation.status.holds_table()
            && let Some(table) = inner.tables.iter_mut().find(|t| t.id == reservation.table_id)
        {
            table.reservations.push(reservation.id.clone());
        }
        inner.reservations.push(reservation);
    }

    pub fn table(&self, id: &RecordId) -> Option<DiningTable> {
        self.inner.read().tables.iter().find(|t| &t.id == id).cloned()
    }

    pub fn reservation(&self, id: &RecordId) -> Option<Reservation> {
        self.inner.read().reservations.iter().find(|r| &r.id == id).cloned()
    }

    pub fn reservation_count(&self) -> usize {
        self.inner.read().reservations.len()
    }

    /// Next commit applies `applied` ops, then fails
    pub fn fail_commit_at(&self, applied: usize) {
        *self.fail_at.lock() = Some(applied);
    }

    /// Units of work committed so far (including failed ones)
    pub fn commits(&self) -> Vec<UnitOfWork> {
        self.commits.lock().clone()
    }

    fn apply(&self, op: &WriteOp) -> RepoResult<()> {
        let mut inner = self.inner.write();
        match op {
            WriteOp::InsertReservation(r) => {
                if inner.reservations.iter().any(|x| x.id == r.id) {
                    return Err(RepoError::Duplicate(r.id.to_string()));
                }
                inner.reservations.push(r.clone());
            }
            WriteOp::SaveReservation(r) => {
                let slot = inner
                    .reservations
                    .iter_mut()
                    .find(|x| x.id == r.id)
                    .ok_or_else(|| RepoError::NotFound(r.id.to_string()))?;
                *slot = r.clone();
            }
            WriteOp::DeleteReservation(id) => {
                let before = inner.reservations.len();
                inner.reservations.retain(|x| &x.id != id);
                if inner.reservations.len() == before {
                    return Err(RepoError::NotFound(id.to_string()));
                }
            }
            WriteOp::AttachToTable { table, reservation } => {
                let t = inner
                    .tables
                    .iter_mut()
                    .find(|t| &t.id == table)
                    .ok_or_else(|| RepoError::NotFound(table.to_string()))?;
                if !t.reservations.contains(reservation) {
                    t.reservations.push(reservation.clone());
                }
            }
            WriteOp::DetachFromTable { table, reservation } => {
                let t = inner
                    .tables
                    .iter_mut()
                    .find(|t| &t.id == table)
                    .ok_or_else(|| RepoError::NotFound(table.to_string()))?;
                t.reservations.retain(|r| r != reservation);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn find_table(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        Ok(self.table(id))
    }

    async fn candidate_tables(&self, min_capacity: i32, max_capacity: i32) -> RepoResult<Vec<DiningTable>> {
        Ok(self
            .inner
            .read()
            .tables
            .iter()
            .filter(|t| t.available && t.capacity >= min_capacity && t.capacity <= max_capacity)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_reservation(&self, id: &RecordId) -> RepoResult<Option<Reservation>> {
        Ok(self.reservation(id))
    }

    async fn reservations_between(&self, start: i64, end: i64) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .inner
            .read()
            .reservations
            .iter()
            .filter(|r| start <= r.reserved_at && r.reserved_at < end)
            .cloned()
            .collect())
    }

    async fn reservations_at(&self, table: &RecordId, instant: i64) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .inner
            .read()
            .reservations
            .iter()
            .filter(|r| &r.table_id == table && r.reserved_at == instant)
            .cloned()
            .collect())
    }

    async fn all_reservations(&self) -> RepoResult<Vec<Reservation>> {
        Ok(self.inner.read().reservations.clone())
    }

    async fn reservations_of_user(&self, user: &RecordId) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .inner
            .read()
            .reservations
            .iter()
            .filter(|r| &r.user_id == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: &RecordId) -> RepoResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| &u.id == id).cloned())
    }
}

#[async_trait]
impl WorkCommitter for MemoryStore {
    async fn commit(&self, work: UnitOfWork) -> Result<(), CommitError> {
        self.commits.lock().push(work.clone());
        let fail_at = self.fail_at.lock().take();
        for (applied, op) in work.ops().iter().enumerate() {
            let result = if fail_at == Some(applied) {
                Err(RepoError::Database("injected failure".to_string()))
            } else {
                self.apply(op)
            };
            if let Err(source) = result {
                return Err(CommitError {
                    applied,
                    failed_op: op.to_string(),
                    source,
                });
            }
        }
        Ok(())
    }
}

/// Notifier that records calls and can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<RecordId>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn reservation_created(
        &self,
        _user: &User,
        reservation: &Reservation,
        _table: &DiningTable,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("smtp down".to_string()));
        }
        self.sent.lock().push(reservation.id.clone());
        Ok(())
    }
}

/// Context wired entirely to `store`
pub fn context(store: &Arc<MemoryStore>, notifier: Arc<RecordingNotifier>, tz: chrono_tz::Tz) -> BookingContext {
    BookingContext {
        tables: store.clone(),
        reservations: store.clone(),
        users: store.clone(),
        committer: store.clone(),
        notifier,
        tz,
    }
}
