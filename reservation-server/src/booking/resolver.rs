//! Availability Resolver
//!
//! Answers which tables can take a party at a given instant and performs
//! reservation writes. All collaborators come in through [`BookingContext`];
//! the resolver holds no global state.
//!
//! Conflicts are exact-instant: two reservations collide only when they name
//! the same table and the same millisecond. There is no duration model.

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use shared::models::{AvailabilityQuery, ReservationCreate, ReservationStatus, ReservationUpdate};
use surrealdb::RecordId;

use super::error::{BookingError, BookingResult, Conflict, Entity};
use super::instant::{DayWindow, requested_instant, reschedule};
use super::store::{ReservationStore, TableStore, UserStore};
use super::unit_of_work::{UnitOfWork, WorkCommitter, WriteOp};
use crate::auth::policy::{Action, Decision, Requester, Resource, authorize};
use crate::db::models::{DiningTable, Reservation, dining_table, new_record_id, parse_record_id, reservation};
use crate::notify::Notifier;
use crate::security_log;
use crate::utils::time::{local_to_millis, now_millis, parse_date, parse_time};

/// Largest table offered for a party: `party_size + SEAT_SLACK` seats
pub const SEAT_SLACK: i32 = 3;

pub const CONFIRMATION_MESSAGE: &str = "Confirmation sent by email";

/// Everything the resolver needs, passed explicitly
#[derive(Clone)]
pub struct BookingContext {
    pub tables: Arc<dyn TableStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub users: Arc<dyn UserStore>,
    pub committer: Arc<dyn WorkCommitter>,
    pub notifier: Arc<dyn Notifier>,
    /// Business timezone for dates and times of day
    pub tz: Tz,
}

/// Result of a successful create
#[derive(Debug, Clone, Serialize)]
pub struct ReservationReceipt {
    pub message: String,
    pub reservation: Reservation,
}

#[derive(Clone)]
pub struct AvailabilityResolver {
    ctx: BookingContext,
}

impl AvailabilityResolver {
    pub fn new(ctx: BookingContext) -> Self {
        Self { ctx }
    }

    pub fn timezone(&self) -> Tz {
        self.ctx.tz
    }

    /// Tables that can seat the party at the requested instant
    ///
    /// Candidates are available tables with `party_size <= capacity <=
    /// party_size + 3`. A candidate is dropped when any live reservation of
    /// that local day sits on it at exactly the requested instant.
    pub async fn find_available_tables(&self, query: &AvailabilityQuery) -> BookingResult<Vec<DiningTable>> {
        let (Some(date), Some(time), Some(party_size)) = (
            non_empty(query.date.as_deref()),
            non_empty(query.time.as_deref()),
            query.party_size,
        ) else {
            return Err(BookingError::Validation(
                "Missing required query parameters".to_string(),
            ));
        };
        if party_size <= 0 {
            return Err(BookingError::Validation(
                "party_size must be a positive integer".to_string(),
            ));
        }

        let day = parse_date(date)?;
        let instant = local_to_millis(day.and_time(parse_time(time)?), self.ctx.tz);
        let window = DayWindow::of_date(day, self.ctx.tz);

        let candidates = self
            .ctx
            .tables
            .candidate_tables(party_size, party_size.saturating_add(SEAT_SLACK))
            .await?;
        let booked = self
            .ctx
            .reservations
            .reservations_between(window.start, window.end)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|table| !booked.iter().any(|r| r.blocks(&table.id, instant)))
            .collect())
    }

    /// Book a table for `user_id`
    ///
    /// Checks run in order: input, user exists, table usable for the party,
    /// no live reservation at the exact instant. The check and the write are
    /// not serialized; two concurrent requests for the same slot can both
    /// pass the conflict check.
    pub async fn create_reservation(
        &self,
        user_id: &RecordId,
        input: &ReservationCreate,
    ) -> BookingResult<ReservationReceipt> {
        if input.guests <= 0 {
            return Err(BookingError::Validation(
                "guests must be a positive integer".to_string(),
            ));
        }
        let instant = requested_instant(&input.date, &input.time, self.ctx.tz)?;

        let user = self
            .ctx
            .users
            .find_user(user_id)
            .await?
            .ok_or(BookingError::NotFound(Entity::User))?;

        let table = self.usable_table(&input.table_id, input.guests).await?;

        let taken = self
            .ctx
            .reservations
            .reservations_at(&table.id, instant)
            .await?
            .iter()
            .any(|r| r.status.holds_table());
        if taken {
            return Err(BookingError::Conflict(Conflict::AlreadyReserved));
        }

        let reservation = Reservation {
            id: new_record_id(reservation::TABLE),
            table_id: table.id.clone(),
            user_id: user.id.clone(),
            reserved_at: instant,
            guests: input.guests,
            status: ReservationStatus::Pending,
            created_at: now_millis(),
        };

        let work = UnitOfWork::new()
            .then(WriteOp::InsertReservation(reservation.clone()))
            .then(WriteOp::AttachToTable {
                table: table.id.clone(),
                reservation: reservation.id.clone(),
            });
        self.commit(work, "create_reservation").await?;

        tracing::info!(
            reservation = %reservation.id,
            table = %table.id,
            user = %user.id,
            reserved_at = reservation.reserved_at,
            guests = reservation.guests,
            "Reservation created"
        );

        if let Err(e) = self
            .ctx
            .notifier
            .reservation_created(&user, &reservation, &table)
            .await
        {
            tracing::warn!(reservation = %reservation.id, error = %e, "Failed to send reservation confirmation");
        }

        Ok(ReservationReceipt {
            message: CONFIRMATION_MESSAGE.to_string(),
            reservation,
        })
    }

    /// Owner-only partial update
    ///
    /// Moving to another table re-validates it for the effective guest count
    /// and moves the reservation between the two tables' lists. The new
    /// instant is not checked for conflicts.
    pub async fn update_reservation(
        &self,
        requester: &Requester,
        id: &RecordId,
        update: &ReservationUpdate,
    ) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        self.check(requester, &current, Action::UpdateReservation)?;

        if current.status == ReservationStatus::Cancelled {
            return Err(BookingError::Conflict(Conflict::AlreadyCancelled));
        }
        if let Some(guests) = update.guests
            && guests <= 0
        {
            return Err(BookingError::Validation(
                "guests must be a positive integer".to_string(),
            ));
        }

        let mut updated = current.clone();
        updated.guests = update.guests.unwrap_or(current.guests);
        updated.reserved_at = reschedule(
            current.reserved_at,
            non_empty(update.date.as_deref()),
            non_empty(update.time.as_deref()),
            self.ctx.tz,
        )?;

        let mut work = UnitOfWork::new();
        if let Some(raw) = non_empty(update.table_id.as_deref()) {
            let target = parse_record_id(dining_table::TABLE, raw);
            if target.as_ref() != Some(&current.table_id) {
                let table = self.usable_table(raw, updated.guests).await?;
                work.push(WriteOp::DetachFromTable {
                    table: current.table_id.clone(),
                    reservation: current.id.clone(),
                });
                work.push(WriteOp::AttachToTable {
                    table: table.id.clone(),
                    reservation: current.id.clone(),
                });
                updated.table_id = table.id;
            }
        }
        work.push(WriteOp::SaveReservation(updated.clone()));
        self.commit(work, "update_reservation").await?;

        tracing::info!(reservation = %updated.id, table = %updated.table_id, "Reservation updated");
        Ok(updated)
    }

    /// Remove a reservation (owner or admin)
    pub async fn delete_reservation(&self, requester: &Requester, id: &RecordId) -> BookingResult<()> {
        let current = self.load(id).await?;
        self.check(requester, &current, Action::DeleteReservation)?;

        let mut work = UnitOfWork::new();
        // cancelled reservations were already taken off their table
        if current.status.holds_table() {
            work.push(WriteOp::DetachFromTable {
                table: current.table_id.clone(),
                reservation: current.id.clone(),
            });
        }
        work.push(WriteOp::DeleteReservation(current.id.clone()));
        self.commit(work, "delete_reservation").await?;

        tracing::info!(reservation = %current.id, by = %requester.user_id, "Reservation deleted");
        Ok(())
    }

    /// Mark a reservation cancelled and free its table (owner or admin)
    pub async fn cancel_reservation(&self, requester: &Requester, id: &RecordId) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        self.check(requester, &current, Action::CancelReservation)?;

        if current.status == ReservationStatus::Cancelled {
            return Err(BookingError::Conflict(Conflict::AlreadyCancelled));
        }

        let mut updated = current.clone();
        updated.status = ReservationStatus::Cancelled;

        let work = UnitOfWork::new()
            .then(WriteOp::DetachFromTable {
                table: current.table_id.clone(),
                reservation: current.id.clone(),
            })
            .then(WriteOp::SaveReservation(updated.clone()));
        self.commit(work, "cancel_reservation").await?;

        tracing::info!(reservation = %updated.id, by = %requester.user_id, "Reservation cancelled");
        Ok(updated)
    }

    /// pending → confirmed (admin)
    pub async fn confirm_reservation(&self, requester: &Requester, id: &RecordId) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        self.check(requester, &current, Action::ConfirmReservation)?;

        let status = current.status;
        match status {
            ReservationStatus::Confirmed => Ok(current),
            ReservationStatus::Cancelled => Err(BookingError::Conflict(Conflict::InvalidTransition)),
            ReservationStatus::Pending => {
                let mut updated = current;
                updated.status = ReservationStatus::Confirmed;
                self.commit(
                    UnitOfWork::new().then(WriteOp::SaveReservation(updated.clone())),
                    "confirm_reservation",
                )
                .await?;
                tracing::info!(reservation = %updated.id, "Reservation confirmed");
                Ok(updated)
            }
        }
    }

    /// Single reservation (owner or admin)
    pub async fn get_reservation(&self, requester: &Requester, id: &RecordId) -> BookingResult<Reservation> {
        let current = self.load(id).await?;
        self.check(requester, &current, Action::ViewReservation)?;
        Ok(current)
    }

    /// Every reservation (admin)
    pub async fn list_reservations(&self, requester: &Requester) -> BookingResult<Vec<Reservation>> {
        if let Decision::Deny(reason) = authorize(requester, &Resource::System, Action::ListAllReservations) {
            return Err(BookingError::Forbidden {
                action: Action::ListAllReservations,
                reason,
            });
        }
        Ok(self.ctx.reservations.all_reservations().await?)
    }

    /// The requester's own reservations
    pub async fn list_user_reservations(&self, requester: &Requester) -> BookingResult<Vec<Reservation>> {
        Ok(self
            .ctx
            .reservations
            .reservations_of_user(&requester.user_id)
            .await?)
    }

    // ========== helpers ==========

    async fn load(&self, id: &RecordId) -> BookingResult<Reservation> {
        self.ctx
            .reservations
            .find_reservation(id)
            .await?
            .ok_or(BookingError::NotFound(Entity::Reservation))
    }

    /// Table that exists, is in service and seats `guests`
    ///
    /// A malformed or unknown id is reported the same way as a full table.
    async fn usable_table(&self, raw_id: &str, guests: i32) -> BookingResult<DiningTable> {
        let Some(id) = parse_record_id(dining_table::TABLE, raw_id) else {
            return Err(BookingError::Conflict(Conflict::TableUnavailable));
        };
        match self.ctx.tables.find_table(&id).await? {
            Some(table) if table.can_seat(guests) => Ok(table),
            _ => Err(BookingError::Conflict(Conflict::TableUnavailable)),
        }
    }

    fn check(&self, requester: &Requester, reservation: &Reservation, action: Action) -> BookingResult<()> {
        let resource = Resource::Reservation {
            owner: &reservation.user_id,
        };
        match authorize(requester, &resource, action) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                security_log!(
                    "WARN",
                    "reservation_access_denied",
                    user_id = requester.user_id.to_string(),
                    reservation = reservation.id.to_string(),
                    action = action.as_str()
                );
                Err(BookingError::Forbidden { action, reason })
            }
        }
    }

    async fn commit(&self, work: UnitOfWork, operation: &'static str) -> BookingResult<()> {
        self.ctx.committer.commit(work).await.map_err(|err| {
            if err.is_partial() {
                tracing::error!(
                    operation,
                    applied = err.applied,
                    failed_op = %err.failed_op,
                    error = %err.source,
                    "Unit of work stopped half way, stored references are inconsistent"
                );
            }
            BookingError::from(err)
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
