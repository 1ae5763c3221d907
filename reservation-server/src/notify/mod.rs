//! Reservation notifications
//!
//! The resolver calls a [`Notifier`] after a reservation is stored. Delivery
//! is best effort: a failure is logged by the caller and never undoes the
//! reservation.

pub mod email;

pub use email::SesNotifier;

use crate::db::models::{DiningTable, Reservation, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to deliver message: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn reservation_created(
        &self,
        user: &User,
        reservation: &Reservation,
        table: &DiningTable,
    ) -> Result<(), NotifyError>;
}

/// Writes the notification to the log instead of sending it
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn reservation_created(
        &self,
        user: &User,
        reservation: &Reservation,
        table: &DiningTable,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            to = %user.email,
            reservation = %reservation.id,
            table_number = table.table_number,
            reserved_at = reservation.reserved_at,
            guests = reservation.guests,
            "Reservation confirmation (e-mail delivery disabled)"
        );
        Ok(())
    }
}
