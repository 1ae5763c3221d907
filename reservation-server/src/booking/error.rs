//! Resolver errors

use super::unit_of_work::CommitError;
use crate::auth::policy::{Action, DenyReason};
use crate::db::repository::RepoError;
use crate::utils::time::TimeError;
use thiserror::Error;

/// Entity kinds the resolver looks up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Table,
    Reservation,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Table => "Table",
            Entity::Reservation => "Reservation",
        }
    }
}

/// Business-rule conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// Table missing, out of service or too small
    TableUnavailable,
    /// Another live reservation holds the table at the same instant
    AlreadyReserved,
    AlreadyCancelled,
    /// Status transition not allowed (e.g. confirming a cancelled booking)
    InvalidTransition,
}

impl Conflict {
    pub fn message(&self) -> &'static str {
        match self {
            Conflict::TableUnavailable => "Table not available or insufficient capacity",
            Conflict::AlreadyReserved => "Table is already reserved for this date",
            Conflict::AlreadyCancelled => "Reservation has already been cancelled",
            Conflict::InvalidTransition => "Reservation status does not allow this change",
        }
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{} not found", .0.as_str())]
    NotFound(Entity),

    #[error("{}", .0.message())]
    Conflict(Conflict),

    #[error("{}", .action.denied_message())]
    Forbidden { action: Action, reason: DenyReason },

    #[error("store error: {0}")]
    Store(#[from] RepoError),

    /// A unit of work stopped after some of its writes were applied
    #[error("inconsistent state: {0}")]
    Inconsistent(#[source] CommitError),
}

impl From<TimeError> for BookingError {
    fn from(err: TimeError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<CommitError> for BookingError {
    fn from(err: CommitError) -> Self {
        if err.is_partial() {
            BookingError::Inconsistent(err)
        } else {
            BookingError::Store(err.source)
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(BookingError::NotFound(Entity::User).to_string(), "User not found");
        assert_eq!(
            BookingError::Conflict(Conflict::TableUnavailable).to_string(),
            "Table not available or insufficient capacity"
        );
        assert_eq!(
            BookingError::Forbidden {
                action: Action::UpdateReservation,
                reason: DenyReason::NotOwner
            }
            .to_string(),
            "Not authorized to update this reservation"
        );
    }

    #[test]
    fn test_commit_error_mapping() {
        let untouched = CommitError {
            applied: 0,
            failed_op: "insert reservation:r1".into(),
            source: RepoError::Database("down".into()),
        };
        assert!(matches!(BookingError::from(untouched), BookingError::Store(_)));

        let partial = CommitError {
            applied: 1,
            failed_op: "delete reservation:r1".into(),
            source: RepoError::Database("down".into()),
        };
        assert!(matches!(BookingError::from(partial), BookingError::Inconsistent(_)));
    }
}
