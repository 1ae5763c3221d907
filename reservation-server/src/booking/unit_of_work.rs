//! Unit of work
//!
//! Every multi-record write the resolver performs is described up front as
//! an ordered list of [`WriteOp`]s and handed to a [`WorkCommitter`]. The
//! committer reports how far it got, so a write that stops half way is never
//! mistaken for one that did nothing.

use crate::db::models::Reservation;
use crate::db::repository::RepoError;
use async_trait::async_trait;
use std::fmt;
use surrealdb::RecordId;
use thiserror::Error;

/// A single write against the store
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create a new reservation record
    InsertReservation(Reservation),
    /// Overwrite an existing reservation record
    SaveReservation(Reservation),
    DeleteReservation(RecordId),
    /// Append the reservation to the table's reservation list
    AttachToTable { table: RecordId, reservation: RecordId },
    /// Remove the reservation from the table's reservation list
    DetachFromTable { table: RecordId, reservation: RecordId },
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::InsertReservation(r) => write!(f, "insert {}", r.id),
            WriteOp::SaveReservation(r) => write!(f, "save {}", r.id),
            WriteOp::DeleteReservation(id) => write!(f, "delete {}", id),
            WriteOp::AttachToTable { table, reservation } => {
                write!(f, "attach {} to {}", reservation, table)
            }
            WriteOp::DetachFromTable { table, reservation } => {
                write!(f, "detach {} from {}", reservation, table)
            }
        }
    }
}

/// Ordered list of writes applied as one logical step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOfWork {
    ops: Vec<WriteOp>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn then(mut self, op: WriteOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Commit failure
///
/// `applied` ops were written before `failed_op` failed; the rest were not
/// attempted.
#[derive(Debug, Error)]
#[error("unit of work failed at `{failed_op}` after {applied} applied op(s): {source}")]
pub struct CommitError {
    pub applied: usize,
    pub failed_op: String,
    #[source]
    pub source: RepoError,
}

impl CommitError {
    /// Some ops reached the store before the failure
    pub fn is_partial(&self) -> bool {
        self.applied > 0
    }
}

/// Applies a unit of work in order, stopping at the first failure
#[async_trait]
pub trait WorkCommitter: Send + Sync {
    async fn commit(&self, work: UnitOfWork) -> Result<(), CommitError>;
}
