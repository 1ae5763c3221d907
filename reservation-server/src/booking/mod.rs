//! Booking - the Availability Resolver and its seams
//!
//! - [`AvailabilityResolver`] - availability search and reservation writes
//! - [`BookingContext`] - stores, committer, notifier and timezone it runs on
//! - [`UnitOfWork`] / [`WorkCommitter`] - ordered multi-record writes
//! - [`TableStore`], [`ReservationStore`], [`UserStore`] - read seams

pub mod error;
pub mod instant;
pub mod resolver;
pub mod store;
pub mod unit_of_work;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
mod tests;

pub use error::{BookingError, BookingResult, Conflict, Entity};
pub use resolver::{AvailabilityResolver, BookingContext, CONFIRMATION_MESSAGE, ReservationReceipt};
pub use store::{ReservationStore, TableStore, UserStore};
pub use unit_of_work::{CommitError, UnitOfWork, WorkCommitter, WriteOp};
