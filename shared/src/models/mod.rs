//! Data models
//!
//! Request/response payloads shared between the server and its clients.
//! Persisted entities (with SurrealDB record ids) live in the server crate;
//! ids cross the wire as `"table:key"` strings.

pub mod dining_table;
pub mod report;
pub mod reservation;
pub mod role;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use report::*;
pub use reservation::*;
pub use role::*;
pub use user::*;
