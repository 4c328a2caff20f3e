//! Remote datastore synchronization.
//!
//! The wire model mirrors two backend tables, `habits` and `completions`,
//! with snake_case rows mapped one-to-one onto the in-memory types. The
//! client is a thin REST wrapper; the optimistic apply/rollback choreography
//! lives in [`crate::tracker`].

pub mod client;
pub mod realtime;
pub mod types;

pub use client::RemoteClient;
pub use realtime::{Change, ChangeEvent, RowFilter, Subscription};
pub use types::{CompletionRow, HabitRow, RemoteError, Table};
