//! # Habitloop Core Library
//!
//! This library provides the core logic for the Habitloop habit tracker.
//! It implements a local-first philosophy: the in-memory stores are
//! authoritative for the session, every mutation applies locally first,
//! and a hosted backend (when configured and signed in) is an optimistic
//! mirror with per-operation rollback on failure.
//!
//! ## Architecture
//!
//! - **Model**: habits with recurrence rules, date-keyed completions
//! - **Stores**: flat in-memory lists behind accessor functions, persisted
//!   as named JSON snapshots and reloaded on startup
//! - **Tracker**: the optimistic mutation choreography (apply local,
//!   replicate, roll back on failure, reconcile server ids)
//! - **Sync**: REST wire rows and the realtime change-feed types
//! - **Cache**: offline cache for same-origin GET traffic with
//!   network-first navigation and cache-first asset strategies
//!
//! ## Key Components
//!
//! - [`Tracker`]: local-first state with optimistic remote sync
//! - [`Frequency`]: the schedule predicate
//! - [`streak`]: streak and milestone calculation
//! - [`OfflineCache`]: request interception strategies

pub mod cache;
pub mod completion;
pub mod error;
pub mod habit;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod sync;
pub mod tracker;

pub use cache::{CacheOutcome, CacheRequest, CachedResponse, Fetcher, HttpFetcher, OfflineCache};
pub use completion::{Completion, CompletionDetails};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use habit::{Frequency, Habit, HabitDraft};
pub use session::{Session, User};
pub use stats::{DailyStats, HabitStats};
pub use storage::{Config, SnapshotStore};
pub use store::{CompletionStore, HabitStore, Toggled, UiPrefs};
pub use sync::{Change, ChangeEvent, RemoteClient, RemoteError, Subscription, Table};
pub use tracker::{HabitStatus, ToggleOutcome, Tracker};
