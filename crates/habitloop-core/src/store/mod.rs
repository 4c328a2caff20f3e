//! In-memory stores for the current session.
//!
//! Each store owns a flat list behind accessor methods; there is no other
//! mutation path. The tracker layers optimistic remote replication on top,
//! so every store mutation here is synchronous and infallible.

mod completions;
mod habits;
mod prefs;

pub use completions::{CompletionStore, Toggled};
pub use habits::HabitStore;
pub use prefs::UiPrefs;
