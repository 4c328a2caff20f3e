//! Wire rows and errors for the remote datastore.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::Completion;
use crate::habit::{Frequency, Habit};

/// The two replicated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Habits,
    Completions,
}

impl Table {
    /// Wire name of the table.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Habits => "habits",
            Table::Completions => "completions",
        }
    }
}

/// A `habits` row as stored by the backend.
///
/// Field names are the wire names; the frequency rides along as a JSON
/// object inside the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRow {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub frequency: Frequency,
    pub reminder_time: Option<String>,
    pub reminder_message: Option<String>,
    pub category: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Habit> for HabitRow {
    fn from(habit: &Habit) -> Self {
        HabitRow {
            id: habit.id.clone(),
            user_id: habit.user_id.clone(),
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            color: habit.color.clone(),
            frequency: habit.frequency.clone(),
            reminder_time: habit.reminder_time.clone(),
            reminder_message: habit.reminder_message.clone(),
            category: habit.category.clone(),
            archived: habit.archived,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
        }
    }
}

impl From<HabitRow> for Habit {
    fn from(row: HabitRow) -> Self {
        Habit {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            emoji: row.emoji,
            color: row.color,
            frequency: row.frequency,
            reminder_time: row.reminder_time,
            reminder_message: row.reminder_message,
            category: row.category,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A `completions` row as stored by the backend.
///
/// The one naming difference to the in-memory type: the calendar date is
/// called `completed_at` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRow {
    pub id: String,
    pub habit_id: String,
    pub completed_at: NaiveDate,
    pub note: Option<String>,
    pub mood: Option<u8>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Completion> for CompletionRow {
    fn from(completion: &Completion) -> Self {
        CompletionRow {
            id: completion.id.clone(),
            habit_id: completion.habit_id.clone(),
            completed_at: completion.date,
            note: completion.note.clone(),
            mood: completion.mood,
            photo_url: completion.photo_url.clone(),
            created_at: completion.created_at,
        }
    }
}

impl From<CompletionRow> for Completion {
    fn from(row: CompletionRow) -> Self {
        Completion {
            id: row.id,
            habit_id: row.habit_id,
            date: row.completed_at,
            note: row.note,
            mood: row.mood,
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}

/// Remote request failures: transport or backend rejection.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected remote response: {0}")]
    UnexpectedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("Remote sync is not configured")]
    NotConfigured,
}
