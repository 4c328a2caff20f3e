//! Completion records: one entry per habit per calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A record that a habit was performed on a given date.
///
/// Dates are calendar dates, not timestamps: the toggle flow keeps at most
/// one completion per (habit, date) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier (client-generated, reconciled on remote insert)
    pub id: String,
    /// The habit this completion belongs to
    pub habit_id: String,
    /// The day the habit was performed
    pub date: NaiveDate,
    /// Optional free-form note
    pub note: Option<String>,
    /// Optional mood rating, 1-5
    pub mood: Option<u8>,
    /// Optional photo reference
    pub photo_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Completion {
    /// Build a completion for `habit_id` on `date` with optional details.
    pub fn new(habit_id: impl Into<String>, date: NaiveDate, details: CompletionDetails) -> Self {
        Completion {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit_id.into(),
            date,
            note: details.note,
            mood: details.mood,
            photo_url: details.photo_url,
            created_at: Utc::now(),
        }
    }
}

/// Optional note/mood/photo bundle for detailed logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionDetails {
    pub note: Option<String>,
    pub mood: Option<u8>,
    pub photo_url: Option<String>,
}

impl CompletionDetails {
    /// Validate note length and mood range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(note) = &self.note {
            if note.chars().count() > 500 {
                return Err(ValidationError::TooLong {
                    field: "note",
                    max: 500,
                });
            }
        }
        if let Some(mood) = self.mood {
            if !(1..=5).contains(&mood) {
                return Err(ValidationError::MoodOutOfRange(mood));
            }
        }
        Ok(())
    }
}
