//! Habit model: the user-defined recurring activity being tracked.

pub mod frequency;

pub use frequency::Frequency;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A user-defined recurring activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier (client-generated, reconciled on remote insert)
    pub id: String,
    /// Owner; `None` for local-only habits that were never synced
    pub user_id: Option<String>,
    /// Display name
    pub name: String,
    /// Display emoji
    pub emoji: String,
    /// Display color as `#RRGGBB`
    pub color: String,
    /// Recurrence rule
    pub frequency: Frequency,
    /// Reminder time of day as `HH:MM`, if any
    pub reminder_time: Option<String>,
    /// Reminder message, if any
    pub reminder_message: Option<String>,
    /// Optional category label
    pub category: Option<String>,
    /// Archived habits stay in the list but are hidden from daily views
    pub archived: bool,
    /// Creation timestamp; also anchors custom-interval scheduling
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Build a habit from a draft, stamping id and timestamps.
    pub fn new(draft: HabitDraft, user_id: Option<String>) -> Self {
        let now = Utc::now();
        Habit {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            name: draft.name,
            emoji: draft.emoji,
            color: draft.color,
            frequency: draft.frequency,
            reminder_time: draft.reminder_time,
            reminder_message: draft.reminder_message,
            category: draft.category,
            archived: draft.archived,
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar date the habit was created (anchors custom scheduling).
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Whether this habit is due on `date`.
    pub fn scheduled_on(&self, date: NaiveDate) -> bool {
        self.frequency.scheduled_on(self.created_date(), date)
    }

    /// Validate the habit's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.name,
            &self.color,
            &self.frequency,
            self.reminder_time.as_deref(),
            self.reminder_message.as_deref(),
            self.category.as_deref(),
        )
    }
}

/// The creatable subset of a habit: everything the user supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub frequency: Frequency,
    pub reminder_time: Option<String>,
    pub reminder_message: Option<String>,
    pub category: Option<String>,
    pub archived: bool,
}

impl HabitDraft {
    /// Create a draft with default presentation fields.
    pub fn new(name: impl Into<String>) -> Self {
        HabitDraft {
            name: name.into(),
            emoji: "✅".to_string(),
            color: "#10B981".to_string(),
            frequency: Frequency::Daily,
            reminder_time: None,
            reminder_message: None,
            category: None,
            archived: false,
        }
    }

    /// Validate the draft's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.name,
            &self.color,
            &self.frequency,
            self.reminder_time.as_deref(),
            self.reminder_message.as_deref(),
            self.category.as_deref(),
        )
    }
}

/// Starter habits installed into an empty, anonymous profile.
pub fn default_habits() -> Vec<HabitDraft> {
    vec![
        HabitDraft {
            name: "Drink water".to_string(),
            emoji: "💧".to_string(),
            color: "#3B82F6".to_string(),
            frequency: Frequency::Daily,
            reminder_time: None,
            reminder_message: Some("Stay hydrated! Your body will thank you 💧".to_string()),
            category: None,
            archived: false,
        },
        HabitDraft {
            name: "Morning exercise".to_string(),
            emoji: "🏃".to_string(),
            color: "#10B981".to_string(),
            frequency: Frequency::Daily,
            reminder_time: None,
            reminder_message: Some("Let's get moving! 🏃‍♂️".to_string()),
            category: None,
            archived: false,
        },
    ]
}

fn validate_fields(
    name: &str,
    color: &str,
    frequency: &Frequency,
    reminder_time: Option<&str>,
    reminder_message: Option<&str>,
    category: Option<&str>,
) -> Result<(), ValidationError> {
    let name_len = name.chars().count();
    if name_len == 0 {
        return Err(ValidationError::InvalidName("name is required".to_string()));
    }
    if name_len > 50 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 50,
        });
    }
    if !is_hex_color(color) {
        return Err(ValidationError::InvalidColor(color.to_string()));
    }
    frequency.validate()?;
    if let Some(time) = reminder_time {
        if chrono::NaiveTime::parse_from_str(time, "%H:%M").is_err() || time.len() != 5 {
            return Err(ValidationError::InvalidReminderTime(time.to_string()));
        }
    }
    if let Some(message) = reminder_message {
        if message.chars().count() > 100 {
            return Err(ValidationError::TooLong {
                field: "reminder_message",
                max: 100,
            });
        }
    }
    if let Some(category) = category {
        if category.chars().count() > 30 {
            return Err(ValidationError::TooLong {
                field: "category",
                max: 30,
            });
        }
    }
    Ok(())
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_habit_stamps_id_and_timestamps() {
        let habit = Habit::new(HabitDraft::new("Read"), None);
        assert!(!habit.id.is_empty());
        assert_eq!(habit.created_at, habit.updated_at);
        assert!(habit.user_id.is_none());
        assert!(!habit.archived);
    }

    #[test]
    fn draft_defaults_are_valid() {
        assert!(HabitDraft::new("Read").validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_overlong_names() {
        assert!(HabitDraft::new("").validate().is_err());
        assert!(HabitDraft::new("x".repeat(51)).validate().is_err());
        assert!(HabitDraft::new("x".repeat(50)).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_colors() {
        let mut draft = HabitDraft::new("Read");
        draft.color = "10B981".to_string();
        assert!(draft.validate().is_err());
        draft.color = "#10B98".to_string();
        assert!(draft.validate().is_err());
        draft.color = "#GGGGGG".to_string();
        assert!(draft.validate().is_err());
        draft.color = "#a1B2c3".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_reminder_times() {
        let mut draft = HabitDraft::new("Read");
        draft.reminder_time = Some("25:00".to_string());
        assert!(draft.validate().is_err());
        draft.reminder_time = Some("9:5".to_string());
        assert!(draft.validate().is_err());
        draft.reminder_time = Some("09:30".to_string());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn habit_serialization_round_trips() {
        let habit = Habit::new(
            HabitDraft {
                frequency: Frequency::Weekly { days: vec![1, 3, 5] },
                category: Some("health".to_string()),
                ..HabitDraft::new("Gym")
            },
            Some("user-1".to_string()),
        );
        let json = serde_json::to_string(&habit).unwrap();
        let decoded: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, habit);
    }

    #[test]
    fn default_habits_are_daily_and_valid() {
        let seeds = default_habits();
        assert_eq!(seeds.len(), 2);
        for seed in seeds {
            assert_eq!(seed.frequency, Frequency::Daily);
            assert!(seed.validate().is_ok());
        }
    }
}
