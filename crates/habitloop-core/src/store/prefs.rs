//! UI preferences: the third named local store.
//!
//! Only the durable toggles persist; the selected calendar date is
//! session state and resets to "today" on reload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User interface preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPrefs {
    #[serde(default = "default_true")]
    pub show_completed_habits: bool,
    #[serde(default = "default_true")]
    pub show_tips: bool,
    #[serde(default)]
    pub has_seen_onboarding: bool,
    /// Session-only: the date currently selected in calendar views.
    #[serde(skip)]
    pub selected_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

impl Default for UiPrefs {
    fn default() -> Self {
        UiPrefs {
            show_completed_habits: true,
            show_tips: true,
            has_seen_onboarding: false,
            selected_date: None,
        }
    }
}

impl UiPrefs {
    /// Selected date, falling back to `today`.
    pub fn selected_date_or(&self, today: NaiveDate) -> NaiveDate {
        self.selected_date.unwrap_or(today)
    }

    pub fn dismiss_tips(&mut self) {
        self.show_tips = false;
    }

    pub fn mark_onboarding_seen(&mut self) {
        self.has_seen_onboarding = true;
    }
}
