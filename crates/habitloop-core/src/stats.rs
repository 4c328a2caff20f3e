//! Completion statistics: rates, heatmap levels, and per-habit summaries.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::completion::Completion;
use crate::habit::Habit;
use crate::streak::{current_streak, longest_streak};

/// Rounded completion percentage; 0 when nothing was scheduled.
pub fn completion_percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((f64::from(completed) / f64::from(total)) * 100.0).round() as u8
}

/// Bucket a completion percentage into a 0-4 heatmap intensity.
pub fn heatmap_level(percentage: u8) -> u8 {
    match percentage {
        0 => 0,
        1..=24 => 1,
        25..=49 => 2,
        50..=74 => 3,
        _ => 4,
    }
}

/// Aggregate completion picture for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    /// Active habits due on this date
    pub total_habits: u32,
    /// How many of those were completed
    pub completed_habits: u32,
    /// Rounded percentage of the two counts above
    pub completion_rate: u8,
}

/// Long-run summary for a single habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub habit_name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub completion_rate_7d: u8,
    pub completion_rate_30d: u8,
}

/// Compute the completion picture for `date` across active habits.
pub fn daily_stats(habits: &[Habit], completions: &[Completion], date: NaiveDate) -> DailyStats {
    let due: Vec<&Habit> = habits
        .iter()
        .filter(|h| !h.archived && h.scheduled_on(date))
        .collect();
    let completed = due
        .iter()
        .filter(|h| completions.iter().any(|c| c.habit_id == h.id && c.date == date))
        .count() as u32;
    let total = due.len() as u32;

    DailyStats {
        date,
        total_habits: total,
        completed_habits: completed,
        completion_rate: completion_percentage(completed, total),
    }
}

/// Compute the long-run summary for one habit.
///
/// Windowed rates count only days the habit was actually scheduled; a
/// habit created mid-window contributes no scheduled days before its
/// creation date.
pub fn habit_stats(habit: &Habit, completions: &[Completion], today: NaiveDate) -> HabitStats {
    let dates: Vec<NaiveDate> = completions
        .iter()
        .filter(|c| c.habit_id == habit.id)
        .map(|c| c.date)
        .collect();

    HabitStats {
        habit_id: habit.id.clone(),
        habit_name: habit.name.clone(),
        current_streak: current_streak(&dates, today),
        longest_streak: longest_streak(&dates),
        total_completions: dates.len() as u32,
        completion_rate_7d: windowed_rate(habit, &dates, today, 7),
        completion_rate_30d: windowed_rate(habit, &dates, today, 30),
    }
}

fn windowed_rate(habit: &Habit, dates: &[NaiveDate], today: NaiveDate, days: u32) -> u8 {
    let created = habit.created_date();
    let mut scheduled = 0;
    let mut completed = 0;
    for offset in 0..days {
        let day = today - Duration::days(i64::from(offset));
        if day < created {
            break;
        }
        if habit.scheduled_on(day) {
            scheduled += 1;
            if dates.contains(&day) {
                completed += 1;
            }
        }
    }
    completion_percentage(completed, scheduled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionDetails;
    use crate::habit::{Frequency, HabitDraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn percentage_is_zero_for_empty_window() {
        assert_eq!(completion_percentage(5, 0), 0);
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(5, 10), 50);
        assert_eq!(completion_percentage(10, 10), 100);
    }

    #[test]
    fn heatmap_levels_bucket_percentages() {
        assert_eq!(heatmap_level(0), 0);
        assert_eq!(heatmap_level(10), 1);
        assert_eq!(heatmap_level(30), 2);
        assert_eq!(heatmap_level(60), 3);
        assert_eq!(heatmap_level(80), 4);
        assert_eq!(heatmap_level(100), 4);
    }

    #[test]
    fn daily_stats_counts_due_and_completed() {
        let today = date(2024, 6, 12); // a Wednesday
        let daily = Habit::new(HabitDraft::new("Water"), None);
        let weekly_off_day = Habit::new(
            HabitDraft {
                frequency: Frequency::Weekly { days: vec![0] }, // Sundays only
                ..HabitDraft::new("Call home")
            },
            None,
        );
        let mut archived = Habit::new(HabitDraft::new("Old habit"), None);
        archived.archived = true;

        let completions = vec![Completion::new(
            daily.id.clone(),
            today,
            CompletionDetails::default(),
        )];

        let habits = vec![daily, weekly_off_day, archived];
        let stats = daily_stats(&habits, &completions, today);
        assert_eq!(stats.total_habits, 1);
        assert_eq!(stats.completed_habits, 1);
        assert_eq!(stats.completion_rate, 100);
    }

    #[test]
    fn habit_stats_aggregates_history() {
        let habit = Habit::new(HabitDraft::new("Water"), None);
        let today = habit.created_date();
        let completions: Vec<Completion> = (0..3)
            .map(|i| {
                Completion::new(
                    habit.id.clone(),
                    today - Duration::days(i),
                    CompletionDetails::default(),
                )
            })
            .collect();

        let stats = habit_stats(&habit, &completions, today);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_completions, 3);
        // Created today, so the only scheduled day in either window is today.
        assert_eq!(stats.completion_rate_7d, 100);
        assert_eq!(stats.completion_rate_30d, 100);
    }

    #[test]
    fn windowed_rate_ignores_days_before_creation() {
        let habit = Habit::new(HabitDraft::new("Water"), None);
        let today = habit.created_date();
        let stats = habit_stats(&habit, &[], today);
        // One scheduled day (today), zero completions.
        assert_eq!(stats.completion_rate_7d, 0);
    }
}
