//! Streak calculation over completion dates.
//!
//! A streak is the count of consecutive days with a completion, ending
//! today or yesterday. A missed day breaks it: the most recent completion
//! being older than yesterday means the streak is 0, not "paused".

use chrono::{Duration, NaiveDate};

/// Streak lengths that mark a milestone worth celebrating.
pub const MILESTONE_DAYS: [u32; 7] = [7, 21, 30, 50, 66, 100, 365];

/// Current consecutive-day streak for a set of completion dates.
///
/// Duplicate dates are not deduplicated here; the toggle flow keeps at
/// most one completion per day, so callers own that invariant.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let yesterday = today - Duration::days(1);
    if sorted[0] != today && sorted[0] != yesterday {
        return 0;
    }

    let mut streak = 1;
    for pair in sorted.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

/// Longest consecutive-day run anywhere in the history.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut best = 1;
    let mut run = 1;
    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }

    best
}

/// Whether a streak length is one of the celebrated milestones.
pub fn is_milestone(streak: u32) -> bool {
    MILESTONE_DAYS.contains(&streak)
}

/// Celebration message for a milestone streak, if it is one.
pub fn milestone_message(streak: u32) -> Option<&'static str> {
    match streak {
        7 => Some("One week strong! You're building momentum."),
        21 => Some("21 days! They say it takes 21 days to form a habit."),
        30 => Some("A full month! You're unstoppable!"),
        50 => Some("50 days! Halfway to 100!"),
        66 => Some("66 days - the magic number for habit formation!"),
        100 => Some("100 DAYS! You're a habit master!"),
        365 => Some("ONE YEAR! Incredible dedication!"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(current_streak(&[], date(2024, 6, 10)), 0);
    }

    #[test]
    fn single_completion_today_is_one() {
        let today = date(2024, 6, 10);
        assert_eq!(current_streak(&[today], today), 1);
    }

    #[test]
    fn streak_ending_yesterday_still_counts() {
        let today = date(2024, 6, 10);
        assert_eq!(current_streak(&[date(2024, 6, 9)], today), 1);
    }

    #[test]
    fn stale_history_is_zero() {
        let today = date(2024, 6, 10);
        assert_eq!(
            current_streak(&[date(2024, 6, 8), date(2024, 6, 7)], today),
            0
        );
    }

    #[test]
    fn consecutive_days_accumulate() {
        let today = date(2024, 6, 10);
        let dates = [date(2024, 6, 10), date(2024, 6, 9), date(2024, 6, 8)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn input_order_does_not_matter() {
        let today = date(2024, 6, 10);
        let dates = [date(2024, 6, 8), date(2024, 6, 10), date(2024, 6, 9)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn gap_breaks_the_count_at_the_gap() {
        let today = date(2024, 6, 10);
        let dates = [
            date(2024, 6, 10),
            date(2024, 6, 9),
            // 6/8 missing
            date(2024, 6, 7),
            date(2024, 6, 6),
        ];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn longest_streak_scans_full_history() {
        let dates = [
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
            date(2024, 2, 1),
            date(2024, 2, 2),
        ];
        assert_eq!(longest_streak(&dates), 4);
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[date(2024, 1, 1)]), 1);
    }

    #[test]
    fn milestones_match_the_published_days() {
        assert!(is_milestone(7));
        assert!(is_milestone(66));
        assert!(!is_milestone(8));
        assert!(milestone_message(21).unwrap().contains("21 days"));
        assert!(milestone_message(5).is_none());
    }

    proptest! {
        /// A run of n consecutive days ending today always yields n, and
        /// knocking any single day out of the middle truncates the streak
        /// at that gap.
        #[test]
        fn gap_anywhere_breaks_at_that_gap(n in 2u32..60, gap in 1u32..59) {
            prop_assume!(gap <= n - 1);
            let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
            let full: Vec<NaiveDate> =
                (0..n).map(|i| today - Duration::days(i64::from(i))).collect();
            prop_assert_eq!(current_streak(&full, today), n);

            // Remove the date `gap` days back; counting stops just before it.
            let holed: Vec<NaiveDate> = full
                .iter()
                .copied()
                .filter(|d| *d != today - Duration::days(i64::from(gap)))
                .collect();
            prop_assert_eq!(current_streak(&holed, today), gap);
        }
    }
}
