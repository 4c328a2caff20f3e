//! Streak and statistics commands.

use clap::Subcommand;
use habitloop_core::stats::heatmap_level;

use super::{parse_date, today, App, CliError};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completion picture for a day (default today)
    Today {
        /// Day as YYYY-MM-DD (default today)
        #[arg(long)]
        date: Option<String>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Long-run stats for one habit
    Habit {
        /// Habit ID
        id: String,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Summary across all active habits
    Summary {
        /// JSON output
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: StatsAction) -> Result<(), CliError> {
    let app = App::open()?;

    match action {
        StatsAction::Today { date, json } => {
            let date = parse_date(date.as_deref())?;
            let stats = app.tracker.daily_stats(date);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "{}: {}/{} habits completed ({}%, heat level {})",
                    stats.date,
                    stats.completed_habits,
                    stats.total_habits,
                    stats.completion_rate,
                    heatmap_level(stats.completion_rate),
                );
            }
        }
        StatsAction::Habit { id, json } => {
            let stats = app
                .tracker
                .habit_stats(&id, today())
                .ok_or_else(|| format!("no such habit: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_habit_stats(&stats);
            }
        }
        StatsAction::Summary { json } => {
            let today = today();
            let all: Vec<_> = app
                .tracker
                .habits()
                .active()
                .iter()
                .filter_map(|habit| app.tracker.habit_stats(&habit.id, today))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for stats in &all {
                    print_habit_stats(stats);
                }
                if all.is_empty() {
                    println!("No active habits");
                }
            }
        }
    }

    Ok(())
}

fn print_habit_stats(stats: &habitloop_core::HabitStats) {
    println!(
        "{}: streak {} (best {}), {} total, 7d {}%, 30d {}%",
        stats.habit_name,
        stats.current_streak,
        stats.longest_streak,
        stats.total_completions,
        stats.completion_rate_7d,
        stats.completion_rate_30d,
    );
}
