//! Habit management commands.

use clap::Subcommand;
use habitloop_core::{Frequency, HabitDraft};

use super::{today, App, CliError};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Display emoji
        #[arg(long, default_value = "✅")]
        emoji: String,
        /// Display color as #RRGGBB
        #[arg(long, default_value = "#10B981")]
        color: String,
        /// Recurrence: daily, weekly, monthly, or custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Comma-separated day numbers (weekly: 0-6 with 0=Sun, monthly: 1-31)
        #[arg(long)]
        days: Option<String>,
        /// Repeat every N days (custom frequency)
        #[arg(long)]
        interval: Option<u32>,
        /// Reminder time as HH:MM
        #[arg(long)]
        reminder_time: Option<String>,
        /// Reminder message
        #[arg(long)]
        reminder_message: Option<String>,
        /// Category label
        #[arg(long)]
        category: Option<String>,
    },
    /// List habits with streaks
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
        /// Only habits due today
        #[arg(long)]
        due: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one habit as JSON
    Show {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New emoji
        #[arg(long)]
        emoji: Option<String>,
        /// New color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
        /// New category label
        #[arg(long)]
        category: Option<String>,
        /// New reminder message
        #[arg(long)]
        reminder_message: Option<String>,
    },
    /// Archive a habit (kept in the list, hidden from daily views)
    Archive {
        /// Habit ID
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
    /// Install the starter habits into an empty profile
    Seed,
}

pub async fn run(action: HabitAction) -> Result<(), CliError> {
    let mut app = App::open()?;

    match action {
        HabitAction::Add {
            name,
            emoji,
            color,
            frequency,
            days,
            interval,
            reminder_time,
            reminder_message,
            category,
        } => {
            let draft = HabitDraft {
                name,
                emoji,
                color,
                frequency: parse_frequency(&frequency, days.as_deref(), interval)?,
                reminder_time,
                reminder_message,
                category,
                archived: false,
            };
            let habit = app.tracker.add_habit(draft).await?;
            app.save()?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { all, due, json } => {
            let today = today();
            let mut statuses = if due {
                app.tracker.due_with_status(today)
            } else {
                app.tracker.habits_with_status(today)
            };
            if !app.prefs.show_completed_habits {
                statuses.retain(|s| !s.completed_today);
            }

            if json {
                let rows: Vec<serde_json::Value> = statuses
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "id": s.habit.id,
                            "name": s.habit.name,
                            "emoji": s.habit.emoji,
                            "streak": s.streak,
                            "completed_today": s.completed_today,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for status in &statuses {
                    let mark = if status.completed_today { "x" } else { " " };
                    println!(
                        "[{}] {} {}  (streak: {})  {}",
                        mark, status.habit.emoji, status.habit.name, status.streak, status.habit.id
                    );
                }
                if all {
                    for habit in app.tracker.habits().archived() {
                        println!("[archived] {} {}  {}", habit.emoji, habit.name, habit.id);
                    }
                }
                if statuses.is_empty() {
                    println!("No habits yet. Try: habitloop habit add \"Drink water\"");
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = app
                .tracker
                .habits()
                .get(&id)
                .ok_or_else(|| format!("no such habit: {id}"))?;
            println!("{}", serde_json::to_string_pretty(habit)?);
        }
        HabitAction::Update {
            id,
            name,
            emoji,
            color,
            category,
            reminder_message,
        } => {
            let habit = app
                .tracker
                .update_habit(&id, |habit| {
                    if let Some(name) = name {
                        habit.name = name;
                    }
                    if let Some(emoji) = emoji {
                        habit.emoji = emoji;
                    }
                    if let Some(color) = color {
                        habit.color = color;
                    }
                    if let Some(category) = category {
                        habit.category = Some(category);
                    }
                    if let Some(message) = reminder_message {
                        habit.reminder_message = Some(message);
                    }
                })
                .await?;
            app.save()?;
            println!("Habit updated: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Archive { id } => {
            let habit = app.tracker.archive_habit(&id).await?;
            app.save()?;
            println!("Habit archived: {}", habit.name);
        }
        HabitAction::Delete { id } => {
            let habit = app.tracker.delete_habit(&id).await?;
            app.save()?;
            println!("Habit deleted: {}", habit.name);
        }
        HabitAction::Seed => {
            let count = app.tracker.seed_default_habits();
            app.save()?;
            println!("Seeded {count} starter habits");
        }
    }

    Ok(())
}

fn parse_frequency(
    kind: &str,
    days: Option<&str>,
    interval: Option<u32>,
) -> Result<Frequency, CliError> {
    match kind {
        "daily" => Ok(Frequency::Daily),
        "weekly" => Ok(Frequency::Weekly {
            days: parse_days(days)?,
        }),
        "monthly" => Ok(Frequency::Monthly {
            days: parse_days(days)?,
        }),
        "custom" => Ok(Frequency::Custom { interval }),
        other => Err(format!("unknown frequency: {other} (expected daily, weekly, monthly, or custom)").into()),
    }
}

fn parse_days(days: Option<&str>) -> Result<Vec<u8>, CliError> {
    match days {
        Some(list) => list
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(CliError::from))
            .collect(),
        None => Ok(Vec::new()),
    }
}
