//! Completion logging commands.

use clap::Subcommand;
use habitloop_core::CompletionDetails;

use super::{parse_date, App, CliError};

#[derive(Subcommand)]
pub enum LogAction {
    /// Toggle a completion on or off for a day (default today)
    Toggle {
        /// Habit ID
        habit_id: String,
        /// Day as YYYY-MM-DD (default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Log a completion with note, mood, or photo details
    Add {
        /// Habit ID
        habit_id: String,
        /// Day as YYYY-MM-DD (default today)
        #[arg(long)]
        date: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
        /// Mood rating, 1-5
        #[arg(long)]
        mood: Option<u8>,
        /// Photo reference
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// List a habit's completions
    List {
        /// Habit ID
        habit_id: String,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: LogAction) -> Result<(), CliError> {
    let mut app = App::open()?;

    match action {
        LogAction::Toggle { habit_id, date } => {
            if !app.tracker.habits().contains(&habit_id) {
                return Err(format!("no such habit: {habit_id}").into());
            }
            let date = parse_date(date.as_deref())?;
            let outcome = app.tracker.toggle_completion(&habit_id, date).await?;
            app.save()?;

            if outcome.added {
                println!("Completed {habit_id} on {date}");
            } else {
                println!("Unchecked {habit_id} on {date}");
            }
            if let Some(message) = outcome.milestone {
                println!("🎉 {message}");
            }
        }
        LogAction::Add {
            habit_id,
            date,
            note,
            mood,
            photo_url,
        } => {
            if !app.tracker.habits().contains(&habit_id) {
                return Err(format!("no such habit: {habit_id}").into());
            }
            let date = parse_date(date.as_deref())?;
            let outcome = app
                .tracker
                .log_completion(
                    &habit_id,
                    date,
                    CompletionDetails {
                        note,
                        mood,
                        photo_url,
                    },
                )
                .await?;
            app.save()?;

            println!("Logged {habit_id} on {date}");
            println!("{}", serde_json::to_string_pretty(&outcome.completion)?);
            if let Some(message) = outcome.milestone {
                println!("🎉 {message}");
            }
        }
        LogAction::List { habit_id, json } => {
            let completions = app.tracker.completions().for_habit(&habit_id);
            if json {
                println!("{}", serde_json::to_string_pretty(&completions)?);
            } else {
                for completion in &completions {
                    let mood = completion
                        .mood
                        .map(|m| format!("  mood {m}/5"))
                        .unwrap_or_default();
                    let note = completion
                        .note
                        .as_deref()
                        .map(|n| format!("  \"{n}\""))
                        .unwrap_or_default();
                    println!("{}{mood}{note}", completion.date);
                }
                if completions.is_empty() {
                    println!("No completions logged for {habit_id}");
                }
            }
        }
    }

    Ok(())
}
