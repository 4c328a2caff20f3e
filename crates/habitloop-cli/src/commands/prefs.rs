//! UI preference commands.

use clap::Subcommand;

use super::{App, CliError};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show current preferences
    Show,
    /// Show or hide already-completed habits in list views
    ShowCompleted {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Stop showing tips
    DismissTips,
    /// Mark onboarding as seen
    OnboardingSeen,
}

pub async fn run(action: PrefsAction) -> Result<(), CliError> {
    let mut app = App::open()?;

    match action {
        PrefsAction::Show => {
            println!("show_completed_habits = {}", app.prefs.show_completed_habits);
            println!("show_tips = {}", app.prefs.show_tips);
            println!("has_seen_onboarding = {}", app.prefs.has_seen_onboarding);
        }
        PrefsAction::ShowCompleted { value } => {
            app.prefs.show_completed_habits = value;
            app.save()?;
            println!("show_completed_habits = {value}");
        }
        PrefsAction::DismissTips => {
            app.prefs.dismiss_tips();
            app.save()?;
            println!("Tips dismissed");
        }
        PrefsAction::OnboardingSeen => {
            app.prefs.mark_onboarding_seen();
            app.save()?;
            println!("Onboarding marked as seen");
        }
    }

    Ok(())
}
