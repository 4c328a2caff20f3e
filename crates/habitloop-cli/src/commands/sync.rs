//! Account and remote synchronization commands.

use clap::Subcommand;
use habitloop_core::{RemoteClient, Session};

use super::{App, CliError};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Show remote configuration and session status
    Status,
    /// Sign in, migrating local anonymous data to the account
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Sign out, returning to anonymous local-only mode
    Logout,
    /// Replace local state with the remote's
    Pull,
}

pub async fn run(action: SyncAction) -> Result<(), CliError> {
    let mut app = App::open()?;

    match action {
        SyncAction::Status => {
            if app.config.remote_configured() {
                println!("Remote: {}", app.config.remote.url.as_deref().unwrap_or(""));
            } else {
                println!("Remote: not configured (set remote.url and remote.api_key)");
            }
            match &app.tracker.session().user {
                Some(user) if !user.anonymous => {
                    println!(
                        "Signed in as {} ({})",
                        user.email.as_deref().unwrap_or("unknown"),
                        user.id
                    );
                }
                _ => println!("Anonymous (local-only)"),
            }
            println!(
                "{} habits, {} completions",
                app.tracker.habits().len(),
                app.tracker.completions().len()
            );
        }
        SyncAction::Login { email, password } => {
            let client = RemoteClient::from_config(&app.config)
                .ok_or("remote sync is not configured (set remote.url and remote.api_key)")?;
            let (user, token) = client.sign_in(&email, &password).await?;
            app.tracker
                .set_session(Session::signed_in(user.clone(), token));

            let migrated = app.tracker.migrate_anonymous(&user).await?;
            if migrated > 0 {
                println!("Migrated {migrated} local habits to your account");
            }
            app.tracker.refresh().await?;
            app.save()?;
            println!("Signed in as {email}");
        }
        SyncAction::Logout => {
            if let Some(client) = RemoteClient::from_config(&app.config) {
                // Best-effort: a dead backend must not trap the user.
                if let Err(err) = client.sign_out().await {
                    eprintln!("warning: remote sign-out failed: {err}");
                }
            }
            app.tracker.set_session(Session::default());
            app.save()?;
            println!("Signed out");
        }
        SyncAction::Pull => {
            if !app.tracker.session().is_signed_in() {
                return Err("not signed in; run `habitloop sync login` first".into());
            }
            app.tracker.refresh().await?;
            app.save()?;
            println!(
                "Pulled {} habits, {} completions",
                app.tracker.habits().len(),
                app.tracker.completions().len()
            );
        }
    }

    Ok(())
}
