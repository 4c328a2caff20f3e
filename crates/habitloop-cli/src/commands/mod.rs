//! CLI command modules.

pub mod config;
pub mod habit;
pub mod log;
pub mod prefs;
pub mod stats;
pub mod sync;

use habitloop_core::storage::snapshot::{
    COMPLETIONS_SNAPSHOT, HABITS_SNAPSHOT, PREFS_SNAPSHOT, SESSION_SNAPSHOT,
};
use habitloop_core::{Config, RemoteClient, Session, SnapshotStore, Tracker, UiPrefs};

pub type CliError = Box<dyn std::error::Error>;

/// Snapshot-backed application state for one CLI invocation.
pub struct App {
    pub config: Config,
    pub tracker: Tracker,
    pub prefs: UiPrefs,
    snapshots: SnapshotStore,
}

impl App {
    /// Load config and the named snapshots, wiring the remote client
    /// when both URL and api key are configured.
    pub fn open() -> Result<Self, CliError> {
        let config = Config::load_or_default();
        let snapshots = SnapshotStore::open()?;

        let session: Session = snapshots.load(SESSION_SNAPSHOT);
        let habits = snapshots.load(HABITS_SNAPSHOT);
        let completions = snapshots.load(COMPLETIONS_SNAPSHOT);
        let prefs: UiPrefs = snapshots.load(PREFS_SNAPSHOT);

        let remote = RemoteClient::from_config(&config).map(|mut client| {
            client.set_access_token(session.access_token.clone());
            client
        });

        Ok(App {
            config,
            tracker: Tracker::with_state(habits, completions, remote, session),
            prefs,
            snapshots,
        })
    }

    /// Persist every named snapshot back to disk.
    pub fn save(&self) -> Result<(), CliError> {
        self.snapshots
            .save(HABITS_SNAPSHOT, &self.tracker.habits().all())?;
        self.snapshots
            .save(COMPLETIONS_SNAPSHOT, &self.tracker.completions().all())?;
        self.snapshots.save(PREFS_SNAPSHOT, &self.prefs)?;
        self.snapshots
            .save(SESSION_SNAPSHOT, self.tracker.session())?;
        Ok(())
    }
}

/// Today as a local calendar date.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(arg: Option<&str>) -> Result<chrono::NaiveDate, CliError> {
    match arg {
        Some(s) => Ok(s.parse()?),
        None => Ok(today()),
    }
}
