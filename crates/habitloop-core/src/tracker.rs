//! The local-first tracker: optimistic mutations with remote rollback.
//!
//! The tracker owns the session's habit and completion lists. Every
//! mutation lands locally first and is the value the caller observes;
//! when a remote is configured and a user is signed in, the same change
//! is then replicated. A failed replication reverses the local change
//! and surfaces the error — once, with no retry, queue, or backoff.
//!
//! Execution is single-task and event-driven: the only suspension points
//! are the remote calls, local mutations apply in call order, and a
//! realtime event racing a local mutation for the same row is resolved
//! by the next [`Tracker::refresh`].

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::completion::{Completion, CompletionDetails};
use crate::error::CoreError;
use crate::habit::{default_habits, Habit, HabitDraft};
use crate::session::{Session, User};
use crate::stats::{daily_stats, habit_stats, DailyStats, HabitStats};
use crate::store::{CompletionStore, HabitStore, Toggled};
use crate::streak::{is_milestone, milestone_message};
use crate::sync::{Change, ChangeEvent, CompletionRow, HabitRow, RemoteClient};

/// A habit joined with its live completion status.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitStatus {
    pub habit: Habit,
    pub streak: u32,
    pub completed_today: bool,
}

/// Result of a toggle or detailed log.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    /// True when a completion was added, false when one was removed.
    pub added: bool,
    pub completion: Completion,
    /// Celebration message when the new streak hit a milestone.
    pub milestone: Option<&'static str>,
}

/// Local-first state for the current session.
pub struct Tracker {
    habits: HabitStore,
    completions: CompletionStore,
    session: Session,
    remote: Option<RemoteClient>,
}

impl Tracker {
    /// Start with empty stores.
    pub fn new(remote: Option<RemoteClient>, session: Session) -> Self {
        Tracker {
            habits: HabitStore::default(),
            completions: CompletionStore::default(),
            session,
            remote,
        }
    }

    /// Start from reloaded snapshots.
    pub fn with_state(
        habits: Vec<Habit>,
        completions: Vec<Completion>,
        remote: Option<RemoteClient>,
        session: Session,
    ) -> Self {
        Tracker {
            habits: HabitStore::new(habits),
            completions: CompletionStore::new(completions),
            session,
            remote,
        }
    }

    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    pub fn completions(&self) -> &CompletionStore {
        &self.completions
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        if let Some(remote) = &mut self.remote {
            remote.set_access_token(session.access_token.clone());
        }
        self.session = session;
    }

    /// Remote client to replicate through, when sync applies.
    fn remote_for_write(&self) -> Option<RemoteClient> {
        if !self.session.is_signed_in() {
            return None;
        }
        self.remote.clone()
    }

    /// Install the starter habits into an empty, anonymous profile.
    ///
    /// Returns how many were added (0 when the store was not empty).
    pub fn seed_default_habits(&mut self) -> usize {
        if !self.habits.is_empty() {
            return 0;
        }
        let seeds = default_habits();
        let count = seeds.len();
        for draft in seeds {
            self.habits.insert(Habit::new(draft, None));
        }
        debug!(count, "seeded default habits");
        count
    }

    /// Create a habit: local insert, then remote insert with rollback.
    pub async fn add_habit(&mut self, draft: HabitDraft) -> Result<Habit, CoreError> {
        draft.validate()?;
        let user_id = self.session.user_id().map(str::to_string);
        let mut habit = Habit::new(draft, user_id);
        self.habits.insert(habit.clone());

        if let Some(remote) = self.remote_for_write() {
            match remote.insert_habit(&HabitRow::from(&habit)).await {
                Ok(stored) => {
                    if stored.id != habit.id {
                        // Adopt the server-assigned id, cascading to this
                        // habit's local completions.
                        self.habits.reassign_id(&habit.id, &stored.id);
                        self.completions.reassign_habit(&habit.id, &stored.id);
                        habit.id = stored.id;
                    }
                }
                Err(err) => {
                    self.habits.remove(&habit.id);
                    warn!(habit = %habit.name, "remote insert failed, rolled back: {err}");
                    return Err(err.into());
                }
            }
        }

        Ok(habit)
    }

    /// Edit a habit in place: local update, then remote update with rollback.
    pub async fn update_habit(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut Habit),
    ) -> Result<Habit, CoreError> {
        let previous = self
            .habits
            .update(id, apply)
            .ok_or_else(|| CoreError::Custom(format!("no such habit: {id}")))?;
        let updated = match self.habits.get(id) {
            Some(habit) => habit.clone(),
            None => return Err(CoreError::Custom(format!("no such habit: {id}"))),
        };

        if let Err(err) = updated.validate() {
            self.habits.replace(previous);
            return Err(err.into());
        }

        if let Some(remote) = self.remote_for_write() {
            if let Err(err) = remote.update_habit(&HabitRow::from(&updated)).await {
                self.habits.replace(previous);
                warn!(habit = %updated.name, "remote update failed, rolled back: {err}");
                return Err(err.into());
            }
        }

        Ok(updated)
    }

    /// Archive without deleting; the habit stays in the list.
    pub async fn archive_habit(&mut self, id: &str) -> Result<Habit, CoreError> {
        self.update_habit(id, |habit| habit.archived = true).await
    }

    /// Delete a habit: local removal, then remote delete with rollback.
    pub async fn delete_habit(&mut self, id: &str) -> Result<Habit, CoreError> {
        let (index, removed) = self
            .habits
            .remove(id)
            .ok_or_else(|| CoreError::Custom(format!("no such habit: {id}")))?;

        if let Some(remote) = self.remote_for_write() {
            if let Err(err) = remote.delete_habit(id).await {
                self.habits.insert_at(index, removed);
                warn!(habit_id = id, "remote delete failed, rolled back: {err}");
                return Err(err.into());
            }
        }

        Ok(removed)
    }

    /// Toggle the completion for (habit, date).
    ///
    /// Adding checks the fresh streak for a milestone; the outcome carries
    /// the celebration message when it hit one.
    pub async fn toggle_completion(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<ToggleOutcome, CoreError> {
        let toggled = self.completions.toggle(habit_id, date);
        let milestone = match &toggled {
            Toggled::Added(_) => self.milestone_for(habit_id),
            Toggled::Removed(_) => None,
        };

        if let Some(remote) = self.remote_for_write() {
            let result = match &toggled {
                Toggled::Added(completion) => remote
                    .insert_completion(&CompletionRow::from(completion))
                    .await
                    .map(|stored| {
                        if stored.id != completion.id {
                            self.completions.reassign_id(&completion.id, &stored.id);
                        }
                    }),
                Toggled::Removed(_) => remote.delete_completion_by_day(habit_id, date).await,
            };
            if let Err(err) = result {
                match &toggled {
                    Toggled::Added(completion) => {
                        self.completions.remove(&completion.id);
                    }
                    Toggled::Removed(completion) => {
                        self.completions.insert(completion.clone());
                    }
                }
                warn!(habit_id, %date, "remote toggle failed, rolled back: {err}");
                return Err(err.into());
            }
        }

        let completion = match toggled {
            Toggled::Added(c) => {
                // The id may have been reconciled above.
                self.completions
                    .for_habit(habit_id)
                    .into_iter()
                    .find(|stored| stored.date == date)
                    .cloned()
                    .unwrap_or(c)
            }
            Toggled::Removed(c) => {
                return Ok(ToggleOutcome {
                    added: false,
                    completion: c,
                    milestone,
                })
            }
        };

        Ok(ToggleOutcome {
            added: true,
            completion,
            milestone,
        })
    }

    /// Log a completion with note/mood/photo details.
    ///
    /// Unlike toggle this always inserts; keeping one record per day is
    /// the caller's concern, matching the toggle-first UI flow.
    pub async fn log_completion(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
        details: CompletionDetails,
    ) -> Result<ToggleOutcome, CoreError> {
        details.validate()?;
        let mut completion = Completion::new(habit_id, date, details);
        self.completions.insert(completion.clone());
        let milestone = self.milestone_for(habit_id);

        if let Some(remote) = self.remote_for_write() {
            match remote.insert_completion(&CompletionRow::from(&completion)).await {
                Ok(stored) => {
                    if stored.id != completion.id {
                        self.completions.reassign_id(&completion.id, &stored.id);
                        completion.id = stored.id;
                    }
                }
                Err(err) => {
                    self.completions.remove(&completion.id);
                    warn!(habit_id, %date, "remote log failed, rolled back: {err}");
                    return Err(err.into());
                }
            }
        }

        Ok(ToggleOutcome {
            added: true,
            completion,
            milestone,
        })
    }

    /// Edit a completion's details: local update, then remote with rollback.
    pub async fn update_completion(
        &mut self,
        id: &str,
        details: CompletionDetails,
    ) -> Result<Completion, CoreError> {
        details.validate()?;
        let previous = self
            .completions
            .update(id, |completion| {
                completion.note = details.note.clone();
                completion.mood = details.mood;
                completion.photo_url = details.photo_url.clone();
            })
            .ok_or_else(|| CoreError::Custom(format!("no such completion: {id}")))?;
        let updated = match self.completions.get(id) {
            Some(completion) => completion.clone(),
            None => return Err(CoreError::Custom(format!("no such completion: {id}"))),
        };

        if let Some(remote) = self.remote_for_write() {
            if let Err(err) = remote.update_completion(&CompletionRow::from(&updated)).await {
                self.completions.replace(previous);
                warn!(completion_id = id, "remote update failed, rolled back: {err}");
                return Err(err.into());
            }
        }

        Ok(updated)
    }

    /// Replace both lists with the authoritative remote state.
    ///
    /// No-op when sync does not apply; a failed fetch leaves the local
    /// lists untouched.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let Some(remote) = self.remote_for_write() else {
            debug!("refresh skipped: not signed in or no remote configured");
            return Ok(());
        };
        let user_id = match self.session.user_id() {
            Some(id) => id.to_string(),
            None => return Ok(()),
        };

        let habit_rows = remote.select_habits(&user_id).await?;
        let completion_rows = remote.select_completions().await?;

        self.habits
            .set_all(habit_rows.into_iter().map(Habit::from).collect());
        self.completions
            .set_all(completion_rows.into_iter().map(Completion::from).collect());
        Ok(())
    }

    /// Push local anonymous data to the backend under `user`'s account.
    ///
    /// Each unowned habit is inserted remotely (adopting the server id for
    /// its completions); when everything lands, the local lists are
    /// cleared so the next [`Tracker::refresh`] becomes authoritative.
    /// A mid-flight failure leaves the local lists untouched.
    pub async fn migrate_anonymous(&mut self, user: &User) -> Result<usize, CoreError> {
        let Some(remote) = self.remote.clone() else {
            return Err(crate::sync::RemoteError::NotConfigured.into());
        };

        let orphans: Vec<Habit> = self
            .habits
            .all()
            .iter()
            .filter(|h| h.user_id.is_none())
            .cloned()
            .collect();
        if orphans.is_empty() {
            return Ok(0);
        }

        for habit in &orphans {
            let mut row = HabitRow::from(habit);
            row.user_id = Some(user.id.clone());
            let stored = remote.insert_habit(&row).await?;

            let completion_rows: Vec<CompletionRow> = self
                .completions
                .for_habit(&habit.id)
                .into_iter()
                .map(|completion| {
                    let mut row = CompletionRow::from(completion);
                    row.habit_id = stored.id.clone();
                    row
                })
                .collect();
            if !completion_rows.is_empty() {
                remote.insert_completions(&completion_rows).await?;
            }
        }

        let migrated = orphans.len();
        self.habits.set_all(Vec::new());
        self.completions.set_all(Vec::new());
        debug!(migrated, "anonymous data migrated to account");
        Ok(migrated)
    }

    /// Fold a realtime change event into the local lists.
    ///
    /// Replacement is last-write-wins by id; completion events for habits
    /// this session does not know are dropped.
    pub fn apply_change(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Habit(Change::Insert(row)) => {
                self.habits.upsert(Habit::from(row));
            }
            ChangeEvent::Habit(Change::Update(row)) => {
                self.habits.replace(Habit::from(row));
            }
            ChangeEvent::Habit(Change::Delete { id }) => {
                self.habits.remove(&id);
            }
            ChangeEvent::Completion(Change::Insert(row)) => {
                if self.habits.contains(&row.habit_id) {
                    self.completions.upsert(Completion::from(row));
                }
            }
            ChangeEvent::Completion(Change::Update(row)) => {
                if self.habits.contains(&row.habit_id) {
                    self.completions.replace(Completion::from(row));
                }
            }
            ChangeEvent::Completion(Change::Delete { id }) => {
                self.completions.remove(&id);
            }
        }
    }

    /// Active habits joined with streak and completed-today status.
    pub fn habits_with_status(&self, today: NaiveDate) -> Vec<HabitStatus> {
        self.habits
            .active()
            .into_iter()
            .map(|habit| self.status_for(habit, today))
            .collect()
    }

    /// Habits due today joined with streak and completed-today status.
    pub fn due_with_status(&self, today: NaiveDate) -> Vec<HabitStatus> {
        self.habits
            .due_on(today)
            .into_iter()
            .map(|habit| self.status_for(habit, today))
            .collect()
    }

    /// Completion picture for one calendar day.
    pub fn daily_stats(&self, date: NaiveDate) -> DailyStats {
        daily_stats(self.habits.all(), self.completions.all(), date)
    }

    /// Long-run summary for one habit.
    pub fn habit_stats(&self, habit_id: &str, today: NaiveDate) -> Option<HabitStats> {
        self.habits
            .get(habit_id)
            .map(|habit| habit_stats(habit, self.completions.all(), today))
    }

    fn status_for(&self, habit: &Habit, today: NaiveDate) -> HabitStatus {
        HabitStatus {
            streak: self.completions.streak_for(&habit.id, today),
            completed_today: self.completions.is_completed(&habit.id, today),
            habit: habit.clone(),
        }
    }

    fn milestone_for(&self, habit_id: &str) -> Option<&'static str> {
        let today = Local::now().date_naive();
        let streak = self.completions.streak_for(habit_id, today);
        if is_milestone(streak) {
            milestone_message(streak)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tracker() -> Tracker {
        Tracker::new(None, Session::default())
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[tokio::test]
    async fn add_habit_is_local_only_when_anonymous() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        assert_eq!(tracker.habits().len(), 1);
        assert!(habit.user_id.is_none());
    }

    #[tokio::test]
    async fn add_habit_rejects_invalid_draft() {
        let mut tracker = tracker();
        assert!(tracker.add_habit(HabitDraft::new("")).await.is_err());
        assert!(tracker.habits().is_empty());
    }

    #[tokio::test]
    async fn update_habit_rolls_back_invalid_edit() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        let before = tracker.habits().get(&habit.id).unwrap().clone();

        let result = tracker
            .update_habit(&habit.id, |h| h.color = "not-a-color".to_string())
            .await;
        assert!(result.is_err());
        assert_eq!(tracker.habits().get(&habit.id).unwrap(), &before);
    }

    #[tokio::test]
    async fn toggle_twice_is_idempotent() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        let day = today();

        let first = tracker.toggle_completion(&habit.id, day).await.unwrap();
        assert!(first.added);
        assert!(tracker.completions().is_completed(&habit.id, day));

        let second = tracker.toggle_completion(&habit.id, day).await.unwrap();
        assert!(!second.added);
        assert!(tracker.completions().is_empty());
    }

    #[tokio::test]
    async fn milestone_fires_on_seventh_day() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        let day = today();

        for i in 1..7 {
            tracker
                .toggle_completion(&habit.id, day - Duration::days(i))
                .await
                .unwrap();
        }
        let outcome = tracker.toggle_completion(&habit.id, day).await.unwrap();
        assert!(outcome.milestone.is_some());
        assert!(outcome.milestone.unwrap().contains("week"));
    }

    #[tokio::test]
    async fn log_completion_validates_details() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        let result = tracker
            .log_completion(
                &habit.id,
                today(),
                CompletionDetails {
                    mood: Some(9),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_err());
        assert!(tracker.completions().is_empty());
    }

    #[tokio::test]
    async fn seeding_only_fills_an_empty_store() {
        let mut tracker = tracker();
        assert_eq!(tracker.seed_default_habits(), 2);
        assert_eq!(tracker.seed_default_habits(), 0);
        assert_eq!(tracker.habits().len(), 2);
    }

    #[tokio::test]
    async fn archive_keeps_the_habit_out_of_daily_views() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        tracker.archive_habit(&habit.id).await.unwrap();

        assert_eq!(tracker.habits().len(), 1);
        assert!(tracker.due_with_status(today()).is_empty());
        assert_eq!(tracker.habits().archived().len(), 1);
    }

    #[test]
    fn realtime_insert_is_deduplicated_by_id() {
        let mut tracker = tracker();
        let habit = Habit::new(HabitDraft::new("Echoed"), Some("u1".to_string()));
        tracker.habits.insert(habit.clone());

        // The echo of our own insert must not duplicate the row.
        let row = HabitRow::from(&habit);
        tracker.apply_change(ChangeEvent::Habit(Change::Insert(row)));
        assert_eq!(tracker.habits().len(), 1);
    }

    #[test]
    fn realtime_completion_for_unknown_habit_is_dropped() {
        let mut tracker = tracker();
        let completion = Completion::new("ghost", today(), CompletionDetails::default());
        let row = CompletionRow::from(&completion);
        tracker.apply_change(ChangeEvent::Completion(Change::Insert(row)));
        assert!(tracker.completions().is_empty());
    }

    #[test]
    fn realtime_delete_removes_by_id() {
        let mut tracker = tracker();
        let habit = Habit::new(HabitDraft::new("Doomed"), None);
        let id = habit.id.clone();
        tracker.habits.insert(habit);

        tracker.apply_change(ChangeEvent::Habit(Change::Delete { id }));
        assert!(tracker.habits().is_empty());
    }

    #[tokio::test]
    async fn status_join_reports_streak_and_completion() {
        let mut tracker = tracker();
        let habit = tracker.add_habit(HabitDraft::new("Read")).await.unwrap();
        let day = today();
        tracker.toggle_completion(&habit.id, day).await.unwrap();
        tracker
            .toggle_completion(&habit.id, day - Duration::days(1))
            .await
            .unwrap();

        let statuses = tracker.habits_with_status(day);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].streak, 2);
        assert!(statuses[0].completed_today);
    }
}
