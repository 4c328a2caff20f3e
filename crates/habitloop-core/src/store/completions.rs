//! The completion list for the current session.

use chrono::NaiveDate;

use crate::completion::{Completion, CompletionDetails};
use crate::streak::current_streak;

/// Result of a toggle: what the store did and with which record.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggled {
    /// No completion existed for the (habit, date) pair; one was added.
    Added(Completion),
    /// A completion existed and was removed.
    Removed(Completion),
}

impl Toggled {
    pub fn completion(&self) -> &Completion {
        match self {
            Toggled::Added(c) | Toggled::Removed(c) => c,
        }
    }

    pub fn was_added(&self) -> bool {
        matches!(self, Toggled::Added(_))
    }
}

/// Owned, ordered list of completions behind accessor functions.
#[derive(Debug, Clone, Default)]
pub struct CompletionStore {
    completions: Vec<Completion>,
}

impl CompletionStore {
    pub fn new(completions: Vec<Completion>) -> Self {
        CompletionStore { completions }
    }

    pub fn all(&self) -> &[Completion] {
        &self.completions
    }

    pub fn len(&self) -> usize {
        self.completions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Replace the whole list (authoritative fetch or realtime reset).
    pub fn set_all(&mut self, completions: Vec<Completion>) {
        self.completions = completions;
    }

    pub fn insert(&mut self, completion: Completion) {
        self.completions.push(completion);
    }

    /// Apply `f` to the completion with `id`, returning the pre-image.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Completion)) -> Option<Completion> {
        let completion = self.completions.iter_mut().find(|c| c.id == id)?;
        let previous = completion.clone();
        f(completion);
        Some(previous)
    }

    /// Replace the stored completion with the same id, byte for byte.
    pub fn replace(&mut self, completion: Completion) -> bool {
        match self.completions.iter_mut().find(|c| c.id == completion.id) {
            Some(slot) => {
                *slot = completion;
                true
            }
            None => false,
        }
    }

    /// Replace by id, or append when the id is unknown (realtime insert).
    pub fn upsert(&mut self, completion: Completion) {
        if !self.replace(completion.clone()) {
            self.completions.push(completion);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<(usize, Completion)> {
        let index = self.completions.iter().position(|c| c.id == id)?;
        Some((index, self.completions.remove(index)))
    }

    /// Swap a locally generated id for the server-assigned one.
    pub fn reassign_id(&mut self, old_id: &str, new_id: &str) -> bool {
        match self.completions.iter_mut().find(|c| c.id == old_id) {
            Some(completion) => {
                completion.id = new_id.to_string();
                true
            }
            None => false,
        }
    }

    /// Re-key completions after their habit's id was reconciled.
    pub fn reassign_habit(&mut self, old_habit_id: &str, new_habit_id: &str) {
        for completion in &mut self.completions {
            if completion.habit_id == old_habit_id {
                completion.habit_id = new_habit_id.to_string();
            }
        }
    }

    /// Find-then-act toggle for the (habit, date) pair.
    ///
    /// This is what keeps the one-completion-per-day invariant: an
    /// existing record is removed, otherwise a bare one is added.
    pub fn toggle(&mut self, habit_id: &str, date: NaiveDate) -> Toggled {
        let existing = self
            .completions
            .iter()
            .find(|c| c.habit_id == habit_id && c.date == date)
            .map(|c| c.id.clone());

        match existing {
            Some(id) => {
                // Present in the list, so remove cannot miss.
                let (_, removed) = self.remove(&id).expect("completion vanished mid-toggle");
                Toggled::Removed(removed)
            }
            None => {
                let completion = Completion::new(habit_id, date, CompletionDetails::default());
                self.completions.push(completion.clone());
                Toggled::Added(completion)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Completion> {
        self.completions.iter().find(|c| c.id == id)
    }

    pub fn for_habit(&self, habit_id: &str) -> Vec<&Completion> {
        self.completions
            .iter()
            .filter(|c| c.habit_id == habit_id)
            .collect()
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&Completion> {
        self.completions.iter().filter(|c| c.date == date).collect()
    }

    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|c| c.habit_id == habit_id && c.date == date)
    }

    pub fn dates_for_habit(&self, habit_id: &str) -> Vec<NaiveDate> {
        self.completions
            .iter()
            .filter(|c| c.habit_id == habit_id)
            .map(|c| c.date)
            .collect()
    }

    /// Current streak for one habit as of `today`.
    pub fn streak_for(&self, habit_id: &str, today: NaiveDate) -> u32 {
        current_streak(&self.dates_for_habit(habit_id), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = CompletionStore::default();
        let day = date(2024, 6, 10);

        let first = store.toggle("habit-1", day);
        assert!(first.was_added());
        assert!(store.is_completed("habit-1", day));

        let second = store.toggle("habit-1", day);
        assert!(!second.was_added());
        assert!(!store.is_completed("habit-1", day));
        assert!(store.is_empty());
    }

    #[test]
    fn double_toggle_restores_original_state() {
        let mut store = CompletionStore::default();
        store.insert(Completion::new(
            "habit-1",
            date(2024, 6, 9),
            CompletionDetails::default(),
        ));
        let snapshot = store.all().to_vec();

        store.toggle("habit-1", date(2024, 6, 10));
        store.toggle("habit-1", date(2024, 6, 10));
        assert_eq!(store.all(), snapshot.as_slice());
    }

    #[test]
    fn toggle_is_scoped_to_the_habit_and_date() {
        let mut store = CompletionStore::default();
        let day = date(2024, 6, 10);
        store.toggle("habit-1", day);
        store.toggle("habit-2", day);
        store.toggle("habit-1", day - Duration::days(1));
        assert_eq!(store.len(), 3);

        store.toggle("habit-1", day);
        assert_eq!(store.len(), 2);
        assert!(store.is_completed("habit-2", day));
    }

    #[test]
    fn streak_for_reads_only_that_habits_dates() {
        let mut store = CompletionStore::default();
        let today = date(2024, 6, 10);
        store.toggle("habit-1", today);
        store.toggle("habit-1", today - Duration::days(1));
        store.toggle("habit-2", today - Duration::days(3));

        assert_eq!(store.streak_for("habit-1", today), 2);
        assert_eq!(store.streak_for("habit-2", today), 0);
    }

    #[test]
    fn reassign_habit_rekeys_all_rows() {
        let mut store = CompletionStore::default();
        store.toggle("local-id", date(2024, 6, 9));
        store.toggle("local-id", date(2024, 6, 10));
        store.toggle("other", date(2024, 6, 10));

        store.reassign_habit("local-id", "server-id");
        assert_eq!(store.for_habit("server-id").len(), 2);
        assert_eq!(store.for_habit("local-id").len(), 0);
        assert_eq!(store.for_habit("other").len(), 1);
    }
}
