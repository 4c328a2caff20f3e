//! The habit list for the current session.

use chrono::{NaiveDate, Utc};

use crate::habit::Habit;

/// Owned, ordered list of habits behind accessor functions.
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn new(habits: Vec<Habit>) -> Self {
        HabitStore { habits }
    }

    pub fn all(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Replace the whole list (authoritative fetch or realtime reset).
    pub fn set_all(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
    }

    pub fn insert(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    /// Re-insert at a remembered position (rollback of a delete).
    pub fn insert_at(&mut self, index: usize, habit: Habit) {
        let index = index.min(self.habits.len());
        self.habits.insert(index, habit);
    }

    /// Apply `f` to the habit with `id`, stamping `updated_at`.
    ///
    /// Returns the pre-image so the caller can roll back.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Habit)) -> Option<Habit> {
        let habit = self.habits.iter_mut().find(|h| h.id == id)?;
        let previous = habit.clone();
        f(habit);
        habit.updated_at = Utc::now();
        Some(previous)
    }

    /// Replace the stored habit with the same id, byte for byte.
    ///
    /// Unlike [`HabitStore::update`] this does not stamp `updated_at`;
    /// it is the rollback and realtime-update primitive.
    pub fn replace(&mut self, habit: Habit) -> bool {
        match self.habits.iter_mut().find(|h| h.id == habit.id) {
            Some(slot) => {
                *slot = habit;
                true
            }
            None => false,
        }
    }

    /// Replace by id, or append when the id is unknown (realtime insert).
    pub fn upsert(&mut self, habit: Habit) {
        if !self.replace(habit.clone()) {
            self.habits.push(habit);
        }
    }

    /// Remove by id, returning the position and the removed habit.
    pub fn remove(&mut self, id: &str) -> Option<(usize, Habit)> {
        let index = self.habits.iter().position(|h| h.id == id)?;
        Some((index, self.habits.remove(index)))
    }

    /// Swap a locally generated id for the server-assigned one.
    pub fn reassign_id(&mut self, old_id: &str, new_id: &str) -> bool {
        match self.habits.iter_mut().find(|h| h.id == old_id) {
            Some(habit) => {
                habit.id = new_id.to_string();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active(&self) -> Vec<&Habit> {
        self.habits.iter().filter(|h| !h.archived).collect()
    }

    pub fn archived(&self) -> Vec<&Habit> {
        self.habits.iter().filter(|h| h.archived).collect()
    }

    /// Active habits due on `date` per their recurrence rule.
    pub fn due_on(&self, date: NaiveDate) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| !h.archived && h.scheduled_on(date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Frequency, HabitDraft};

    fn store_with(names: &[&str]) -> HabitStore {
        let mut store = HabitStore::default();
        for name in names {
            store.insert(Habit::new(HabitDraft::new(*name), None));
        }
        store
    }

    #[test]
    fn update_returns_pre_image_and_stamps() {
        let mut store = store_with(&["Water"]);
        let id = store.all()[0].id.clone();
        let before = store.all()[0].clone();

        let previous = store.update(&id, |h| h.name = "Hydrate".to_string()).unwrap();
        assert_eq!(previous, before);
        let after = store.get(&id).unwrap();
        assert_eq!(after.name, "Hydrate");
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn replace_restores_exactly() {
        let mut store = store_with(&["Water"]);
        let id = store.all()[0].id.clone();
        let before = store.all()[0].clone();

        store.update(&id, |h| h.name = "Changed".to_string());
        assert!(store.replace(before.clone()));
        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn remove_and_insert_at_round_trip() {
        let mut store = store_with(&["A", "B", "C"]);
        let snapshot: Vec<Habit> = store.all().to_vec();
        let id = store.all()[1].id.clone();

        let (index, removed) = store.remove(&id).unwrap();
        assert_eq!(index, 1);
        store.insert_at(index, removed);
        assert_eq!(store.all(), snapshot.as_slice());
    }

    #[test]
    fn upsert_replaces_or_appends() {
        let mut store = store_with(&["A"]);
        let mut echoed = store.all()[0].clone();
        echoed.name = "A'".to_string();
        store.upsert(echoed);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].name, "A'");

        store.upsert(Habit::new(HabitDraft::new("B"), None));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn due_on_respects_archive_flag_and_rule() {
        let mut store = HabitStore::default();
        store.insert(Habit::new(HabitDraft::new("Daily"), None));
        store.insert(Habit::new(
            HabitDraft {
                frequency: Frequency::Weekly { days: Vec::new() },
                ..HabitDraft::new("Never")
            },
            None,
        ));
        let archived_id = {
            let habit = Habit::new(HabitDraft::new("Archived"), None);
            let id = habit.id.clone();
            store.insert(habit);
            id
        };
        store.update(&archived_id, |h| h.archived = true);

        let today = chrono::Utc::now().date_naive();
        let due = store.due_on(today);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].name, "Daily");
    }
}
