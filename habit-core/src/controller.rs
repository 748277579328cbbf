use crate::api::{CreateHabitRequest, HabitApi, UpdateHabitRequest};
use crate::{EditState, Habit, HabitError, HabitId, ViewState};

/// Keeps a local habit list in step with the remote collection.
///
/// The server is the source of truth: local records only change after a
/// request succeeds, and the returned record replaces whatever was there.
/// Failed writes leave the list, the input buffer and any open edit exactly
/// as they were so the user can retry.
pub struct HabitController<A> {
    api: A,
    habits: Vec<Habit>,
    view: ViewState,
}

impl<A: HabitApi> HabitController<A> {
    pub fn new(api: A, view: ViewState) -> Self {
        Self {
            api,
            habits: Vec::new(),
            view,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Filter, day cursor and input buffer are plain state; mutate them directly.
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Habits passing the current filter for the selected day, in server order.
    pub fn visible_habits(&self) -> Vec<&Habit> {
        let day = self.view.selected_day;
        let filter = self.view.filter;
        self.habits
            .iter()
            .filter(|habit| filter.matches(habit, day))
            .collect()
    }

    /// Fetch the full list. Failures are logged and keep the previous list.
    pub async fn load(&mut self) {
        match self.api.list_habits().await {
            Ok(habits) => {
                tracing::debug!("Loaded {} habits", habits.len());
                self.habits = habits;
                self.view.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Could not load habits: {}", e);
                self.view.last_error = Some(e.to_string());
            }
        }
    }

    /// Create a habit named after the input buffer.
    pub async fn create(&mut self) -> Result<HabitId, HabitError> {
        self.create_with_icon(None).await
    }

    pub async fn create_with_icon(&mut self, icon: Option<&str>) -> Result<HabitId, HabitError> {
        let name = self.view.new_habit_input.trim().to_string();
        if name.is_empty() {
            return Err(self.fail("create habit", HabitError::EmptyName));
        }

        let request = CreateHabitRequest {
            name,
            icon: icon.map(str::to_string),
        };

        match self.api.create_habit(&request).await {
            Ok(habit) => {
                let id = habit.id;
                self.habits.push(habit);
                self.view.new_habit_input.clear();
                self.view.last_error = None;
                Ok(id)
            }
            Err(e) => Err(self.fail("create habit", e.into())),
        }
    }

    /// Open an edit draft for `id`, replacing any draft already open.
    pub fn start_edit(&mut self, id: HabitId) -> Result<(), HabitError> {
        let habit = self
            .habits
            .iter()
            .find(|habit| habit.id == id)
            .ok_or(HabitError::UnknownHabit(id))?;
        self.view.start_edit(habit);
        Ok(())
    }

    pub fn set_edit_name(&mut self, name: &str) -> Result<(), HabitError> {
        let draft = self.view.edit_draft_mut().ok_or(HabitError::NotEditing)?;
        draft.name = name.to_string();
        draft.validation_error = None;
        Ok(())
    }

    pub fn set_edit_icon(&mut self, icon: Option<&str>) -> Result<(), HabitError> {
        let draft = self.view.edit_draft_mut().ok_or(HabitError::NotEditing)?;
        draft.icon = icon.map(str::to_string);
        Ok(())
    }

    /// Drop the draft. The record itself was never touched.
    pub fn cancel_edit(&mut self) {
        self.view.close_edit();
    }

    /// Send the draft. On success the response replaces the record and the
    /// edit closes; otherwise the draft stays open.
    pub async fn save_edit(&mut self) -> Result<(), HabitError> {
        let EditState::Editing(draft) = &mut self.view.edit else {
            return Err(HabitError::NotEditing);
        };

        let name = draft.name.trim().to_string();
        if name.is_empty() {
            draft.validation_error = Some("Name must not be empty".to_string());
            return Err(self.fail("update habit", HabitError::EmptyName));
        }

        let id = draft.habit_id;
        let icon = draft.icon.clone();
        let Some(original) = self.habit(id) else {
            return Err(self.fail("update habit", HabitError::UnknownHabit(id)));
        };

        let request = UpdateHabitRequest {
            name,
            icon,
            completions: original.completions.clone().unwrap_or_default(),
        };

        match self.api.update_habit(id, &request).await {
            Ok(updated) => {
                self.merge(updated);
                self.view.close_edit();
                self.view.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("update habit", e.into())),
        }
    }

    pub async fn delete(&mut self, id: HabitId) -> Result<(), HabitError> {
        if self.habit(id).is_none() {
            return Err(self.fail("delete habit", HabitError::UnknownHabit(id)));
        }

        match self.api.delete_habit(id).await {
            Ok(()) => {
                self.habits.retain(|habit| habit.id != id);
                if self.view.edit_draft().is_some_and(|d| d.habit_id == id) {
                    self.view.close_edit();
                }
                self.view.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("delete habit", e.into())),
        }
    }

    /// Flip the habit's completion for the selected day.
    pub async fn toggle_completion(&mut self, id: HabitId) -> Result<(), HabitError> {
        let Some(habit) = self.habit(id) else {
            return Err(self.fail("toggle completion", HabitError::UnknownHabit(id)));
        };

        let request = UpdateHabitRequest {
            name: habit.name.clone(),
            icon: habit.icon.clone(),
            completions: habit.completions_toggled(self.view.selected_day),
        };

        match self.api.update_habit(id, &request).await {
            Ok(updated) => {
                self.merge(updated);
                self.view.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("toggle completion", e.into())),
        }
    }

    fn merge(&mut self, updated: Habit) {
        match self.habits.iter_mut().find(|habit| habit.id == updated.id) {
            Some(existing) => *existing = updated,
            None => self.habits.push(updated),
        }
    }

    fn fail(&mut self, action: &str, error: HabitError) -> HabitError {
        tracing::warn!("Failed to {}: {}", action, error);
        self.view.last_error = Some(error.to_string());
        error
    }
}
