use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{time_utils, FilterMode, Habit, HabitId};

/// In-progress edit of a single habit. Changes live here until the server accepts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub habit_id: HabitId,
    pub name: String,
    pub icon: Option<String>,
    pub validation_error: Option<String>,
}

impl HabitDraft {
    fn from_habit(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id,
            name: habit.name.clone(),
            icon: habit.icon.clone(),
            validation_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum EditState {
    #[default]
    Closed,
    Editing(HabitDraft),
}

/// Everything the habit list screen keeps besides the habits themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub filter: FilterMode,
    #[serde(with = "time_utils::iso_date")]
    pub selected_day: Date,
    #[serde(with = "time_utils::iso_date")]
    pub today: Date,
    pub new_habit_input: String,
    pub edit: EditState,
    pub last_error: Option<String>,
}

impl ViewState {
    pub fn new(today: Date) -> Self {
        Self {
            filter: FilterMode::default(),
            selected_day: today,
            today,
            new_habit_input: String::new(),
            edit: EditState::Closed,
            last_error: None,
        }
    }

    /// Start from a persisted selected day. Missing or malformed values select `today`.
    pub fn restore(stored_day: Option<&str>, today: Date) -> Self {
        let mut state = Self::new(today);
        match stored_day.map(|raw| (raw, time_utils::parse_date(raw))) {
            Some((_, Some(day))) => state.selected_day = day,
            Some((raw, None)) => {
                tracing::debug!("Ignoring invalid stored day {:?}, using today", raw);
            }
            None => {}
        }
        state
    }

    /// Value to persist for the selected day.
    pub fn selected_day_value(&self) -> String {
        time_utils::format_date(self.selected_day)
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn set_new_habit_input(&mut self, value: &str) {
        self.new_habit_input = value.to_string();
    }

    pub fn next_day(&mut self) {
        self.shift_days(1);
    }

    pub fn previous_day(&mut self) {
        self.shift_days(-1);
    }

    pub fn next_week(&mut self) {
        self.shift_days(7);
    }

    pub fn previous_week(&mut self) {
        self.shift_days(-7);
    }

    pub fn go_to_today(&mut self) {
        self.selected_day = self.today;
    }

    /// Moves the cursor; stays put at the edge of the calendar.
    fn shift_days(&mut self, days: i64) {
        if let Some(day) = self.selected_day.checked_add(Duration::days(days)) {
            self.selected_day = day;
        }
    }

    pub fn week_days(&self) -> Vec<Date> {
        time_utils::week_days(self.selected_day)
    }

    pub fn is_current_week(&self) -> bool {
        time_utils::week_start(self.selected_day) == time_utils::week_start(self.today)
    }

    pub fn week_label(&self) -> String {
        if self.is_current_week() {
            return "Current week".to_string();
        }
        let (year, week, _) = self.selected_day.to_iso_week_date();
        format!("Week {}, {}", week, year)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing(_))
    }

    pub fn edit_draft(&self) -> Option<&HabitDraft> {
        match &self.edit {
            EditState::Editing(draft) => Some(draft),
            EditState::Closed => None,
        }
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut HabitDraft> {
        match &mut self.edit {
            EditState::Editing(draft) => Some(draft),
            EditState::Closed => None,
        }
    }

    pub fn start_edit(&mut self, habit: &Habit) {
        self.edit = EditState::Editing(HabitDraft::from_habit(habit));
    }

    pub fn close_edit(&mut self) {
        self.edit = EditState::Closed;
    }
}
