use serde::{Deserialize, Serialize};
use time::Date;

use crate::time_utils;

pub type HabitId = i64;

/// A habit as returned by the habit API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// Computed by the server from `completions`.
    #[serde(default)]
    pub streak_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completions: Option<Vec<Completion>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Completion {
    /// `YYYY-MM-DD`
    pub date: String,
    pub completed: bool,
}

impl Habit {
    pub fn is_completed_on(&self, day: Date) -> bool {
        let key = time_utils::format_date(day);
        self.completions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|c| c.completed && c.date == key)
    }

    /// Completion list with the entry for `day` flipped. Other days are kept as-is.
    pub fn completions_toggled(&self, day: Date) -> Vec<Completion> {
        let key = time_utils::format_date(day);
        let mut completions = self.completions.clone().unwrap_or_default();

        match completions.iter_mut().find(|c| c.date == key) {
            Some(existing) => existing.completed = !existing.completed,
            None => completions.push(Completion {
                date: key,
                completed: true,
            }),
        }

        completions.sort_by(|a, b| a.date.cmp(&b.date));
        completions
    }
}

/// Client-side projection of the habit list relative to the selected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Open,
    Done,
}

impl FilterMode {
    pub fn matches(self, habit: &Habit, day: Date) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Open => !habit.is_completed_on(day),
            FilterMode::Done => habit.is_completed_on(day),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "open" => Ok(FilterMode::Open),
            "done" => Ok(FilterMode::Done),
            other => Err(format!("unknown filter mode: {other}")),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FilterMode::All => "all",
            FilterMode::Open => "open",
            FilterMode::Done => "done",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn habit_with(completions: Option<Vec<Completion>>) -> Habit {
        Habit {
            id: 1,
            name: "Joggen".to_string(),
            streak_count: 1,
            icon: None,
            completions,
        }
    }

    #[test]
    fn deserializes_minimal_payload() {
        let habit: Habit =
            serde_json::from_str(r#"{"id":2,"name":"Lesen","streakCount":3}"#).unwrap();
        assert_eq!(habit.id, 2);
        assert_eq!(habit.streak_count, 3);
        assert!(habit.icon.is_none());
        assert!(habit.completions.is_none());
    }

    #[test]
    fn deserializes_null_completions() {
        let habit: Habit =
            serde_json::from_str(r#"{"id":2,"name":"Lesen","completions":null}"#).unwrap();
        assert_eq!(habit.streak_count, 0);
        assert!(habit.completions.is_none());
    }

    #[test]
    fn completion_lookup_ignores_uncompleted_entries() {
        let habit = habit_with(Some(vec![
            Completion {
                date: "2026-10-19".to_string(),
                completed: false,
            },
            Completion {
                date: "2026-10-20".to_string(),
                completed: true,
            },
        ]));
        assert!(!habit.is_completed_on(date!(2026 - 10 - 19)));
        assert!(habit.is_completed_on(date!(2026 - 10 - 20)));
        assert!(!habit.is_completed_on(date!(2026 - 10 - 21)));
    }

    #[test]
    fn toggling_adds_then_flips() {
        let habit = habit_with(None);
        let toggled = habit.completions_toggled(date!(2026 - 10 - 19));
        assert_eq!(
            toggled,
            vec![Completion {
                date: "2026-10-19".to_string(),
                completed: true,
            }]
        );

        let habit = habit_with(Some(toggled));
        let toggled = habit.completions_toggled(date!(2026 - 10 - 19));
        assert!(!toggled[0].completed);
    }

    #[test]
    fn filter_modes_follow_selected_day() {
        let day = date!(2026 - 10 - 19);
        let done = habit_with(Some(vec![Completion {
            date: "2026-10-19".to_string(),
            completed: true,
        }]));
        let open = habit_with(None);

        assert!(FilterMode::All.matches(&done, day));
        assert!(FilterMode::All.matches(&open, day));
        assert!(FilterMode::Done.matches(&done, day));
        assert!(!FilterMode::Done.matches(&open, day));
        assert!(FilterMode::Open.matches(&open, day));
        assert!(!FilterMode::Open.matches(&done, day));
    }

    #[test]
    fn filter_mode_parses_case_insensitively() {
        assert_eq!("DONE".parse::<FilterMode>(), Ok(FilterMode::Done));
        assert!("later".parse::<FilterMode>().is_err());
    }
}
