use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use time::{Date, Duration};

use super::{CreateHabitRequest, HabitApi, UpdateHabitRequest};
use crate::{time_utils, ApiError, Completion, Habit, HabitId};

/// In-memory habit store used by `--dev` runs. Behaves like the real server:
/// assigns ids and recomputes streaks on every write.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
    today: Date,
}

#[derive(Debug)]
struct DevStore {
    habits: Vec<Habit>,
    next_id: HabitId,
}

impl DevBackend {
    pub fn new(today: Date) -> Self {
        let habits = seed_dev_habits(today);
        let next_id = habits.iter().map(|h| h.id).max().unwrap_or(0) + 1;
        Self {
            store: Arc::new(Mutex::new(DevStore { habits, next_id })),
            today,
        }
    }

    pub fn empty(today: Date) -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore {
                habits: Vec::new(),
                next_id: 1,
            })),
            today,
        }
    }

    fn not_found(call: &str, id: HabitId) -> ApiError {
        tracing::debug!(call, id, "dev backend: habit not found");
        ApiError::Status {
            call: call.to_string(),
            status: 404,
        }
    }
}

#[async_trait]
impl HabitApi for DevBackend {
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        Ok(self
            .store
            .lock()
            .expect("dev store lock poisoned")
            .habits
            .clone())
    }

    async fn create_habit(&self, request: &CreateHabitRequest) -> Result<Habit, ApiError> {
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let habit = Habit {
            id: store.next_id,
            name: request.name.clone(),
            streak_count: 0,
            icon: request.icon.clone(),
            completions: Some(vec![]),
        };
        store.next_id += 1;
        store.habits.push(habit.clone());
        Ok(habit)
    }

    async fn update_habit(
        &self,
        id: HabitId,
        request: &UpdateHabitRequest,
    ) -> Result<Habit, ApiError> {
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let habit = store
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| Self::not_found("PUT /habits/:id", id))?;

        habit.name = request.name.clone();
        habit.icon = request.icon.clone();
        habit.streak_count = streak_for(&request.completions, self.today);
        habit.completions = Some(request.completions.clone());
        Ok(habit.clone())
    }

    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError> {
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let before = store.habits.len();
        store.habits.retain(|habit| habit.id != id);
        if store.habits.len() == before {
            return Err(Self::not_found("DELETE /habits/:id", id));
        }
        Ok(())
    }
}

/// Consecutive completed days ending today, or ending yesterday when today is
/// still open.
pub(crate) fn streak_for(completions: &[Completion], today: Date) -> u32 {
    let is_done = |day: Date| {
        let key = time_utils::format_date(day);
        completions.iter().any(|c| c.completed && c.date == key)
    };

    let mut cursor = if is_done(today) {
        Some(today)
    } else {
        today.previous_day()
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|day| is_done(*day)) {
        streak += 1;
        cursor = day.previous_day();
    }
    streak
}

fn seed_dev_habits(today: Date) -> Vec<Habit> {
    let completed_days_back = |days: &[i64]| -> Vec<Completion> {
        days.iter()
            .filter_map(|back| today.checked_sub(Duration::days(*back)))
            .map(|day| Completion {
                date: time_utils::format_date(day),
                completed: true,
            })
            .collect()
    };

    let seeds = [
        ("Joggen", Some("🏃"), completed_days_back(&[1])),
        ("Lesen", Some("📚"), completed_days_back(&[0, 1, 2])),
        ("Wasser trinken", None, completed_days_back(&[3, 4])),
    ];

    seeds
        .into_iter()
        .zip(1..)
        .map(|((name, icon, completions), id)| Habit {
            id,
            name: name.to_string(),
            streak_count: streak_for(&completions, today),
            icon: icon.map(str::to_string),
            completions: Some(completions),
        })
        .collect()
}
