//! Scriptable [`HabitApi`] for controller tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{CreateHabitRequest, HabitApi, UpdateHabitRequest};
use crate::{ApiError, Habit, HabitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Update,
    Delete,
}

/// Mock that serves a fixed habit list and fails the calls it is told to fail.
///
/// Writes are echoed back the way a server would: creates get the next id,
/// updates return the stored record with the requested changes applied.
#[derive(Clone, Default)]
pub struct MockHabitApi {
    habits: Arc<Mutex<Vec<Habit>>>,
    failing: Arc<Mutex<Vec<Call>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockHabitApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_habits(self, habits: Vec<Habit>) -> Self {
        *self.habits.lock().unwrap() = habits;
        self
    }

    pub fn failing(self, call: Call) -> Self {
        self.fail(call);
        self
    }

    pub fn fail(&self, call: Call) {
        self.failing.lock().unwrap().push(call);
    }

    pub fn recover(&self, call: Call) {
        self.failing.lock().unwrap().retain(|c| *c != call);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn check(&self, call: Call) -> Result<(), ApiError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&call) {
            return Err(ApiError::Status {
                call: format!("{:?}", call),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HabitApi for MockHabitApi {
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        self.check(Call::List)?;
        Ok(self.habits.lock().unwrap().clone())
    }

    async fn create_habit(&self, request: &CreateHabitRequest) -> Result<Habit, ApiError> {
        self.check(Call::Create)?;
        let mut habits = self.habits.lock().unwrap();
        let habit = Habit {
            id: habits.iter().map(|h| h.id).max().unwrap_or(0) + 1,
            name: request.name.clone(),
            streak_count: 0,
            icon: request.icon.clone(),
            completions: None,
        };
        habits.push(habit.clone());
        Ok(habit)
    }

    async fn update_habit(
        &self,
        id: HabitId,
        request: &UpdateHabitRequest,
    ) -> Result<Habit, ApiError> {
        self.check(Call::Update)?;
        let mut habits = self.habits.lock().unwrap();
        let habit = habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| ApiError::Status {
                call: "Update".to_string(),
                status: 404,
            })?;
        habit.name = request.name.clone();
        habit.icon = request.icon.clone();
        habit.streak_count = request.completions.iter().filter(|c| c.completed).count() as u32;
        habit.completions = Some(request.completions.clone());
        Ok(habit.clone())
    }

    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError> {
        self.check(Call::Delete)?;
        self.habits.lock().unwrap().retain(|h| h.id != id);
        Ok(())
    }
}
