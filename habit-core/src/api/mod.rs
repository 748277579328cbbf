mod client;
mod dev_backend;
pub mod dto;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::{ApiError, Habit, HabitId};

pub use client::HttpHabitApi;
pub use dev_backend::DevBackend;
pub use dto::{CreateHabitRequest, UpdateHabitRequest};

/// The remote habit collection.
///
/// Every implementation is expected to hand back server-owned records: ids and
/// streak counts in the returned [`Habit`]s are authoritative.
#[async_trait]
pub trait HabitApi: Send + Sync {
    /// Read the full collection.
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError>;

    /// Create a habit and return the stored record with its assigned id.
    async fn create_habit(&self, request: &CreateHabitRequest) -> Result<Habit, ApiError>;

    async fn update_habit(
        &self,
        id: HabitId,
        request: &UpdateHabitRequest,
    ) -> Result<Habit, ApiError>;

    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError>;
}
