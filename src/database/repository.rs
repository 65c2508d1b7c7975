use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{ApiKey, NewSelectedCalendar, SelectedCalendar, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    /// Lookup that treats a missing row as an error
    async fn find_by_id_or_404(&self, id: i32) -> Result<User, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }
}

#[async_trait]
pub trait SelectedCalendarRepository: Send + Sync {
    /// Inserts one row. A duplicate (user, integration, external id) is a
    /// `DatabaseError::UniqueViolation`.
    async fn create(&self, data: NewSelectedCalendar) -> Result<SelectedCalendar, DatabaseError>;

    async fn list_by_user_ids(&self, user_ids: &[i32]) -> Result<Vec<SelectedCalendar>, DatabaseError>;
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn find_by_hashed_key(&self, hashed_key: &str) -> Result<Option<ApiKey>, DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}
