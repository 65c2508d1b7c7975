use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{ApiKey, NewSelectedCalendar, SelectedCalendar, User};
use super::repository::{ApiKeyRepository, HealthCheck, SelectedCalendarRepository, UserRepository};

/// Process-local store with the same constraints as the Postgres schema.
/// Used by the test suites and for running without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryData>,
}

#[derive(Default)]
struct MemoryData {
    users: HashMap<i32, User>,
    api_keys: Vec<ApiKey>,
    selected_calendars: Vec<SelectedCalendar>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn insert_api_key(&self, key: ApiKey) {
        self.inner.write().await.api_keys.push(key);
    }

    /// Snapshot of every stored row, internal fields included
    pub async fn selected_calendars(&self) -> Vec<SelectedCalendar> {
        self.inner.read().await.selected_calendars.clone()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl SelectedCalendarRepository for MemoryStore {
    async fn create(&self, data: NewSelectedCalendar) -> Result<SelectedCalendar, DatabaseError> {
        let mut inner = self.inner.write().await;

        let duplicate = inner.selected_calendars.iter().any(|c| {
            c.user_id == data.user_id
                && c.integration == data.integration
                && c.external_id == data.external_id
        });
        if duplicate {
            return Err(DatabaseError::UniqueViolation(format!(
                "Selected calendar '{}' for integration '{}' already exists for user {}",
                data.external_id, data.integration, data.user_id
            )));
        }

        let now = Utc::now();
        let record = SelectedCalendar {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id,
            integration: data.integration,
            external_id: data.external_id,
            credential_id: None,
            google_channel_id: None,
            google_channel_token: None,
            google_channel_expiration: None,
            created_at: now,
            updated_at: now,
        };
        inner.selected_calendars.push(record.clone());
        Ok(record)
    }

    async fn list_by_user_ids(&self, user_ids: &[i32]) -> Result<Vec<SelectedCalendar>, DatabaseError> {
        Ok(self
            .inner
            .read()
            .await
            .selected_calendars
            .iter()
            .filter(|c| user_ids.contains(&c.user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryStore {
    async fn find_by_hashed_key(&self, hashed_key: &str) -> Result<Option<ApiKey>, DatabaseError> {
        Ok(self
            .inner
            .read()
            .await
            .api_keys
            .iter()
            .find(|k| k.hashed_key == hashed_key)
            .cloned())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;

    fn new_calendar(user_id: i32, external_id: &str) -> NewSelectedCalendar {
        NewSelectedCalendar {
            integration: "google_calendar".to_string(),
            external_id: external_id.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicates_per_user() {
        let store = MemoryStore::new();
        store.create(new_calendar(1, "a")).await.unwrap();

        let err = store.create(new_calendar(1, "a")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));

        // Same calendar for another user is fine
        store.create(new_calendar(2, "a")).await.unwrap();
        assert_eq!(store.selected_calendars().await.len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let store = MemoryStore::new();
        store.create(new_calendar(1, "a")).await.unwrap();
        store.create(new_calendar(2, "b")).await.unwrap();
        store.create(new_calendar(3, "c")).await.unwrap();

        let rows = store.list_by_user_ids(&[1, 3]).await.unwrap();
        let owners: Vec<_> = rows.iter().map(|c| c.user_id).collect();
        assert_eq!(owners, vec![1, 3]);
    }

    #[tokio::test]
    async fn find_by_id_or_404_reports_missing_user() {
        let store = MemoryStore::new();
        store
            .insert_user(User {
                id: 5,
                username: Some("pro".to_string()),
                email: "pro@example.com".to_string(),
                role: UserRole::User,
            })
            .await;

        assert_eq!(store.find_by_id_or_404(5).await.unwrap().id, 5);
        let err = store.find_by_id_or_404(6).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
