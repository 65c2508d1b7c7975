use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{ApiKey, NewSelectedCalendar, SelectedCalendar, User};
use super::repository::{ApiKeyRepository, HealthCheck, SelectedCalendarRepository, UserRepository};

/// Repositories backed by the application's Postgres database
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, role FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl SelectedCalendarRepository for PgStore {
    async fn create(&self, data: NewSelectedCalendar) -> Result<SelectedCalendar, DatabaseError> {
        let query = r#"
            INSERT INTO "SelectedCalendar"
                ("id", "userId", "integration", "externalId", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING *
        "#;

        sqlx::query_as::<_, SelectedCalendar>(query)
            .bind(Uuid::new_v4().to_string())
            .bind(data.user_id)
            .bind(&data.integration)
            .bind(&data.external_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    DatabaseError::UniqueViolation(format!(
                        "Selected calendar '{}' for integration '{}' already exists for user {}",
                        data.external_id, data.integration, data.user_id
                    ))
                }
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn list_by_user_ids(&self, user_ids: &[i32]) -> Result<Vec<SelectedCalendar>, DatabaseError> {
        let rows = sqlx::query_as::<_, SelectedCalendar>(
            r#"SELECT * FROM "SelectedCalendar" WHERE "userId" = ANY($1) ORDER BY "createdAt""#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ApiKeyRepository for PgStore {
    async fn find_by_hashed_key(&self, hashed_key: &str) -> Result<Option<ApiKey>, DatabaseError> {
        let key = sqlx::query_as::<_, ApiKey>(
            r#"SELECT id, "userId", "hashedKey", "expiresAt" FROM "ApiKey" WHERE "hashedKey" = $1"#,
        )
        .bind(hashed_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
