use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored row. Carries provider bookkeeping that never leaves the service;
/// see `validation::SelectedCalendarPublic` for the exposed shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCalendar {
    pub id: String,
    #[sqlx(rename = "userId")]
    pub user_id: i32,
    pub integration: String,
    #[sqlx(rename = "externalId")]
    pub external_id: String,
    #[sqlx(rename = "credentialId")]
    pub credential_id: Option<i32>,
    #[sqlx(rename = "googleChannelId")]
    pub google_channel_id: Option<String>,
    #[sqlx(rename = "googleChannelToken")]
    pub google_channel_token: Option<String>,
    #[sqlx(rename = "googleChannelExpiration")]
    pub google_channel_expiration: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload: the three columns a create call is allowed to set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSelectedCalendar {
    pub integration: String,
    pub external_id: String,
    pub user_id: i32,
}
