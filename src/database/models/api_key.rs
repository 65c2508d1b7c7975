use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    #[sqlx(rename = "userId")]
    pub user_id: i32,
    /// Lowercase hex SHA-256 of the key without its prefix
    #[sqlx(rename = "hashedKey")]
    pub hashed_key: String,
    #[sqlx(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn key(expires_at: Option<DateTime<Utc>>) -> ApiKey {
        ApiKey {
            id: "key_1".to_string(),
            user_id: 1,
            hashed_key: "abc".to_string(),
            expires_at,
        }
    }

    #[test]
    fn keys_without_expiry_never_expire() {
        assert!(!key(None).is_expired_at(Utc::now()));
    }

    #[test]
    fn expiry_is_compared_against_now() {
        let now = Utc::now();
        assert!(key(Some(now - Duration::minutes(1))).is_expired_at(now));
        assert!(!key(Some(now + Duration::minutes(1))).is_expired_at(now));
    }
}
