use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::app::AppState;
use crate::error::ApiError;

/// Caller identity resolved from the API key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub is_system_wide_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyQuery {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// API key middleware: resolves `?apiKey=` to an `AuthUser` extension
pub async fn api_key_middleware(
    State(state): State<AppState>,
    query: Result<Query<ApiKeyQuery>, QueryRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let raw_key = query
        .api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ApiError::unauthorized("No apiKey provided"))?;

    let hashed_key = hash_api_key(&state.api_key_prefix, &raw_key);
    let api_key = state
        .api_keys
        .find_by_hashed_key(&hashed_key)
        .await?
        .ok_or_else(|| {
            tracing::warn!("API key validation failed: unknown key");
            ApiError::unauthorized("Your apiKey is not valid")
        })?;

    if api_key.is_expired_at(Utc::now()) {
        tracing::warn!("API key validation failed: key '{}' expired", api_key.id);
        return Err(ApiError::unauthorized("This apiKey is expired"));
    }

    let user = state
        .users
        .find_by_id(api_key.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("API key '{}' belongs to missing user {}", api_key.id, api_key.user_id);
            ApiError::unauthorized("No user found for this apiKey")
        })?;

    let auth_user = AuthUser {
        user_id: user.id,
        is_system_wide_admin: user.is_system_wide_admin(),
    };
    tracing::debug!(
        "API key authenticated user {} (admin: {})",
        auth_user.user_id,
        auth_user.is_system_wide_admin
    );

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Lowercase hex SHA-256 of `key`, with `prefix` stripped when present
pub fn hash_api_key(prefix: &str, key: &str) -> String {
    let bare = key.strip_prefix(prefix).unwrap_or(key);
    format!("{:x}", Sha256::digest(bare.as_bytes()))
}
