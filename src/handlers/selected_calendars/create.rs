use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::{SelectedCalendarBodyParams, SelectedCalendarPublic};

use super::to_public;

pub const CREATED_MESSAGE: &str = "Selected Calendar created successfully";

#[derive(Debug, Serialize)]
pub struct CreateSelectedCalendarResponse {
    pub selected_calendar: SelectedCalendarPublic,
    pub message: String,
}

/// POST /selected-calendars - Create a selected calendar
///
/// Body: `{ "integration": string, "externalId": string, "userId"?: integer }`.
/// Only system-wide admins may pass `userId`, and it must name an existing user.
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CreateSelectedCalendarResponse> {
    let Json(body) = payload?;

    let response = create_selected_calendar(&state, &auth_user, &body).await?;
    Ok(ApiResponse::created(response))
}

pub async fn create_selected_calendar(
    state: &AppState,
    auth_user: &AuthUser,
    body: &Value,
) -> Result<CreateSelectedCalendarResponse, ApiError> {
    let (body_user_id, mut data) =
        SelectedCalendarBodyParams::parse(body)?.into_parts(auth_user.user_id);

    // Presence alone is rejected for non-admins, even when it names the caller
    if let Some(owner_id) = body_user_id {
        if !auth_user.is_system_wide_admin {
            tracing::warn!(
                "User {} attempted to create a selected calendar for user {}",
                auth_user.user_id,
                owner_id
            );
            return Err(ApiError::forbidden("ADMIN required for userId"));
        }

        state.users.find_by_id_or_404(owner_id).await?;
        data.user_id = owner_id;
    }

    let created = state.selected_calendars.create(data).await?;
    tracing::debug!(
        "Created selected calendar {} ({}/{}) for user {}",
        created.id,
        created.integration,
        created.external_id,
        created.user_id
    );

    Ok(CreateSelectedCalendarResponse {
        selected_calendar: to_public(&created)?,
        message: CREATED_MESSAGE.to_string(),
    })
}
