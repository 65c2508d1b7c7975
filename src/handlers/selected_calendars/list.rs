use axum::extract::{rejection::QueryRejection, Extension, Query, State};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::{parse_user_ids, SelectedCalendarPublic};

use super::to_public;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Single id or comma-separated ids; admin only
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListSelectedCalendarsResponse {
    pub selected_calendars: Vec<SelectedCalendarPublic>,
}

/// GET /selected-calendars - List selected calendars
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<ListSelectedCalendarsResponse> {
    let Query(query) = query?;
    let response = list_selected_calendars(&state, &auth_user, query.user_id.as_deref()).await?;
    Ok(ApiResponse::success(response))
}

pub async fn list_selected_calendars(
    state: &AppState,
    auth_user: &AuthUser,
    user_id_filter: Option<&str>,
) -> Result<ListSelectedCalendarsResponse, ApiError> {
    let requested = user_id_filter.map(parse_user_ids).transpose()?;

    let user_ids = match requested {
        Some(_) if !auth_user.is_system_wide_admin => {
            tracing::warn!(
                "User {} attempted to list selected calendars of other users",
                auth_user.user_id
            );
            return Err(ApiError::forbidden("ADMIN required for userId"));
        }
        Some(ids) => ids,
        None => vec![auth_user.user_id],
    };

    let rows = state.selected_calendars.list_by_user_ids(&user_ids).await?;
    let selected_calendars = rows.iter().map(to_public).collect::<Result<Vec<_>, _>>()?;

    Ok(ListSelectedCalendarsResponse { selected_calendars })
}
