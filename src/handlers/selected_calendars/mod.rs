pub mod create;
pub mod list;

pub use create::post as create;
pub use list::get as list;

use crate::database::models::SelectedCalendar;
use crate::error::ApiError;
use crate::validation::SelectedCalendarPublic;

/// Runs a stored row through the public schema
pub(crate) fn to_public(record: &SelectedCalendar) -> Result<SelectedCalendarPublic, ApiError> {
    let raw = serde_json::to_value(record).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;
    Ok(SelectedCalendarPublic::parse(&raw)?)
}
