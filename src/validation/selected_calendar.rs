use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{FieldCollector, ValidationError};
use crate::database::models::NewSelectedCalendar;

/// Body of `POST /selected-calendars`. Unknown keys are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCalendarBodyParams {
    pub integration: String,
    pub external_id: String,
    /// Owner requested by the caller; only admins may set it
    pub user_id: Option<i32>,
}

impl SelectedCalendarBodyParams {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldCollector::default();
        let Some(map) = fields.object(raw) else {
            return Err(ValidationError::input(fields.into_errors()));
        };

        let integration = fields.required_string(map, "integration");
        let external_id = fields.required_string(map, "externalId");
        let user_id = fields.optional_int(map, "userId");

        match (integration, external_id) {
            (Some(integration), Some(external_id)) if fields.is_empty() => Ok(Self {
                integration,
                external_id,
                user_id,
            }),
            _ => Err(ValidationError::input(fields.into_errors())),
        }
    }

    /// Splits off the requested owner and builds an insert owned by `caller_id`
    pub fn into_parts(self, caller_id: i32) -> (Option<i32>, NewSelectedCalendar) {
        let data = NewSelectedCalendar {
            integration: self.integration,
            external_id: self.external_id,
            user_id: caller_id,
        };
        (self.user_id, data)
    }
}

/// Externally visible shape of a selected calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCalendarPublic {
    pub user_id: i32,
    pub integration: String,
    pub external_id: String,
    pub credential_id: Option<i32>,
}

impl SelectedCalendarPublic {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldCollector::default();
        let Some(map) = fields.object(raw) else {
            return Err(ValidationError::output(fields.into_errors()));
        };

        let user_id = fields.required_int(map, "userId");
        let integration = fields.required_string(map, "integration");
        let external_id = fields.required_string(map, "externalId");
        let credential_id = fields.nullable_int(map, "credentialId");

        match (user_id, integration, external_id) {
            (Some(user_id), Some(integration), Some(external_id)) if fields.is_empty() => Ok(Self {
                user_id,
                integration,
                external_id,
                credential_id,
            }),
            _ => Err(ValidationError::output(fields.into_errors())),
        }
    }
}

/// Parses the `userId` query filter: one id or a comma-separated list
pub fn parse_user_ids(raw: &str) -> Result<Vec<i32>, ValidationError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim) {
        match part.parse::<i32>() {
            Ok(id) => ids.push(id),
            Err(_) => {
                let mut errors = HashMap::new();
                errors.insert(
                    "userId".to_string(),
                    format!("Expected integer, received '{}'", part),
                );
                return Err(ValidationError::input(errors).with_message("Invalid query parameters"));
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::SchemaTarget;
    use serde_json::json;

    #[test]
    fn parses_minimal_body() {
        let body = json!({ "integration": "google_calendar", "externalId": "me@example.com" });
        let params = SelectedCalendarBodyParams::parse(&body).unwrap();
        assert_eq!(params.integration, "google_calendar");
        assert_eq!(params.external_id, "me@example.com");
        assert_eq!(params.user_id, None);
    }

    #[test]
    fn unknown_keys_are_stripped() {
        let body = json!({
            "integration": "office365_calendar",
            "externalId": "abc",
            "googleChannelToken": "secret"
        });
        assert!(SelectedCalendarBodyParams::parse(&body).is_ok());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let err = SelectedCalendarBodyParams::parse(&json!({})).unwrap_err();
        assert_eq!(err.target, SchemaTarget::Input);
        assert_eq!(err.field_errors["integration"], "Required");
        assert_eq!(err.field_errors["externalId"], "Required");
    }

    #[test]
    fn mistyped_user_id_is_rejected() {
        let body = json!({ "integration": "x", "externalId": "y", "userId": "7" });
        let err = SelectedCalendarBodyParams::parse(&body).unwrap_err();
        assert_eq!(err.field_errors.len(), 1);
        assert_eq!(err.field_errors["userId"], "Expected integer, received string");

        let body = json!({ "integration": "x", "externalId": "y", "userId": 7.5 });
        assert!(SelectedCalendarBodyParams::parse(&body).is_err());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = SelectedCalendarBodyParams::parse(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field_errors["_root"], "Expected object, received array");
    }

    #[test]
    fn into_parts_defaults_owner_to_caller() {
        let body = json!({ "integration": "x", "externalId": "y", "userId": 42 });
        let (requested, data) = SelectedCalendarBodyParams::parse(&body).unwrap().into_parts(7);
        assert_eq!(requested, Some(42));
        assert_eq!(data.user_id, 7);
        assert_eq!(data.integration, "x");
    }

    #[test]
    fn public_schema_drops_internal_fields() {
        let stored = json!({
            "id": "b3c1",
            "userId": 3,
            "integration": "google_calendar",
            "externalId": "cal-1",
            "credentialId": null,
            "googleChannelId": "chan",
            "googleChannelToken": "tok",
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let public = SelectedCalendarPublic::parse(&stored).unwrap();
        let out = serde_json::to_value(&public).unwrap();

        let mut keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["credentialId", "externalId", "integration", "userId"]);
    }

    #[test]
    fn public_schema_mismatch_is_an_output_error() {
        let err = SelectedCalendarPublic::parse(&json!({ "integration": "x" })).unwrap_err();
        assert_eq!(err.target, SchemaTarget::Output);
        assert!(err.field_errors.contains_key("userId"));
    }

    #[test]
    fn parses_user_id_lists() {
        assert_eq!(parse_user_ids("4").unwrap(), vec![4]);
        assert_eq!(parse_user_ids("1, 2,3").unwrap(), vec![1, 2, 3]);
        let err = parse_user_ids("1,abc").unwrap_err();
        assert_eq!(err.message, "Invalid query parameters");
    }
}
