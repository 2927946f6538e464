//! Medication entity owned by a single user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Metformin")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "500mg")]
    pub dosage: String,
    #[schema(example = "twice daily")]
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied medication fields, used for both create and full update.
/// Ownership is never taken from the payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct MedicationInput {
    #[validate(length(min = 1, message = "Medication name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Dosage is required"))]
    pub dosage: String,
    #[validate(length(min = 1, message = "Frequency is required"))]
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_date_range(input: &MedicationInput) -> Result<(), validator::ValidationError> {
    match input.end_date {
        Some(end) if end < input.start_date => {
            let mut err = validator::ValidationError::new("date_range");
            err.message = Some("End date must not be before start date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: NaiveDate, end: Option<NaiveDate>) -> MedicationInput {
        MedicationInput {
            name: "Ibuprofen".into(),
            description: None,
            dosage: "200mg".into(),
            frequency: "daily".into(),
            start_date: start,
            end_date: end,
            notes: None,
            active: true,
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(input(start, Some(end)).validate().is_err());
        assert!(input(start, None).validate().is_ok());
        assert!(input(end, Some(start)).validate().is_ok());
    }

    #[test]
    fn test_active_defaults_to_true() {
        let json = r#"{"name":"A","dosage":"1","frequency":"daily","startDate":"2024-01-01"}"#;
        let parsed: MedicationInput = serde_json::from_str(json).unwrap();
        assert!(parsed.active);
    }
}
