//! Medication reminders and their completion state.
//!
//! A reminder is either pending or completed; `completed_at` is set exactly
//! when `completed` is true.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Medication;

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub reminder_time: NaiveDateTime,
    pub notes: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Completion timestamp that keeps `completed_at` in lockstep with `completed`.
///
/// An already-set timestamp survives re-completion.
pub fn completion_timestamp(
    completed: bool,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if completed {
        Some(current.unwrap_or(now))
    } else {
        None
    }
}

impl Reminder {
    /// Mark as completed. Idempotent.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.set_completed(true, now);
    }

    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completion_timestamp(completed, self.completed_at, now);
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    pub medication_id: Uuid,
    #[schema(value_type = String, example = "2024-05-01T08:00:00")]
    pub reminder_time: NaiveDateTime,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminder {
    /// Re-point the reminder to another of the caller's medications
    pub medication_id: Option<Uuid>,
    #[schema(value_type = String, example = "2024-05-01T20:00:00")]
    pub reminder_time: NaiveDateTime,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Optional window for the pending list. Both ends must be present to apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl ReminderWindow {
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub medication_name: Option<String>,
    pub medication_dosage: Option<String>,
    #[schema(value_type = String)]
    pub reminder_time: NaiveDateTime,
    pub notes: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder, medication: Option<&Medication>) -> Self {
        Self {
            id: reminder.id,
            medication_id: reminder.medication_id,
            medication_name: medication.map(|m| m.name.clone()),
            medication_dosage: medication.map(|m| m.dosage.clone()),
            reminder_time: reminder.reminder_time,
            notes: reminder.notes,
            completed: reminder.completed,
            completed_at: reminder.completed_at,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reminder() -> Reminder {
        let now = Utc::now();
        Reminder {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            reminder_time: now.naive_utc(),
            notes: None,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completed_at_tracks_completed_flag() {
        let now = Utc::now();
        assert_eq!(completion_timestamp(true, None, now), Some(now));
        assert_eq!(completion_timestamp(false, Some(now), now), None);
        assert_eq!(completion_timestamp(false, None, now), None);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let first = Utc::now() - Duration::hours(3);
        let mut r = reminder();
        r.complete(first);
        r.complete(Utc::now());
        assert!(r.completed);
        assert_eq!(r.completed_at, Some(first));
    }

    #[test]
    fn test_uncomplete_clears_timestamp() {
        let mut r = reminder();
        r.complete(Utc::now());
        r.set_completed(false, Utc::now());
        assert!(!r.completed);
        assert!(r.completed_at.is_none());
    }

    #[test]
    fn test_window_needs_both_ends() {
        let t = Utc::now().naive_utc();
        let half = ReminderWindow { start: Some(t), end: None };
        assert!(half.bounds().is_none());
        let full = ReminderWindow { start: Some(t), end: Some(t) };
        assert_eq!(full.bounds(), Some((t, t)));
    }
}
