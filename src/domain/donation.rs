//! Medicine donations.
//!
//! Status machine: `PENDING -> {COMPLETED, CANCELLED}`. Both targets are
//! terminal; a donation can only be edited or deleted while pending.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DonationStatus {
    Pending,
    Completed,
    Cancelled,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "PENDING",
            DonationStatus::Completed => "COMPLETED",
            DonationStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DonationStatus::Pending)
    }

    /// Validate a transition out of `self`.
    pub fn transition_to(self, next: DonationStatus) -> AppResult<DonationStatus> {
        match (self, next) {
            (DonationStatus::Pending, DonationStatus::Completed)
            | (DonationStatus::Pending, DonationStatus::Cancelled) => Ok(next),
            (DonationStatus::Pending, DonationStatus::Pending) => Err(AppError::bad_request(
                "Donation is already in PENDING status",
            )),
            (current, _) => Err(AppError::bad_request(format!(
                "Cannot update status of a donation that is not in pending status (current status: {})",
                current
            ))),
        }
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(DonationStatus::Pending),
            "COMPLETED" => Ok(DonationStatus::Completed),
            "CANCELLED" | "CANCELED" => Ok(DonationStatus::Cancelled),
            _ => Err(AppError::bad_request(format!("Invalid donation status: {}", s))),
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub medicine_name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    pub location: String,
    pub organization: Option<String>,
    pub notes: Option<String>,
    pub status: DonationStatus,
    pub donation_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// Reject edits and deletes once the donation left PENDING.
    pub fn ensure_mutable(&self, action: &str) -> AppResult<()> {
        if self.status.is_terminal() {
            return Err(AppError::bad_request(format!(
                "Cannot {} a donation that is not in pending status (current status: {})",
                action, self.status
            )));
        }
        Ok(())
    }

    /// Apply a status change, stamping `completed_date` on completion.
    pub fn apply_status(&mut self, next: DonationStatus, now: DateTime<Utc>) -> AppResult<()> {
        self.status = self.status.transition_to(next)?;
        if self.status == DonationStatus::Completed {
            self.completed_date = Some(now);
        }
        Ok(())
    }
}

/// Donation fields supplied by the donor
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationInput {
    #[validate(length(min = 1, message = "Medicine name is required"))]
    pub medicine_name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub organization: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PUT /donations/{id}/status`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StatusUpdate {
    #[schema(example = "COMPLETED")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: Uuid,
    pub medicine_name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    pub location: String,
    pub status: DonationStatus,
    pub organization: Option<String>,
    pub notes: Option<String>,
    pub donation_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub donor_name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonationResponse {
    pub fn new(donation: Donation, donor_name: Option<String>) -> Self {
        Self {
            id: donation.id,
            medicine_name: donation.medicine_name,
            quantity: donation.quantity,
            expiry_date: donation.expiry_date,
            location: donation.location,
            status: donation.status,
            organization: donation.organization,
            notes: donation.notes,
            donation_date: donation.donation_date,
            completed_date: donation.completed_date,
            donor_name: donor_name.unwrap_or_else(|| "Unknown".to_string()),
            user_id: donation.user_id,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(status: DonationStatus) -> Donation {
        let now = Utc::now();
        Donation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            medicine_name: "Amoxicillin".into(),
            quantity: 2,
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            location: "Cairo".into(),
            organization: None,
            notes: None,
            status,
            donation_date: now,
            completed_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_moves_to_terminal_states() {
        assert_eq!(
            DonationStatus::Pending.transition_to(DonationStatus::Completed).unwrap(),
            DonationStatus::Completed
        );
        assert_eq!(
            DonationStatus::Pending.transition_to(DonationStatus::Cancelled).unwrap(),
            DonationStatus::Cancelled
        );
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        for from in [DonationStatus::Completed, DonationStatus::Cancelled] {
            for to in [
                DonationStatus::Pending,
                DonationStatus::Completed,
                DonationStatus::Cancelled,
            ] {
                let err = from.transition_to(to).unwrap_err();
                assert!(matches!(err, AppError::BadRequest(ref m) if m.contains(from.as_str())));
            }
        }
    }

    #[test]
    fn test_pending_to_pending_is_rejected() {
        assert!(DonationStatus::Pending
            .transition_to(DonationStatus::Pending)
            .is_err());
    }

    #[test]
    fn test_completion_stamps_completed_date() {
        let now = Utc::now();
        let mut d = donation(DonationStatus::Pending);
        d.apply_status(DonationStatus::Completed, now).unwrap();
        assert_eq!(d.completed_date, Some(now));

        let mut c = donation(DonationStatus::Pending);
        c.apply_status(DonationStatus::Cancelled, now).unwrap();
        assert!(c.completed_date.is_none());
    }

    #[test]
    fn test_terminal_donation_is_immutable() {
        let d = donation(DonationStatus::Completed);
        let err = d.ensure_mutable("delete").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot delete a donation that is not in pending status (current status: COMPLETED)"
        );
        assert!(donation(DonationStatus::Pending).ensure_mutable("update").is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("completed".parse::<DonationStatus>().unwrap(), DonationStatus::Completed);
        assert_eq!("Canceled".parse::<DonationStatus>().unwrap(), DonationStatus::Cancelled);
        assert!("SHIPPED".parse::<DonationStatus>().is_err());
    }
}
