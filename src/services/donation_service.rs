//! Donation service. Donations move PENDING -> COMPLETED | CANCELLED and
//! are frozen once they leave PENDING.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Donation, DonationInput, DonationResponse, DonationStatus, Principal, StatusUpdate,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DonationService: Send + Sync {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<DonationResponse>>;

    async fn pending(&self, principal: &Principal) -> AppResult<Vec<DonationResponse>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<DonationResponse>;

    async fn create(&self, principal: &Principal, input: DonationInput)
        -> AppResult<DonationResponse>;

    /// Edit the donor-supplied fields of a PENDING donation
    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: DonationInput,
    ) -> AppResult<DonationResponse>;

    /// Delete a PENDING donation
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        update: StatusUpdate,
    ) -> AppResult<DonationResponse>;
}

pub struct DonationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DonationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned(&self, principal: &Principal, id: Uuid) -> AppResult<Donation> {
        self.uow
            .donations()
            .find_by_id_and_user(id, principal.id)
            .await?
            .ok_or_not_found("Donation")
    }

    async fn donor_name(&self, principal: &Principal) -> AppResult<Option<String>> {
        let donor = self.uow.users().find_by_id(principal.id).await?;
        Ok(donor.map(|u| u.full_name()))
    }

    async fn respond(&self, principal: &Principal, donation: Donation) -> AppResult<DonationResponse> {
        let donor = self.donor_name(principal).await?;
        Ok(DonationResponse::new(donation, donor))
    }

    async fn respond_all(
        &self,
        principal: &Principal,
        donations: Vec<Donation>,
    ) -> AppResult<Vec<DonationResponse>> {
        let donor = self.donor_name(principal).await?;
        Ok(donations
            .into_iter()
            .map(|d| DonationResponse::new(d, donor.clone()))
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> DonationService for DonationManager<U> {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<DonationResponse>> {
        let donations = self.uow.donations().list_by_user(principal.id).await?;
        self.respond_all(principal, donations).await
    }

    async fn pending(&self, principal: &Principal) -> AppResult<Vec<DonationResponse>> {
        let donations = self
            .uow
            .donations()
            .list_by_user_and_status(principal.id, DonationStatus::Pending)
            .await?;
        self.respond_all(principal, donations).await
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<DonationResponse> {
        let donation = self.owned(principal, id).await?;
        self.respond(principal, donation).await
    }

    async fn create(
        &self,
        principal: &Principal,
        input: DonationInput,
    ) -> AppResult<DonationResponse> {
        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            user_id: principal.id,
            medicine_name: input.medicine_name,
            quantity: input.quantity,
            expiry_date: input.expiry_date,
            location: input.location,
            organization: input.organization,
            notes: input.notes,
            status: DonationStatus::Pending,
            donation_date: now,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };

        let donation = self.uow.donations().insert(donation).await?;
        tracing::info!(user_id = %principal.id, donation_id = %donation.id, "Donation created");
        self.respond(principal, donation).await
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: DonationInput,
    ) -> AppResult<DonationResponse> {
        let mut donation = self.owned(principal, id).await?;
        donation.ensure_mutable("update")?;

        donation.medicine_name = input.medicine_name;
        donation.quantity = input.quantity;
        donation.expiry_date = input.expiry_date;
        donation.location = input.location;
        donation.organization = input.organization;
        donation.notes = input.notes;
        donation.updated_at = Utc::now();

        let donation = self.uow.donations().save(donation).await?;
        self.respond(principal, donation).await
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        let donation = self.owned(principal, id).await?;
        donation.ensure_mutable("delete")?;

        if self.uow.donations().delete(id, principal.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Donation"))
        }
    }

    async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        update: StatusUpdate,
    ) -> AppResult<DonationResponse> {
        let raw = update
            .status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("Status is required"))?;
        let next: DonationStatus = raw.parse()?;

        let mut donation = self.owned(principal, id).await?;
        let previous = donation.status;
        let now = Utc::now();
        donation.apply_status(next, now)?;
        donation.updated_at = now;

        let donation = self.uow.donations().save(donation).await?;
        tracing::info!(
            donation_id = %donation.id,
            from = %previous,
            to = %donation.status,
            "Donation status changed"
        );
        self.respond(principal, donation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::services::testing::{fixtures, TestUnitOfWork};

    fn with_donation(donation: Donation) -> TestUnitOfWork {
        let mut uow = TestUnitOfWork::default();
        uow.donations
            .expect_find_by_id_and_user()
            .returning(move |id, user_id| {
                Ok((id == donation.id && user_id == donation.user_id).then(|| donation.clone()))
            });
        uow.users
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::user(id, &[Role::User]))));
        uow
    }

    fn status(s: &str) -> StatusUpdate {
        StatusUpdate {
            status: Some(s.to_string()),
        }
    }

    #[tokio::test]
    async fn test_completed_cannot_go_back_to_pending() {
        let caller = Uuid::new_v4();
        let donation = fixtures::donation(Uuid::new_v4(), caller, DonationStatus::Completed);
        let id = donation.id;
        let mut uow = with_donation(donation);
        uow.donations.expect_save().never();
        let service = DonationManager::new(uow.build());

        let err = service
            .update_status(&fixtures::principal(caller, &[Role::User]), id, status("PENDING"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_complete_stamps_completed_date() {
        let caller = Uuid::new_v4();
        let donation = fixtures::donation(Uuid::new_v4(), caller, DonationStatus::Pending);
        let id = donation.id;
        let mut uow = with_donation(donation);
        uow.donations
            .expect_save()
            .withf(|d| d.status == DonationStatus::Completed && d.completed_date.is_some())
            .returning(Ok);
        let service = DonationManager::new(uow.build());

        let response = service
            .update_status(&fixtures::principal(caller, &[Role::User]), id, status("completed"))
            .await
            .unwrap();
        assert_eq!(response.status, DonationStatus::Completed);
        assert_eq!(response.donor_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_unknown_or_missing_status_is_bad_request() {
        let service = DonationManager::new(TestUnitOfWork::default().build());
        let principal = fixtures::principal(Uuid::new_v4(), &[Role::User]);

        for update in [status("SHIPPED"), StatusUpdate { status: None }] {
            let err = service
                .update_status(&principal, Uuid::new_v4(), update)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_delete_cancelled_donation_is_rejected() {
        let caller = Uuid::new_v4();
        let donation = fixtures::donation(Uuid::new_v4(), caller, DonationStatus::Cancelled);
        let id = donation.id;
        let mut uow = with_donation(donation);
        uow.donations.expect_delete().never();
        let service = DonationManager::new(uow.build());

        let err = service
            .delete(&fixtures::principal(caller, &[Role::User]), id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("CANCELLED")));
    }

    #[tokio::test]
    async fn test_foreign_donation_is_not_found() {
        let donation = fixtures::donation(Uuid::new_v4(), Uuid::new_v4(), DonationStatus::Pending);
        let id = donation.id;
        let service = DonationManager::new(with_donation(donation).build());

        let err = service
            .get(&fixtures::principal(Uuid::new_v4(), &[Role::User]), id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Donation"));
    }
}
