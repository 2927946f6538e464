//! Medication service. A medication belongs to exactly one user; every
//! lookup is by `(id, owner)` so foreign rows read as missing.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Medication, MedicationInput, Principal};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait MedicationService: Send + Sync {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<Medication>>;

    async fn list_active(&self, principal: &Principal) -> AppResult<Vec<Medication>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Medication>;

    async fn create(&self, principal: &Principal, input: MedicationInput) -> AppResult<Medication>;

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: MedicationInput,
    ) -> AppResult<Medication>;

    /// Hard delete, reminders included
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

pub struct MedicationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MedicationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> MedicationService for MedicationManager<U> {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<Medication>> {
        self.uow.medications().list_by_user(principal.id).await
    }

    async fn list_active(&self, principal: &Principal) -> AppResult<Vec<Medication>> {
        self.uow.medications().list_active_by_user(principal.id).await
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Medication> {
        self.uow
            .medications()
            .find_by_id_and_user(id, principal.id)
            .await?
            .ok_or_not_found("Medication")
    }

    async fn create(&self, principal: &Principal, input: MedicationInput) -> AppResult<Medication> {
        let medication = self.uow.medications().create(principal.id, input).await?;
        tracing::debug!(user_id = %principal.id, medication_id = %medication.id, "Medication created");
        Ok(medication)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: MedicationInput,
    ) -> AppResult<Medication> {
        self.get(principal, id).await?;
        self.uow.medications().update(id, principal.id, input).await
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        if self.uow.medications().delete(id, principal.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Medication"))
        }
    }
}
