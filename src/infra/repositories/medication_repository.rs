//! Medication repository. Every query is scoped by owner.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::medication::{self, ActiveModel, Entity as MedicationEntity};
use crate::domain::{Medication, MedicationInput};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Medication>>;

    async fn list_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Medication>>;

    /// `None` when absent or owned by someone else
    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Medication>>;

    async fn create(&self, user_id: Uuid, input: MedicationInput) -> AppResult<Medication>;

    async fn update(&self, id: Uuid, user_id: Uuid, input: MedicationInput)
        -> AppResult<Medication>;

    /// Hard delete; reminders go with it. Returns false when nothing matched.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn count_by_status(&self, user_id: Uuid, active: bool) -> AppResult<u64>;
}

pub struct MedicationStore {
    db: DatabaseConnection,
}

impl MedicationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MedicationRepository for MedicationStore {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Medication>> {
        let models = MedicationEntity::find()
            .filter(medication::Column::UserId.eq(user_id))
            .order_by_asc(medication::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Medication::from).collect())
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Medication>> {
        let models = MedicationEntity::find()
            .filter(medication::Column::UserId.eq(user_id))
            .filter(medication::Column::Active.eq(true))
            .order_by_asc(medication::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Medication::from).collect())
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Medication>> {
        let result = MedicationEntity::find_by_id(id)
            .filter(medication::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Medication::from))
    }

    async fn create(&self, user_id: Uuid, input: MedicationInput) -> AppResult<Medication> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            description: Set(input.description),
            dosage: Set(input.dosage),
            frequency: Set(input.frequency),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            notes: Set(input.notes),
            active: Set(input.active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(Medication::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: MedicationInput,
    ) -> AppResult<Medication> {
        let existing = MedicationEntity::find_by_id(id)
            .filter(medication::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Medication"))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.dosage = Set(input.dosage);
        active.frequency = Set(input.frequency);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.notes = Set(input.notes);
        active.active = Set(input.active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Medication::from(model))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = MedicationEntity::delete_many()
            .filter(medication::Column::Id.eq(id))
            .filter(medication::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_status(&self, user_id: Uuid, active: bool) -> AppResult<u64> {
        let count = MedicationEntity::find()
            .filter(medication::Column::UserId.eq(user_id))
            .filter(medication::Column::Active.eq(active))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
