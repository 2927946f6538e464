//! Donation repository. Every query is scoped by owner.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::donation::{self, ActiveModel, Entity as DonationEntity};
use crate::domain::{Donation, DonationStatus};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Donation>>;

    async fn list_by_user_and_status(
        &self,
        user_id: Uuid,
        status: DonationStatus,
    ) -> AppResult<Vec<Donation>>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Donation>>;

    async fn insert(&self, donation: Donation) -> AppResult<Donation>;

    /// Persist every mutable column of an existing donation
    async fn save(&self, donation: Donation) -> AppResult<Donation>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn count_by_status(&self, user_id: Uuid, status: DonationStatus) -> AppResult<u64>;
}

pub struct DonationStore {
    db: DatabaseConnection,
}

impl DonationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active(donation: Donation) -> ActiveModel {
    ActiveModel {
        id: Set(donation.id),
        user_id: Set(donation.user_id),
        medicine_name: Set(donation.medicine_name),
        quantity: Set(donation.quantity),
        expiry_date: Set(donation.expiry_date),
        location: Set(donation.location),
        organization: Set(donation.organization),
        notes: Set(donation.notes),
        status: Set(donation.status.as_str().to_string()),
        donation_date: Set(donation.donation_date),
        completed_date: Set(donation.completed_date),
        created_at: Set(donation.created_at),
        updated_at: Set(donation.updated_at),
    }
}

#[async_trait]
impl DonationRepository for DonationStore {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(donation::Column::UserId.eq(user_id))
            .order_by_desc(donation::Column::DonationDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Donation::from).collect())
    }

    async fn list_by_user_and_status(
        &self,
        user_id: Uuid,
        status: DonationStatus,
    ) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(donation::Column::UserId.eq(user_id))
            .filter(donation::Column::Status.eq(status.as_str()))
            .order_by_desc(donation::Column::DonationDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Donation::from).collect())
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Donation>> {
        let result = DonationEntity::find_by_id(id)
            .filter(donation::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Donation::from))
    }

    async fn insert(&self, donation: Donation) -> AppResult<Donation> {
        let model = to_active(donation).insert(&self.db).await?;
        Ok(Donation::from(model))
    }

    async fn save(&self, donation: Donation) -> AppResult<Donation> {
        let mut active = to_active(donation);
        active.user_id = sea_orm::ActiveValue::NotSet;
        active.created_at = sea_orm::ActiveValue::NotSet;
        let model = active.update(&self.db).await?;
        Ok(Donation::from(model))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = DonationEntity::delete_many()
            .filter(donation::Column::Id.eq(id))
            .filter(donation::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_status(&self, user_id: Uuid, status: DonationStatus) -> AppResult<u64> {
        let count = DonationEntity::find()
            .filter(donation::Column::UserId.eq(user_id))
            .filter(donation::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
