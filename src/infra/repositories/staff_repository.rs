//! Pharmacy staff repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::pharmacy_staff::{self, ActiveModel, Entity as StaffEntity};
use crate::domain::{PharmacyStaff, StaffRole};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// The row linking `user_id` to `pharmacy_id`, active or not
    async fn find_by_pharmacy_and_user(
        &self,
        pharmacy_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<PharmacyStaff>>;

    /// Staff row by id, only if it belongs to `pharmacy_id`
    async fn find_in_pharmacy(
        &self,
        staff_id: Uuid,
        pharmacy_id: Uuid,
    ) -> AppResult<Option<PharmacyStaff>>;

    async fn list_by_pharmacy(&self, pharmacy_id: Uuid) -> AppResult<Vec<PharmacyStaff>>;

    /// Assignments of a user across pharmacies, oldest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<PharmacyStaff>>;

    /// Persist role and active flag
    async fn save(&self, staff: PharmacyStaff) -> AppResult<PharmacyStaff>;
}

pub struct StaffStore {
    db: DatabaseConnection,
}

impl StaffStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn find_by_pharmacy_and_user<C: ConnectionTrait>(
    conn: &C,
    pharmacy_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<PharmacyStaff>> {
    let result = StaffEntity::find()
        .filter(pharmacy_staff::Column::PharmacyId.eq(pharmacy_id))
        .filter(pharmacy_staff::Column::UserId.eq(user_id))
        .one(conn)
        .await?;
    Ok(result.map(PharmacyStaff::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(
    conn: &C,
    pharmacy_id: Uuid,
    user_id: Uuid,
    role: StaffRole,
) -> AppResult<PharmacyStaff> {
    let now = chrono::Utc::now();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        pharmacy_id: Set(pharmacy_id),
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(PharmacyStaff::from(model))
}

pub(crate) async fn save<C: ConnectionTrait>(
    conn: &C,
    staff: PharmacyStaff,
) -> AppResult<PharmacyStaff> {
    let model = ActiveModel {
        id: Set(staff.id),
        role: Set(staff.role.as_str().to_string()),
        active: Set(staff.active),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(PharmacyStaff::from(model))
}

#[async_trait]
impl StaffRepository for StaffStore {
    async fn find_by_pharmacy_and_user(
        &self,
        pharmacy_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<PharmacyStaff>> {
        find_by_pharmacy_and_user(&self.db, pharmacy_id, user_id).await
    }

    async fn find_in_pharmacy(
        &self,
        staff_id: Uuid,
        pharmacy_id: Uuid,
    ) -> AppResult<Option<PharmacyStaff>> {
        let result = StaffEntity::find_by_id(staff_id)
            .filter(pharmacy_staff::Column::PharmacyId.eq(pharmacy_id))
            .one(&self.db)
            .await?;
        Ok(result.map(PharmacyStaff::from))
    }

    async fn list_by_pharmacy(&self, pharmacy_id: Uuid) -> AppResult<Vec<PharmacyStaff>> {
        let models = StaffEntity::find()
            .filter(pharmacy_staff::Column::PharmacyId.eq(pharmacy_id))
            .order_by_asc(pharmacy_staff::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(PharmacyStaff::from).collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<PharmacyStaff>> {
        let models = StaffEntity::find()
            .filter(pharmacy_staff::Column::UserId.eq(user_id))
            .order_by_asc(pharmacy_staff::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(PharmacyStaff::from).collect())
    }

    async fn save(&self, staff: PharmacyStaff) -> AppResult<PharmacyStaff> {
        save(&self.db, staff).await
    }
}
