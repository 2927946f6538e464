//! Pharmacy repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::pharmacy::{self, ActiveModel, Entity as PharmacyEntity};
use super::entities::pharmacy_staff::{self, Entity as StaffEntity};
use crate::domain::{NewPharmacy, Pharmacy, PharmacyUpdate};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PharmacyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pharmacy>>;

    /// Every pharmacy, active or not, oldest first
    async fn list_all(&self) -> AppResult<Vec<Pharmacy>>;

    /// Pharmacies the user owns or holds an active staff row in
    async fn list_for_member(&self, user_id: Uuid) -> AppResult<Vec<Pharmacy>>;

    async fn exists_by_registration_number(&self, registration_number: &str) -> AppResult<bool>;

    async fn update(&self, id: Uuid, update: PharmacyUpdate) -> AppResult<Pharmacy>;

    /// Soft delete: flips `active` to false
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;
}

pub struct PharmacyStore {
    db: DatabaseConnection,
}

impl PharmacyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<pharmacy::Model> {
        PharmacyEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Pharmacy"))
    }
}

pub(crate) async fn exists_by_registration_number<C: ConnectionTrait>(
    conn: &C,
    registration_number: &str,
) -> AppResult<bool> {
    let count = PharmacyEntity::find()
        .filter(pharmacy::Column::RegistrationNumber.eq(registration_number))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    conn: &C,
    new_pharmacy: NewPharmacy,
) -> AppResult<Pharmacy> {
    let now = chrono::Utc::now();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new_pharmacy.name),
        registration_number: Set(new_pharmacy.registration_number),
        address: Set(new_pharmacy.address),
        phone: Set(new_pharmacy.phone),
        email: Set(new_pharmacy.email),
        website: Set(new_pharmacy.website),
        owner_id: Set(new_pharmacy.owner_id),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        AppError::from_unique_violation(e, "Pharmacy registration number already exists")
    })?;

    Ok(Pharmacy::from(model))
}

#[async_trait]
impl PharmacyRepository for PharmacyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pharmacy>> {
        let result = PharmacyEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Pharmacy::from))
    }

    async fn list_all(&self) -> AppResult<Vec<Pharmacy>> {
        let models = PharmacyEntity::find()
            .order_by_asc(pharmacy::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Pharmacy::from).collect())
    }

    async fn list_for_member(&self, user_id: Uuid) -> AppResult<Vec<Pharmacy>> {
        let staffed: Vec<Uuid> = StaffEntity::find()
            .filter(pharmacy_staff::Column::UserId.eq(user_id))
            .filter(pharmacy_staff::Column::Active.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.pharmacy_id)
            .collect();

        let models = PharmacyEntity::find()
            .filter(
                pharmacy::Column::OwnerId
                    .eq(user_id)
                    .or(pharmacy::Column::Id.is_in(staffed)),
            )
            .order_by_asc(pharmacy::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Pharmacy::from).collect())
    }

    async fn exists_by_registration_number(&self, registration_number: &str) -> AppResult<bool> {
        exists_by_registration_number(&self.db, registration_number).await
    }

    async fn update(&self, id: Uuid, update: PharmacyUpdate) -> AppResult<Pharmacy> {
        let model = self.find_model(id).await?;
        let mut pharmacy = Pharmacy::from(model.clone());
        pharmacy.apply(update);

        let mut active: ActiveModel = model.into();
        active.name = Set(pharmacy.name);
        active.address = Set(pharmacy.address);
        active.phone = Set(pharmacy.phone);
        active.email = Set(pharmacy.email);
        active.website = Set(pharmacy.website);
        active.active = Set(pharmacy.active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Pharmacy::from(model))
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.active = Set(false);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }
}
