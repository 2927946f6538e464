//! Donation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Donation, DonationStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub medicine_name: String,
    pub quantity: i32,
    pub expiry_date: Date,
    pub location: String,
    pub organization: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub donation_date: DateTimeUtc,
    pub completed_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Donation {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|_| {
            tracing::warn!(donation_id = %model.id, status = %model.status, "Unknown stored donation status");
            DonationStatus::Pending
        });
        Donation {
            id: model.id,
            user_id: model.user_id,
            medicine_name: model.medicine_name,
            quantity: model.quantity,
            expiry_date: model.expiry_date,
            location: model.location,
            organization: model.organization,
            notes: model.notes,
            status,
            donation_date: model.donation_date,
            completed_date: model.completed_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
