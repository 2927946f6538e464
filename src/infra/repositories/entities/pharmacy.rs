//! Pharmacy database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Pharmacy;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pharmacies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub owner_id: Uuid,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pharmacy_staff::Entity")]
    Staff,
    #[sea_orm(has_many = "super::bill::Entity")]
    Bill,
}

impl Related<super::pharmacy_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Pharmacy {
    fn from(model: Model) -> Self {
        Pharmacy {
            id: model.id,
            name: model.name,
            registration_number: model.registration_number,
            address: model.address,
            phone: model.phone,
            email: model.email,
            website: model.website,
            owner_id: model.owner_id,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
