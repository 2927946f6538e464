//! Pharmacy staff database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{PharmacyStaff, StaffRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pharmacy_staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pharmacy::Entity",
        from = "Column::PharmacyId",
        to = "super::pharmacy::Column::Id",
        on_delete = "Cascade"
    )]
    Pharmacy,
}

impl Related<super::pharmacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pharmacy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PharmacyStaff {
    fn from(model: Model) -> Self {
        // Anything that is not ADMIN grants plain membership only
        let role = model.role.parse().unwrap_or(StaffRole::Staff);
        PharmacyStaff {
            id: model.id,
            pharmacy_id: model.pharmacy_id,
            user_id: model.user_id,
            role,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
