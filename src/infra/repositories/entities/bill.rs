//! Bill database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Bill;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub bill_number: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
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

impl From<Model> for Bill {
    fn from(model: Model) -> Self {
        Bill {
            id: model.id,
            pharmacy_id: model.pharmacy_id,
            bill_number: model.bill_number,
            customer_name: model.customer_name,
            total_amount: model.total_amount,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
