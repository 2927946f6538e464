//! Medication database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Medication;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "medications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub dosage: String,
    pub frequency: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reminder::Entity")]
    Reminder,
}

impl Related<super::reminder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Medication {
    fn from(model: Model) -> Self {
        Medication {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            dosage: model.dosage,
            frequency: model.frequency,
            start_date: model.start_date,
            end_date: model.end_date,
            notes: model.notes,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
