//! Reminder database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Reminder;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub reminder_time: DateTime,
    pub notes: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::medication::Entity",
        from = "Column::MedicationId",
        to = "super::medication::Column::Id",
        on_delete = "Cascade"
    )]
    Medication,
}

impl Related<super::medication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Reminder {
    fn from(model: Model) -> Self {
        Reminder {
            id: model.id,
            user_id: model.user_id,
            medication_id: model.medication_id,
            reminder_time: model.reminder_time,
            notes: model.notes,
            completed: model.completed,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
