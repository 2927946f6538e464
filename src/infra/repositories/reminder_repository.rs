//! Reminder repository. Every query is scoped by owner.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::reminder::{self, ActiveModel, Entity as ReminderEntity};
use crate::domain::Reminder;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// All of a user's reminders, soonest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Reminder>>;

    /// Uncompleted reminders, optionally restricted to `[start, end]`
    async fn list_pending_by_user(
        &self,
        user_id: Uuid,
        window: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> AppResult<Vec<Reminder>>;

    /// Reminders scheduled at or after `since`
    async fn list_since(&self, user_id: Uuid, since: NaiveDateTime) -> AppResult<Vec<Reminder>>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Reminder>>;

    async fn insert(&self, reminder: Reminder) -> AppResult<Reminder>;

    /// Persist every mutable column of an existing reminder
    async fn save(&self, reminder: Reminder) -> AppResult<Reminder>;

    /// Returns false when nothing matched
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn count_pending(&self, user_id: Uuid) -> AppResult<u64>;

    /// Completed reminders scheduled at or after `since`
    async fn count_completed_since(&self, user_id: Uuid, since: NaiveDateTime) -> AppResult<u64>;
}

pub struct ReminderStore {
    db: DatabaseConnection,
}

impl ReminderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active(reminder: Reminder) -> ActiveModel {
    ActiveModel {
        id: Set(reminder.id),
        user_id: Set(reminder.user_id),
        medication_id: Set(reminder.medication_id),
        reminder_time: Set(reminder.reminder_time),
        notes: Set(reminder.notes),
        completed: Set(reminder.completed),
        completed_at: Set(reminder.completed_at),
        created_at: Set(reminder.created_at),
        updated_at: Set(reminder.updated_at),
    }
}

#[async_trait]
impl ReminderRepository for ReminderStore {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Reminder>> {
        let models = ReminderEntity::find()
            .filter(reminder::Column::UserId.eq(user_id))
            .order_by_asc(reminder::Column::ReminderTime)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Reminder::from).collect())
    }

    async fn list_pending_by_user(
        &self,
        user_id: Uuid,
        window: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> AppResult<Vec<Reminder>> {
        let mut query = ReminderEntity::find()
            .filter(reminder::Column::UserId.eq(user_id))
            .filter(reminder::Column::Completed.eq(false));
        if let Some((start, end)) = window {
            query = query.filter(reminder::Column::ReminderTime.between(start, end));
        }
        let models = query
            .order_by_asc(reminder::Column::ReminderTime)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Reminder::from).collect())
    }

    async fn list_since(&self, user_id: Uuid, since: NaiveDateTime) -> AppResult<Vec<Reminder>> {
        let models = ReminderEntity::find()
            .filter(reminder::Column::UserId.eq(user_id))
            .filter(reminder::Column::ReminderTime.gte(since))
            .order_by_asc(reminder::Column::ReminderTime)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Reminder::from).collect())
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Reminder>> {
        let result = ReminderEntity::find_by_id(id)
            .filter(reminder::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Reminder::from))
    }

    async fn insert(&self, reminder: Reminder) -> AppResult<Reminder> {
        let model = to_active(reminder).insert(&self.db).await?;
        Ok(Reminder::from(model))
    }

    async fn save(&self, reminder: Reminder) -> AppResult<Reminder> {
        let mut active = to_active(reminder);
        // Ownership and creation time never change
        active.user_id = sea_orm::ActiveValue::NotSet;
        active.created_at = sea_orm::ActiveValue::NotSet;
        let model = active.update(&self.db).await?;
        Ok(Reminder::from(model))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = ReminderEntity::delete_many()
            .filter(reminder::Column::Id.eq(id))
            .filter(reminder::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_pending(&self, user_id: Uuid) -> AppResult<u64> {
        let count = ReminderEntity::find()
            .filter(reminder::Column::UserId.eq(user_id))
            .filter(reminder::Column::Completed.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_completed_since(&self, user_id: Uuid, since: NaiveDateTime) -> AppResult<u64> {
        let count = ReminderEntity::find()
            .filter(reminder::Column::UserId.eq(user_id))
            .filter(reminder::Column::Completed.eq(true))
            .filter(reminder::Column::ReminderTime.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
