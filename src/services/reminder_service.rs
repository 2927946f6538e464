//! Reminder service.
//!
//! A reminder may only point at one of its owner's medications, on create
//! and on every re-point.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    CreateReminder, Medication, Principal, Reminder, ReminderResponse, ReminderWindow,
    UpdateReminder,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ReminderService: Send + Sync {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<ReminderResponse>>;

    /// Open reminders, restricted to the window when both ends are given
    async fn pending(
        &self,
        principal: &Principal,
        window: ReminderWindow,
    ) -> AppResult<Vec<ReminderResponse>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<ReminderResponse>;

    async fn create(&self, principal: &Principal, input: CreateReminder)
        -> AppResult<ReminderResponse>;

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateReminder,
    ) -> AppResult<ReminderResponse>;

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;

    /// Mark completed. Completing twice keeps the first timestamp.
    async fn complete(&self, principal: &Principal, id: Uuid) -> AppResult<ReminderResponse>;
}

pub struct ReminderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReminderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_medication(&self, principal: &Principal, id: Uuid) -> AppResult<Medication> {
        self.uow
            .medications()
            .find_by_id_and_user(id, principal.id)
            .await?
            .ok_or_not_found("Medication")
    }

    async fn owned_reminder(&self, principal: &Principal, id: Uuid) -> AppResult<Reminder> {
        self.uow
            .reminders()
            .find_by_id_and_user(id, principal.id)
            .await?
            .ok_or_not_found("Reminder")
    }

    async fn respond(&self, principal: &Principal, reminder: Reminder) -> AppResult<ReminderResponse> {
        let medication = self
            .uow
            .medications()
            .find_by_id_and_user(reminder.medication_id, principal.id)
            .await?;
        Ok(ReminderResponse::new(reminder, medication.as_ref()))
    }

    /// Attach medication details using one medication query for the batch
    async fn respond_all(
        &self,
        principal: &Principal,
        reminders: Vec<Reminder>,
    ) -> AppResult<Vec<ReminderResponse>> {
        let medications: HashMap<Uuid, Medication> = self
            .uow
            .medications()
            .list_by_user(principal.id)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(reminders
            .into_iter()
            .map(|r| {
                let medication = medications.get(&r.medication_id);
                ReminderResponse::new(r, medication)
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> ReminderService for ReminderManager<U> {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<ReminderResponse>> {
        let reminders = self.uow.reminders().list_by_user(principal.id).await?;
        self.respond_all(principal, reminders).await
    }

    async fn pending(
        &self,
        principal: &Principal,
        window: ReminderWindow,
    ) -> AppResult<Vec<ReminderResponse>> {
        let reminders = self
            .uow
            .reminders()
            .list_pending_by_user(principal.id, window.bounds())
            .await?;
        self.respond_all(principal, reminders).await
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<ReminderResponse> {
        let reminder = self.owned_reminder(principal, id).await?;
        self.respond(principal, reminder).await
    }

    async fn create(
        &self,
        principal: &Principal,
        input: CreateReminder,
    ) -> AppResult<ReminderResponse> {
        let medication = self.owned_medication(principal, input.medication_id).await?;

        let now = Utc::now();
        let mut reminder = Reminder {
            id: Uuid::new_v4(),
            user_id: principal.id,
            medication_id: medication.id,
            reminder_time: input.reminder_time,
            notes: input.notes,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        reminder.set_completed(input.completed, now);

        let reminder = self.uow.reminders().insert(reminder).await?;
        Ok(ReminderResponse::new(reminder, Some(&medication)))
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateReminder,
    ) -> AppResult<ReminderResponse> {
        let mut reminder = self.owned_reminder(principal, id).await?;

        let target = input.medication_id.unwrap_or(reminder.medication_id);
        let medication = self.owned_medication(principal, target).await?;

        let now = Utc::now();
        reminder.medication_id = medication.id;
        reminder.reminder_time = input.reminder_time;
        reminder.notes = input.notes;
        reminder.set_completed(input.completed, now);
        reminder.updated_at = now;

        let reminder = self.uow.reminders().save(reminder).await?;
        Ok(ReminderResponse::new(reminder, Some(&medication)))
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        if self.uow.reminders().delete(id, principal.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Reminder"))
        }
    }

    async fn complete(&self, principal: &Principal, id: Uuid) -> AppResult<ReminderResponse> {
        let mut reminder = self.owned_reminder(principal, id).await?;
        if !reminder.completed {
            let now = Utc::now();
            reminder.complete(now);
            reminder.updated_at = now;
            reminder = self.uow.reminders().save(reminder).await?;
        }
        self.respond(principal, reminder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::services::testing::{fixtures, TestUnitOfWork};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_with_foreign_medication_is_not_found() {
        let mut uow = TestUnitOfWork::default();
        uow.medications
            .expect_find_by_id_and_user()
            .returning(|_, _| Ok(None));
        uow.reminders.expect_insert().never();
        let service = ReminderManager::new(uow.build());

        let err = service
            .create(
                &fixtures::principal(Uuid::new_v4(), &[Role::User]),
                CreateReminder {
                    medication_id: Uuid::new_v4(),
                    reminder_time: at(8),
                    notes: None,
                    completed: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Medication"));
    }

    #[tokio::test]
    async fn test_create_completed_sets_timestamp() {
        let caller = Uuid::new_v4();
        let med = fixtures::medication(Uuid::new_v4(), caller);
        let med_id = med.id;

        let mut uow = TestUnitOfWork::default();
        uow.medications
            .expect_find_by_id_and_user()
            .returning(move |_, _| Ok(Some(med.clone())));
        uow.reminders
            .expect_insert()
            .withf(move |r| r.user_id == caller && r.completed && r.completed_at.is_some())
            .returning(Ok);
        let service = ReminderManager::new(uow.build());

        let response = service
            .create(
                &fixtures::principal(caller, &[Role::User]),
                CreateReminder {
                    medication_id: med_id,
                    reminder_time: at(8),
                    notes: Some("with food".into()),
                    completed: true,
                },
            )
            .await
            .unwrap();
        assert!(response.completed);
        assert_eq!(response.medication_name.as_deref(), Some("Metformin"));
    }

    #[tokio::test]
    async fn test_update_cannot_repoint_to_foreign_medication() {
        let caller = Uuid::new_v4();
        let own_med = Uuid::new_v4();
        let reminder = fixtures::reminder(Uuid::new_v4(), caller, own_med, at(8));
        let reminder_id = reminder.id;

        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_find_by_id_and_user()
            .returning(move |_, _| Ok(Some(reminder.clone())));
        uow.medications
            .expect_find_by_id_and_user()
            .returning(move |id, user_id| {
                Ok((id == own_med).then(|| fixtures::medication(id, user_id)))
            });
        uow.reminders.expect_save().never();
        let service = ReminderManager::new(uow.build());

        let err = service
            .update(
                &fixtures::principal(caller, &[Role::User]),
                reminder_id,
                UpdateReminder {
                    medication_id: Some(Uuid::new_v4()),
                    reminder_time: at(9),
                    notes: None,
                    completed: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Medication"));
    }

    #[tokio::test]
    async fn test_update_uncompleting_clears_timestamp() {
        let caller = Uuid::new_v4();
        let med_id = Uuid::new_v4();
        let mut reminder = fixtures::reminder(Uuid::new_v4(), caller, med_id, at(8));
        reminder.complete(Utc::now() - Duration::hours(1));
        let reminder_id = reminder.id;

        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_find_by_id_and_user()
            .returning(move |_, _| Ok(Some(reminder.clone())));
        uow.medications
            .expect_find_by_id_and_user()
            .returning(|id, user_id| Ok(Some(fixtures::medication(id, user_id))));
        uow.reminders
            .expect_save()
            .withf(|r| !r.completed && r.completed_at.is_none())
            .returning(Ok);
        let service = ReminderManager::new(uow.build());

        let response = service
            .update(
                &fixtures::principal(caller, &[Role::User]),
                reminder_id,
                UpdateReminder {
                    medication_id: None,
                    reminder_time: at(20),
                    notes: None,
                    completed: false,
                },
            )
            .await
            .unwrap();
        assert!(response.completed_at.is_none());
        assert_eq!(response.reminder_time, at(20));
    }

    #[tokio::test]
    async fn test_complete_twice_keeps_first_timestamp() {
        let caller = Uuid::new_v4();
        let mut reminder = fixtures::reminder(Uuid::new_v4(), caller, Uuid::new_v4(), at(8));
        let first = Utc::now() - Duration::hours(3);
        reminder.complete(first);
        let reminder_id = reminder.id;

        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_find_by_id_and_user()
            .returning(move |_, _| Ok(Some(reminder.clone())));
        uow.reminders.expect_save().never();
        uow.medications
            .expect_find_by_id_and_user()
            .returning(|_, _| Ok(None));
        let service = ReminderManager::new(uow.build());

        let response = service
            .complete(&fixtures::principal(caller, &[Role::User]), reminder_id)
            .await
            .unwrap();
        assert_eq!(response.completed_at, Some(first));
    }

    #[tokio::test]
    async fn test_pending_passes_window_only_when_complete() {
        let caller = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_list_pending_by_user()
            .withf(|_, window| window.is_none())
            .returning(|_, _| Ok(vec![]));
        uow.medications.expect_list_by_user().returning(|_| Ok(vec![]));
        let service = ReminderManager::new(uow.build());

        let half_open = ReminderWindow {
            start: Some(at(6)),
            end: None,
        };
        let pending = service
            .pending(&fixtures::principal(caller, &[Role::User]), half_open)
            .await
            .unwrap();
        assert!(pending.is_empty());
    }
}
