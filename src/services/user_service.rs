//! User service - the caller's own account.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Principal, ProfileUpdate, User};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Account behind the principal
    async fn me(&self, principal: &Principal) -> AppResult<User>;

    /// Change first and/or last name of the caller
    async fn update_profile(&self, principal: &Principal, update: ProfileUpdate) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn me(&self, principal: &Principal) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(principal.id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(&self, principal: &Principal, update: ProfileUpdate) -> AppResult<User> {
        if update.first_name.is_none() && update.last_name.is_none() {
            return self.me(principal).await;
        }
        let user = self.uow.users().update_profile(principal.id, update).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::errors::AppError;
    use crate::services::testing::{fixtures, TestUnitOfWork};
    use mockall::predicate::eq;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_me_for_deleted_account_is_not_found() {
        let id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.users.expect_find_by_id().with(eq(id)).returning(|_| Ok(None));
        let service = UserManager::new(uow.build());

        let err = service.me(&fixtures::principal(id, &[Role::User])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_profile_targets_the_caller() {
        let id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.users
            .expect_update_profile()
            .withf(move |uid, update| *uid == id && update.first_name.as_deref() == Some("Janet"))
            .returning(|uid, update| {
                let mut user = fixtures::user(uid, &[Role::User]);
                user.first_name = update.first_name.unwrap_or_default();
                Ok(user)
            });
        let service = UserManager::new(uow.build());

        let user = service
            .update_profile(
                &fixtures::principal(id, &[Role::User]),
                ProfileUpdate {
                    first_name: Some("Janet".into()),
                    last_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(user.first_name, "Janet");
    }
}
