//! User repository, including the role join table.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::domain::{NewUser, ProfileUpdate, Role, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, roles included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address, roles included
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Change first and/or last name
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn with_roles<C: ConnectionTrait>(conn: &C, model: user::Model) -> AppResult<User> {
    let roles = UserRoleEntity::find()
        .filter(user_role::Column::UserId.eq(model.id))
        .all(conn)
        .await?;
    Ok(model.into_domain(roles))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<User>> {
    match UserEntity::find_by_id(id).one(conn).await? {
        Some(model) => Ok(Some(with_roles(conn, model).await?)),
        None => Ok(None),
    }
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let found = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await?;
    match found {
        Some(model) => Ok(Some(with_roles(conn, model).await?)),
        None => Ok(None),
    }
}

pub(crate) async fn exists_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<bool> {
    let count = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> AppResult<User> {
    let now = chrono::Utc::now();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        image_url: Set(None),
        enabled: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| AppError::from_unique_violation(e, "Email is already in use"))?;

    for role in &new_user.roles {
        grant_role(conn, model.id, *role).await?;
    }

    with_roles(conn, model).await
}

/// Add a role; granting one the user already holds is a no-op.
pub(crate) async fn grant_role<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    role: Role,
) -> AppResult<()> {
    let row = user_role::ActiveModel {
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
    };
    UserRoleEntity::insert(row)
        .on_conflict(
            OnConflict::columns([user_role::Column::UserId, user_role::Column::Role])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        exists_by_email(&self.db, email).await
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = existing.into();
        if let Some(first_name) = update.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(last_name);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        with_roles(&self.db, model).await
    }
}
