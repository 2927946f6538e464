//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub enabled: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine the row with its role rows. Unknown role names are skipped.
    pub fn into_domain(self, roles: Vec<super::user_role::Model>) -> User {
        let roles = roles
            .into_iter()
            .filter_map(|r| match r.role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    tracing::warn!(user_id = %self.id, role = %r.role, "Ignoring unknown role");
                    None
                }
            })
            .collect();

        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            image_url: self.image_url,
            enabled: self.enabled,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
