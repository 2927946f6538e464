//! Authenticated principal.
//!
//! Resolved once from the bearer token at the request boundary and passed
//! explicitly through handlers and services.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(id: Uuid, email: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            email: email.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True when the principal holds at least one of `roles`.
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.roles.contains(r))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
