//! Pharmacy membership and administration predicates.
//!
//! Both predicates fail closed: a missing pharmacy, a missing user or a
//! repository error all answer `false`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Pharmacy, Principal};
use crate::errors::AppResult;
use crate::infra::{PharmacyRepository, StaffRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OwnershipPredicates: Send + Sync {
    /// Owner, or holder of an active staff row (any role)
    async fn is_pharmacy_member(&self, pharmacy_id: Uuid, principal: &Principal) -> bool;

    /// Owner, or holder of an active ADMIN staff row
    async fn is_pharmacy_admin(&self, pharmacy_id: Uuid, principal: &Principal) -> bool;
}

/// Repository-backed predicates
pub struct PharmacyAccess {
    pharmacies: Arc<dyn PharmacyRepository>,
    users: Arc<dyn UserRepository>,
    staff: Arc<dyn StaffRepository>,
}

#[derive(Clone, Copy)]
enum Level {
    Member,
    Admin,
}

impl PharmacyAccess {
    pub fn new(
        pharmacies: Arc<dyn PharmacyRepository>,
        users: Arc<dyn UserRepository>,
        staff: Arc<dyn StaffRepository>,
    ) -> Self {
        Self {
            pharmacies,
            users,
            staff,
        }
    }

    async fn resolve(&self, pharmacy_id: Uuid, principal: &Principal) -> AppResult<Option<Pharmacy>> {
        let Some(pharmacy) = self.pharmacies.find_by_id(pharmacy_id).await? else {
            return Ok(None);
        };
        if self.users.find_by_id(principal.id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(pharmacy))
    }

    async fn check(&self, pharmacy_id: Uuid, principal: &Principal, level: Level) -> AppResult<bool> {
        let Some(pharmacy) = self.resolve(pharmacy_id, principal).await? else {
            return Ok(false);
        };
        if pharmacy.is_owned_by(principal.id) {
            return Ok(true);
        }

        let row = self
            .staff
            .find_by_pharmacy_and_user(pharmacy_id, principal.id)
            .await?;
        Ok(match (row, level) {
            (Some(row), Level::Member) => row.grants_membership(principal.id),
            (Some(row), Level::Admin) => row.grants_admin(principal.id),
            (None, _) => false,
        })
    }

    async fn fail_closed(&self, pharmacy_id: Uuid, principal: &Principal, level: Level) -> bool {
        match self.check(pharmacy_id, principal, level).await {
            Ok(allowed) => allowed,
            Err(e) => {
                tracing::warn!(
                    pharmacy_id = %pharmacy_id,
                    user_id = %principal.id,
                    error = %e,
                    "Ownership lookup failed, denying"
                );
                false
            }
        }
    }
}

#[async_trait]
impl OwnershipPredicates for PharmacyAccess {
    async fn is_pharmacy_member(&self, pharmacy_id: Uuid, principal: &Principal) -> bool {
        self.fail_closed(pharmacy_id, principal, Level::Member).await
    }

    async fn is_pharmacy_admin(&self, pharmacy_id: Uuid, principal: &Principal) -> bool {
        self.fail_closed(pharmacy_id, principal, Level::Admin).await
    }
}
