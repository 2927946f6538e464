//! Route access table.
//!
//! Every protected route is listed here with its [`AccessRule`]. A route
//! missing from the table is denied.
//!
//! Evaluation order: bypass roles, then coarse roles (403 on failure), then
//! the pharmacy scope (404 on failure, so pharmacies cannot be probed).

use uuid::Uuid;

use super::OwnershipPredicates;
use crate::domain::{Principal, Role};
use crate::errors::{AppError, AppResult};

/// Pharmacy-level check applied after the role checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Open,
    PharmacyMember,
    PharmacyAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    /// Holding any of these grants access outright
    pub bypass: &'static [Role],
    /// Principal must hold one of these; empty means any authenticated caller
    pub roles: &'static [Role],
    pub scope: Scope,
}

const ANY: &[Role] = &[];
const ADMIN: &[Role] = &[Role::Admin];
const PHARMACY: &[Role] = &[Role::Pharmacy];

const AUTHENTICATED: AccessRule = AccessRule {
    bypass: ANY,
    roles: ANY,
    scope: Scope::Open,
};

const ADMIN_ONLY: AccessRule = AccessRule {
    bypass: ANY,
    roles: ADMIN,
    scope: Scope::Open,
};

const PHARMACY_ROLE: AccessRule = AccessRule {
    bypass: ANY,
    roles: PHARMACY,
    scope: Scope::Open,
};

const MEMBER: AccessRule = AccessRule {
    bypass: ADMIN,
    roles: ANY,
    scope: Scope::PharmacyMember,
};

const PHARMACY_ADMIN: AccessRule = AccessRule {
    bypass: ADMIN,
    roles: ANY,
    scope: Scope::PharmacyAdmin,
};

const STAFF_MEMBER: AccessRule = AccessRule {
    bypass: ADMIN,
    roles: PHARMACY,
    scope: Scope::PharmacyMember,
};

const STAFF_ADMIN: AccessRule = AccessRule {
    bypass: ADMIN,
    roles: PHARMACY,
    scope: Scope::PharmacyAdmin,
};

/// `(method, matched path, rule)`
static ROUTES: &[(&str, &str, AccessRule)] = &[
    // auth
    ("GET", "/auth/validate", AUTHENTICATED),
    // users
    ("GET", "/api/users/me", AUTHENTICATED),
    ("GET", "/api/users/profile", AUTHENTICATED),
    ("PUT", "/api/users/profile", AUTHENTICATED),
    // medications
    ("GET", "/api/medications", AUTHENTICATED),
    ("POST", "/api/medications", AUTHENTICATED),
    ("GET", "/api/medications/active", AUTHENTICATED),
    ("GET", "/api/medications/:id", AUTHENTICATED),
    ("PUT", "/api/medications/:id", AUTHENTICATED),
    ("DELETE", "/api/medications/:id", AUTHENTICATED),
    // reminders
    ("GET", "/reminders", AUTHENTICATED),
    ("POST", "/reminders", AUTHENTICATED),
    ("GET", "/reminders/pending", AUTHENTICATED),
    ("GET", "/reminders/:id", AUTHENTICATED),
    ("PUT", "/reminders/:id", AUTHENTICATED),
    ("DELETE", "/reminders/:id", AUTHENTICATED),
    ("POST", "/reminders/:id/complete", AUTHENTICATED),
    // donations
    ("GET", "/donations", AUTHENTICATED),
    ("POST", "/donations", AUTHENTICATED),
    ("GET", "/donations/pending", AUTHENTICATED),
    ("GET", "/donations/:id", AUTHENTICATED),
    ("PUT", "/donations/:id", AUTHENTICATED),
    ("DELETE", "/donations/:id", AUTHENTICATED),
    ("PUT", "/donations/:id/status", AUTHENTICATED),
    // pharmacies
    ("GET", "/api/pharmacies", ADMIN_ONLY),
    ("POST", "/api/pharmacies", ADMIN_ONLY),
    ("GET", "/api/pharmacies/mine", PHARMACY_ROLE),
    ("GET", "/api/pharmacies/:id", MEMBER),
    ("PUT", "/api/pharmacies/:id", PHARMACY_ADMIN),
    ("DELETE", "/api/pharmacies/:id", PHARMACY_ADMIN),
    ("GET", "/api/pharmacies/:id/activity", STAFF_MEMBER),
    ("GET", "/api/pharmacies/:id/staff", STAFF_MEMBER),
    ("POST", "/api/pharmacies/:id/staff", STAFF_ADMIN),
    ("PUT", "/api/pharmacies/:id/staff/:staff_id", STAFF_ADMIN),
    ("GET", "/api/pharmacies/:id/bills", STAFF_MEMBER),
    ("POST", "/api/pharmacies/:id/bills", STAFF_MEMBER),
    // analytics
    ("GET", "/api/analytics/dashboard", AUTHENTICATED),
    ("GET", "/api/analytics/user/dashboard", AUTHENTICATED),
    ("GET", "/api/analytics/user/adherence", AUTHENTICATED),
    ("GET", "/api/analytics/user/medications", AUTHENTICATED),
    ("GET", "/api/analytics/sales/summary", STAFF_MEMBER),
    // rewards
    ("GET", "/api/rewards/dashboard", AUTHENTICATED),
    ("GET", "/api/rewards/achievements", AUTHENTICATED),
];

/// Rule for a `(method, matched path)` pair, if one is registered
pub fn rule_for(method: &str, path: &str) -> Option<&'static AccessRule> {
    ROUTES
        .iter()
        .find(|(m, p, _)| m.eq_ignore_ascii_case(method) && *p == path)
        .map(|(_, _, rule)| rule)
}

/// Apply `rule` to `principal`.
///
/// `pharmacy_id` is only consulted for scoped rules; `None` there means the
/// request named no usable pharmacy and yields NOT_FOUND.
pub async fn evaluate(
    rule: &AccessRule,
    principal: &Principal,
    pharmacy_id: Option<Uuid>,
    predicates: &dyn OwnershipPredicates,
) -> AppResult<()> {
    if principal.has_any(rule.bypass) {
        return Ok(());
    }

    if !rule.roles.is_empty() && !principal.has_any(rule.roles) {
        tracing::debug!(user_id = %principal.id, required = ?rule.roles, "Role check failed");
        return Err(AppError::Forbidden);
    }

    let allowed = match (rule.scope, pharmacy_id) {
        (Scope::Open, _) => true,
        (_, None) => false,
        (Scope::PharmacyMember, Some(id)) => predicates.is_pharmacy_member(id, principal).await,
        (Scope::PharmacyAdmin, Some(id)) => predicates.is_pharmacy_admin(id, principal).await,
    };

    if allowed {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %principal.id,
            pharmacy_id = ?pharmacy_id,
            scope = ?rule.scope,
            "Pharmacy scope check failed"
        );
        Err(AppError::not_found("Pharmacy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MockOwnershipPredicates;

    fn principal(roles: &[Role]) -> Principal {
        Principal::new(Uuid::new_v4(), "p@example.com", roles.iter().copied())
    }

    fn predicates(member: bool, admin: bool) -> MockOwnershipPredicates {
        let mut mock = MockOwnershipPredicates::new();
        mock.expect_is_pharmacy_member().returning(move |_, _| member);
        mock.expect_is_pharmacy_admin().returning(move |_, _| admin);
        mock
    }

    #[test]
    fn test_unknown_route_has_no_rule() {
        assert!(rule_for("GET", "/api/secret").is_none());
        assert!(rule_for("PATCH", "/api/pharmacies/:id").is_none());
        assert!(rule_for("get", "/api/pharmacies/:id").is_some());
    }

    #[test]
    fn test_table_matches_documented_rules() {
        let list = rule_for("GET", "/api/pharmacies").unwrap();
        assert_eq!(list.roles, &[Role::Admin]);

        let add_staff = rule_for("POST", "/api/pharmacies/:id/staff").unwrap();
        assert_eq!(add_staff.bypass, &[Role::Admin]);
        assert_eq!(add_staff.roles, &[Role::Pharmacy]);
        assert_eq!(add_staff.scope, Scope::PharmacyAdmin);

        let sales = rule_for("GET", "/api/analytics/sales/summary").unwrap();
        assert_eq!(sales.scope, Scope::PharmacyMember);
    }

    #[tokio::test]
    async fn test_admin_bypasses_scope() {
        let rule = rule_for("DELETE", "/api/pharmacies/:id").unwrap();
        // Predicates would deny, but are never asked
        let mock = MockOwnershipPredicates::new();
        let result = evaluate(rule, &principal(&[Role::Admin]), Some(Uuid::new_v4()), &mock).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_role_check_is_forbidden() {
        let rule = rule_for("GET", "/api/pharmacies/:id/staff").unwrap();
        let mock = MockOwnershipPredicates::new();
        let err = evaluate(rule, &principal(&[Role::User]), Some(Uuid::new_v4()), &mock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_failed_scope_is_not_found() {
        let rule = rule_for("PUT", "/api/pharmacies/:id").unwrap();
        let mock = predicates(true, false);
        let err = evaluate(rule, &principal(&[Role::Pharmacy]), Some(Uuid::new_v4()), &mock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_member_passes_member_scope() {
        let rule = rule_for("GET", "/api/pharmacies/:id/activity").unwrap();
        let mock = predicates(true, false);
        let result = evaluate(rule, &principal(&[Role::Pharmacy]), Some(Uuid::new_v4()), &mock).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_pharmacy_id_is_not_found() {
        let rule = rule_for("GET", "/api/analytics/sales/summary").unwrap();
        let mock = predicates(true, true);
        let err = evaluate(rule, &principal(&[Role::Pharmacy]), None, &mock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_rule_allows_any_principal() {
        let rule = rule_for("GET", "/api/medications/:id").unwrap();
        let mock = MockOwnershipPredicates::new();
        assert!(evaluate(rule, &principal(&[]), None, &mock).await.is_ok());
    }
}
