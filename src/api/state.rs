//! Application state - Dependency injection container.
//!
//! Handlers and middleware only see trait objects, so tests can swap in
//! fakes for any service, the rate limiter or the health probes.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, HealthCheck, RateLimiter};
use crate::policy::OwnershipPredicates;
use crate::services::{
    AnalyticsService, AuthService, DonationService, MedicationService, PharmacyService,
    ReminderService, RewardsService, ServiceContainer, Services, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub pharmacy_service: Arc<dyn PharmacyService>,
    pub medication_service: Arc<dyn MedicationService>,
    pub reminder_service: Arc<dyn ReminderService>,
    pub donation_service: Arc<dyn DonationService>,
    pub analytics_service: Arc<dyn AnalyticsService>,
    pub rewards_service: Arc<dyn RewardsService>,
    /// Pharmacy scope checks for the authorization middleware
    pub ownership: Arc<dyn OwnershipPredicates>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Wire the production state from live connections.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let container = Services::from_connection(database.connection(), config);
        let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
            database as Arc<dyn HealthCheck>,
            cache.clone() as Arc<dyn HealthCheck>,
        ];
        Self::from_container(&container, cache, health_checks)
    }

    /// Build state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        rate_limiter: Arc<dyn RateLimiter>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            pharmacy_service: container.pharmacies(),
            medication_service: container.medications(),
            reminder_service: container.reminders(),
            donation_service: container.donations(),
            analytics_service: container.analytics(),
            rewards_service: container.rewards(),
            ownership: container.ownership(),
            rate_limiter,
            health_checks,
        }
    }
}
