//! Analytics service - patient adherence figures and pharmacy sales totals.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DASHBOARD_WINDOW_DAYS, DEFAULT_ADHERENCE_DAYS, MAX_ADHERENCE_DAYS};
use crate::domain::{
    AdherenceBreakdown, MedicationBreakdown, Principal, Reminder, SalesPeriod, SalesSummary,
    UserDashboard,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Counts plus the adherence rate over the last 7 days
    async fn user_dashboard(&self, principal: &Principal) -> AppResult<UserDashboard>;

    /// Adherence by weekday and time of day over the last `days` (1..=365, default 7)
    async fn adherence(&self, principal: &Principal, days: Option<i64>)
        -> AppResult<AdherenceBreakdown>;

    /// Active and inactive medication counts
    async fn medications(&self, principal: &Principal) -> AppResult<MedicationBreakdown>;

    /// Sum of bill totals for the period; unknown periods fall back to `week`
    async fn sales_summary(&self, pharmacy_id: Uuid, period: Option<String>)
        -> AppResult<SalesSummary>;
}

pub struct AnalyticsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AnalyticsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reminders scheduled in `[now - days, now]`
    async fn reminders_in_last(&self, user_id: Uuid, days: i64) -> AppResult<Vec<Reminder>> {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let reminders = self
            .uow
            .reminders()
            .list_since(user_id, now - Duration::days(days))
            .await?;
        Ok(reminders
            .into_iter()
            .filter(|r| r.reminder_time <= now)
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> AnalyticsService for AnalyticsManager<U> {
    async fn user_dashboard(&self, principal: &Principal) -> AppResult<UserDashboard> {
        let active = self
            .uow
            .medications()
            .count_by_status(principal.id, true)
            .await?;
        let pending = self.uow.reminders().count_pending(principal.id).await?;
        let window = self
            .reminders_in_last(principal.id, DASHBOARD_WINDOW_DAYS)
            .await?;

        Ok(UserDashboard::build(active, pending, &window))
    }

    async fn adherence(
        &self,
        principal: &Principal,
        days: Option<i64>,
    ) -> AppResult<AdherenceBreakdown> {
        let days = days.unwrap_or(DEFAULT_ADHERENCE_DAYS);
        if !(1..=MAX_ADHERENCE_DAYS).contains(&days) {
            return Err(AppError::bad_request(format!(
                "days must be between 1 and {}",
                MAX_ADHERENCE_DAYS
            )));
        }

        let reminders = self.reminders_in_last(principal.id, days).await?;
        Ok(AdherenceBreakdown::build(days as u32, &reminders))
    }

    async fn medications(&self, principal: &Principal) -> AppResult<MedicationBreakdown> {
        let medications = self.uow.medications();
        let active = medications.count_by_status(principal.id, true).await?;
        let inactive = medications.count_by_status(principal.id, false).await?;
        Ok(MedicationBreakdown::new(active, inactive))
    }

    async fn sales_summary(
        &self,
        pharmacy_id: Uuid,
        period: Option<String>,
    ) -> AppResult<SalesSummary> {
        let period = SalesPeriod::parse_or_default(period.as_deref());
        let (start, end) = period.range(Utc::now());

        let total_amount = self
            .uow
            .bills()
            .total_between(pharmacy_id, start, end)
            .await?;
        tracing::debug!(pharmacy_id = %pharmacy_id, period = period.as_str(), total_amount, "Sales summary");

        Ok(SalesSummary {
            total_amount,
            period: period.as_str().to_string(),
        })
    }
}
