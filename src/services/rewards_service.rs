//! Rewards service - points, streak and achievements from reminder history.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{REWARDS_WINDOW_DAYS, STREAK_LOOKBACK_DAYS};
use crate::domain::rewards::{achievements, current_streak};
use crate::domain::{Achievement, DonationStatus, Principal, RewardsDashboard};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait RewardsService: Send + Sync {
    async fn dashboard(&self, principal: &Principal) -> AppResult<RewardsDashboard>;

    async fn achievements(&self, principal: &Principal) -> AppResult<Vec<Achievement>>;
}

pub struct RewardsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RewardsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn streak(&self, user_id: Uuid) -> AppResult<u64> {
        let now = Utc::now().naive_utc();
        let history = self
            .uow
            .reminders()
            .list_since(user_id, now - Duration::days(STREAK_LOOKBACK_DAYS))
            .await?;
        Ok(current_streak(&history, now.date()))
    }
}

#[async_trait]
impl<U: UnitOfWork> RewardsService for RewardsManager<U> {
    async fn dashboard(&self, principal: &Principal) -> AppResult<RewardsDashboard> {
        let since = Utc::now().naive_utc() - Duration::days(REWARDS_WINDOW_DAYS);
        let completed = self
            .uow
            .reminders()
            .count_completed_since(principal.id, since)
            .await?;
        let streak = self.streak(principal.id).await?;

        Ok(RewardsDashboard::build(completed, streak))
    }

    async fn achievements(&self, principal: &Principal) -> AppResult<Vec<Achievement>> {
        let streak = self.streak(principal.id).await?;
        let donations = self
            .uow
            .donations()
            .count_by_status(principal.id, DonationStatus::Completed)
            .await?;

        Ok(achievements(streak, donations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, Reminder, Role};
    use crate::services::testing::{fixtures, TestUnitOfWork};

    /// One completed reminder per day for the `days` days before today
    fn perfect_days(days: i64) -> Vec<Reminder> {
        let today = Utc::now().date_naive();
        (1..=days)
            .map(|n| {
                let at = (today - Duration::days(n)).and_hms_opt(9, 0, 0).unwrap();
                let mut r = fixtures::reminder(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), at);
                r.complete(Utc::now());
                r
            })
            .collect()
    }

    #[tokio::test]
    async fn test_dashboard_combines_points_and_streak() {
        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_count_completed_since()
            .returning(|_, _| Ok(20));
        uow.reminders
            .expect_list_since()
            .returning(|_, _| Ok(perfect_days(3)));
        let service = RewardsManager::new(uow.build());

        let dashboard = service
            .dashboard(&fixtures::principal(Uuid::new_v4(), &[Role::User]))
            .await
            .unwrap();
        assert_eq!(dashboard.current_streak, 3);
        // 20 * 10 + 3 * 5
        assert_eq!(dashboard.total_points, 215);
        assert_eq!(dashboard.level, Level::Silver);
    }

    #[tokio::test]
    async fn test_achievements_use_completed_donations() {
        let mut uow = TestUnitOfWork::default();
        uow.reminders
            .expect_list_since()
            .returning(|_, _| Ok(perfect_days(9)));
        uow.donations
            .expect_count_by_status()
            .withf(|_, status| *status == DonationStatus::Completed)
            .returning(|_, _| Ok(1));
        let service = RewardsManager::new(uow.build());

        let list = service
            .achievements(&fixtures::principal(Uuid::new_v4(), &[Role::User]))
            .await
            .unwrap();
        assert_eq!(list[0].progress, 7);
        assert_eq!(list[1].progress, 1);
    }
}
