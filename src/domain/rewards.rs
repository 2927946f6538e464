//! Gamified rewards: points, streaks, levels and achievements.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    DONATION_HERO_COUNT, LEVEL_GOLD_POINTS, LEVEL_PLATINUM_POINTS, LEVEL_SILVER_POINTS,
    PERFECT_WEEK_DAYS, POINTS_PER_COMPLETED_REMINDER, POINTS_PER_STREAK_DAY,
};

use super::Reminder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Level {
    pub fn for_points(points: u64) -> Self {
        if points >= LEVEL_PLATINUM_POINTS {
            Level::Platinum
        } else if points >= LEVEL_GOLD_POINTS {
            Level::Gold
        } else if points >= LEVEL_SILVER_POINTS {
            Level::Silver
        } else {
            Level::Bronze
        }
    }
}

/// Consecutive perfect days ending today.
///
/// A day is perfect when it has at least one reminder and all of them are
/// completed. An unfinished today does not break the streak; counting then
/// starts from yesterday.
pub fn current_streak(reminders: &[Reminder], today: NaiveDate) -> u64 {
    // day -> all completed so far
    let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for reminder in reminders {
        let day = reminder.reminder_time.date();
        let perfect = days.entry(day).or_insert(true);
        *perfect &= reminder.completed;
    }

    let is_perfect = |day: NaiveDate| days.get(&day).copied().unwrap_or(false);

    let mut day = if is_perfect(today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while is_perfect(day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

pub fn total_points(completed_reminders: u64, streak: u64) -> u64 {
    completed_reminders * POINTS_PER_COMPLETED_REMINDER + streak * POINTS_PER_STREAK_DAY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub points: u64,
    pub available: bool,
}

const CATALOG: [(u32, &str, &str, u64); 3] = [
    (
        1,
        "10% Off Next Prescription",
        "Get 10% off your next prescription refill at participating pharmacies",
        500,
    ),
    (
        2,
        "Free Health Check",
        "Complimentary basic health check at partner clinics",
        1000,
    ),
    (
        3,
        "Premium Membership Month",
        "One month of premium membership features",
        750,
    ),
];

/// Static reward catalog, flagged against the caller's balance.
pub fn reward_catalog(points: u64) -> Vec<RewardItem> {
    CATALOG
        .iter()
        .map(|&(id, name, description, cost)| RewardItem {
            id,
            name: name.to_string(),
            description: description.to_string(),
            points: cost,
            available: points >= cost,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardsDashboard {
    pub total_points: u64,
    pub adherence_points: u64,
    pub current_streak: u64,
    pub level: Level,
    pub available_rewards: Vec<RewardItem>,
}

impl RewardsDashboard {
    pub fn build(completed_reminders: u64, streak: u64) -> Self {
        let total = total_points(completed_reminders, streak);
        Self {
            total_points: total,
            adherence_points: completed_reminders * POINTS_PER_COMPLETED_REMINDER,
            current_streak: streak,
            level: Level::for_points(total),
            available_rewards: reward_catalog(total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub progress: u64,
    pub total: u64,
    pub points: u64,
}

pub fn achievements(streak: u64, completed_donations: u64) -> Vec<Achievement> {
    vec![
        Achievement {
            title: "Perfect Week".to_string(),
            description: "Take all medications on time for a week".to_string(),
            progress: streak.min(PERFECT_WEEK_DAYS),
            total: PERFECT_WEEK_DAYS,
            points: 100,
        },
        Achievement {
            title: "Donation Hero".to_string(),
            description: format!("Donate medicines {} times", DONATION_HERO_COUNT),
            progress: completed_donations.min(DONATION_HERO_COUNT),
            total: DONATION_HERO_COUNT,
            points: 150,
        },
    ]
}
