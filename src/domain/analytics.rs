//! Adherence and sales arithmetic behind the analytics endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reminder;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Part of the day a reminder falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// MORNING [05,12), AFTERNOON [12,17), EVENING [17,21), NIGHT otherwise
    pub fn of(time: NaiveDateTime) -> Self {
        match time.hour() {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "MORNING",
            TimeOfDay::Afternoon => "AFTERNOON",
            TimeOfDay::Evening => "EVENING",
            TimeOfDay::Night => "NIGHT",
        }
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// `completed / total * 100`, rounded to one decimal. Zero when `total` is zero.
pub fn adherence_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[derive(Default, Clone, Copy)]
struct Tally {
    completed: u64,
    total: u64,
}

impl Tally {
    fn add(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }

    fn rate(&self) -> f64 {
        adherence_rate(self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub active_medications_count: u64,
    pub pending_reminders_count: u64,
    pub adherence_rate: f64,
    pub missed_reminders_count: u64,
}

impl UserDashboard {
    /// `window` holds the reminders scheduled inside the dashboard window.
    pub fn build(active_medications: u64, pending_reminders: u64, window: &[Reminder]) -> Self {
        let mut tally = Tally::default();
        for reminder in window {
            tally.add(reminder.completed);
        }
        Self {
            active_medications_count: active_medications,
            pending_reminders_count: pending_reminders,
            adherence_rate: tally.rate(),
            missed_reminders_count: tally.total - tally.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceBreakdown {
    pub days: u32,
    pub adherence_by_day_of_week: BTreeMap<String, f64>,
    pub adherence_by_time_of_day: BTreeMap<String, f64>,
}

impl AdherenceBreakdown {
    /// Buckets every reminder by weekday and time of day of its `reminder_time`.
    pub fn build(days: u32, reminders: &[Reminder]) -> Self {
        let mut by_day = [Tally::default(); 7];
        let mut by_time = [Tally::default(); 4];

        for reminder in reminders {
            let day = reminder.reminder_time.weekday().num_days_from_monday() as usize;
            by_day[day].add(reminder.completed);
            let slot = TimeOfDay::of(reminder.reminder_time) as usize;
            by_time[slot].add(reminder.completed);
        }

        Self {
            days,
            adherence_by_day_of_week: WEEKDAYS
                .iter()
                .zip(by_day.iter())
                .map(|(day, tally)| (weekday_name(*day).to_string(), tally.rate()))
                .collect(),
            adherence_by_time_of_day: TimeOfDay::ALL
                .iter()
                .zip(by_time.iter())
                .map(|(slot, tally)| (slot.as_str().to_string(), tally.rate()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationBreakdown {
    /// Keys are `ACTIVE` and `INACTIVE`
    pub medications_by_status: BTreeMap<String, u64>,
}

impl MedicationBreakdown {
    pub fn new(active: u64, inactive: u64) -> Self {
        let mut medications_by_status = BTreeMap::new();
        medications_by_status.insert("ACTIVE".to_string(), active);
        medications_by_status.insert("INACTIVE".to_string(), inactive);
        Self {
            medications_by_status,
        }
    }
}

/// Reporting window for sales totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl SalesPeriod {
    /// Unknown values fall back to `Week`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return SalesPeriod::Week;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "today" => SalesPeriod::Today,
            "week" => SalesPeriod::Week,
            "month" => SalesPeriod::Month,
            "year" => SalesPeriod::Year,
            other => {
                tracing::warn!(period = %other, "Invalid sales period, defaulting to week");
                SalesPeriod::Week
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalesPeriod::Today => "today",
            SalesPeriod::Week => "week",
            SalesPeriod::Month => "month",
            SalesPeriod::Year => "year",
        }
    }

    /// Inclusive start, exclusive end.
    ///
    /// `today` spans the whole calendar day; the others run from the start of
    /// the current week (Monday), month or year up to `now`.
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let start_date = match self {
            SalesPeriod::Today => today,
            SalesPeriod::Week => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            SalesPeriod::Month => today.with_day(1).unwrap_or(today),
            SalesPeriod::Year => today.with_ordinal(1).unwrap_or(today),
        };
        let start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
        let end = match self {
            SalesPeriod::Today => start + Duration::days(1),
            _ => now,
        };
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_amount: f64,
    #[schema(example = "week")]
    pub period: String,
}
