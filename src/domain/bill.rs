//! Pharmacy sales records and the activity feed derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    #[schema(example = "INV-2024-0042")]
    pub bill_number: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    #[validate(length(min = 1, message = "Bill number is required"))]
    pub bill_number: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(range(min = 0.0, message = "Total amount cannot be negative"))]
    pub total_amount: f64,
}

/// One entry of a pharmacy's recent activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[schema(example = "bill-6f1c...")]
    pub id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    #[schema(example = "BILL_CREATED")]
    pub kind: String,
}

impl From<&Bill> for ActivityItem {
    fn from(bill: &Bill) -> Self {
        Self {
            id: format!("bill-{}", bill.id),
            description: format!(
                "Bill #{} created for {}",
                bill.bill_number, bill.customer_name
            ),
            timestamp: bill.created_at,
            kind: "BILL_CREATED".to_string(),
        }
    }
}

/// Newest first, truncated to `limit`.
pub fn activity_feed(bills: &[Bill], limit: usize) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = bills.iter().map(ActivityItem::from).collect();
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(limit);
    items
}
