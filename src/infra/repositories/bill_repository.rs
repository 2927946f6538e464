//! Bill repository: pharmacy sales.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::bill::{self, ActiveModel, Entity as BillEntity};
use crate::domain::{Bill, NewBill};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn create(&self, pharmacy_id: Uuid, created_by: Uuid, bill: NewBill) -> AppResult<Bill>;

    /// Newest first
    async fn list_by_pharmacy(&self, pharmacy_id: Uuid) -> AppResult<Vec<Bill>>;

    /// The `limit` most recent bills, newest first
    async fn latest_by_pharmacy(&self, pharmacy_id: Uuid, limit: u64) -> AppResult<Vec<Bill>>;

    /// Sum of `total_amount` for bills created in `[start, end)`
    async fn total_between(
        &self,
        pharmacy_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<f64>;
}

pub struct BillStore {
    db: DatabaseConnection,
}

impl BillStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(FromQueryResult)]
struct SalesTotal {
    total: Option<f64>,
}

#[async_trait]
impl BillRepository for BillStore {
    async fn create(&self, pharmacy_id: Uuid, created_by: Uuid, bill: NewBill) -> AppResult<Bill> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            pharmacy_id: Set(pharmacy_id),
            bill_number: Set(bill.bill_number),
            customer_name: Set(bill.customer_name),
            total_amount: Set(bill.total_amount),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(Bill::from(model))
    }

    async fn list_by_pharmacy(&self, pharmacy_id: Uuid) -> AppResult<Vec<Bill>> {
        let models = BillEntity::find()
            .filter(bill::Column::PharmacyId.eq(pharmacy_id))
            .order_by_desc(bill::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Bill::from).collect())
    }

    async fn latest_by_pharmacy(&self, pharmacy_id: Uuid, limit: u64) -> AppResult<Vec<Bill>> {
        let models = BillEntity::find()
            .filter(bill::Column::PharmacyId.eq(pharmacy_id))
            .order_by_desc(bill::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Bill::from).collect())
    }

    async fn total_between(
        &self,
        pharmacy_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<f64> {
        let row = BillEntity::find()
            .select_only()
            .column_as(Expr::col(bill::Column::TotalAmount).sum(), "total")
            .filter(bill::Column::PharmacyId.eq(pharmacy_id))
            .filter(bill::Column::CreatedAt.gte(start))
            .filter(bill::Column::CreatedAt.lt(end))
            .into_model::<SalesTotal>()
            .one(&self.db)
            .await?;
        Ok(row.and_then(|r| r.total).unwrap_or(0.0))
    }
}
