//! Pharmacy service - tenants, their staff roster and bills.
//!
//! Access to a pharmacy is decided before these methods run; they only
//! enforce existence and the business rules of each operation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};
use crate::domain::{
    activity_feed, ActivityItem, AddStaff, Bill, CreatePharmacy, NewBill, Pharmacy,
    PharmacyResponse, PharmacyUpdate, Principal, Role, StaffResponse, StaffRole, StaffUpdate,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const REGISTRATION_NUMBER_TAKEN: &str = "Pharmacy registration number already exists";
const ALREADY_STAFF: &str = "User is already a staff member of this pharmacy";

#[async_trait]
pub trait PharmacyService: Send + Sync {
    /// Every pharmacy on the platform
    async fn list_all(&self) -> AppResult<Vec<PharmacyResponse>>;

    /// Pharmacies the caller owns or works at
    async fn mine(&self, principal: &Principal) -> AppResult<Vec<PharmacyResponse>>;

    async fn get(&self, pharmacy_id: Uuid) -> AppResult<PharmacyResponse>;

    /// Create a pharmacy owned by the caller, with the caller as ADMIN staff
    async fn create(&self, principal: &Principal, input: CreatePharmacy)
        -> AppResult<PharmacyResponse>;

    async fn update(&self, pharmacy_id: Uuid, update: PharmacyUpdate)
        -> AppResult<PharmacyResponse>;

    /// Soft delete
    async fn delete(&self, pharmacy_id: Uuid) -> AppResult<()>;

    /// Latest bills as activity items. `limit` defaults to 5 and must be 1..=50.
    async fn activity(&self, pharmacy_id: Uuid, limit: Option<u64>)
        -> AppResult<Vec<ActivityItem>>;

    async fn list_staff(&self, pharmacy_id: Uuid) -> AppResult<Vec<StaffResponse>>;

    /// Add an existing account to the roster by email
    async fn add_staff(&self, pharmacy_id: Uuid, input: AddStaff) -> AppResult<StaffResponse>;

    async fn update_staff(
        &self,
        pharmacy_id: Uuid,
        staff_id: Uuid,
        update: StaffUpdate,
    ) -> AppResult<StaffResponse>;

    async fn list_bills(&self, pharmacy_id: Uuid) -> AppResult<Vec<Bill>>;

    async fn create_bill(&self, principal: &Principal, pharmacy_id: Uuid, bill: NewBill)
        -> AppResult<Bill>;
}

pub struct PharmacyManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PharmacyManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn pharmacy(&self, pharmacy_id: Uuid) -> AppResult<Pharmacy> {
        self.uow
            .pharmacies()
            .find_by_id(pharmacy_id)
            .await?
            .ok_or_not_found("Pharmacy")
    }

    async fn respond(&self, pharmacy: Pharmacy) -> AppResult<PharmacyResponse> {
        let owner = self.uow.users().find_by_id(pharmacy.owner_id).await?;
        Ok(PharmacyResponse::new(pharmacy, owner.as_ref()))
    }

    async fn respond_all(&self, pharmacies: Vec<Pharmacy>) -> AppResult<Vec<PharmacyResponse>> {
        let mut responses = Vec::with_capacity(pharmacies.len());
        for pharmacy in pharmacies {
            responses.push(self.respond(pharmacy).await?);
        }
        Ok(responses)
    }
}

#[async_trait]
impl<U: UnitOfWork> PharmacyService for PharmacyManager<U> {
    async fn list_all(&self) -> AppResult<Vec<PharmacyResponse>> {
        let pharmacies = self.uow.pharmacies().list_all().await?;
        self.respond_all(pharmacies).await
    }

    async fn mine(&self, principal: &Principal) -> AppResult<Vec<PharmacyResponse>> {
        let pharmacies = self.uow.pharmacies().list_for_member(principal.id).await?;
        self.respond_all(pharmacies).await
    }

    async fn get(&self, pharmacy_id: Uuid) -> AppResult<PharmacyResponse> {
        let pharmacy = self.pharmacy(pharmacy_id).await?;
        self.respond(pharmacy).await
    }

    async fn create(
        &self,
        principal: &Principal,
        input: CreatePharmacy,
    ) -> AppResult<PharmacyResponse> {
        if self
            .uow
            .pharmacies()
            .exists_by_registration_number(&input.registration_number)
            .await?
        {
            return Err(AppError::bad_request(REGISTRATION_NUMBER_TAKEN));
        }

        let new_pharmacy = input.with_owner(principal.id);
        let pharmacy = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx
                        .pharmacies()
                        .exists_by_registration_number(&new_pharmacy.registration_number)
                        .await?
                    {
                        return Err(AppError::bad_request(REGISTRATION_NUMBER_TAKEN));
                    }
                    let pharmacy = ctx.pharmacies().create(new_pharmacy).await?;
                    ctx.staff()
                        .create(pharmacy.id, pharmacy.owner_id, StaffRole::Admin)
                        .await?;
                    Ok(pharmacy)
                })
            })
            .await?;

        tracing::info!(pharmacy_id = %pharmacy.id, owner_id = %principal.id, "Pharmacy created");
        self.respond(pharmacy).await
    }

    async fn update(
        &self,
        pharmacy_id: Uuid,
        update: PharmacyUpdate,
    ) -> AppResult<PharmacyResponse> {
        self.pharmacy(pharmacy_id).await?;
        let pharmacy = self.uow.pharmacies().update(pharmacy_id, update).await?;
        self.respond(pharmacy).await
    }

    async fn delete(&self, pharmacy_id: Uuid) -> AppResult<()> {
        self.pharmacy(pharmacy_id).await?;
        self.uow.pharmacies().deactivate(pharmacy_id).await?;
        tracing::info!(pharmacy_id = %pharmacy_id, "Pharmacy deactivated");
        Ok(())
    }

    async fn activity(
        &self,
        pharmacy_id: Uuid,
        limit: Option<u64>,
    ) -> AppResult<Vec<ActivityItem>> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        if !(1..=MAX_ACTIVITY_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(format!(
                "limit must be between 1 and {}",
                MAX_ACTIVITY_LIMIT
            )));
        }

        let bills = self
            .uow
            .bills()
            .latest_by_pharmacy(pharmacy_id, limit)
            .await?;
        Ok(activity_feed(&bills, limit as usize))
    }

    async fn list_staff(&self, pharmacy_id: Uuid) -> AppResult<Vec<StaffResponse>> {
        let rows = self.uow.staff().list_by_pharmacy(pharmacy_id).await?;
        let users = self.uow.users();

        let mut roster = Vec::with_capacity(rows.len());
        for row in rows {
            match users.find_by_id(row.user_id).await? {
                Some(user) => roster.push(StaffResponse::new(row, &user)),
                None => {
                    tracing::warn!(staff_id = %row.id, user_id = %row.user_id, "Staff row without user")
                }
            }
        }
        Ok(roster)
    }

    async fn add_staff(&self, pharmacy_id: Uuid, input: AddStaff) -> AppResult<StaffResponse> {
        self.pharmacy(pharmacy_id).await?;
        let user = self
            .uow
            .users()
            .find_by_email(&input.email)
            .await?
            .ok_or_not_found("User")?;

        let existing = self
            .uow
            .staff()
            .find_by_pharmacy_and_user(pharmacy_id, user.id)
            .await?;
        if existing.as_ref().is_some_and(|row| row.active) {
            return Err(AppError::bad_request(ALREADY_STAFF));
        }

        let role = input.role.unwrap_or(StaffRole::Staff);
        let user_id = user.id;
        let staff = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let existing = ctx
                        .staff()
                        .find_by_pharmacy_and_user(pharmacy_id, user_id)
                        .await?;
                    let staff = match existing {
                        Some(row) if row.active => return Err(AppError::bad_request(ALREADY_STAFF)),
                        Some(mut row) => {
                            row.apply(&StaffUpdate {
                                role: Some(role),
                                active: Some(true),
                            });
                            ctx.staff().save(row).await?
                        }
                        None => ctx.staff().create(pharmacy_id, user_id, role).await?,
                    };
                    ctx.users().grant_role(user_id, Role::Pharmacy).await?;
                    Ok(staff)
                })
            })
            .await?;

        tracing::info!(
            pharmacy_id = %pharmacy_id,
            user_id = %user.id,
            role = %staff.role,
            "Staff member added"
        );
        Ok(StaffResponse::new(staff, &user))
    }

    async fn update_staff(
        &self,
        pharmacy_id: Uuid,
        staff_id: Uuid,
        update: StaffUpdate,
    ) -> AppResult<StaffResponse> {
        let mut row = self
            .uow
            .staff()
            .find_in_pharmacy(staff_id, pharmacy_id)
            .await?
            .ok_or_not_found("Staff member")?;
        row.apply(&update);

        let row = self.uow.staff().save(row).await?;
        let user = self
            .uow
            .users()
            .find_by_id(row.user_id)
            .await?
            .ok_or_not_found("User")?;
        Ok(StaffResponse::new(row, &user))
    }

    async fn list_bills(&self, pharmacy_id: Uuid) -> AppResult<Vec<Bill>> {
        self.uow.bills().list_by_pharmacy(pharmacy_id).await
    }

    async fn create_bill(
        &self,
        principal: &Principal,
        pharmacy_id: Uuid,
        bill: NewBill,
    ) -> AppResult<Bill> {
        self.pharmacy(pharmacy_id).await?;
        self.uow.bills().create(pharmacy_id, principal.id, bill).await
    }
}
