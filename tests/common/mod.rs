//! Shared in-memory fakes for the integration tests.
//!
//! `World` stands in for every service and the ownership predicates at once,
//! so the real router, middleware and route table run against a small set of
//! tables held in memory. Operations the tests never reach answer with an
//! internal error.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use pharmacare::api::{create_router, AppState};
use pharmacare::domain::{
    Achievement, ActivityItem, AddStaff, AdherenceBreakdown, Bill, CreatePharmacy,
    CreateReminder, Donation, DonationInput, DonationResponse, DonationStatus, Medication,
    MedicationBreakdown, MedicationInput, NewBill, Pharmacy, PharmacyResponse, PharmacyStaff,
    PharmacyUpdate, Principal, ProfileUpdate, ReminderResponse, ReminderWindow, RewardsDashboard,
    Role, SalesSummary, StaffResponse, StaffRole, StaffUpdate, StatusUpdate, UpdateReminder, User,
    UserDashboard, UserResponse,
};
use pharmacare::errors::{AppError, AppResult};
use pharmacare::infra::{HealthCheck, RateLimiter};
use pharmacare::policy::OwnershipPredicates;
use pharmacare::services::{
    AnalyticsService, AuthResponse, AuthService, DonationService, LoginRequest, MedicationService,
    PharmacyAuthResponse, PharmacyService, PharmacySignupRequest, ReminderService, RewardsService,
    SignupRequest, UserService, ValidateResponse, ValidatedIdentity,
};

fn not_faked() -> AppError {
    AppError::internal("operation not faked")
}

#[derive(Default)]
struct Tables {
    tokens: HashMap<String, Uuid>,
    users: HashMap<Uuid, User>,
    medications: Vec<Medication>,
    pharmacies: Vec<Pharmacy>,
    staff: Vec<PharmacyStaff>,
    donations: Vec<Donation>,
}

impl Tables {
    fn register(&mut self, email: &str, roles: &[Role]) -> (User, String) {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            image_url: None,
            enabled: true,
            roles: roles.iter().copied().collect(),
            created_at: now,
            updated_at: now,
        };
        let token = format!("token-{}", user.id);
        self.tokens.insert(token.clone(), user.id);
        self.users.insert(user.id, user.clone());
        (user, token)
    }

    fn user(&self, id: Uuid) -> AppResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| AppError::not_found("User"))
    }

    fn is_member(&self, pharmacy_id: Uuid, user_id: Uuid, admin: bool) -> bool {
        let Some(pharmacy) = self.pharmacies.iter().find(|p| p.id == pharmacy_id) else {
            return false;
        };
        pharmacy.is_owned_by(user_id)
            || self.staff.iter().any(|s| {
                s.pharmacy_id == pharmacy_id
                    && if admin {
                        s.grants_admin(user_id)
                    } else {
                        s.grants_membership(user_id)
                    }
            })
    }

    fn staff_response(&self, row: PharmacyStaff) -> AppResult<StaffResponse> {
        let user = self.user(row.user_id)?.clone();
        Ok(StaffResponse::new(row, &user))
    }
}

/// In-memory backend for every service trait
#[derive(Default)]
pub struct World {
    tables: Mutex<Tables>,
}

impl World {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create an account and return it with a bearer token
    pub fn account(&self, email: &str, roles: &[Role]) -> (Principal, String) {
        let (user, token) = self.tables.lock().unwrap().register(email, roles);
        (user.principal(), token)
    }

    pub fn medication(&self, owner: Uuid) -> Uuid {
        let now = Utc::now();
        let medication = Medication {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "Metformin".to_string(),
            description: None,
            dosage: "500mg".to_string(),
            frequency: "twice daily".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            notes: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let id = medication.id;
        self.tables.lock().unwrap().medications.push(medication);
        id
    }

    pub fn pharmacy(&self, owner: Uuid, registration_number: &str) -> Uuid {
        let now = Utc::now();
        let pharmacy = Pharmacy {
            id: Uuid::new_v4(),
            name: "Corner Pharmacy".to_string(),
            registration_number: registration_number.to_string(),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
            email: "corner@example.com".to_string(),
            website: None,
            owner_id: owner,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let id = pharmacy.id;
        self.tables.lock().unwrap().pharmacies.push(pharmacy);
        id
    }

    pub fn staff(&self, pharmacy_id: Uuid, user_id: Uuid, role: StaffRole) -> Uuid {
        let now = Utc::now();
        let row = PharmacyStaff {
            id: Uuid::new_v4(),
            pharmacy_id,
            user_id,
            role,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let id = row.id;
        self.tables.lock().unwrap().staff.push(row);
        id
    }

    pub fn donation(&self, owner: Uuid, status: DonationStatus) -> Uuid {
        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            user_id: owner,
            medicine_name: "Amoxicillin".to_string(),
            quantity: 2,
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            location: "Clinic".to_string(),
            organization: None,
            notes: None,
            status,
            donation_date: now,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };
        let id = donation.id;
        self.tables.lock().unwrap().donations.push(donation);
        id
    }

    pub fn donation_status(&self, id: Uuid) -> Option<DonationStatus> {
        let tables = self.tables.lock().unwrap();
        tables.donations.iter().find(|d| d.id == id).map(|d| d.status)
    }
}

#[async_trait]
impl AuthService for World {
    async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == request.email) {
            return Err(AppError::bad_request("Email is already in use"));
        }
        let (user, token) = tables.register(&request.email, &[Role::User]);
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    async fn login(&self, _request: LoginRequest) -> AppResult<AuthResponse> {
        Err(AppError::InvalidCredentials)
    }

    async fn pharmacy_signup(
        &self,
        request: PharmacySignupRequest,
    ) -> AppResult<PharmacyAuthResponse> {
        {
            let tables = self.tables.lock().unwrap();
            if tables
                .pharmacies
                .iter()
                .any(|p| p.registration_number == request.registration_number)
            {
                return Err(AppError::bad_request(
                    "Pharmacy registration number already exists",
                ));
            }
        }
        let (admin, token) = self.account(&request.admin_email, &[Role::Pharmacy]);
        let pharmacy_id = self.pharmacy(admin.id, &request.registration_number);
        let staff_id = self.staff(pharmacy_id, admin.id, StaffRole::Admin);

        let tables = self.tables.lock().unwrap();
        let row = tables
            .staff
            .iter()
            .find(|s| s.id == staff_id)
            .cloned()
            .ok_or_else(not_faked)?;
        Ok(PharmacyAuthResponse {
            token,
            staff: tables.staff_response(row)?,
        })
    }

    async fn pharmacy_login(&self, _request: LoginRequest) -> AppResult<PharmacyAuthResponse> {
        Err(AppError::InvalidCredentials)
    }

    async fn validate(&self, principal: &Principal) -> AppResult<ValidateResponse> {
        if !principal.has_role(Role::User) {
            return Err(AppError::unauthorized("Invalid user type"));
        }
        let tables = self.tables.lock().unwrap();
        let user = tables.user(principal.id)?.clone();
        Ok(ValidateResponse {
            user_type: "user".to_string(),
            user_data: ValidatedIdentity::User(UserResponse::from(user)),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Principal> {
        let tables = self.tables.lock().unwrap();
        let id = tables
            .tokens
            .get(token)
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;
        Ok(tables.user(*id)?.principal())
    }
}

#[async_trait]
impl UserService for World {
    async fn me(&self, principal: &Principal) -> AppResult<User> {
        Ok(self.tables.lock().unwrap().user(principal.id)?.clone())
    }

    async fn update_profile(
        &self,
        _principal: &Principal,
        _update: ProfileUpdate,
    ) -> AppResult<User> {
        Err(not_faked())
    }
}

#[async_trait]
impl MedicationService for World {
    async fn list(&self, principal: &Principal) -> AppResult<Vec<Medication>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .medications
            .iter()
            .filter(|m| m.user_id == principal.id)
            .cloned()
            .collect())
    }

    async fn list_active(&self, _principal: &Principal) -> AppResult<Vec<Medication>> {
        Err(not_faked())
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Medication> {
        let tables = self.tables.lock().unwrap();
        tables
            .medications
            .iter()
            .find(|m| m.id == id && m.user_id == principal.id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Medication"))
    }

    async fn create(
        &self,
        _principal: &Principal,
        _input: MedicationInput,
    ) -> AppResult<Medication> {
        Err(not_faked())
    }

    async fn update(
        &self,
        _principal: &Principal,
        _id: Uuid,
        _input: MedicationInput,
    ) -> AppResult<Medication> {
        Err(not_faked())
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.medications.len();
        tables
            .medications
            .retain(|m| !(m.id == id && m.user_id == principal.id));
        if tables.medications.len() == before {
            return Err(AppError::not_found("Medication"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderService for World {
    async fn list(&self, _principal: &Principal) -> AppResult<Vec<ReminderResponse>> {
        Ok(Vec::new())
    }

    async fn pending(
        &self,
        _principal: &Principal,
        _window: ReminderWindow,
    ) -> AppResult<Vec<ReminderResponse>> {
        Err(not_faked())
    }

    async fn get(&self, _principal: &Principal, _id: Uuid) -> AppResult<ReminderResponse> {
        Err(AppError::not_found("Reminder"))
    }

    async fn create(
        &self,
        _principal: &Principal,
        _input: CreateReminder,
    ) -> AppResult<ReminderResponse> {
        Err(not_faked())
    }

    async fn update(
        &self,
        _principal: &Principal,
        _id: Uuid,
        _input: UpdateReminder,
    ) -> AppResult<ReminderResponse> {
        Err(not_faked())
    }

    async fn delete(&self, _principal: &Principal, _id: Uuid) -> AppResult<()> {
        Err(not_faked())
    }

    async fn complete(&self, _principal: &Principal, _id: Uuid) -> AppResult<ReminderResponse> {
        Err(not_faked())
    }
}

#[async_trait]
impl DonationService for World {
    async fn list(&self, _principal: &Principal) -> AppResult<Vec<DonationResponse>> {
        Err(not_faked())
    }

    async fn pending(&self, _principal: &Principal) -> AppResult<Vec<DonationResponse>> {
        Err(not_faked())
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<DonationResponse> {
        let tables = self.tables.lock().unwrap();
        let donation = tables
            .donations
            .iter()
            .find(|d| d.id == id && d.user_id == principal.id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Donation"))?;
        let donor = tables.user(principal.id).ok().map(User::full_name);
        Ok(DonationResponse::new(donation, donor))
    }

    async fn create(
        &self,
        _principal: &Principal,
        _input: DonationInput,
    ) -> AppResult<DonationResponse> {
        Err(not_faked())
    }

    async fn update(
        &self,
        _principal: &Principal,
        _id: Uuid,
        _input: DonationInput,
    ) -> AppResult<DonationResponse> {
        Err(not_faked())
    }

    async fn delete(&self, _principal: &Principal, _id: Uuid) -> AppResult<()> {
        Err(not_faked())
    }

    async fn update_status(
        &self,
        principal: &Principal,
        id: Uuid,
        update: StatusUpdate,
    ) -> AppResult<DonationResponse> {
        let next: DonationStatus = update
            .status
            .as_deref()
            .ok_or_else(|| AppError::bad_request("Status is required"))?
            .parse()?;

        let mut tables = self.tables.lock().unwrap();
        let donation = tables
            .donations
            .iter_mut()
            .find(|d| d.id == id && d.user_id == principal.id)
            .ok_or_else(|| AppError::not_found("Donation"))?;
        donation.apply_status(next, Utc::now())?;
        let donation = donation.clone();
        let donor = tables.user(principal.id).ok().map(User::full_name);
        Ok(DonationResponse::new(donation, donor))
    }
}

#[async_trait]
impl PharmacyService for World {
    async fn list_all(&self) -> AppResult<Vec<PharmacyResponse>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .pharmacies
            .iter()
            .cloned()
            .map(|p| PharmacyResponse::new(p, None))
            .collect())
    }

    async fn mine(&self, _principal: &Principal) -> AppResult<Vec<PharmacyResponse>> {
        Err(not_faked())
    }

    async fn get(&self, pharmacy_id: Uuid) -> AppResult<PharmacyResponse> {
        let tables = self.tables.lock().unwrap();
        let pharmacy = tables
            .pharmacies
            .iter()
            .find(|p| p.id == pharmacy_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Pharmacy"))?;
        Ok(PharmacyResponse::new(pharmacy, None))
    }

    async fn create(
        &self,
        _principal: &Principal,
        _input: CreatePharmacy,
    ) -> AppResult<PharmacyResponse> {
        Err(not_faked())
    }

    async fn update(
        &self,
        _pharmacy_id: Uuid,
        _update: PharmacyUpdate,
    ) -> AppResult<PharmacyResponse> {
        Err(not_faked())
    }

    async fn delete(&self, _pharmacy_id: Uuid) -> AppResult<()> {
        Err(not_faked())
    }

    async fn activity(
        &self,
        _pharmacy_id: Uuid,
        _limit: Option<u64>,
    ) -> AppResult<Vec<ActivityItem>> {
        Err(not_faked())
    }

    async fn list_staff(&self, pharmacy_id: Uuid) -> AppResult<Vec<StaffResponse>> {
        let tables = self.tables.lock().unwrap();
        tables
            .staff
            .iter()
            .filter(|s| s.pharmacy_id == pharmacy_id)
            .cloned()
            .map(|row| tables.staff_response(row))
            .collect()
    }

    async fn add_staff(&self, _pharmacy_id: Uuid, _input: AddStaff) -> AppResult<StaffResponse> {
        Err(not_faked())
    }

    async fn update_staff(
        &self,
        pharmacy_id: Uuid,
        staff_id: Uuid,
        update: StaffUpdate,
    ) -> AppResult<StaffResponse> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .staff
            .iter_mut()
            .find(|s| s.id == staff_id && s.pharmacy_id == pharmacy_id)
            .ok_or_else(|| AppError::not_found("Staff member"))?;
        row.apply(&update);
        let row = row.clone();
        tables.staff_response(row)
    }

    async fn list_bills(&self, _pharmacy_id: Uuid) -> AppResult<Vec<Bill>> {
        Ok(Vec::new())
    }

    async fn create_bill(
        &self,
        _principal: &Principal,
        _pharmacy_id: Uuid,
        _bill: NewBill,
    ) -> AppResult<Bill> {
        Err(not_faked())
    }
}

#[async_trait]
impl AnalyticsService for World {
    async fn user_dashboard(&self, _principal: &Principal) -> AppResult<UserDashboard> {
        Ok(UserDashboard::build(0, 0, &[]))
    }

    async fn adherence(
        &self,
        _principal: &Principal,
        _days: Option<i64>,
    ) -> AppResult<AdherenceBreakdown> {
        Err(not_faked())
    }

    async fn medications(&self, _principal: &Principal) -> AppResult<MedicationBreakdown> {
        Err(not_faked())
    }

    async fn sales_summary(
        &self,
        _pharmacy_id: Uuid,
        period: Option<String>,
    ) -> AppResult<SalesSummary> {
        Ok(SalesSummary {
            total_amount: 0.0,
            period: period.unwrap_or_else(|| "week".to_string()),
        })
    }
}

#[async_trait]
impl RewardsService for World {
    async fn dashboard(&self, _principal: &Principal) -> AppResult<RewardsDashboard> {
        Ok(RewardsDashboard::build(0, 0))
    }

    async fn achievements(&self, _principal: &Principal) -> AppResult<Vec<Achievement>> {
        Err(not_faked())
    }
}

#[async_trait]
impl OwnershipPredicates for World {
    async fn is_pharmacy_member(&self, pharmacy_id: Uuid, principal: &Principal) -> bool {
        self.tables
            .lock()
            .unwrap()
            .is_member(pharmacy_id, principal.id, false)
    }

    async fn is_pharmacy_admin(&self, pharmacy_id: Uuid, principal: &Principal) -> bool {
        self.tables
            .lock()
            .unwrap()
            .is_member(pharmacy_id, principal.id, true)
    }
}

/// Rate limiter that lets everything through, or fails like an unreachable Redis
pub struct FakeRateLimiter {
    pub reachable: bool,
}

#[async_trait]
impl RateLimiter for FakeRateLimiter {
    async fn check_rate_limit(
        &self,
        _identifier: &str,
        _max_requests: u64,
        _window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        if self.reachable {
            Ok((1, true))
        } else {
            Err(AppError::internal("redis unreachable"))
        }
    }
}

pub struct FakeProbe {
    pub name: &'static str,
    pub healthy: bool,
}

#[async_trait]
impl HealthCheck for FakeProbe {
    fn component(&self) -> &'static str {
        self.name
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

pub fn state_with(
    world: &Arc<World>,
    rate_limiter: FakeRateLimiter,
    probes: Vec<FakeProbe>,
) -> AppState {
    AppState {
        auth_service: world.clone(),
        user_service: world.clone(),
        pharmacy_service: world.clone(),
        medication_service: world.clone(),
        reminder_service: world.clone(),
        donation_service: world.clone(),
        analytics_service: world.clone(),
        rewards_service: world.clone(),
        ownership: world.clone(),
        rate_limiter: Arc::new(rate_limiter),
        health_checks: probes
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn HealthCheck>)
            .collect(),
    }
}

/// Full application router over `world`, with a permissive rate limiter
pub fn app(world: &Arc<World>) -> Router {
    create_router(state_with(
        world,
        FakeRateLimiter { reachable: true },
        Vec::new(),
    ))
}

/// Send one request and return status plus parsed JSON body (Null when empty)
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
