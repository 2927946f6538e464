//! Authentication service - account signup, login and token handling.
//!
//! Patients and pharmacy staff share one account table and are told apart by
//! role: `login` only admits USER accounts, `pharmacy_login` only PHARMACY
//! accounts with at least one staff assignment.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::domain::{
    CreatePharmacy, NewUser, Password, PharmacyStaff, Principal, Role, StaffResponse, StaffRole,
    User, UserResponse,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

const EMAIL_IN_USE: &str = "Email is already in use";
const ADMIN_EMAIL_IN_USE: &str = "Admin email is already in use";
const REGISTRATION_NUMBER_TAKEN: &str = "Pharmacy registration number already exists";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Principal carried by the token. Unknown role names are dropped.
    pub fn principal(&self) -> Principal {
        let roles = self.roles.iter().filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::debug!(role = %name, "Ignoring unknown role claim");
                None
            }
        });
        Principal::new(self.sub, self.email.clone(), roles)
    }
}

/// Patient signup request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Minimum 8 characters
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Login request, shared by patients and pharmacy staff
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Pharmacy signup: the pharmacy plus its first administrator
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacySignupRequest {
    #[validate(length(min = 1, message = "Pharmacy name is required"))]
    #[schema(example = "Corner Pharmacy")]
    pub pharmacy_name: String,
    #[validate(length(min = 1, message = "Registration number is required"))]
    #[schema(example = "RX-100")]
    pub registration_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Invalid pharmacy email format"))]
    pub pharmacy_email: String,
    pub website: Option<String>,
    #[validate(length(min = 1, message = "Admin first name is required"))]
    pub admin_first_name: String,
    #[validate(length(min = 1, message = "Admin last name is required"))]
    pub admin_last_name: String,
    #[validate(email(message = "Invalid admin email format"))]
    pub admin_email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub admin_password: String,
}

impl PharmacySignupRequest {
    fn pharmacy(&self) -> CreatePharmacy {
        CreatePharmacy {
            name: self.pharmacy_name.clone(),
            registration_number: self.registration_number.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.pharmacy_email.clone(),
            website: self.website.clone(),
        }
    }
}

/// Token plus the patient account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Token plus the staff assignment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PharmacyAuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub staff: StaffResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ValidatedIdentity {
    Pharmacy(StaffResponse),
    User(UserResponse),
}

/// Result of `GET /auth/validate`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// "pharmacy" or "user"
    #[schema(example = "user")]
    pub user_type: String,
    pub user_data: ValidatedIdentity,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a patient account and sign it in
    async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse>;

    /// Patient login
    async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse>;

    /// Register a pharmacy together with its admin account, atomically
    async fn pharmacy_signup(&self, request: PharmacySignupRequest)
        -> AppResult<PharmacyAuthResponse>;

    /// Pharmacy staff login
    async fn pharmacy_login(&self, request: LoginRequest) -> AppResult<PharmacyAuthResponse>;

    /// Describe the account behind a valid token
    async fn validate(&self, principal: &Principal) -> AppResult<ValidateResponse>;

    /// Verify a bearer token and return its principal
    fn verify_token(&self, token: &str) -> AppResult<Principal>;
}

/// Generate a signed JWT for a user
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        roles: user.roles.iter().map(|r| r.to_string()).collect(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    /// Check credentials without revealing whether the email exists.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email).await?;

        // Verify against a dummy hash when the user is missing so both paths
        // cost the same.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(password);

        match user {
            Some(user) if password_valid && user.enabled => Ok(user),
            _ => {
                tracing::debug!("Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Oldest staff assignment of a user
    async fn primary_assignment(&self, user: &User) -> AppResult<Option<PharmacyStaff>> {
        let assignments = self.uow.staff().list_by_user(user.id).await?;
        Ok(assignments.into_iter().next())
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        if self.uow.users().exists_by_email(&request.email).await? {
            return Err(AppError::bad_request(EMAIL_IN_USE));
        }

        let password_hash = Password::new(&request.password)?.into_string();
        let new_user = NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            roles: vec![Role::User],
        };

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.users().exists_by_email(&new_user.email).await? {
                        return Err(AppError::bad_request(EMAIL_IN_USE));
                    }
                    ctx.users().create(new_user).await
                })
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = self.authenticate(&request.email, &request.password).await?;

        if !user.has_role(Role::User) || user.has_role(Role::Pharmacy) {
            tracing::warn!(user_id = %user.id, "Patient login attempted by non-patient account");
            return Err(AppError::unauthorized("Access denied for this user type"));
        }

        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    async fn pharmacy_signup(
        &self,
        request: PharmacySignupRequest,
    ) -> AppResult<PharmacyAuthResponse> {
        if self.uow.users().exists_by_email(&request.admin_email).await? {
            return Err(AppError::bad_request(ADMIN_EMAIL_IN_USE));
        }
        if self
            .uow
            .pharmacies()
            .exists_by_registration_number(&request.registration_number)
            .await?
        {
            return Err(AppError::bad_request(REGISTRATION_NUMBER_TAKEN));
        }

        let password_hash = Password::new(&request.admin_password)?.into_string();
        let pharmacy = request.pharmacy();
        let admin = NewUser {
            first_name: request.admin_first_name,
            last_name: request.admin_last_name,
            email: request.admin_email,
            password_hash,
            roles: vec![Role::Pharmacy],
        };

        let (user, staff) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.users().exists_by_email(&admin.email).await? {
                        return Err(AppError::bad_request(ADMIN_EMAIL_IN_USE));
                    }
                    if ctx
                        .pharmacies()
                        .exists_by_registration_number(&pharmacy.registration_number)
                        .await?
                    {
                        return Err(AppError::bad_request(REGISTRATION_NUMBER_TAKEN));
                    }

                    let user = ctx.users().create(admin).await?;
                    let pharmacy = ctx.pharmacies().create(pharmacy.with_owner(user.id)).await?;
                    let staff = ctx
                        .staff()
                        .create(pharmacy.id, user.id, StaffRole::Admin)
                        .await?;
                    Ok((user, staff))
                })
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            pharmacy_id = %staff.pharmacy_id,
            "Pharmacy registered"
        );
        let token = generate_token(&user, &self.config)?;
        Ok(PharmacyAuthResponse {
            token,
            staff: StaffResponse::new(staff, &user),
        })
    }

    async fn pharmacy_login(&self, request: LoginRequest) -> AppResult<PharmacyAuthResponse> {
        let user = self.authenticate(&request.email, &request.password).await?;

        if !user.has_role(Role::Pharmacy) {
            return Err(AppError::unauthorized("Unauthorized: User is not pharmacy staff"));
        }
        let Some(staff) = self.primary_assignment(&user).await? else {
            tracing::warn!(user_id = %user.id, "Pharmacy account has no staff assignment");
            return Err(AppError::unauthorized("Pharmacy staff details not found"));
        };

        let token = generate_token(&user, &self.config)?;
        Ok(PharmacyAuthResponse {
            token,
            staff: StaffResponse::new(staff, &user),
        })
    }

    async fn validate(&self, principal: &Principal) -> AppResult<ValidateResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Token validation failed: user not found"))?;

        if user.has_role(Role::Pharmacy) {
            let staff = self.primary_assignment(&user).await?.ok_or_else(|| {
                AppError::internal(format!("User {} has PHARMACY role but no staff row", user.id))
            })?;
            return Ok(ValidateResponse {
                user_type: "pharmacy".to_string(),
                user_data: ValidatedIdentity::Pharmacy(StaffResponse::new(staff, &user)),
            });
        }

        if user.has_role(Role::User) {
            return Ok(ValidateResponse {
                user_type: "user".to_string(),
                user_data: ValidatedIdentity::User(user.into()),
            });
        }

        Err(AppError::unauthorized(
            "Token validation failed: User role not supported for this context",
        ))
    }

    fn verify_token(&self, token: &str) -> AppResult<Principal> {
        Ok(verify_token_internal(token, &self.config)?.principal())
    }
}
