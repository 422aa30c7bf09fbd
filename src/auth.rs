//! Mock authentication.
//!
//! Credentials are checked against a hardcoded account list behind the
//! [`AuthBackend`] trait, so a real identity service can replace
//! [`MockAuthBackend`] without touching callers. The signed-in user is kept in
//! an [`AuthContext`] driven by a small reducer and mirrored to durable
//! storage under [`USER_KEY`](crate::storage::USER_KEY).

use std::borrow::Cow;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::storage::{load_json, save_json, KeyValueStore, USER_KEY};

/// Code a cashier must present to self-register.
pub const CASHIER_ADMIN_CODE: &str = "SILKCRAFT_ADMIN_2024";

/// Optional leading `+`, then at least ten digits, whitespace, dashes or parentheses.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[\d\s\-()]{10,}$").expect("Invalid regex"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Cashier,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl AuthUser {
    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User with this email already exists")]
    UserAlreadyExists,
    #[error("Invalid admin code")]
    InvalidAdminCode,
    #[error("Admin accounts cannot be registered")]
    RoleNotAllowed,
    #[error("{0}")]
    Validation(String),
    #[error("Authentication service unavailable")]
    Unavailable,
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_register_form", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(regex(path = "PHONE_RE", message = "Please enter a valid phone number"))]
    pub phone: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub agree_to_terms: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub admin_code: Option<String>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(invalid("password_length", "Password must be at least 8 characters"));
    }
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if !(upper && lower && digit) {
        return Err(invalid("password_strength", "Password must contain uppercase, lowercase, and number"));
    }
    Ok(())
}

fn validate_register_form(form: &RegisterRequest) -> Result<(), ValidationError> {
    if form.password != form.confirm_password {
        return Err(invalid("password_mismatch", "Passwords do not match"));
    }
    if !form.agree_to_terms {
        return Err(invalid("terms", "You must agree to the terms and conditions"));
    }
    let business = form.business_name.as_deref().map(str::trim).unwrap_or_default();
    if form.role == Role::Cashier && business.is_empty() {
        return Err(invalid("business_name", "Business name is required for business accounts"));
    }
    Ok(())
}

/// Flattens validator output into one message, ordered by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .map(|e| e.message.as_deref().map(str::to_string).unwrap_or_else(|| e.code.to_string()))
        .collect::<Vec<_>>()
        .join("; ")
}

impl RegisterRequest {
    pub fn check(&self) -> Result<(), AuthError> {
        self.validate().map_err(|e| AuthError::Validation(describe(&e)))
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, AuthError>;
}

#[derive(Clone, Debug)]
struct MockAccount {
    user: AuthUser,
    password: String,
}

/// In-process account list with a simulated network delay.
pub struct MockAuthBackend {
    accounts: Mutex<Vec<MockAccount>>,
    delay: Duration,
}

impl MockAuthBackend {
    pub fn new(delay: Duration) -> Self {
        Self { accounts: Mutex::new(seed_accounts()), delay }
    }

    pub fn shared(delay: Duration) -> Arc<dyn AuthBackend> { Arc::new(Self::new(delay)) }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() { tokio::time::sleep(self.delay).await; }
    }
}

fn seed_accounts() -> Vec<MockAccount> {
    let account = |id: &str, email: &str, password: &str, first: &str, last: &str, role: Role, phone: &str, business: Option<&str>| MockAccount {
        user: AuthUser {
            id: id.into(),
            email: email.into(),
            first_name: first.into(),
            last_name: last.into(),
            role,
            phone: Some(phone.into()),
            business_name: business.map(Into::into),
        },
        password: password.into(),
    };
    vec![
        account("1", "admin@silkcraft.com", "admin123", "Admin", "User", Role::Admin, "+1234567890", None),
        account("2", "cashier@silkcraft.com", "cashier123", "Cashier", "User", Role::Cashier, "+1234567891", Some("SilkCraft Store")),
        account("3", "customer@example.com", "customer123", "John", "Doe", Role::Customer, "+1234567892", None),
    ]
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.simulate_latency().await;
        let accounts = self.accounts.lock().map_err(|_| AuthError::Unavailable)?;
        accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, AuthError> {
        self.simulate_latency().await;
        let mut accounts = self.accounts.lock().map_err(|_| AuthError::Unavailable)?;
        let email = request.email.trim();
        if accounts.iter().any(|a| a.user.email.eq_ignore_ascii_case(email)) {
            return Err(AuthError::UserAlreadyExists);
        }
        match request.role {
            Role::Admin => return Err(AuthError::RoleNotAllowed),
            Role::Cashier if request.admin_code.as_deref() != Some(CASHIER_ADMIN_CODE) => {
                return Err(AuthError::InvalidAdminCode);
            }
            Role::Cashier | Role::Customer => {}
        }
        let user = AuthUser {
            id: uuid::Uuid::now_v7().to_string(),
            email: email.to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            role: request.role,
            phone: Some(request.phone.trim().to_string()),
            business_name: request.business_name.as_deref().map(str::trim).filter(|b| !b.is_empty()).map(Into::into),
        };
        accounts.push(MockAccount { user: user.clone(), password: request.password.clone() });
        Ok(user)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool { self.user.is_some() }
}

#[derive(Debug)]
enum AuthAction {
    Start,
    Success(AuthUser),
    Failure,
    Logout,
    Restore(Option<AuthUser>),
}

fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Start => AuthState { is_loading: true, ..state },
        AuthAction::Success(user) => AuthState { user: Some(user), is_loading: false },
        AuthAction::Failure | AuthAction::Logout => AuthState { user: None, is_loading: false },
        AuthAction::Restore(user) => AuthState { user, is_loading: false },
    }
}

/// Session-scoped authentication state.
///
/// Constructed once at start-up; login and register borrow it mutably, so a
/// second submission cannot start while one is in flight.
pub struct AuthContext<S> {
    state: AuthState,
    backend: Arc<dyn AuthBackend>,
    storage: S,
}

impl<S: KeyValueStore> AuthContext<S> {
    /// Restores a previously signed-in user. A malformed record is dropped.
    pub fn load(backend: Arc<dyn AuthBackend>, storage: S) -> Self {
        let restored = load_json::<AuthUser>(&storage, USER_KEY);
        if restored.is_none() {
            if let Err(e) = storage.remove(USER_KEY) {
                tracing::warn!(error = %e, "failed to clear stored user");
            }
        }
        let mut ctx = Self { state: AuthState::default(), backend, storage };
        ctx.dispatch(AuthAction::Restore(restored));
        ctx
    }

    pub fn state(&self) -> &AuthState { &self.state }
    pub fn user(&self) -> Option<&AuthUser> { self.state.user.as_ref() }
    pub fn is_authenticated(&self) -> bool { self.state.is_authenticated() }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.dispatch(AuthAction::Start);
        match self.backend.authenticate(email, password).await {
            Ok(user) => Ok(self.sign_in(user)),
            Err(e) => {
                tracing::info!(email, error = %e, "login rejected");
                self.dispatch(AuthAction::Failure);
                Err(e)
            }
        }
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthUser, AuthError> {
        request.check()?;
        self.dispatch(AuthAction::Start);
        match self.backend.register(request).await {
            Ok(user) => Ok(self.sign_in(user)),
            Err(e) => {
                tracing::info!(email = %request.email, error = %e, "registration rejected");
                self.dispatch(AuthAction::Failure);
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(USER_KEY) {
            tracing::warn!(error = %e, "failed to clear stored user");
        }
        self.dispatch(AuthAction::Logout);
    }

    fn sign_in(&mut self, user: AuthUser) -> AuthUser {
        if let Err(e) = save_json(&self.storage, USER_KEY, &user) {
            tracing::warn!(error = %e, "failed to persist signed-in user");
        }
        tracing::info!(user_id = %user.id, role = ?user.role, "signed in");
        self.dispatch(AuthAction::Success(user.clone()));
        user
    }

    fn dispatch(&mut self, action: AuthAction) {
        tracing::debug!(?action, "auth dispatch");
        self.state = reduce(std::mem::take(&mut self.state), action);
    }
}
