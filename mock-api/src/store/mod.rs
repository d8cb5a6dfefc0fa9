//! In-memory data behind the stub backend.
//!
//! Everything lives in one mutex-guarded [`Data`] value. Ids come from a
//! single counter shared by all entities, so an id never names two things.
//! Sessions are opaque uuid tokens handed out by [`Backend::login`] and never
//! expire; the dashboards only care that a token is present and accepted.

mod catalog;
mod listing;
mod orders;

pub use catalog::{NewProduct, NewStore};
pub use listing::{ListParams, Listed, Page};
pub use orders::NewOrder;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::Timestamp;
use payloads::requests::{CreateUser, LoginCredentials, UpdateUser};
use payloads::responses::LoginResponse;
use payloads::{
    AuthenticatedUser, Order, OrderId, Product, ProductId, Role, Store, StoreId,
    User, UserId,
};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct Backend {
    data: Arc<Mutex<Data>>,
}

#[derive(Default)]
struct Data {
    next_id: i64,
    stores: BTreeMap<StoreId, Store>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    accounts: BTreeMap<UserId, Account>,
    sessions: HashMap<String, UserId>,
}

struct Account {
    user: User,
    password: SecretString,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Backend {
    fn lock(&self) -> MutexGuard<'_, Data> {
        // a panicking handler can't leave the maps half-updated
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add the admin account if no account uses `email` yet.
    pub fn ensure_admin(&self, email: &str, password: &SecretString) {
        let mut data = self.lock();
        if data.accounts.values().any(|a| a.user.email == email) {
            return;
        }
        let id = UserId(data.next_id());
        let user = User {
            id,
            name: "Administrator".into(),
            email: email.into(),
            role: Role::Admin,
            phone: None,
            active: true,
            created_at: Some(Timestamp::now()),
            extra: Default::default(),
        };
        data.accounts.insert(
            id,
            Account {
                user,
                password: password.clone(),
            },
        );
    }

    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginResponse, StoreError> {
        let mut data = self.lock();
        let account = data
            .accounts
            .values()
            .find(|a| a.user.email.eq_ignore_ascii_case(&credentials.email))
            .filter(|a| a.password.expose_secret() == credentials.password)
            .ok_or(StoreError::InvalidCredentials)?;
        if !account.user.active {
            return Err(StoreError::AccountDisabled);
        }
        let user = authenticated(&account.user);
        let token = Uuid::new_v4().to_string();
        data.sessions.insert(token.clone(), user.id);
        Ok(LoginResponse {
            user,
            access_token: token,
        })
    }

    /// Resolve a bearer token to the account it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, StoreError> {
        let data = self.lock();
        let user_id = data.sessions.get(token).ok_or(StoreError::InvalidToken)?;
        let account = data.accounts.get(user_id).ok_or(StoreError::InvalidToken)?;
        if !account.user.active {
            return Err(StoreError::AccountDisabled);
        }
        Ok(authenticated(&account.user))
    }

    pub fn list_users(&self, params: &ListParams) -> Page<User> {
        let data = self.lock();
        let rows = data.accounts.values().map(|a| a.user.clone()).collect();
        listing::paginate(rows, params)
    }

    pub fn create_user(&self, details: &CreateUser) -> Result<User, StoreError> {
        let name = non_empty("name", &details.name)?;
        let email = non_empty("email", &details.email)?;
        if details.password.len() < 6 {
            return Err(StoreError::WeakPassword);
        }
        let mut data = self.lock();
        if data
            .accounts
            .values()
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
        {
            return Err(StoreError::EmailTaken(email.to_string()));
        }
        let id = UserId(data.next_id());
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: details.role,
            phone: details.phone.clone(),
            active: true,
            created_at: Some(Timestamp::now()),
            extra: Default::default(),
        };
        data.accounts.insert(
            id,
            Account {
                user: user.clone(),
                password: SecretString::from(details.password.clone()),
            },
        );
        Ok(user)
    }

    pub fn update_user(
        &self,
        user_id: UserId,
        details: &UpdateUser,
    ) -> Result<User, StoreError> {
        let mut data = self.lock();
        let account =
            data.accounts.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        if let Some(name) = &details.name {
            account.user.name = non_empty("name", name)?.to_string();
        }
        if let Some(phone) = &details.phone {
            account.user.phone = Some(phone.clone());
        }
        if let Some(role) = details.role {
            account.user.role = role;
        }
        if let Some(active) = details.active {
            account.user.active = active;
        }
        let user = account.user.clone();
        if !user.active {
            data.sessions.retain(|_, id| *id != user_id);
        }
        Ok(user)
    }

    pub fn delete_user(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.accounts.remove(&user_id).ok_or(StoreError::UserNotFound)?;
        data.sessions.retain(|_, id| *id != user_id);
        Ok(())
    }
}

fn authenticated(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
    }
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(StoreError::EmptyField(field))
    } else {
        Ok(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is disabled")]
    AccountDisabled,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Admin role required")]
    RequiresAdmin,
    #[error("Store not found")]
    StoreNotFound,
    #[error("Product not found")]
    ProductNotFound,
    #[error("Order not found")]
    OrderNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Email '{0}' is already registered")]
    EmailTaken(String),
    #[error("Password must be at least 6 characters")]
    WeakPassword,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("Price must not be negative")]
    NegativePrice,
    #[error("Quantity must not be negative")]
    NegativeQuantity,
    #[error("Order is already {0}")]
    OrderClosed(&'static str),
    #[error("Unknown status")]
    UnknownStatus,
}
