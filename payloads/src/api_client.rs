use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    AuthenticatedUser, Envelope, ListQuery, Order, OrderId, OrderStatus,
    PaginatedResult, Product, ProductId, ProductStatus, SecretStore, Session,
    Store, StoreId, StoreStatus, User, UserId, normalize, requests, responses,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    /// Sent as `multipart/form-data`; reqwest sets the boundary header.
    Multipart(reqwest::multipart::Form),
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub address: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `BACKEND_URL` (required) and `REQUEST_TIMEOUT_MS` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        use std::env::var;

        let address = var("BACKEND_URL")
            .map_err(|_| ConfigError::Missing("BACKEND_URL"))?;
        let timeout = match var("REQUEST_TIMEOUT_MS") {
            Ok(ms) => Duration::from_millis(ms.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    name: "REQUEST_TIMEOUT_MS",
                    value: ms.clone(),
                }
            })?),
            Err(_) => DEFAULT_TIMEOUT,
        };
        Ok(Self { address, timeout })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// An API client for interfacing with the backend.
///
/// Every call resolves to an [`Envelope`]; transport failures, timeouts and
/// error statuses are returned as data rather than raised.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub secrets: Arc<dyn SecretStore>,
    pub timeout: Duration,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(config: ClientConfig, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            address: config.address,
            inner_client: reqwest::Client::new(),
            secrets,
            timeout: config.timeout,
        }
    }

    fn format_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.address.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Perform one request against the backend.
    ///
    /// The bearer token is read from the secret store on every call. The
    /// whole exchange, including reading the body, is raced against
    /// `self.timeout`; if the timer wins the request is dropped and the
    /// result is [`ClientError::Timeout`].
    pub async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
    ) -> Envelope<Value> {
        tracing::debug!(method = method.as_str(), endpoint, "Sending request");
        let envelope = match self.send(endpoint, method, body).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::Err(e),
        };
        if let Envelope::Err(e) = &envelope {
            tracing::warn!(method = method.as_str(), endpoint, "Request failed: {e}");
        }
        envelope
    }

    async fn send(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
    ) -> Result<Envelope<Value>, ClientError> {
        if endpoint.trim().is_empty() {
            return Err(ClientError::InvalidEndpoint);
        }

        let mut request = self
            .inner_client
            .request(method.into(), self.format_url(endpoint));
        if let Some(token) = Session::token(self.secrets.as_ref()) {
            request = request.bearer_auth(token.expose_secret());
        }
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request.header(CONTENT_TYPE, "application/json"),
        };

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };
        let (status, text) = crate::time::timeout(self.timeout, exchange)
            .await
            .ok_or(ClientError::Timeout)??;

        Ok(normalize(status, &text))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Envelope<T> {
        self.request(endpoint, HttpMethod::Get, None).await.decode()
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Envelope<PaginatedResult<T>> {
        let query_string = match query.to_query_string() {
            Ok(query_string) => query_string,
            Err(e) => return Envelope::Err(ClientError::Encode(e.to_string())),
        };
        let endpoint = format!("{endpoint}?{query_string}");
        self.request(&endpoint, HttpMethod::Get, None)
            .await
            .and_then(PaginatedResult::<T>::from_envelope)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: &impl Serialize,
    ) -> Envelope<T> {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => return Envelope::Err(ClientError::Encode(e.to_string())),
        };
        self.request(endpoint, method, Some(RequestBody::Json(body)))
            .await
            .decode()
    }

    async fn delete(&self, endpoint: &str) -> Envelope<()> {
        self.request(endpoint, HttpMethod::Delete, None)
            .await
            .discard()
    }
}

/// Session methods
impl APIClient {
    /// Log in and persist the token and user for subsequent requests.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Envelope<responses::LoginResponse> {
        let envelope: Envelope<responses::LoginResponse> = self
            .send_json("/api/back-office/auth/login", HttpMethod::Post, details)
            .await;
        envelope.and_then(|login, _| {
            Session::save(self.secrets.as_ref(), &login)
                .map_err(|e| ClientError::Encode(e.to_string()))?;
            tracing::info!("Logged in as {}", login.user.email);
            Ok(login)
        })
    }

    /// Forget the stored token and user. Takes effect on the next request.
    pub fn logout(&self) {
        Session::clear(self.secrets.as_ref());
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        Session::current_user(self.secrets.as_ref())
    }
}

/// Store (shop) management
impl APIClient {
    pub async fn list_stores(
        &self,
        query: &ListQuery,
    ) -> Envelope<PaginatedResult<Store>> {
        self.get_page("/api/admin/shops", query).await
    }

    pub async fn get_store(&self, store_id: StoreId) -> Envelope<Store> {
        self.get(&format!("/api/admin/shops/{store_id}")).await
    }

    pub async fn update_store(
        &self,
        store_id: StoreId,
        details: &requests::UpdateStore,
    ) -> Envelope<Store> {
        self.send_json(
            &format!("/api/admin/shops/{store_id}"),
            HttpMethod::Put,
            details,
        )
        .await
    }

    pub async fn update_store_status(
        &self,
        store_id: StoreId,
        status: StoreStatus,
    ) -> Envelope<Store> {
        self.send_json(
            &format!("/api/admin/shops/{store_id}/status"),
            HttpMethod::Put,
            &requests::UpdateStoreStatus { status },
        )
        .await
    }

    pub async fn delete_store(&self, store_id: StoreId) -> Envelope<()> {
        self.delete(&format!("/api/admin/shops/{store_id}")).await
    }
}

/// Product management
impl APIClient {
    pub async fn list_products(
        &self,
        query: &ListQuery,
    ) -> Envelope<PaginatedResult<Product>> {
        self.get_page("/api/admin/products", query).await
    }

    pub async fn get_product(&self, product_id: ProductId) -> Envelope<Product> {
        self.get(&format!("/api/admin/products/{product_id}")).await
    }

    pub async fn update_product(
        &self,
        product_id: ProductId,
        details: &requests::UpdateProduct,
    ) -> Envelope<Product> {
        self.send_json(
            &format!("/api/admin/products/{product_id}"),
            HttpMethod::Put,
            details,
        )
        .await
    }

    pub async fn update_product_status(
        &self,
        product_id: ProductId,
        status: ProductStatus,
    ) -> Envelope<Product> {
        self.send_json(
            &format!("/api/admin/products/{product_id}/status"),
            HttpMethod::Put,
            &requests::UpdateProductStatus { status },
        )
        .await
    }

    pub async fn delete_product(&self, product_id: ProductId) -> Envelope<()> {
        self.delete(&format!("/api/admin/products/{product_id}")).await
    }
}

/// Order management
impl APIClient {
    pub async fn list_orders(
        &self,
        query: &ListQuery,
    ) -> Envelope<PaginatedResult<Order>> {
        self.get_page("/api/admin/orders", query).await
    }

    pub async fn get_order(&self, order_id: OrderId) -> Envelope<Order> {
        self.get(&format!("/api/admin/orders/{order_id}")).await
    }

    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Envelope<Order> {
        self.send_json(
            &format!("/api/admin/orders/{order_id}/status"),
            HttpMethod::Put,
            &requests::UpdateOrderStatus { status },
        )
        .await
    }
}

/// Back-office accounts
impl APIClient {
    pub async fn list_users(
        &self,
        query: &ListQuery,
    ) -> Envelope<PaginatedResult<User>> {
        self.get_page("/api/back-office/users", query).await
    }

    pub async fn create_user(
        &self,
        details: &requests::CreateUser,
    ) -> Envelope<User> {
        self.send_json("/api/back-office/users", HttpMethod::Post, details)
            .await
    }

    pub async fn update_user(
        &self,
        user_id: UserId,
        details: &requests::UpdateUser,
    ) -> Envelope<User> {
        self.send_json(
            &format!("/api/back-office/users/{user_id}"),
            HttpMethod::Put,
            details,
        )
        .await
    }

    pub async fn delete_user(&self, user_id: UserId) -> Envelope<()> {
        self.delete(&format!("/api/back-office/users/{user_id}")).await
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Endpoint must not be empty")]
    InvalidEndpoint,
    #[error("Request timeout")]
    Timeout,
    /// An error status, with the best message found in the response body.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// A 2xx response whose body said `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("Network error. Please check your connection.")]
    Network(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Text suitable for showing next to a retry control.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout | Self::Network(_) => {
                "Connection error, please retry.".to_string()
            }
            e if e.is_unauthorized() => {
                "Authentication required. Please log in again.".to_string()
            }
            e => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
