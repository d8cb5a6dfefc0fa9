pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use mock_api::store::{Backend, NewProduct, NewStore};
use mock_api::{Config, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, telemetry};
use payloads::requests::LoginCredentials;
use payloads::responses::LoginResponse;
use payloads::{
    APIClient, ClientConfig, MemoryStore, Product, ProductStatus, Store,
    StoreStatus,
};
use rust_decimal::Decimal;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    /// Logged out until [`TestApp::login_admin`] is called.
    pub client: APIClient,
    /// The token and user `client` sends with each request.
    pub secrets: Arc<MemoryStore>,
    /// Direct access to the data behind the server.
    pub backend: Backend,
}

impl TestApp {
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// A second client for the same server with its own secret store and
    /// timeout.
    pub fn client_with_timeout(&self, timeout: Duration) -> APIClient {
        let mut config = ClientConfig::new(self.address());
        config.timeout = timeout;
        APIClient::new(config, Arc::new(MemoryStore::new()))
    }

    pub async fn login_admin(&self) -> anyhow::Result<LoginResponse> {
        Ok(self.client.login(&admin_credentials()).await.into_result()?)
    }

    pub fn create_test_store(&self, name: &str) -> anyhow::Result<Store> {
        Ok(self.backend.add_store(NewStore {
            name: name.into(),
            address: Some("12 Lý Thường Kiệt, Hà Nội".into()),
            phone: Some("0901234567".into()),
            owner_id: None,
            status: StoreStatus::Active,
        })?)
    }

    /// A store holding `count` active products named "Dish 1".."Dish n",
    /// priced 10000, 20000, ... in that order.
    pub fn create_test_products(
        &self,
        count: usize,
    ) -> anyhow::Result<(Store, Vec<Product>)> {
        let store = self.create_test_store("Bếp Test")?;
        let products = (1..=count)
            .map(|n| {
                self.backend.add_product(NewProduct {
                    name: format!("Dish {n}"),
                    price: Decimal::from(n as i64 * 10_000),
                    original_price: None,
                    quantity: 5,
                    status: ProductStatus::Active,
                    store_id: store.id,
                    category: Some("Test".into()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((store, products))
    }
}

pub fn admin_credentials() -> LoginCredentials {
    LoginCredentials {
        email: DEFAULT_ADMIN_EMAIL.into(),
        password: DEFAULT_ADMIN_PASSWORD.into(),
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let mut config = Config {
        ip: "127.0.0.1".into(),
        port,
        allowed_origins: vec!["*".to_string()],
        admin_email: DEFAULT_ADMIN_EMAIL.into(),
        admin_password: DEFAULT_ADMIN_PASSWORD.to_string().into(),
    };
    let backend = Backend::default();
    let server = mock_api::build(&mut config, backend.clone()).unwrap();
    tokio::spawn(server);

    let secrets = Arc::new(MemoryStore::new());
    let client = APIClient::new(
        ClientConfig::new(format!("http://127.0.0.1:{}", config.port)),
        secrets.clone(),
    );

    TestApp {
        port: config.port,
        client,
        secrets,
        backend,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}
