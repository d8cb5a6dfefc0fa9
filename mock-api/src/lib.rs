pub mod routes;
pub mod store;
pub mod telemetry;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use secrecy::SecretString;
use std::net::TcpListener;

use crate::store::Backend;

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
/// The admin account from `config` is added to `backend` so it can log in.
pub fn build(config: &mut Config, backend: Backend) -> std::io::Result<Server> {
    backend.ensure_admin(&config.admin_email, &config.admin_password);
    let backend = web::Data::new(backend);

    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|origin| origin == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials();
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .service(routes::api_services())
            .app_data(backend.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin (development only)
    pub allowed_origins: Vec<String>,
    pub admin_email: String,
    pub admin_password: SecretString,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;
        use std::env::var;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            ip: var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".into()),
            port: var("PORT")
                .unwrap_or_else(|_| "8000".into())
                .parse()
                .context("PORT must be a port number")?,
            allowed_origins,
            admin_email: var("ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into()),
            admin_password: SecretString::from(
                var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
            ),
        })
    }
}

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@foodshare.vn";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
