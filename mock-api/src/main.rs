use mock_api::{
    Config, build,
    store::Backend,
    telemetry::{get_subscriber, init_subscriber, log_error},
};

/// FoodShare stub backend
///
/// Serves the admin and back-office routes the dashboards use from memory.
/// Environment variables can be set directly or loaded from a .env file in
/// the project root. All are optional:
/// - IP_ADDRESS: bind address (default 127.0.0.1)
/// - PORT: port (default 8000, 0 for an OS-assigned port)
/// - ALLOWED_ORIGINS: "*" or a comma-separated list of origins
/// - ADMIN_EMAIL / ADMIN_PASSWORD: the account accepted by the login route
///
/// The store starts empty apart from the admin account; run the dev-server
/// crate for seeded data.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = get_subscriber("info".into());
    init_subscriber(subscriber)?;

    let mut config = Config::from_env()?;
    let server = build(&mut config, Backend::default())?;
    tracing::info!("Listening on http://{}:{}", config.ip, config.port);
    if let Err(e) = server.await {
        log_error(e);
    }
    Ok(())
}
