//! Arqo API server.
//!
//! Wires configuration, the database pool, and the JWT validator into the
//! Axum router and serves it.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arqo_api::{AppState, create_router};
use arqo_db::connect_with_pool;
use arqo_shared::jwt::JwtConfig;
use arqo_shared::time::parse_timezone;
use arqo_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arqo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        token_expires_minutes: config.auth.token_expiry_minutes,
    });

    // Register days roll over in the store's timezone, not UTC.
    let timezone = parse_timezone(&config.register.timezone)?;
    info!(timezone = %timezone, "Register timezone configured");

    let app = create_router(AppState::new(db, jwt_service, timezone));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
