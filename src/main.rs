use intraportal::config::AppConfig;
use intraportal::{db, routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intraportal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Database pool ready"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState { db: pool, config };
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(host = %addr, "Starting intraportal API server");
    axum::serve(listener, app).await?;

    Ok(())
}
