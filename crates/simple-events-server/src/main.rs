mod config;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use simple_events_api::auth::bootstrap_admin;
use simple_events_api::state::AppState;
use simple_events_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_events=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("SIMPLE_EVENTS_SECRET is not set; using the development secret");
    }

    // Schema setup runs here; a failure stops the server.
    let db = Database::open(&config.db_path, &config.table_prefix)
        .with_context(|| format!("Failed to set up database at {}", config.db_path.display()))?;

    if let Some(admin) = &config.admin {
        bootstrap_admin(&db, &admin.username, &admin.password)?;
    }

    let state = AppState::new(db, config.settings())?;

    let app = simple_events_api::router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Simple Events listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
