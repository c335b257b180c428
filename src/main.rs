use anyhow::Context;
use guestbook::config::Config;
use guestbook::db;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    tracing::info!("Configuration parsed");

    tracing::info!("Connecting to database");
    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;

    db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database schema is up to date");

    let sessions = match &config.session_database_url {
        Some(url) => db::init_pool(url, config.db_max_connections)
            .await
            .context("Failed to connect to session database")?,
        None => pool.clone(),
    };

    let app = guestbook::build_app(pool, sessions, &config)
        .await
        .context("Failed to set up session store")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
