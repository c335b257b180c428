pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod json;
pub mod models;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::{get, get_service}, Router};
use sqlx::SqlitePool;
use std::path::PathBuf;
use time::Duration;
use tower::Layer;
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::db::EntryRepository;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub entries: EntryRepository,
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

fn cached_dir(dir: PathBuf) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    )
    .layer(ServeDir::new(dir))
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on `db` beforehand.
/// The session store table is migrated here, on `sessions`, which may be the
/// same pool as `db`.
pub async fn build_app(
    db: SqlitePool,
    sessions: SqlitePool,
    config: &Config,
) -> Result<Router, sqlx::Error> {
    let session_store = SqliteStore::new(sessions);
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_lifetime_hours)))
        .with_secure(config.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax);

    let state = AppState {
        entries: EntryRepository::new(db),
    };

    let frontend = &config.frontend_dir;

    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::entries::router())
        .route("/", get_service(ServeFile::new(frontend.join("index.html"))))
        .nest_service("/assets", cached_dir(frontend.join("assets")))
        .nest_service("/img", cached_dir(frontend.clone()))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(json::MAX_BODY_BYTES))
        .layer(session_layer)
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    Ok(app)
}
