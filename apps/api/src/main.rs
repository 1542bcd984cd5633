mod applications;
mod auth;
mod config;
mod db;
mod drives;
mod errors;
mod imports;
mod mailer;
mod models;
mod notify;
mod resumes;
mod routes;
mod state;
mod students;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::mailer::{MailClient, Mailer};
use crate::notify::NotificationOutbox;
use crate::resumes::scoring::KeywordResumeScorer;
use crate::routes::build_router;
use crate::state::AppState;

/// Bounded capacity of the notification outbox channel.
const OUTBOX_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting placements API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize mail client and notification outbox
    let mailer: Arc<dyn Mailer> = Arc::new(MailClient::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ));
    let outbox = NotificationOutbox::spawn(db.clone(), mailer, OUTBOX_CAPACITY);
    info!("Notification outbox ready (capacity: {OUTBOX_CAPACITY})");

    // Initialize resume scorer (KeywordResumeScorer by default)
    let resume_scorer = Arc::new(KeywordResumeScorer);

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        outbox,
        resume_scorer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
