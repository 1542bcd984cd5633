use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::notify::NotificationOutbox;
use crate::resumes::scoring::ResumeScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Handle to the notification outbox. Enqueueing never blocks a request.
    pub outbox: NotificationOutbox,
    /// Pluggable resume scorer. Default: KeywordResumeScorer.
    pub resume_scorer: Arc<dyn ResumeScorer>,
}
