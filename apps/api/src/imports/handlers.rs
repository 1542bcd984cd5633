use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::auth::AdminAccount;
use crate::errors::AppError;
use crate::imports::pipeline::run_bulk_invite;
use crate::imports::report::ImportReport;
use crate::imports::store::PgStudentStore;
use crate::notify::OutboxMessage;
use crate::state::AppState;

/// POST /api/v1/students/bulk-invite
///
/// Accepts `{ "students": [...] }` and returns the batch report with 201 on
/// any completed run, partial failures included. Only the snapshot fetch
/// can turn the whole request into a 500.
pub async fn handle_bulk_invite(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ImportReport>), AppError> {
    let students = body
        .get("students")
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty())
        .ok_or_else(|| {
            AppError::Validation("students must be a non-empty array".to_string())
        })?;

    let store = PgStudentStore::new(state.db.clone());
    let outcome = run_bulk_invite(&store, students)
        .await
        .map_err(AppError::Internal)?;

    for invite in &outcome.invites {
        state.outbox.enqueue(OutboxMessage::invite(
            invite.account_id,
            &invite.email,
            &invite.first_name,
            &invite.token,
            &state.config.app_base_url,
        ));
    }

    Ok((StatusCode::CREATED, Json(outcome.report)))
}
