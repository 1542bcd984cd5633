use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthedAccount;
use crate::errors::AppError;
use crate::models::drive::DriveRow;
use crate::resumes::scoring::ResumeReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    /// Falls back to the caller's stored resume text when omitted.
    pub resume_text: Option<String>,
    /// When set, the drive's required skills feed the skill component.
    pub drive_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub drive_id: Option<Uuid>,
    pub report: ResumeReport,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let resume_text = match request.resume_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => sqlx::query_scalar::<_, Option<String>>(
            "SELECT resume_text FROM student_profiles WHERE account_id = $1",
        )
        .bind(account.id)
        .fetch_optional(&state.db)
        .await?
        .flatten()
        .ok_or_else(|| {
            AppError::Validation(
                "resume_text is required when no stored resume exists".to_string(),
            )
        })?,
    };

    let required_skills = match request.drive_id {
        Some(drive_id) => {
            let drive: DriveRow = sqlx::query_as("SELECT * FROM drives WHERE id = $1")
                .bind(drive_id)
                .fetch_optional(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Drive {drive_id} not found")))?;
            drive.required_skills
        }
        None => Vec::new(),
    };

    let report = state
        .resume_scorer
        .score(&resume_text, &required_skills)
        .await?;

    Ok(Json(AnalyzeResumeResponse {
        drive_id: request.drive_id,
        report,
    }))
}
