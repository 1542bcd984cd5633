//! Axum route handlers for the applications workflow.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::bulk_update::{
    apply_bulk_update, parse_status_csv, BulkUpdateReport, CsvParseError,
};
use crate::applications::eligibility::{check_eligibility, EligibilityCriteria};
use crate::applications::status::ApplicationStatus;
use crate::auth::{AdminAccount, AuthedAccount};
use crate::errors::AppError;
use crate::models::application::{ApplicantEntry, ApplicationListEntry, ApplicationRow};
use crate::models::drive::DriveRow;
use crate::models::student::StudentProfileRow;
use crate::notify::OutboxMessage;
use crate::state::AppState;

/// POST /api/v1/drives/:drive_id/applications
///
/// A student applies to a drive. Gated on the registration window and the
/// drive's eligibility criteria; duplicate applications are a 409.
pub async fn handle_apply(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
    Path(drive_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let drive: DriveRow = sqlx::query_as("SELECT * FROM drives WHERE id = $1")
        .bind(drive_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Drive {drive_id} not found")))?;

    if !drive.is_open(Utc::now()) {
        return Err(AppError::UnprocessableEntity(
            "Registration for this drive is not open".to_string(),
        ));
    }

    let profile: StudentProfileRow =
        sqlx::query_as("SELECT * FROM student_profiles WHERE account_id = $1")
            .bind(account.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;

    let decision = check_eligibility(
        profile.cgpa,
        profile.backlogs,
        &profile.branch,
        &EligibilityCriteria::from_drive(&drive),
    );
    if !decision.eligible {
        return Err(AppError::UnprocessableEntity(format!(
            "Not eligible for this drive: {}",
            decision.reasons.join("; ")
        )));
    }

    let already_applied: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM applications WHERE drive_id = $1 AND student_id = $2")
            .bind(drive_id)
            .bind(account.id)
            .fetch_optional(&state.db)
            .await?;
    if already_applied.is_some() {
        return Err(AppError::Conflict(
            "Already applied to this drive".to_string(),
        ));
    }

    let application: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (id, drive_id, student_id, status)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(drive_id)
    .bind(account.id)
    .bind(ApplicationStatus::Applied.as_str())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
///
/// The caller's own applications, joined with drive and company names.
pub async fn handle_list_own_applications(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
) -> Result<Json<Vec<ApplicationListEntry>>, AppError> {
    let entries: Vec<ApplicationListEntry> = sqlx::query_as(
        r#"
        SELECT a.id, a.drive_id, d.title AS drive_title, c.name AS company_name,
               a.status, a.remarks, a.applied_at
        FROM applications a
        JOIN drives d ON d.id = a.drive_id
        JOIN companies c ON c.id = d.company_id
        WHERE a.student_id = $1
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(account.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct ApplicantFilter {
    pub status: Option<String>,
}

/// GET /api/v1/drives/:drive_id/applications
///
/// Admin view of a drive's applicants, optionally filtered by status.
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(drive_id): Path<Uuid>,
    Query(filter): Query<ApplicantFilter>,
) -> Result<Json<Vec<ApplicantEntry>>, AppError> {
    let status = match filter.status.as_deref() {
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status '{raw}'")))?,
        ),
        None => None,
    };

    let entries: Vec<ApplicantEntry> = sqlx::query_as(
        r#"
        SELECT a.id, a.student_id, sp.roll_no, sp.first_name, sp.last_name,
               sp.branch, sp.cgpa, a.status, a.applied_at
        FROM applications a
        JOIN student_profiles sp ON sp.account_id = a.student_id
        WHERE a.drive_id = $1
          AND ($2::text IS NULL OR a.status = $2)
        ORDER BY a.applied_at ASC
        "#,
    )
    .bind(drive_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub remarks: Option<String>,
}

/// PATCH /api/v1/applications/:id/status
///
/// Single-application status update; same enum, notification and
/// best-effort email as the bulk path.
pub async fn handle_update_status(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(application_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<StatusCode, AppError> {
    let status = ApplicationStatus::parse(&request.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", request.status)))?;

    let result: Option<(Uuid, String, String, String)> = sqlx::query_as(
        r#"
        UPDATE applications AS a
        SET status = $1, remarks = COALESCE($2, a.remarks), updated_at = NOW()
        FROM accounts ac, student_profiles sp, drives d
        WHERE a.id = $3
          AND ac.id = a.student_id
          AND sp.account_id = a.student_id
          AND d.id = a.drive_id
        RETURNING a.student_id, ac.email, sp.first_name, d.title
        "#,
    )
    .bind(status.as_str())
    .bind(request.remarks.as_deref())
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    let (student_id, email, first_name, drive_title) = result
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    state.outbox.enqueue(OutboxMessage::status_change(
        student_id,
        &email,
        &first_name,
        &drive_title,
        status.as_str(),
    ));

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/drives/:drive_id/applications/bulk-update
///
/// Multipart CSV upload (`file` field, `rollNo,status[,remarks]`). Upload
/// problems are a 400; everything past the header is per-row.
pub async fn handle_bulk_status_update(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(drive_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<BulkUpdateReport>, AppError> {
    let drive: DriveRow = sqlx::query_as("SELECT * FROM drives WHERE id = $1")
        .bind(drive_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Drive {drive_id} not found")))?;

    let mut file: Option<bytes::Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            file = Some(field.bytes().await.map_err(|e| {
                AppError::Validation(format!("Failed to read uploaded file: {e}"))
            })?);
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("file field is required".to_string()))?;

    let rows = parse_status_csv(&file).map_err(|e| match e {
        CsvParseError::Empty => AppError::Validation("uploaded file is empty".to_string()),
        other => AppError::Validation(other.to_string()),
    })?;

    let report = apply_bulk_update(&state.db, &state.outbox, &drive, &rows).await?;
    Ok(Json(report))
}
