//! Axum route handlers for the student roster and self-service endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AdminAccount, AuthedAccount};
use crate::errors::AppError;
use crate::models::application::NotificationRow;
use crate::models::student::{RosterEntry, StudentProfileRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/students
///
/// Paginated admin roster. Heavy lifting stays in the database.
pub async fn handle_list_students(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Query(page): Query<RosterQuery>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);

    let roster: Vec<RosterEntry> = sqlx::query_as(
        r#"
        SELECT ac.id AS account_id, ac.email, ac.active, sp.roll_no,
               sp.first_name, sp.last_name, sp.branch, sp.cgpa, sp.backlogs
        FROM accounts ac
        JOIN student_profiles sp ON sp.account_id = ac.id
        ORDER BY sp.roll_no ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(roster))
}

/// GET /api/v1/students/:id
pub async fn handle_get_student(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentProfileRow>, AppError> {
    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE account_id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    profile
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
}

/// GET /api/v1/me/profile
pub async fn handle_get_own_profile(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
) -> Result<Json<StudentProfileRow>, AppError> {
    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE account_id = $1")
            .bind(account.id)
            .fetch_optional(&state.db)
            .await?;
    profile
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub branch: Option<String>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<i32>,
    pub resume_text: Option<String>,
}

/// PATCH /api/v1/me/profile
pub async fn handle_update_own_profile(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<StudentProfileRow>, AppError> {
    if let Some(cgpa) = request.cgpa {
        if !(0.0..=10.0).contains(&cgpa) {
            return Err(AppError::Validation(
                "cgpa must be between 0 and 10".to_string(),
            ));
        }
    }
    if let Some(backlogs) = request.backlogs {
        if backlogs < 0 {
            return Err(AppError::Validation(
                "backlogs cannot be negative".to_string(),
            ));
        }
    }

    let profile: Option<StudentProfileRow> = sqlx::query_as(
        r#"
        UPDATE student_profiles
        SET first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            branch = COALESCE($3, branch),
            cgpa = COALESCE($4, cgpa),
            backlogs = COALESCE($5, backlogs),
            resume_text = COALESCE($6, resume_text),
            updated_at = NOW()
        WHERE account_id = $7
        RETURNING *
        "#,
    )
    .bind(request.first_name.as_deref())
    .bind(request.last_name.as_deref())
    .bind(request.branch.as_deref())
    .bind(request.cgpa)
    .bind(request.backlogs)
    .bind(request.resume_text.as_deref())
    .bind(account.id)
    .fetch_optional(&state.db)
    .await?;

    profile
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInviteResponse {
    pub account_id: Uuid,
    pub email: String,
    pub auth_token: String,
}

/// POST /api/v1/invites/accept
///
/// Exchanges a pending invite token for an activated account and a fresh
/// bearer token. The invite token is cleared in the same statement, so a
/// second acceptance attempt sees 404.
pub async fn handle_accept_invite(
    State(state): State<AppState>,
    Json(request): Json<AcceptInviteRequest>,
) -> Result<Json<AcceptInviteResponse>, AppError> {
    if request.token.trim().is_empty() {
        return Err(AppError::Validation("token cannot be empty".to_string()));
    }

    let auth_token = Uuid::new_v4().simple().to_string();
    let activated: Option<(Uuid, String)> = sqlx::query_as(
        r#"
        UPDATE accounts
        SET active = TRUE, invite_token = NULL, auth_token = $1, activated_at = NOW()
        WHERE invite_token = $2 AND active = FALSE
        RETURNING id, email
        "#,
    )
    .bind(&auth_token)
    .bind(request.token.trim())
    .fetch_optional(&state.db)
    .await?;

    let (account_id, email) = activated
        .ok_or_else(|| AppError::NotFound("Invite token not found or already used".to_string()))?;

    Ok(Json(AcceptInviteResponse {
        account_id,
        email,
        auth_token,
    }))
}

/// GET /api/v1/me/notifications
pub async fn handle_list_own_notifications(
    State(state): State<AppState>,
    AuthedAccount(account): AuthedAccount,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let notifications: Vec<NotificationRow> = sqlx::query_as(
        "SELECT * FROM notifications WHERE account_id = $1 ORDER BY created_at DESC",
    )
    .bind(account.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(notifications))
}
