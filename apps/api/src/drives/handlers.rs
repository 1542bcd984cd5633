//! Axum route handlers for companies and drives.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AdminAccount, AuthedAccount};
use crate::errors::AppError;
use crate::models::company::CompanyRow;
use crate::models::drive::DriveRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyRow>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let company: CompanyRow = sqlx::query_as(
        r#"
        INSERT INTO companies (id, name, website, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.name.trim())
    .bind(request.website.as_deref())
    .bind(request.description.as_deref())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    AuthedAccount(_account): AuthedAccount,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    let companies: Vec<CompanyRow> =
        sqlx::query_as("SELECT * FROM companies ORDER BY name ASC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    AuthedAccount(_account): AuthedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRow>, AppError> {
    let company: Option<CompanyRow> = sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    company
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct CreateDriveRequest {
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub ctc_lpa: Option<f64>,
    pub min_cgpa: Option<f64>,
    pub max_backlogs: Option<i32>,
    #[serde(default)]
    pub allowed_branches: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
}

/// POST /api/v1/drives
pub async fn handle_create_drive(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Json(request): Json<CreateDriveRequest>,
) -> Result<(StatusCode, Json<DriveRow>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.closes_at <= request.opens_at {
        return Err(AppError::Validation(
            "closes_at must be after opens_at".to_string(),
        ));
    }

    let company_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM companies WHERE id = $1")
        .bind(request.company_id)
        .fetch_optional(&state.db)
        .await?;
    if company_exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Company {} not found",
            request.company_id
        )));
    }

    let drive: DriveRow = sqlx::query_as(
        r#"
        INSERT INTO drives
            (id, company_id, title, description, ctc_lpa, min_cgpa, max_backlogs,
             allowed_branches, required_skills, opens_at, closes_at, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.company_id)
    .bind(request.title.trim())
    .bind(request.description.as_deref())
    .bind(request.ctc_lpa)
    .bind(request.min_cgpa)
    .bind(request.max_backlogs)
    .bind(&request.allowed_branches)
    .bind(&request.required_skills)
    .bind(request.opens_at)
    .bind(request.closes_at)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(drive)))
}

#[derive(Debug, Deserialize)]
pub struct DriveFilter {
    /// When true, only drives whose registration window is currently open.
    #[serde(default)]
    pub open: bool,
}

/// GET /api/v1/drives
pub async fn handle_list_drives(
    State(state): State<AppState>,
    AuthedAccount(_account): AuthedAccount,
    Query(filter): Query<DriveFilter>,
) -> Result<Json<Vec<DriveRow>>, AppError> {
    let query = if filter.open {
        "SELECT * FROM drives WHERE active AND opens_at <= NOW() AND NOW() <= closes_at ORDER BY closes_at ASC"
    } else {
        "SELECT * FROM drives ORDER BY opens_at DESC"
    };

    let drives: Vec<DriveRow> = sqlx::query_as(query).fetch_all(&state.db).await?;
    Ok(Json(drives))
}

/// GET /api/v1/drives/:id
pub async fn handle_get_drive(
    State(state): State<AppState>,
    AuthedAccount(_account): AuthedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<DriveRow>, AppError> {
    let drive: Option<DriveRow> = sqlx::query_as("SELECT * FROM drives WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    drive
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Drive {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDriveRequest {
    pub active: Option<bool>,
    pub closes_at: Option<DateTime<Utc>>,
}

/// PATCH /api/v1/drives/:id
///
/// Admins can close a drive early or extend its window.
pub async fn handle_update_drive(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriveRequest>,
) -> Result<Json<DriveRow>, AppError> {
    let drive: Option<DriveRow> = sqlx::query_as(
        r#"
        UPDATE drives
        SET active = COALESCE($1, active), closes_at = COALESCE($2, closes_at)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(request.active)
    .bind(request.closes_at)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    drive
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Drive {id} not found")))
}
