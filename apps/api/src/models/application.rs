use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `applications` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub drive_id: Uuid,
    pub student_id: Uuid,
    pub status: String,
    pub remarks: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One application joined with its drive and company, as shown to students.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationListEntry {
    pub id: Uuid,
    pub drive_id: Uuid,
    pub drive_title: String,
    pub company_name: String,
    pub status: String,
    pub remarks: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// One applicant joined with their profile, as shown to admins for a drive.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicantEntry {
    pub id: Uuid,
    pub student_id: Uuid,
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    pub branch: String,
    pub cgpa: f64,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// A row from the `notifications` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
