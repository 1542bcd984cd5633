use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `student_profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfileRow {
    pub account_id: Uuid,
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    pub branch: String,
    pub cgpa: f64,
    pub backlogs: i32,
    pub resume_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One roster entry: the account/profile join returned to admins.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RosterEntry {
    pub account_id: Uuid,
    pub email: String,
    pub active: bool,
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    pub branch: String,
    pub cgpa: f64,
    pub backlogs: i32,
}
