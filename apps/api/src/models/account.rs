#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";

/// A row from the `accounts` table.
///
/// Accounts created by a bulk invite start inactive with a single-use
/// `invite_token`; accepting the invite activates the account, clears the
/// token, and issues the bearer `auth_token`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub active: bool,
    #[serde(skip_serializing)]
    pub invite_token: Option<String>,
    pub invite_sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccountRow {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
