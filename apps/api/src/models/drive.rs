use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `drives` table: one company's recruitment cycle, with its
/// eligibility criteria and registration window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriveRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Offered CTC in lakhs per annum.
    pub ctc_lpa: Option<f64>,
    pub min_cgpa: Option<f64>,
    pub max_backlogs: Option<i32>,
    pub allowed_branches: Vec<String>,
    pub required_skills: Vec<String>,
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl DriveRow {
    /// Whether the registration window is currently open.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.active && self.opens_at <= now && now <= self.closes_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_drive(opens_offset_hours: i64, closes_offset_hours: i64, active: bool) -> DriveRow {
        let now = Utc::now();
        DriveRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Graduate Engineer".to_string(),
            description: None,
            ctc_lpa: Some(12.0),
            min_cgpa: None,
            max_backlogs: None,
            allowed_branches: vec![],
            required_skills: vec![],
            opens_at: now + Duration::hours(opens_offset_hours),
            closes_at: now + Duration::hours(closes_offset_hours),
            active,
            created_at: now,
        }
    }

    #[test]
    fn test_open_within_window() {
        assert!(make_drive(-1, 1, true).is_open(Utc::now()));
    }

    #[test]
    fn test_closed_before_window() {
        assert!(!make_drive(1, 2, true).is_open(Utc::now()));
    }

    #[test]
    fn test_closed_after_window() {
        assert!(!make_drive(-2, -1, true).is_open(Utc::now()));
    }

    #[test]
    fn test_inactive_drive_never_open() {
        assert!(!make_drive(-1, 1, false).is_open(Utc::now()));
    }
}
