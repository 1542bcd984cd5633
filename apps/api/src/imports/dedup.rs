//! Duplicate detection against the pre-fetched identifier snapshot.
//!
//! The snapshot is read once before the batch starts and never refreshed,
//! so records within one batch are not cross-checked against each other;
//! the storage layer's uniqueness constraints catch those at commit time.

use std::collections::HashSet;

use crate::imports::record::NormalizedRecord;

pub const REASON_EMAIL_EXISTS: &str = "Email already exists";
pub const REASON_ROLL_NO_EXISTS: &str = "Roll number already exists";

/// Emails and roll numbers already present in storage.
#[derive(Debug, Default, Clone)]
pub struct IdentifierSnapshot {
    pub emails: HashSet<String>,
    pub roll_numbers: HashSet<String>,
}

/// Classification of one normalized record against the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass {
    Candidate,
    /// The record's email collides. Carries the offending value.
    DuplicateEmail(String),
    /// The record's roll number collides. Carries the offending value.
    DuplicateRollNo(String),
}

/// Classifies one record. The email check runs first and wins when both
/// identifiers collide. Matching is exact and case-sensitive.
pub fn classify(record: &NormalizedRecord, snapshot: &IdentifierSnapshot) -> RowClass {
    if let Some(email) = record.email_str() {
        if snapshot.emails.contains(email) {
            return RowClass::DuplicateEmail(email.to_string());
        }
    }
    if let Some(roll_no) = record.roll_no_str() {
        if snapshot.roll_numbers.contains(&roll_no) {
            return RowClass::DuplicateRollNo(roll_no);
        }
    }
    RowClass::Candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::record::normalize;
    use serde_json::json;

    fn snapshot(emails: &[&str], rolls: &[&str]) -> IdentifierSnapshot {
        IdentifierSnapshot {
            emails: emails.iter().map(|s| s.to_string()).collect(),
            roll_numbers: rolls.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fresh_record_is_candidate() {
        let rec = normalize(&json!({ "email": "new@x.edu", "rollNo": "CS1" }));
        assert_eq!(classify(&rec, &snapshot(&[], &[])), RowClass::Candidate);
    }

    #[test]
    fn test_existing_email_is_duplicate() {
        let rec = normalize(&json!({ "email": "old@x.edu", "rollNo": "CS1" }));
        assert_eq!(
            classify(&rec, &snapshot(&["old@x.edu"], &[])),
            RowClass::DuplicateEmail("old@x.edu".to_string())
        );
    }

    #[test]
    fn test_existing_roll_no_is_duplicate() {
        let rec = normalize(&json!({ "email": "new@x.edu", "rollNo": "CS1" }));
        assert_eq!(
            classify(&rec, &snapshot(&[], &["CS1"])),
            RowClass::DuplicateRollNo("CS1".to_string())
        );
    }

    #[test]
    fn test_email_collision_wins_over_roll_no() {
        let rec = normalize(&json!({ "email": "old@x.edu", "rollNo": "CS1" }));
        assert_eq!(
            classify(&rec, &snapshot(&["old@x.edu"], &["CS1"])),
            RowClass::DuplicateEmail("old@x.edu".to_string())
        );
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let rec = normalize(&json!({ "email": "Old@X.edu" }));
        assert_eq!(
            classify(&rec, &snapshot(&["old@x.edu"], &[])),
            RowClass::Candidate
        );
    }

    #[test]
    fn test_record_without_identifiers_is_candidate() {
        let rec = normalize(&json!({ "firstName": "Asha" }));
        assert_eq!(
            classify(&rec, &snapshot(&["old@x.edu"], &["CS1"])),
            RowClass::Candidate
        );
    }
}
