//! Per-record validation: turns a normalized record into a typed
//! `NewStudent` or one merged failure message. All-or-nothing per record.

use std::sync::OnceLock;

use regex::Regex;

use crate::imports::record::{number, owned_text, NormalizedRecord};

/// A fully validated bulk-invite record, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub backlogs: i32,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

/// Validates one non-duplicate candidate. On failure, every broken rule is
/// collected and merged into a single semicolon-joined message.
pub fn validate(record: &NormalizedRecord) -> Result<NewStudent, String> {
    let mut problems: Vec<String> = Vec::new();

    let roll_no = required_text(&record.roll_no, "rollNo", &mut problems);
    let first_name = required_text(&record.first_name, "firstName", &mut problems);
    let last_name = required_text(&record.last_name, "lastName", &mut problems);
    let branch = required_text(&record.branch, "branch", &mut problems);

    let email = required_text(&record.email, "email", &mut problems);
    if let Some(ref email) = email {
        if !email_regex().is_match(email) {
            problems.push("email is invalid".to_string());
        }
    }

    let cgpa = match record.cgpa.as_ref().map(number) {
        None => {
            problems.push("cgpa is required".to_string());
            None
        }
        Some(None) => {
            problems.push("cgpa must be a number".to_string());
            None
        }
        Some(Some(v)) if !(0.0..=10.0).contains(&v) => {
            problems.push("cgpa must be between 0 and 10".to_string());
            None
        }
        Some(Some(v)) => Some(v),
    };

    let backlogs = match number(&record.backlogs) {
        None => {
            problems.push("backlogs must be a number".to_string());
            None
        }
        Some(v) if v < 0.0 => {
            problems.push("backlogs cannot be negative".to_string());
            None
        }
        Some(v) => Some(v as i32),
    };

    if !problems.is_empty() {
        return Err(problems.join("; "));
    }

    // Every Option is Some here: each None above pushed a problem.
    Ok(NewStudent {
        roll_no: roll_no.unwrap(),
        first_name: first_name.unwrap(),
        last_name: last_name.unwrap(),
        email: email.unwrap(),
        branch: branch.unwrap(),
        cgpa: cgpa.unwrap(),
        backlogs: backlogs.unwrap(),
    })
}

fn required_text(
    value: &Option<serde_json::Value>,
    field: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match owned_text(value) {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => {
            problems.push(format!("{field} is required"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::record::normalize;
    use serde_json::json;

    fn valid_row() -> serde_json::Value {
        json!({
            "rollNo": "CS101",
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.edu",
            "branch": "CSE",
            "cgpa": 8.4,
            "backlogs": 1
        })
    }

    #[test]
    fn test_valid_record_passes() {
        let student = validate(&normalize(&valid_row())).unwrap();
        assert_eq!(student.roll_no, "CS101");
        assert_eq!(student.cgpa, 8.4);
        assert_eq!(student.backlogs, 1);
    }

    #[test]
    fn test_cgpa_boundaries_inclusive() {
        let mut row = valid_row();
        row["cgpa"] = json!(10.0);
        assert!(validate(&normalize(&row)).is_ok());
        row["cgpa"] = json!(0.0);
        assert!(validate(&normalize(&row)).is_ok());
    }

    #[test]
    fn test_cgpa_just_outside_range_fails() {
        let mut row = valid_row();
        row["cgpa"] = json!(10.01);
        assert!(validate(&normalize(&row))
            .unwrap_err()
            .contains("between 0 and 10"));
        row["cgpa"] = json!(-0.01);
        assert!(validate(&normalize(&row)).is_err());
    }

    #[test]
    fn test_cgpa_numeric_string_accepted() {
        let mut row = valid_row();
        row["cgpa"] = json!("9.1");
        assert_eq!(validate(&normalize(&row)).unwrap().cgpa, 9.1);
    }

    #[test]
    fn test_missing_cgpa_is_required_error() {
        let row = json!({
            "rollNo": "CS101", "firstName": "Asha", "lastName": "Rao",
            "email": "asha@example.edu", "branch": "CSE"
        });
        assert!(validate(&normalize(&row)).unwrap_err().contains("cgpa is required"));
    }

    #[test]
    fn test_absent_backlogs_defaults_and_passes() {
        let row = json!({
            "rollNo": "CS101", "firstName": "Asha", "lastName": "Rao",
            "email": "asha@example.edu", "branch": "CSE", "cgpa": 8.0
        });
        assert_eq!(validate(&normalize(&row)).unwrap().backlogs, 0);
    }

    #[test]
    fn test_negative_backlogs_fails() {
        let mut row = valid_row();
        row["backlogs"] = json!(-2);
        assert!(validate(&normalize(&row))
            .unwrap_err()
            .contains("backlogs cannot be negative"));
    }

    #[test]
    fn test_malformed_email_fails() {
        for bad in ["no-at-sign.edu", "two@@x.edu oops", "trailing@domain"] {
            let mut row = valid_row();
            row["email"] = json!(bad);
            assert!(validate(&normalize(&row)).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_empty_required_field_fails() {
        let mut row = valid_row();
        row["branch"] = json!("  ");
        assert!(validate(&normalize(&row)).unwrap_err().contains("branch is required"));
    }

    #[test]
    fn test_multiple_failures_merge_into_one_message() {
        let row = json!({ "email": "not-an-email", "cgpa": "high" });
        let message = validate(&normalize(&row)).unwrap_err();
        assert!(message.contains("rollNo is required"));
        assert!(message.contains("email is invalid"));
        assert!(message.contains("cgpa must be a number"));
        assert!(message.contains("; "));
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut row = valid_row();
        row["firstName"] = json!("  Asha ");
        assert_eq!(validate(&normalize(&row)).unwrap().first_name, "Asha");
    }
}
