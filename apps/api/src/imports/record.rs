//! Row normalizer for bulk-invite uploads.
//!
//! Callers send loosely-typed records with unpredictable key casing
//! (`rollNo` / `rollno` / `RollNo` / `roll_no`). Each canonical field
//! resolves through an ordered alias list, matched case-insensitively, so a
//! missing field is an explicit `None` rather than a silently coalesced
//! default. The one exception is `backlogs`, which defaults to 0.

use serde_json::{Map, Value};

const ROLL_NO_ALIASES: &[&str] = &["rollNo", "roll_no"];
const FIRST_NAME_ALIASES: &[&str] = &["firstName", "first_name"];
const LAST_NAME_ALIASES: &[&str] = &["lastName", "last_name"];
const EMAIL_ALIASES: &[&str] = &["email"];
const BRANCH_ALIASES: &[&str] = &["branch"];
const CGPA_ALIASES: &[&str] = &["cgpa"];
const BACKLOGS_ALIASES: &[&str] = &["backlogs"];

/// One bulk-invite row after alias resolution. Values keep their raw JSON
/// shape; type checks happen in the validator.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub roll_no: Option<Value>,
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub branch: Option<Value>,
    pub cgpa: Option<Value>,
    pub backlogs: Value,
}

/// Maps one raw record to canonical field names. Pure function.
pub fn normalize(raw: &Value) -> NormalizedRecord {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    NormalizedRecord {
        roll_no: lookup(fields, ROLL_NO_ALIASES),
        first_name: lookup(fields, FIRST_NAME_ALIASES),
        last_name: lookup(fields, LAST_NAME_ALIASES),
        email: lookup(fields, EMAIL_ALIASES),
        branch: lookup(fields, BRANCH_ALIASES),
        cgpa: lookup(fields, CGPA_ALIASES),
        backlogs: lookup(fields, BACKLOGS_ALIASES).unwrap_or(Value::from(0)),
    }
}

impl NormalizedRecord {
    /// The email as submitted, used for snapshot matching (case-sensitive).
    pub fn email_str(&self) -> Option<&str> {
        text(&self.email)
    }

    /// The roll number as submitted, used for snapshot matching.
    pub fn roll_no_str(&self) -> Option<String> {
        owned_text(&self.roll_no)
    }
}

fn lookup(fields: &Map<String, Value>, aliases: &[&str]) -> Option<Value> {
    for alias in aliases {
        if let Some((_, value)) = fields.iter().find(|(key, _)| key.eq_ignore_ascii_case(alias)) {
            return Some(value.clone());
        }
    }
    None
}

/// Borrowed string content of a field, if it is a non-null string.
pub fn text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// Owned string content of a field. Numbers are accepted and stringified,
/// since spreadsheet exports routinely send roll numbers as numbers.
pub fn owned_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric content of a field: a JSON number, or a string that parses as one.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_keys_resolve() {
        let rec = normalize(&json!({
            "rollNo": "CS101", "firstName": "Asha", "lastName": "Rao",
            "email": "asha@example.edu", "branch": "CSE", "cgpa": 8.4, "backlogs": 1
        }));
        assert_eq!(rec.roll_no, Some(json!("CS101")));
        assert_eq!(rec.email, Some(json!("asha@example.edu")));
        assert_eq!(rec.backlogs, json!(1));
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        for key in ["Email", "email", "EMAIL"] {
            let rec = normalize(&json!({ key: "a@b.com" }));
            assert_eq!(rec.email, Some(json!("a@b.com")), "key {key} did not resolve");
        }
    }

    #[test]
    fn test_snake_case_aliases_resolve() {
        let rec = normalize(&json!({ "roll_no": "EC042", "first_name": "Vikram" }));
        assert_eq!(rec.roll_no, Some(json!("EC042")));
        assert_eq!(rec.first_name, Some(json!("Vikram")));
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let rec = normalize(&json!({ "email": "x@y.edu" }));
        assert!(rec.roll_no.is_none());
        assert!(rec.cgpa.is_none());
        assert!(rec.branch.is_none());
    }

    #[test]
    fn test_backlogs_defaults_to_zero() {
        let rec = normalize(&json!({ "email": "x@y.edu" }));
        assert_eq!(rec.backlogs, json!(0));
    }

    #[test]
    fn test_non_object_row_is_all_absent() {
        let rec = normalize(&json!("not a record"));
        assert!(rec.email.is_none());
        assert_eq!(rec.backlogs, json!(0));
    }

    #[test]
    fn test_numeric_roll_no_stringifies() {
        let rec = normalize(&json!({ "rollNo": 42 }));
        assert_eq!(rec.roll_no_str().as_deref(), Some("42"));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(&json!("7.5")), Some(7.5));
        assert_eq!(number(&json!(7.5)), Some(7.5));
        assert_eq!(number(&json!("seven")), None);
        assert_eq!(number(&json!(null)), None);
    }
}
