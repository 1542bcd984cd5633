//! Aggregate report returned by the bulk-invite endpoint.
//!
//! The camelCase key names (`invitesSent`, row entries) are the caller
//! contract and must not drift.

use serde::Serialize;

/// One skipped row and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    /// 1-based position in the original input array.
    pub row: usize,
    /// The identifier value that collided.
    pub value: String,
    pub reason: String,
}

/// One failed row and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based position in the original input array.
    pub row: usize,
    pub message: String,
}

/// Batch summary. Invariant: `imported + failed + skipped` equals the input
/// length, and `invites_sent` equals `imported`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    pub skipped: usize,
    pub invites_sent: usize,
    pub duplicates: Vec<DuplicateEntry>,
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ImportReport {
            success: true,
            imported: 2,
            failed: 1,
            skipped: 1,
            invites_sent: 2,
            duplicates: vec![DuplicateEntry {
                row: 1,
                value: "a@b.edu".to_string(),
                reason: "Email already exists".to_string(),
            }],
            errors: vec![RowError {
                row: 4,
                message: "cgpa is required".to_string(),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["invitesSent"], 2);
        assert_eq!(json["duplicates"][0]["row"], 1);
        assert_eq!(json["errors"][0]["message"], "cgpa is required");
    }
}
