//! CSV bulk status updates: `rollNo,status[,remarks]`, one outcome per row.
//!
//! Only a missing/empty file or missing required columns reject the upload;
//! everything after the header is handled row by row.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::imports::report::RowError;
use crate::models::drive::DriveRow;
use crate::notify::{NotificationOutbox, OutboxMessage};

#[derive(Debug, Error)]
pub enum CsvParseError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("failed to read CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// One data row as uploaded. Status stays raw so unknown values become
/// per-row errors during apply, not upload rejections.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCsvRow {
    /// 1-based position among the data rows (header excluded).
    pub row: usize,
    pub roll_no: String,
    pub status: String,
    pub remarks: Option<String>,
}

/// Parses the uploaded CSV. Header matching is case-insensitive and
/// tolerates `roll_no` for `rollNo`; `remarks` is optional.
pub fn parse_status_csv(data: &[u8]) -> Result<Vec<StatusCsvRow>, CsvParseError> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CsvParseError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let roll_no_idx = find_column(&headers, "rollno");
    let status_idx = find_column(&headers, "status");
    let remarks_idx = find_column(&headers, "remarks");

    let mut missing = Vec::new();
    if roll_no_idx.is_none() {
        missing.push("rollNo");
    }
    if status_idx.is_none() {
        missing.push("status");
    }
    if !missing.is_empty() {
        return Err(CsvParseError::MissingColumns(missing));
    }
    let (roll_no_idx, status_idx) = (roll_no_idx.unwrap(), status_idx.unwrap());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        rows.push(StatusCsvRow {
            row: index + 1,
            roll_no: field(roll_no_idx),
            status: field(status_idx),
            remarks: remarks_idx
                .map(field)
                .filter(|r| !r.is_empty()),
        });
    }

    Ok(rows)
}

fn find_column(headers: &csv::StringRecord, canonical: &str) -> Option<usize> {
    headers.iter().position(|h| {
        h.chars()
            .filter(|c| !matches!(c, '_' | ' '))
            .collect::<String>()
            .eq_ignore_ascii_case(canonical)
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateReport {
    pub success: bool,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

/// Applies the parsed rows to one drive's applications, sequentially. Each
/// successful row gets a notification record and a best-effort email.
pub async fn apply_bulk_update(
    pool: &PgPool,
    outbox: &NotificationOutbox,
    drive: &DriveRow,
    rows: &[StatusCsvRow],
) -> Result<BulkUpdateReport, sqlx::Error> {
    let mut updated = 0usize;
    let mut errors: Vec<RowError> = Vec::new();

    for row in rows {
        if row.roll_no.is_empty() {
            errors.push(RowError {
                row: row.row,
                message: "rollNo is required".to_string(),
            });
            continue;
        }

        let Some(status) = ApplicationStatus::parse(&row.status) else {
            errors.push(RowError {
                row: row.row,
                message: format!("Unknown status '{}'", row.status.trim()),
            });
            continue;
        };

        let result: Option<(Uuid, String, String)> = sqlx::query_as(
            r#"
            UPDATE applications AS a
            SET status = $1, remarks = COALESCE($2, a.remarks), updated_at = NOW()
            FROM student_profiles sp
            JOIN accounts ac ON ac.id = sp.account_id
            WHERE sp.roll_no = $3
              AND a.student_id = sp.account_id
              AND a.drive_id = $4
            RETURNING a.student_id, ac.email, sp.first_name
            "#,
        )
        .bind(status.as_str())
        .bind(row.remarks.as_deref())
        .bind(&row.roll_no)
        .bind(drive.id)
        .fetch_optional(pool)
        .await?;

        match result {
            Some((student_id, email, first_name)) => {
                updated += 1;
                outbox.enqueue(OutboxMessage::status_change(
                    student_id,
                    &email,
                    &first_name,
                    &drive.title,
                    status.as_str(),
                ));
            }
            None => errors.push(RowError {
                row: row.row,
                message: format!("No application found for roll number '{}'", row.roll_no),
            }),
        }
    }

    info!(
        "Bulk status update for drive {}: {} updated, {} failed",
        drive.id,
        updated,
        errors.len()
    );

    Ok(BulkUpdateReport {
        success: true,
        updated,
        failed: errors.len(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_with_and_without_remarks() {
        let rows =
            parse_status_csv(b"rollNo,status,remarks\nCS1,SHORTLISTED,Good aptitude score\nCS2,REJECTED,\n")
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].roll_no, "CS1");
        assert_eq!(rows[0].remarks.as_deref(), Some("Good aptitude score"));
        assert_eq!(rows[1].remarks, None);
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let rows = parse_status_csv(b"ROLLNO,Status\nCS1,OFFER\n").unwrap();
        assert_eq!(rows[0].roll_no, "CS1");
        assert_eq!(rows[0].status, "OFFER");
    }

    #[test]
    fn test_snake_case_roll_no_header_accepted() {
        let rows = parse_status_csv(b"roll_no,status\nCS1,OFFER\n").unwrap();
        assert_eq!(rows[0].roll_no, "CS1");
    }

    #[test]
    fn test_remarks_column_is_optional() {
        let rows = parse_status_csv(b"rollNo,status\nCS1,APPLIED\n").unwrap();
        assert_eq!(rows[0].remarks, None);
    }

    #[test]
    fn test_missing_status_column_rejects_upload() {
        match parse_status_csv(b"rollNo,remarks\nCS1,note\n") {
            Err(CsvParseError::MissingColumns(cols)) => assert_eq!(cols, vec!["status"]),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_rejects_upload() {
        assert!(matches!(parse_status_csv(b"  \n "), Err(CsvParseError::Empty)));
    }

    #[test]
    fn test_unknown_status_survives_parsing() {
        // Unknown statuses are a per-row concern at apply time.
        let rows = parse_status_csv(b"rollNo,status\nCS1,HIRED\n").unwrap();
        assert_eq!(rows[0].status, "HIRED");
    }

    #[test]
    fn test_rows_are_numbered_from_first_data_row() {
        let rows = parse_status_csv(b"rollNo,status\nCS1,OFFER\nCS2,REJECTED\n").unwrap();
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[1].row, 2);
    }

    #[test]
    fn test_short_row_yields_empty_fields_not_an_error() {
        let rows = parse_status_csv(b"rollNo,status\nCS1\n").unwrap();
        assert_eq!(rows[0].roll_no, "CS1");
        assert_eq!(rows[0].status, "");
    }
}
