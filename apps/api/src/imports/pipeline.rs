//! The bulk-invite pipeline: a single sequential pass over the input batch.
//!
//! Every input record lands in exactly one of {imported, duplicates,
//! errors}. Per-record problems never escape the record boundary; the only
//! whole-batch failure is the identifier-snapshot fetch, which happens
//! before any record is touched.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::imports::dedup::{classify, RowClass, REASON_EMAIL_EXISTS, REASON_ROLL_NO_EXISTS};
use crate::imports::record::normalize;
use crate::imports::report::{DuplicateEntry, ImportReport, RowError};
use crate::imports::store::StudentStore;
use crate::imports::validate::validate;

/// One successfully committed record, carrying what the invite email needs.
#[derive(Debug, Clone)]
pub struct StudentInvite {
    pub account_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub token: String,
}

#[derive(Debug)]
pub struct BulkInviteOutcome {
    pub report: ImportReport,
    /// Exactly one entry per imported record, in commit order.
    pub invites: Vec<StudentInvite>,
}

/// Runs the full pipeline over `rows`. Records are committed strictly one
/// at a time in input order; a commit failure is recorded and the batch
/// continues with the next record.
pub async fn run_bulk_invite(
    store: &dyn StudentStore,
    rows: &[Value],
) -> Result<BulkInviteOutcome> {
    let snapshot = store
        .identifier_snapshot()
        .await
        .context("failed to read existing student identifiers")?;

    let mut duplicates: Vec<DuplicateEntry> = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();
    let mut invites: Vec<StudentInvite> = Vec::new();

    for (index, raw) in rows.iter().enumerate() {
        let row = index + 1;
        let record = normalize(raw);

        match classify(&record, &snapshot) {
            RowClass::DuplicateEmail(value) => {
                duplicates.push(DuplicateEntry {
                    row,
                    value,
                    reason: REASON_EMAIL_EXISTS.to_string(),
                });
                continue;
            }
            RowClass::DuplicateRollNo(value) => {
                duplicates.push(DuplicateEntry {
                    row,
                    value,
                    reason: REASON_ROLL_NO_EXISTS.to_string(),
                });
                continue;
            }
            RowClass::Candidate => {}
        }

        let student = match validate(&record) {
            Ok(student) => student,
            Err(message) => {
                errors.push(RowError { row, message });
                continue;
            }
        };

        let token = Uuid::new_v4().simple().to_string();
        match store
            .create_invited_student(&student, &token, Utc::now())
            .await
        {
            Ok(account_id) => invites.push(StudentInvite {
                account_id,
                email: student.email,
                first_name: student.first_name,
                token,
            }),
            Err(e) => {
                warn!("Bulk invite row {row} failed to commit: {e}");
                errors.push(RowError {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    let imported = invites.len();
    let report = ImportReport {
        success: true,
        imported,
        failed: errors.len(),
        skipped: duplicates.len(),
        invites_sent: imported,
        duplicates,
        errors,
    };

    info!(
        "Bulk invite processed {} rows: {} imported, {} skipped, {} failed",
        rows.len(),
        report.imported,
        report.skipped,
        report.failed
    );

    Ok(BulkInviteOutcome { report, invites })
}
