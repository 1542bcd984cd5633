//! Storage boundary for the bulk-invite committer.
//!
//! The pipeline only sees the `StudentStore` trait; tests inject an
//! in-memory implementation instead of touching Postgres.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::imports::dedup::IdentifierSnapshot;
use crate::imports::validate::NewStudent;
use crate::models::account::ROLE_STUDENT;

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Reads all existing emails and roll numbers. Called exactly once per
    /// batch, before any record is processed.
    async fn identifier_snapshot(&self) -> Result<IdentifierSnapshot>;

    /// Creates one inactive student account plus its profile. Must be
    /// atomic per record; the batch as a whole is not.
    async fn create_invited_student(
        &self,
        student: &NewStudent,
        invite_token: &str,
        invited_at: DateTime<Utc>,
    ) -> Result<Uuid>;
}

/// Production store backed by the shared connection pool.
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn identifier_snapshot(&self) -> Result<IdentifierSnapshot> {
        let emails: Vec<String> = sqlx::query_scalar("SELECT email FROM accounts")
            .fetch_all(&self.pool)
            .await?;
        let roll_numbers: Vec<String> = sqlx::query_scalar("SELECT roll_no FROM student_profiles")
            .fetch_all(&self.pool)
            .await?;

        Ok(IdentifierSnapshot {
            emails: emails.into_iter().collect(),
            roll_numbers: roll_numbers.into_iter().collect(),
        })
    }

    async fn create_invited_student(
        &self,
        student: &NewStudent,
        invite_token: &str,
        invited_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let account_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, role, active, invite_token, invite_sent_at)
            VALUES ($1, $2, $3, FALSE, $4, $5)
            "#,
        )
        .bind(account_id)
        .bind(&student.email)
        .bind(ROLE_STUDENT)
        .bind(invite_token)
        .bind(invited_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO student_profiles
                (account_id, roll_no, first_name, last_name, branch, cgpa, backlogs)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account_id)
        .bind(&student.roll_no)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.branch)
        .bind(student.cgpa)
        .bind(student.backlogs)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(account_id)
    }
}
