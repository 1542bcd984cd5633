//! Notification outbox.
//!
//! Side effects that must never change a request's result (invite emails,
//! status-change emails) are enqueued here and drained by a background
//! worker. The worker writes a notification record, then attempts delivery
//! through the mail client; both steps are best-effort and only logged.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::mailer::Mailer;

pub const KIND_INVITE: &str = "invite";
pub const KIND_STATUS_UPDATE: &str = "status_update";

/// One queued notification.
#[derive(Debug, Clone)]
pub struct OutboxMessage {
    pub account_id: Uuid,
    pub email: String,
    pub kind: &'static str,
    pub subject: String,
    pub body: String,
}

impl OutboxMessage {
    /// Invite email for a freshly created inactive account.
    pub fn invite(
        account_id: Uuid,
        email: &str,
        first_name: &str,
        token: &str,
        base_url: &str,
    ) -> Self {
        Self {
            account_id,
            email: email.to_string(),
            kind: KIND_INVITE,
            subject: "You have been invited to the placement portal".to_string(),
            body: format!(
                "Hi {first_name},\n\nAn account has been created for you on the placement portal. \
                 Use the link below to activate it:\n\n{base_url}/invites/accept?token={token}\n\n\
                 The link is valid for one activation only."
            ),
        }
    }

    /// Status-change email sent when an admin advances an application.
    pub fn status_change(
        account_id: Uuid,
        email: &str,
        first_name: &str,
        drive_title: &str,
        status: &str,
    ) -> Self {
        Self {
            account_id,
            email: email.to_string(),
            kind: KIND_STATUS_UPDATE,
            subject: format!("Application update: {drive_title}"),
            body: format!(
                "Hi {first_name},\n\nYour application for \"{drive_title}\" has moved to status \
                 {status}. Check the portal for details."
            ),
        }
    }
}

/// Cloneable handle to the outbox channel.
#[derive(Clone)]
pub struct NotificationOutbox {
    tx: mpsc::Sender<OutboxMessage>,
}

impl NotificationOutbox {
    /// Spawns the worker task and returns the enqueue handle.
    pub fn spawn(pool: PgPool, mailer: Arc<dyn Mailer>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<OutboxMessage>(capacity);

        tokio::spawn(async move {
            info!("Notification outbox worker started");
            while let Some(message) = rx.recv().await {
                deliver(&pool, mailer.as_ref(), message).await;
            }
            info!("Notification outbox worker stopped");
        });

        Self { tx }
    }

    /// Enqueues a message without blocking. A full or closed channel drops
    /// the message with a warning; callers never observe a failure.
    pub fn enqueue(&self, message: OutboxMessage) {
        if let Err(e) = self.tx.try_send(message) {
            warn!("Dropping notification, outbox unavailable: {e}");
        }
    }
}

async fn deliver(pool: &PgPool, mailer: &dyn Mailer, message: OutboxMessage) {
    let insert = sqlx::query(
        "INSERT INTO notifications (id, account_id, kind, subject, body) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(message.account_id)
    .bind(message.kind)
    .bind(&message.subject)
    .bind(&message.body)
    .execute(pool)
    .await;

    if let Err(e) = insert {
        error!(
            "Failed to record {} notification for account {}: {e}",
            message.kind, message.account_id
        );
    }

    if let Err(e) = mailer
        .send(&message.email, &message.subject, &message.body)
        .await
    {
        warn!("Failed to email {} ({}): {e}", message.email, message.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_message_contains_token_link() {
        let msg = OutboxMessage::invite(
            Uuid::new_v4(),
            "priya@example.edu",
            "Priya",
            "abc123",
            "https://placements.example.edu",
        );
        assert_eq!(msg.kind, KIND_INVITE);
        assert_eq!(msg.email, "priya@example.edu");
        assert!(msg
            .body
            .contains("https://placements.example.edu/invites/accept?token=abc123"));
    }

    #[test]
    fn test_status_change_message_names_drive_and_status() {
        let msg = OutboxMessage::status_change(
            Uuid::new_v4(),
            "dev@example.edu",
            "Dev",
            "SDE Intern 2026",
            "SHORTLISTED",
        );
        assert_eq!(msg.kind, KIND_STATUS_UPDATE);
        assert!(msg.subject.contains("SDE Intern 2026"));
        assert!(msg.body.contains("SHORTLISTED"));
    }
}
