/// Mail client — the single point of entry for all outbound email.
///
/// ARCHITECTURAL RULE: No other module may talk to the mail API directly.
/// All delivery goes through the notification outbox, which calls this.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Mail API unavailable after {retries} retries")]
    Unavailable { retries: u32 },
}

/// Delivery boundary. The outbox worker holds an `Arc<dyn Mailer>` so tests
/// can swap in a recording implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MailApiError {
    message: String,
}

/// HTTP mail client. Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct MailClient {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl MailClient {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for MailClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let request_body = MailRequest {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let mut last_error: Option<MailError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Mail send attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(MailError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Mail API returned {}: {}", status, message);
                last_error = Some(MailError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<MailApiError>(&raw)
                    .map(|e| e.message)
                    .unwrap_or(raw);
                return Err(MailError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!("Mail delivered to {to}: {subject}");
            return Ok(());
        }

        Err(last_error.unwrap_or(MailError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}
