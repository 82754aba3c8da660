//! Reqwest-backed mail API adapter.
//!
//! Sends one JSON POST per notification to a transactional mail provider.
//! Only transport concerns live here: the subject and body come from
//! [`Notification`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{Notification, Notifier, NotifierError, Recipient};

#[derive(Debug, Serialize)]
struct MailAddressDto<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct MailRequestDto<'a> {
    from: MailAddressDto<'a>,
    to: [MailAddressDto<'a>; 1],
    subject: &'a str,
    text: String,
}

/// Sender identity and credentials for the mail API.
pub struct MailerIdentity {
    pub sender_name: String,
    pub sender_email: String,
    pub api_key: Zeroizing<String>,
}

/// Notifier that POSTs messages to a mail API endpoint.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    identity: MailerIdentity,
}

impl HttpMailer {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: MailerIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }

    fn request_body<'a>(
        &'a self,
        recipient: &'a Recipient,
        notification: &'a Notification,
    ) -> MailRequestDto<'a> {
        MailRequestDto {
            from: MailAddressDto {
                name: &self.identity.sender_name,
                email: &self.identity.sender_email,
            },
            to: [MailAddressDto {
                name: &recipient.name,
                email: recipient.email.as_ref(),
            }],
            subject: notification.subject(),
            text: notification.body(&recipient.name),
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.identity.api_key.as_str())
            .json(&self.request_body(recipient, notification))
            .send()
            .await
            .map_err(|error| NotifierError::delivery(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(subject = notification.subject(), "mail accepted by provider");
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(status_error(status, body.as_ref()))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if preview.is_empty() {
        NotifierError::delivery(format!("mail API returned status {}", status.as_u16()))
    } else {
        NotifierError::delivery(format!(
            "mail API returned status {}: {preview}",
            status.as_u16()
        ))
    }
}
