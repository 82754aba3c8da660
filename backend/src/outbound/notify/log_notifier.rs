//! Notifier used when no mail API is configured.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notification, Notifier, NotifierError, Recipient};

/// Writes each notification to the log instead of sending it.
///
/// Tokens appear in the log so local sign-up and reset flows stay usable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        info!(
            to = %recipient.email,
            subject = notification.subject(),
            body = %notification.body(&recipient.name),
            "mail delivery disabled; logging notification"
        );
        Ok(())
    }
}
