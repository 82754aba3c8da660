//! Notifier adapters: a mail API client and a logging fallback.

mod http_mailer;
mod log_notifier;

pub use http_mailer::{HttpMailer, MailerIdentity};
pub use log_notifier::LogNotifier;
