//! Notification delivery.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Title attached to every reminder.
pub const DEFAULT_TITLE: &str = "Plant Hardening Reminder";

/// Capability to deliver a message to the single configured recipient.
pub trait Notifier {
    fn send(&self, message: &str, title: &str) -> Result<(), NotifyError>;
}

/// Errors that can occur while delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    message: &'a str,
}

/// Posts `{"title": .., "message": ..}` as JSON to a webhook.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    http: reqwest::blocking::Client,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            token,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, message: &str, title: &str) -> Result<(), NotifyError> {
        let mut request = self
            .http
            .post(&self.url)
            .json(&WebhookPayload { title, message });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(title, "Notification delivered");
        Ok(())
    }
}

/// Writes the notification to the log instead of delivering it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &str, title: &str) -> Result<(), NotifyError> {
        tracing::info!(title, message, "Notification (log only)");
        Ok(())
    }
}

/// Notifier chosen at startup.
#[derive(Clone, Debug)]
pub enum ConfiguredNotifier {
    Webhook(WebhookNotifier),
    Log(LogNotifier),
}

impl Notifier for ConfiguredNotifier {
    fn send(&self, message: &str, title: &str) -> Result<(), NotifyError> {
        match self {
            Self::Webhook(n) => n.send(message, title),
            Self::Log(n) => n.send(message, title),
        }
    }
}
