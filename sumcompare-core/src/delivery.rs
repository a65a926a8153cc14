//! Report delivery via SMTP.
//!
//! `ReportSink` abstracts the outbound channel so the comparator can be
//! exercised without network access. `SmtpReportSink` sends through lettre;
//! `MemorySink` records messages for tests and dry runs.

use crate::config::EmailConfig;
use crate::error::DeliveryError;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

/// Destination for rendered reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn send(&self, subject: &str, body: &str, is_html: bool) -> Result<(), DeliveryError>;
}

/// Outcome of handing a report to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Failed(String),
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent)
    }
}

/// Send through `sink`, logging the outcome instead of propagating failures.
pub async fn deliver_logged(
    sink: &dyn ReportSink,
    subject: &str,
    body: &str,
    is_html: bool,
) -> DeliveryStatus {
    match sink.send(subject, body, is_html).await {
        Ok(()) => {
            info!(subject, "Report delivered");
            DeliveryStatus::Sent
        }
        Err(e) => {
            error!(subject, error = %e, "Failed to send report");
            DeliveryStatus::Failed(e.to_string())
        }
    }
}

/// SMTP sender using lettre over STARTTLS.
pub struct SmtpReportSink {
    config: EmailConfig,
}

impl SmtpReportSink {
    /// Create a sink, rejecting configs that lack a host or addresses.
    pub fn new(config: EmailConfig) -> Result<Self, DeliveryError> {
        if let Some(field) = config.missing_field() {
            return Err(DeliveryError::NotConfigured {
                field: field.to_string(),
            });
        }
        Ok(Self { config })
    }

    /// Build the MIME message for a report.
    pub fn build_message(
        &self,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<lettre::Message, DeliveryError> {
        let mut builder = lettre::Message::builder()
            .from(parse_mailbox(&self.config.from_address)?)
            .to(parse_mailbox(&self.config.to_address)?)
            .subject(subject);
        for cc in &self.config.cc_addresses {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        let content_type = if is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };
        builder
            .header(content_type)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Build {
                message: e.to_string(),
            })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| DeliveryError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

#[async_trait]
impl ReportSink for SmtpReportSink {
    async fn send(&self, subject: &str, body: &str, is_html: bool) -> Result<(), DeliveryError> {
        let email = self.build_message(subject, body, is_html)?;

        let creds = lettre::transport::smtp::authentication::Credentials::new(
            self.config.login().to_string(),
            self.config.password.clone(),
        );

        let mailer =
            lettre::AsyncSmtpTransport::<lettre::Tokio1Executor>::starttls_relay(
                &self.config.smtp_host,
            )
            .map_err(|e| DeliveryError::Transport {
                message: format!("SMTP relay error: {e}"),
            })?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        use lettre::AsyncTransport;
        mailer
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport {
                message: format!("SMTP send error: {e}"),
            })?;

        info!(to = %self.config.to_address, "Email sent");
        if !self.config.cc_addresses.is_empty() {
            info!(cc = %self.config.cc_addresses.join(", "), "Email CC'd");
        }
        Ok(())
    }
}

/// A report captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReport {
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// In-memory sink for tests and `--no-email` runs.
#[derive(Default)]
pub struct MemorySink {
    sent: Mutex<Vec<SentReport>>,
    failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every send fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn sent(&self) -> Vec<SentReport> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MemorySink {
    async fn send(&self, subject: &str, body: &str, is_html: bool) -> Result<(), DeliveryError> {
        if let Some(message) = &self.failure {
            return Err(DeliveryError::Transport {
                message: message.clone(),
            });
        }
        self.sent.lock().unwrap().push(SentReport {
            subject: subject.to_string(),
            body: body.to_string(),
            is_html,
        });
        Ok(())
    }
}
