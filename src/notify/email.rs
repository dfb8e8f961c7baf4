//! # Email Delivery
//!
//! Templates for the messages the service sends and the senders that
//! deliver them. Without SMTP settings messages are only logged.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::observability::Event;

use super::errors::{NotifyError, NotifyResult};

/// Mail settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender mailbox, e.g. `AtlasDesk <noreply@atlasdesk.local>`
    #[serde(default = "default_from")]
    pub from: String,

    /// Receives contact form notifications
    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    /// Base URL used in invitation links
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Absent: messages are logged instead of sent
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

fn default_from() -> String {
    "AtlasDesk <noreply@atlasdesk.local>".to_string()
}

fn default_admin_email() -> String {
    "admin@atlasdesk.local".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            admin_email: default_admin_email(),
            frontend_url: default_frontend_url(),
            smtp: None,
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Empty: no authentication, plain connection (local relays)
    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// Messages the service sends
#[derive(Debug, Clone, PartialEq)]
pub enum EmailTemplate {
    /// New account with a link to set a password
    Invitation {
        to: String,
        first_name: String,
        token: String,
    },

    /// Contact form submission, sent to the admin mailbox
    ContactNotification {
        first_name: String,
        last_name: String,
        email: String,
        phone_number: Option<String>,
        description: String,
    },

    /// Receipt sent back to whoever filled in the contact form
    ContactAcknowledgment { to: String, first_name: String },
}

impl EmailTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            EmailTemplate::Invitation { .. } => "invitation",
            EmailTemplate::ContactNotification { .. } => "contact_notification",
            EmailTemplate::ContactAcknowledgment { .. } => "contact_acknowledgment",
        }
    }
}

/// A rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Render a template against mail settings
pub fn render(template: &EmailTemplate, config: &MailConfig) -> RenderedEmail {
    match template {
        EmailTemplate::Invitation {
            to,
            first_name,
            token,
        } => {
            let link = format!(
                "{}/reset-password/{}",
                config.frontend_url.trim_end_matches('/'),
                token
            );
            RenderedEmail {
                to: to.clone(),
                subject: "Welcome to AtlasDesk".to_string(),
                body: format!(
                    "Dear {},\n\n\
                    You have been invited to join AtlasDesk. \
                    Set up your password using the link below:\n\n\
                    {}\n\n\
                    This link will expire in 24 hours.\n\n\
                    If you did not expect this invitation, you can ignore this email.\n\n\
                    Best regards,\n\
                    The AtlasDesk Team",
                    first_name, link
                ),
            }
        }
        EmailTemplate::ContactNotification {
            first_name,
            last_name,
            email,
            phone_number,
            description,
        } => RenderedEmail {
            to: config.admin_email.clone(),
            subject: "New Contact Form Submission".to_string(),
            body: format!(
                "New contact form submission\n\n\
                Name: {} {}\n\
                Email: {}\n\
                Phone: {}\n\
                Message:\n{}",
                first_name,
                last_name,
                email,
                phone_number.as_deref().unwrap_or("Not provided"),
                description
            ),
        },
        EmailTemplate::ContactAcknowledgment { to, first_name } => RenderedEmail {
            to: to.clone(),
            subject: "Thank you for contacting us".to_string(),
            body: format!(
                "Dear {},\n\n\
                We have received your message and will get back to you soon.\n\n\
                Best regards,\n\
                The AtlasDesk Team",
                first_name
            ),
        },
    }
}

/// Email sender trait
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, template: EmailTemplate) -> NotifyResult<()>;
}

/// Records messages instead of sending them
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: RwLock<Vec<EmailTemplate>>,
    fail: bool,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails
    pub fn failing() -> Self {
        Self {
            sent: RwLock::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailTemplate> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, template: EmailTemplate) -> NotifyResult<()> {
        if self.fail {
            return Err(NotifyError::Transport("mock transport failure".to_string()));
        }
        self.sent
            .write()
            .map_err(|_| NotifyError::Transport("Lock poisoned".to_string()))?
            .push(template);
        Ok(())
    }
}

/// Logs rendered messages; used when no SMTP relay is configured
#[derive(Debug, Default)]
pub struct LogEmailSender {
    config: MailConfig,
}

impl LogEmailSender {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, template: EmailTemplate) -> NotifyResult<()> {
        let email = render(&template, &self.config);
        info!(
            event = Event::EmailLogged.as_str(),
            template = template.name(),
            to = %email.to,
            subject = %email.subject,
        );
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpEmailSender {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: MailConfig, smtp: &SmtpConfig) -> NotifyResult<Self> {
        let transport = if smtp.user.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
                .port(smtp.port)
                .build()
        } else {
            let creds = Credentials::new(smtp.user.clone(), smtp.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(smtp.port)
                .build()
        };

        Ok(Self { config, transport })
    }

    fn build_message(&self, email: &RenderedEmail) -> NotifyResult<Message> {
        Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| NotifyError::InvalidAddress(format!("from: {}", e)))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotifyError::InvalidAddress(format!("to: {}", e)))?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, template: EmailTemplate) -> NotifyResult<()> {
        let email = render(&template, &self.config);
        let message = self.build_message(&email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Pick a sender from mail settings
pub fn create_email_sender(config: &MailConfig) -> NotifyResult<Arc<dyn EmailSender>> {
    match &config.smtp {
        Some(smtp) => Ok(Arc::new(SmtpEmailSender::new(config.clone(), smtp)?)),
        None => Ok(Arc::new(LogEmailSender::new(config.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> EmailTemplate {
        EmailTemplate::Invitation {
            to: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            token: "abc123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_email_sender() {
        let sender = MockEmailSender::new();
        sender.send(invitation()).await.unwrap();

        assert_eq!(sender.sent_count(), 1);
        assert_eq!(sender.sent()[0], invitation());
    }

    #[tokio::test]
    async fn test_failing_mock_sender() {
        let sender = MockEmailSender::failing();
        assert!(sender.send(invitation()).await.is_err());
        assert_eq!(sender.sent_count(), 0);
    }

    #[test]
    fn test_invitation_link() {
        let config = MailConfig {
            frontend_url: "https://app.example.com/".to_string(),
            ..MailConfig::default()
        };
        let email = render(&invitation(), &config);

        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "Welcome to AtlasDesk");
        assert!(email
            .body
            .contains("https://app.example.com/reset-password/abc123"));
        assert!(email.body.contains("Dear Ada"));
    }

    #[test]
    fn test_contact_notification_goes_to_admin() {
        let config = MailConfig::default();
        let email = render(
            &EmailTemplate::ContactNotification {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john@example.com".to_string(),
                phone_number: None,
                description: "I would like a quote.".to_string(),
            },
            &config,
        );

        assert_eq!(email.to, config.admin_email);
        assert!(email.body.contains("Name: John Doe"));
        assert!(email.body.contains("Phone: Not provided"));
    }

    #[tokio::test]
    async fn test_default_sender_only_logs() {
        let sender = create_email_sender(&MailConfig::default()).unwrap();
        assert!(sender.send(invitation()).await.is_ok());
    }

    #[test]
    fn test_message_rejects_bad_recipient() {
        let smtp = SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            user: String::new(),
            password: String::new(),
        };
        let sender = SmtpEmailSender::new(MailConfig::default(), &smtp).unwrap();
        let email = RenderedEmail {
            to: "not an address".to_string(),
            subject: "x".to_string(),
            body: "y".to_string(),
        };
        assert!(matches!(
            sender.build_message(&email),
            Err(NotifyError::InvalidAddress(_))
        ));
    }
}
