//! # Notifications
//!
//! Outbound email for user invitations and contact form submissions.

mod email;
mod errors;

pub use email::{
    create_email_sender, render, EmailSender, EmailTemplate, LogEmailSender, MailConfig,
    MockEmailSender, RenderedEmail, SmtpConfig, SmtpEmailSender,
};
pub use errors::{NotifyError, NotifyResult};
