//! SMTP delivery over implicit TLS (port 465) with the account from the Config document.

use crate::error::{SkillError, SkillResult};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use raki_core::services::{Mailer, OutgoingEmail, ServiceResult};
use raki_core::AssistantConfig;
use tracing::info;

pub struct SmtpMailer {
    host: String,
    account: Option<String>,
    password: Option<String>,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, account: Option<String>, password: Option<String>) -> Self {
        Self {
            host: host.into(),
            account,
            password,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.smtp_host.clone(),
            Some(config.email.trim().to_string()).filter(|e| !e.is_empty()),
            config.email_password(),
        )
    }

    /// Builds the message without sending it.
    pub fn compose(&self, email: &OutgoingEmail) -> SkillResult<Message> {
        let account = self
            .account
            .as_deref()
            .ok_or_else(|| SkillError::NotConfigured("no email account".into()))?;
        let from: Mailbox = account.parse()?;
        let to: Mailbox = email.to.parse()?;
        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?)
    }

    async fn deliver(&self, email: &OutgoingEmail) -> SkillResult<()> {
        let message = self.compose(email)?;
        let (Some(account), Some(password)) = (&self.account, &self.password) else {
            return Err(SkillError::NotConfigured("no email password".into()));
        };
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .credentials(Credentials::new(account.clone(), password.clone()))
            .build();
        transport.send(message).await?;
        info!(target: "raki::mail", host = %self.host, "message delivered");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> ServiceResult<()> {
        Ok(self.deliver(email).await?)
    }
}
