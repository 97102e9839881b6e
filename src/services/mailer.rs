//! Outbound e-mail over SMTP.

use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use log::{info, warn};

use crate::config::CONFIG;
use crate::errors::ApiError;
use crate::utils::mask_email;

const RESET_SUBJECT: &str = "Password reset";

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

pub fn reset_link(token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        CONFIG.base_url,
        urlencoding::encode(token)
    )
}

fn reset_message(from: Mailbox, to: &str, link: &str) -> Result<Message, ApiError> {
    let body = format!(
        "A password reset was requested for your account.\n\n\
         Use the link below to choose a new password:\n{}\n\n\
         The link expires in {} hours. If you did not ask for this, ignore this e-mail.\n",
        link, CONFIG.password_reset_expiry_hours
    );
    Ok(Message::builder()
        .from(from)
        .to(to.parse()?)
        .subject(RESET_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body)?)
}

impl Mailer {
    /// SMTP relay when `SMTP_HOST` is set; otherwise messages are only logged.
    pub fn from_config() -> Result<Self, ApiError> {
        let from: Mailbox = CONFIG.email_from.parse()?;
        let transport = match &CONFIG.smtp_host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?;
                if let (Some(user), Some(pass)) = (&CONFIG.smtp_username, &CONFIG.smtp_password) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }
                info!("SMTP relay configured at {}", host);
                Some(builder.build())
            }
            None => {
                warn!("SMTP_HOST not set, e-mails will be logged instead of sent");
                None
            }
        };
        Ok(Self { transport, from })
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), ApiError> {
        let link = reset_link(token);
        let Some(transport) = &self.transport else {
            info!("Password reset link for {}: {}", mask_email(to), link);
            return Ok(());
        };

        let message = reset_message(self.from.clone(), to, &link)?;
        transport.send(message).await?;
        info!("Password reset e-mail sent to {}", mask_email(to));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_encodes_token() {
        let link = reset_link("a b");
        assert!(link.starts_with(&CONFIG.base_url));
        assert!(link.ends_with("/reset-password?token=a%20b"));
    }

    #[test]
    fn test_reset_message_headers() {
        let from: Mailbox = "CRM <no-reply@example.com>".parse().unwrap();
        let message = reset_message(from, "rep@example.com", "https://x/y").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Password reset"));
        assert!(raw.contains("To: rep@example.com"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let from: Mailbox = "no-reply@example.com".parse().unwrap();
        assert!(reset_message(from, "not an address", "https://x/y").is_err());
    }
}
