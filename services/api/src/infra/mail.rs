use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::repository::Notifier;
use crate::error::ApiError;

/// SMTP-backed notifier. Delivery failure is surfaced as
/// `ApiError::Notification` so issuance can treat it as a hard failure.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(host: &str, user: &str, pass: &str, from: &str) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(user.to_owned(), pass.to_owned()))
            .build();
        Ok(Self {
            mailer,
            from: from.parse()?,
        })
    }
}

impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e: lettre::address::AddressError| ApiError::Notification(e.into()))?)
            .subject(subject)
            .body(body.to_owned())
            .map_err(|e| ApiError::Notification(e.into()))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| ApiError::Notification(e.into()))?;
        Ok(())
    }
}
