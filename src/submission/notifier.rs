use std::sync::Arc;

use crate::config::NotifierConfig;
use crate::email::{MailError, Mailer};

use super::event::{FormSubmissionEvent, email_address};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Sent { to: String },
    MissingEmailAddress,
}

/// Sends the confirmation email for each submitted form.
pub struct SubmissionNotifier {
    config: NotifierConfig,
    mailer: Arc<dyn Mailer>,
}

impl SubmissionNotifier {
    pub fn new(config: NotifierConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    /// Handle one submission. A missing address is logged and reported as an
    /// outcome; a failed send is returned untouched to the caller.
    pub async fn handle(&self, event: &FormSubmissionEvent) -> Result<Outcome, MailError> {
        let data = event.form_data();

        let Some(email) = email_address(&data, &self.config.email_key) else {
            tracing::warn!("找不到電子郵件地址。無法發送電子郵件。");
            return Ok(Outcome::MissingEmailAddress);
        };

        self.mailer
            .send(email, &self.config.subject, &self.config.body)
            .await?;

        tracing::info!("已將確認電子郵件發送至：{email}");

        Ok(Outcome::Sent {
            to: email.to_string(),
        })
    }
}
