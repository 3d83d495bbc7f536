use crate::error::{Error, Result};
use crate::models::application_event::ApplicationEvent;
use crate::services::telegram_service::Notifier;
use crate::utils::html::escape;

/// Renders the fixed "new resume" notification in Telegram HTML.
pub fn render_notification(event: &ApplicationEvent) -> String {
    format!(
        r#"
<b>🆕 NEW RESUME:</b>

<b>👱🏻‍♂️ Employee:</b> {name}
<b>📧 Email:</b> {email}
<b>📞 Phone:</b> {phone}
<b>📚 Job:</b> {label}
<b>🏠 City:</b> {location}
<b>💵 Salary:</b> ${salary}

<b>📄 Resume:</b>
{url}

<b>🔗 Profiles:</b>
{profiles}

<b>🔎 Summary:</b>
{summary}
"#,
        name = escape(&event.name),
        email = escape(&event.email),
        phone = escape(&event.phone),
        label = escape(&event.label),
        location = escape(&event.location.to_string()),
        salary = escape(&event.salary.to_string()),
        url = escape(&event.url),
        profiles = escape(&event.profile_urls()),
        summary = escape(&event.summary),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    Delivered,
    MalformedPayload,
    MissingField,
    DeliveryFailed,
}

/// Processes one broker delivery. Every failure is logged and the message is
/// dropped; the queue is consumed with auto-ack so nothing is redelivered.
pub struct MessageHandler<N> {
    notifier: N,
    chat_id: String,
}

impl<N: Notifier> MessageHandler<N> {
    pub fn new(notifier: N, chat_id: String) -> Self {
        Self { notifier, chat_id }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Decodes, renders and delivers `body`, returning the first error.
    pub async fn process(&self, body: &[u8]) -> Result<()> {
        let event = ApplicationEvent::from_slice(body)?;
        let text = render_notification(&event);
        tracing::info!(" [x] Received message");
        self.notifier.send_message(&self.chat_id, &text).await
    }

    pub async fn handle(&self, body: &[u8]) -> HandleOutcome {
        match self.process(body).await {
            Ok(()) => HandleOutcome::Delivered,
            Err(Error::Json(e)) => {
                tracing::error!(
                    error = %e,
                    "Failed to decode JSON: {}",
                    String::from_utf8_lossy(body)
                );
                HandleOutcome::MalformedPayload
            }
            Err(Error::MissingField(field)) => {
                tracing::error!(field = %field, "Missing key in JSON: {}", field);
                HandleOutcome::MissingField
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to deliver notification to Telegram");
                HandleOutcome::DeliveryFailed
            }
        }
    }
}
