use crate::config::TelegramConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const PARSE_MODE_HTML: &str = "HTML";

/// Outbound delivery of a rendered notification to one chat.
pub trait Notifier {
    fn send_message(&self, chat_id: &str, text: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramService {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramService {
    pub fn new(client: Client, api_base: String, bot_token: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    pub fn from_config(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(
            client,
            config.api_base.clone(),
            config.bot_token.clone(),
        ))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

impl Notifier for TelegramService {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: PARSE_MODE_HTML,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();
        let parsed: Option<TelegramResponse> = serde_json::from_str(&raw).ok();

        match parsed {
            Some(resp) if status.is_success() && resp.ok => {
                tracing::debug!(chat_id, "Telegram message delivered");
                Ok(())
            }
            Some(resp) => Err(Error::Telegram {
                status: status.as_u16(),
                description: resp.description.unwrap_or_else(|| raw.clone()),
            }),
            None => Err(Error::Telegram {
                status: status.as_u16(),
                description: raw,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_strips_trailing_slash() {
        let svc = TelegramService::new(
            Client::new(),
            "https://api.telegram.org/".to_string(),
            "123:abc".to_string(),
        );
        assert_eq!(
            svc.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn request_body_carries_html_parse_mode() {
        let body = SendMessageRequest {
            chat_id: "-1001",
            text: "<b>hi</b>",
            parse_mode: PARSE_MODE_HTML,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"chat_id": "-1001", "text": "<b>hi</b>", "parse_mode": "HTML"})
        );
    }
}
