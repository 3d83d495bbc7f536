#![allow(dead_code)]

use cvmaker_notifier::error::{Error, Result};
use cvmaker_notifier::services::telegram_service::Notifier;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const CHAT_ID: &str = "-1001234567890";

/// Records every message instead of calling Telegram.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        if self.fail {
            return Err(Error::Telegram {
                status: 429,
                description: "Too Many Requests: retry after 5".to_string(),
            });
        }
        Ok(())
    }
}

pub fn jane() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "phone": "555-1111",
        "label": "Engineer",
        "location": "Remote",
        "salary": 90000,
        "url": "http://cv/jane",
        "profiles": [{"url": "http://li/jane"}, {"url": "http://gh/jane"}],
        "summary": "5 yrs backend."
    })
}
