pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    handler_service::MessageHandler, telegram_service::TelegramService,
};

/// Everything the consume loop needs, built once at startup and passed down.
pub struct AppState {
    pub config: Config,
    pub handler: MessageHandler<TelegramService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let telegram = TelegramService::from_config(&config.telegram)?;
        let handler = MessageHandler::new(telegram, config.telegram.chat_id.clone());

        Ok(Self { config, handler })
    }
}
