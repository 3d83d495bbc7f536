use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_QUEUE: &str = "cvmaker_queue";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct RabbitConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub vhost: String,
    pub queue: String,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
}

impl RabbitConfig {
    /// Builds the `amqp://` URI. Credentials and vhost are percent-encoded.
    pub fn amqp_uri(&self) -> Result<String> {
        let mut uri = Url::parse("amqp://localhost")
            .map_err(|e| Error::Config(format!("Invalid broker URI: {}", e)))?;
        uri.set_host(Some(&self.host))
            .map_err(|e| Error::Config(format!("Invalid RABBITMQ_HOST '{}': {}", self.host, e)))?;
        uri.set_port(Some(self.port))
            .map_err(|_| Error::Config("Broker URI cannot carry a port".to_string()))?;
        uri.set_username(&self.user)
            .map_err(|_| Error::Config("Broker URI cannot carry a username".to_string()))?;
        uri.set_password(Some(&self.password))
            .map_err(|_| Error::Config("Broker URI cannot carry a password".to_string()))?;

        let vhost: String = url::form_urlencoded::byte_serialize(self.vhost.as_bytes()).collect();
        uri.set_path(&format!("/{}", vhost));
        Ok(uri.to_string())
    }
}

impl fmt::Debug for RabbitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RabbitConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("vhost", &self.vhost)
            .field("queue", &self.queue)
            .field("connect_attempts", &self.connect_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rabbitmq: RabbitConfig,
    pub telegram: TelegramConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            rabbitmq: RabbitConfig {
                host: get_env_or("RABBITMQ_HOST", "rabbitmq"),
                port: get_env_parse_or("RABBITMQ_PORT", 5672)?,
                user: get_env_or("RABBITMQ_USER", "guest"),
                password: get_env_or("RABBITMQ_PASS", "guest"),
                vhost: get_env_or("RABBITMQ_VHOST", "/"),
                queue: get_env_or("RABBITMQ_QUEUE", DEFAULT_QUEUE),
                connect_attempts: get_env_parse_or("RABBITMQ_CONNECT_ATTEMPTS", 10)?,
                retry_delay: Duration::from_secs(get_env_parse_or("RABBITMQ_RETRY_DELAY_SECS", 5)?),
            },
            telegram: TelegramConfig {
                bot_token: get_env("TELEGRAM_BOT_TOKEN")?,
                chat_id: get_env("TELEGRAM_CHAT_ID")?,
                api_base: get_env_or("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(get_env_parse_or("TELEGRAM_TIMEOUT_SECS", 30)?),
            },
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("Missing environment variable: {}", name))),
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
