pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Broker error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("Failed to connect to RabbitMQ after {attempts} attempts")]
    ConnectRetriesExhausted { attempts: u32 },

    #[error("Broker closed the consumer for queue '{0}'")]
    ConsumerClosed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing key in JSON: {0}")]
    MissingField(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Telegram API error ({status}): {description}")]
    Telegram { status: u16, description: String },
}
