use crate::config::RabbitConfig;
use crate::error::{Error, Result};
use crate::services::handler_service::{HandleOutcome, MessageHandler};
use crate::services::telegram_service::Notifier;
use crate::utils::retry::{retry_fixed, RetryPolicy};
use futures_lite::stream::{Stream, StreamExt};
use lapin::{
    options::{BasicConsumeOptions, QueueDeclareOptions},
    types::FieldTable,
    Channel, Connection, ConnectionProperties,
};
use std::future::Future;

const CONSUMER_TAG: &str = "cvmaker-notifier";

/// Opens the broker connection, retrying with a fixed delay.
pub async fn connect_with_retry(config: &RabbitConfig) -> Result<Connection> {
    let uri = config.amqp_uri()?;
    let policy = RetryPolicy {
        max_attempts: config.connect_attempts,
        delay: config.retry_delay,
    };

    let connected = retry_fixed(policy, |attempt| {
        tracing::info!(
            attempt,
            host = %config.host,
            port = config.port,
            "Connecting to RabbitMQ"
        );
        let uri = uri.clone();
        async move { Connection::connect(&uri, ConnectionProperties::default()).await }
    })
    .await;

    match connected {
        Ok(connection) => {
            tracing::info!(host = %config.host, port = config.port, "Connected to RabbitMQ");
            Ok(connection)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to connect to RabbitMQ after {} attempts. Exiting.",
                policy.max_attempts
            );
            Err(Error::ConnectRetriesExhausted {
                attempts: policy.max_attempts,
            })
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeStats {
    pub delivered: u64,
    pub malformed: u64,
    pub missing_field: u64,
    pub delivery_failed: u64,
}

impl ConsumeStats {
    pub fn record(&mut self, outcome: HandleOutcome) {
        match outcome {
            HandleOutcome::Delivered => self.delivered += 1,
            HandleOutcome::MalformedPayload => self.malformed += 1,
            HandleOutcome::MissingField => self.missing_field += 1,
            HandleOutcome::DeliveryFailed => self.delivery_failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.delivered + self.malformed + self.missing_field + self.delivery_failed
    }
}

pub struct BrokerService {
    connection: Connection,
    channel: Channel,
    queue: String,
}

impl BrokerService {
    /// Opens a channel and declares `queue` (no-op when it already exists).
    pub async fn open(connection: Connection, queue: &str) -> Result<Self> {
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
            .await?;
        tracing::info!(queue, "Queue declared");

        Ok(Self {
            connection,
            channel,
            queue: queue.to_string(),
        })
    }

    /// Subscribes with auto-ack and feeds each delivery to `handler` until
    /// `shutdown` resolves. Delivery is at-most-once: a message that fails to
    /// decode, render or deliver is not requeued.
    pub async fn consume<N, F>(&self, handler: &MessageHandler<N>, shutdown: F) -> Result<ConsumeStats>
    where
        N: Notifier,
        F: Future<Output = ()>,
    {
        let options = BasicConsumeOptions {
            no_ack: true,
            ..BasicConsumeOptions::default()
        };
        let consumer = self
            .channel
            .basic_consume(&self.queue, CONSUMER_TAG, options, FieldTable::default())
            .await?;

        tracing::info!(" [*] Waiting for messages. To exit press CTRL+C");

        let deliveries = consumer.map(|delivery| {
            delivery
                .map(|d| d.data)
                .map_err(Error::from)
        });
        run_consume_loop(&self.queue, deliveries, handler, shutdown).await
    }

    pub async fn close(self) -> Result<()> {
        self.connection.close(200, "Bye").await?;
        tracing::info!("RabbitMQ connection closed");
        Ok(())
    }
}

/// Handles message bodies one at a time, in arrival order. The next body is
/// not polled until the current one has been fully handled.
pub async fn run_consume_loop<S, N, F>(
    queue: &str,
    mut deliveries: S,
    handler: &MessageHandler<N>,
    shutdown: F,
) -> Result<ConsumeStats>
where
    S: Stream<Item = Result<Vec<u8>>> + Unpin,
    N: Notifier,
    F: Future<Output = ()>,
{
    let mut stats = ConsumeStats::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal, stopping consumer...");
                break;
            }
            next = deliveries.next() => match next {
                Some(Ok(body)) => stats.record(handler.handle(&body).await),
                Some(Err(e)) => return Err(e),
                None => return Err(Error::ConsumerClosed(queue.to_string())),
            },
        }
    }

    tracing::info!(
        total = stats.total(),
        delivered = stats.delivered,
        malformed = stats.malformed,
        missing_field = stats.missing_field,
        delivery_failed = stats.delivery_failed,
        "Consumer stopped"
    );
    Ok(stats)
}
