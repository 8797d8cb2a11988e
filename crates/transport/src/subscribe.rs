//! C4 — Subscribe Loop: drives a single consumer in a pull/ack loop,
//! invoking a user-supplied handler per message, following the exact
//! protocol in §4.4.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use transport_ports::{AckHandle, MessageHandler, TerminationReason};

use crate::client::Client;
use crate::config::SubscribeConfig;
use crate::consumer::Fetcher;
use crate::errors::{FetchError, SubscribeError};

pub struct Subscriber {
    client: Client,
}

impl Subscriber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Spawns the loop and returns the buffered, single-slot error channel
    /// (§4.4 "Error channel"). Channel closure is the loop's termination
    /// signal.
    pub fn subscribe_consumer<F, H>(
        &self,
        token: CancellationToken,
        consumer: F,
        handler: H,
        config: SubscribeConfig,
    ) -> mpsc::Receiver<SubscribeError>
    where
        F: Fetcher + Send + Sync + 'static,
        F::Ack: Send + Sync + 'static,
        H: MessageHandler<F::Ack> + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(run_loop(token, consumer, handler, config, tx));
        rx
    }
}

#[instrument(skip(token, consumer, handler, config, tx), fields(batch_size = config.batch_size))]
async fn run_loop<F, H>(
    token: CancellationToken,
    consumer: F,
    handler: H,
    config: SubscribeConfig,
    tx: mpsc::Sender<SubscribeError>,
) where
    F: Fetcher,
    H: MessageHandler<F::Ack>,
{
    loop {
        if token.is_cancelled() {
            let _ = tx.send(SubscribeError::Canceled).await;
            handler.on_terminate(TerminationReason::Canceled);
            break;
        }

        match consumer.fetch(config.batch_size, config.fetch_timeout).await {
            Ok(messages) => {
                for msg in messages {
                    match handler.handle(&msg).await {
                        Ok(()) => {
                            if let Err(e) = msg.ack.ack().await {
                                warn!(error = %e, "ack failed");
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "handler failed, naking message");
                            if let Err(e) = msg.ack.nak().await {
                                warn!(error = %e, "nak failed");
                            }
                        }
                    }
                }
            }
            Err(FetchError::ConsumerNotFound) => {
                let _ = tx.send(SubscribeError::ConsumerNotFound).await;
                handler.on_terminate(TerminationReason::ConsumerNotFound);
                break;
            }
            Err(FetchError::DeadlineExceeded) => {
                warn!("fetch deadline exceeded with no matching messages");
            }
            Err(FetchError::Transient(reason)) => {
                warn!(reason = %reason, "transient fetch error, backing off");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
    info!("subscribe loop terminated");
}
