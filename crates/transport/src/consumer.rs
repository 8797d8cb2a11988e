//! C3 — Consumer Factory: the durable pull-consumer handle and its
//! broker-backed ack capability. `Fetcher` is the abstraction the subscribe
//! loop (C4) drives; it exists so tests can script fetch outcomes without a
//! real broker behind them (§8 invariants 4-6).

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::instrument;

use transport_ports::{AckError, AckHandle, Message};

use crate::broker::BrokerCore;
use crate::errors::FetchError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Capability to pull a batch from a durable consumer, bounded by a
/// per-fetch deadline (§4.4 step 2).
pub trait Fetcher: Send + Sync {
    type Ack: AckHandle;

    fn fetch(
        &self,
        batch_size: usize,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Message<Self::Ack>>, FetchError>> + Send;
}

/// Ack handle bound to one delivered message on one broker-backed consumer.
pub struct BrokerAckHandle {
    core: Arc<BrokerCore>,
    consumer_name: String,
    seq: u64,
}

impl AckHandle for BrokerAckHandle {
    fn ack(&self) -> impl Future<Output = Result<(), AckError>> + Send {
        async move { self.core.ack(&self.consumer_name, self.seq).await }
    }

    fn nak(&self) -> impl Future<Output = Result<(), AckError>> + Send {
        async move { self.core.nak(&self.consumer_name, self.seq).await }
    }
}

/// A durable pull consumer handle (§4.3). Durable name = consumer name, so
/// restarts resume from the stored cursor.
pub struct Consumer {
    core: Arc<BrokerCore>,
    name: String,
}

impl Consumer {
    pub(crate) fn new(core: Arc<BrokerCore>, name: String) -> Self {
        Self { core, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn exists(&self) -> bool {
        self.core.consumer_exists(&self.name).await
    }
}

impl Fetcher for Consumer {
    type Ack = BrokerAckHandle;

    #[instrument(skip(self), fields(consumer = %self.name, batch_size))]
    async fn fetch(
        &self,
        batch_size: usize,
        timeout: Duration,
    ) -> Result<Vec<Message<Self::Ack>>, FetchError> {
        let deadline = Instant::now() + timeout;
        loop {
            let batch = self.core.fetch_once(&self.name, batch_size).await?;
            if !batch.is_empty() {
                return Ok(batch
                    .into_iter()
                    .map(|(seq, subject, payload, delivery_count)| Message {
                        subject,
                        payload,
                        delivery_count: delivery_count as u64,
                        ack: BrokerAckHandle {
                            core: self.core.clone(),
                            consumer_name: self.name.clone(),
                            seq,
                        },
                    })
                    .collect());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(FetchError::DeadlineExceeded);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
