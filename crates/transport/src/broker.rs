//! C1 — Broker Host: embedded persistent message broker lifecycle.
//!
//! `BrokerCore` is the shared, internally-synchronized state (streams and
//! consumers) that C2/C3/C4/C5 operate against. `Broker` is the public
//! lifecycle handle: it binds a loopback listener, waits for readiness,
//! and establishes the client connection the spec requires `start` to
//! prove before returning.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use transport_domain::StreamName;
use transport_ports::AckError;

use crate::config::{BrokerConfig, ConsumerPolicy};
use crate::errors::{BrokerError, ControlPlaneError, FetchError};
use crate::store::{check_domain_marker, ConsumerState, PendingDelivery, StreamStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Created,
    Starting,
    Ready,
    Stopping,
    Stopped,
}

pub(crate) struct BrokerCore {
    config: BrokerConfig,
    streams: Mutex<HashMap<StreamName, StreamStore>>,
    consumers: Mutex<HashMap<String, ConsumerState>>,
}

impl BrokerCore {
    fn new(config: BrokerConfig) -> Result<Self, BrokerError> {
        if config.enable_durable_log {
            check_domain_marker(&config.store_dir, &config.durable_log_domain)?;
        }
        Ok(Self {
            config,
            streams: Mutex::new(HashMap::new()),
            consumers: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) async fn ensure_stream(&self, name: StreamName) -> Result<(), BrokerError> {
        let mut streams = self.streams.lock().await;
        if streams.contains_key(&name) {
            return Ok(());
        }
        let store = StreamStore::open(&self.config.store_dir, name, self.config.enable_durable_log)?;
        streams.insert(name, store);
        debug!(stream = %name, "stream ensured");
        Ok(())
    }

    pub(crate) async fn has_stream(&self, name: StreamName) -> bool {
        self.streams.lock().await.contains_key(&name)
    }

    pub(crate) async fn publish(&self, subject: &str, payload: Bytes) -> Result<u64, ControlPlaneError> {
        let stream_name = StreamName::ALL
            .iter()
            .copied()
            .find(|s| subject.starts_with(s.subject_prefix()))
            .ok_or_else(|| ControlPlaneError::UnknownSubjectPrefix(subject.to_string()))?;
        let mut streams = self.streams.lock().await;
        let store = streams
            .get_mut(&stream_name)
            .ok_or_else(|| ControlPlaneError::UnknownStream(stream_name.to_string()))?;
        store
            .append(subject.to_string(), payload)
            .map_err(|e| ControlPlaneError::Io(e.to_string()))
    }

    pub(crate) async fn create_or_update_consumer(
        &self,
        stream: StreamName,
        name: &str,
        filter_subjects: Vec<String>,
        policy: ConsumerPolicy,
    ) -> Result<(), ControlPlaneError> {
        if !self.has_stream(stream).await {
            return Err(ControlPlaneError::UnknownStream(stream.to_string()));
        }
        let mut consumers = self.consumers.lock().await;
        match consumers.get_mut(name) {
            Some(existing) => {
                existing.filter_subjects = filter_subjects;
                existing.ack_wait = policy.ack_wait;
                existing.max_deliver = policy.max_deliver;
            }
            None => {
                consumers.insert(
                    name.to_string(),
                    ConsumerState {
                        stream,
                        filter_subjects,
                        ack_wait: policy.ack_wait,
                        max_deliver: policy.max_deliver,
                        cursor: 1,
                        pending: HashMap::new(),
                    },
                );
            }
        }
        Ok(())
    }

    pub(crate) async fn consumer_exists(&self, name: &str) -> bool {
        self.consumers.lock().await.contains_key(name)
    }

    /// One non-blocking snapshot of whatever is fetchable right now. Callers
    /// that want the deadline semantics poll this (see `consumer::Consumer`).
    pub(crate) async fn fetch_once(
        &self,
        consumer_name: &str,
        batch_size: usize,
    ) -> Result<Vec<(u64, String, Bytes, u32)>, FetchError> {
        let mut consumers = self.consumers.lock().await;
        let consumer = consumers
            .get_mut(consumer_name)
            .ok_or(FetchError::ConsumerNotFound)?;
        let streams = self.streams.lock().await;
        let store = streams
            .get(&consumer.stream)
            .ok_or(FetchError::ConsumerNotFound)?;
        let now = Instant::now();
        let mut out = Vec::new();

        let expired: Vec<u64> = consumer
            .pending
            .iter()
            .filter(|(_, p)| p.expires_at <= now)
            .map(|(seq, _)| *seq)
            .collect();
        for seq in expired {
            if out.len() >= batch_size {
                break;
            }
            let delivery_count = consumer.pending.get(&seq).map(|p| p.delivery_count).unwrap_or(0);
            if delivery_count >= consumer.max_deliver {
                consumer.pending.remove(&seq);
                continue;
            }
            if let Some(msg) = store.messages.iter().find(|m| m.seq == seq) {
                let new_count = delivery_count + 1;
                consumer.pending.insert(
                    seq,
                    PendingDelivery {
                        delivery_count: new_count,
                        expires_at: now + consumer.ack_wait,
                    },
                );
                out.push((seq, msg.subject.clone(), msg.payload.clone(), new_count));
            } else {
                consumer.pending.remove(&seq);
            }
        }

        if out.len() < batch_size {
            let cursor = consumer.cursor;
            for msg in store.messages.iter().filter(|m| m.seq >= cursor) {
                if out.len() >= batch_size {
                    break;
                }
                if consumer.pending.contains_key(&msg.seq) {
                    continue;
                }
                if !consumer.matches(&msg.subject) {
                    consumer.cursor = consumer.cursor.max(msg.seq + 1);
                    continue;
                }
                consumer.pending.insert(
                    msg.seq,
                    PendingDelivery {
                        delivery_count: 1,
                        expires_at: now + consumer.ack_wait,
                    },
                );
                consumer.cursor = consumer.cursor.max(msg.seq + 1);
                out.push((msg.seq, msg.subject.clone(), msg.payload.clone(), 1));
            }
        }

        Ok(out)
    }

    pub(crate) async fn ack(&self, consumer_name: &str, seq: u64) -> Result<(), AckError> {
        let mut consumers = self.consumers.lock().await;
        let consumer = consumers.get_mut(consumer_name).ok_or_else(|| AckError {
            op: "ack",
            reason: "consumer not found".to_string(),
        })?;
        consumer.pending.remove(&seq);
        Ok(())
    }

    pub(crate) async fn nak(&self, consumer_name: &str, seq: u64) -> Result<(), AckError> {
        let mut consumers = self.consumers.lock().await;
        let consumer = consumers.get_mut(consumer_name).ok_or_else(|| AckError {
            op: "nak",
            reason: "consumer not found".to_string(),
        })?;
        if let Some(pending) = consumer.pending.get_mut(&seq) {
            pending.expires_at = Instant::now();
        }
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    mut shutdown_rx: oneshot::Receiver<()>,
    ready_tx: oneshot::Sender<()>,
) {
    let _ = ready_tx.send(());
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _)) => drop(stream),
                    Err(e) => {
                        warn!(error = %e, "broker accept loop error");
                        break;
                    }
                }
            }
        }
    }
}

/// Public C1 lifecycle handle.
pub struct Broker {
    pub(crate) core: Arc<BrokerCore>,
    local_addr: SocketAddr,
    state: BrokerState,
    accept_task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _heartbeat: Option<TcpStream>,
}

impl Broker {
    #[instrument(skip(config), fields(server_name = %config.server_name, port = config.port))]
    pub async fn start(config: BrokerConfig) -> Result<Self, BrokerError> {
        let enable_logging = config.enable_logging;
        let server_name = config.server_name.clone();
        if enable_logging {
            info!(server_name = %server_name, "starting broker");
        }

        let listener = TcpListener::bind(("127.0.0.1", config.port))
            .await
            .map_err(|e| BrokerError::Io(e.to_string()))?;
        let local_addr = listener.local_addr().map_err(|e| BrokerError::Io(e.to_string()))?;
        if !local_addr.ip().is_loopback() {
            return Err(BrokerError::AddressResolution);
        }

        let core = Arc::new(BrokerCore::new(config)?);

        let (ready_tx, ready_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let accept_task = tokio::spawn(accept_loop(listener, shutdown_rx, ready_tx));

        tokio::time::timeout(Duration::from_secs(15), ready_rx)
            .await
            .map_err(|_| BrokerError::NotReady)?
            .map_err(|_| BrokerError::NotReady)?;

        let heartbeat = TcpStream::connect(local_addr)
            .await
            .map_err(|e| BrokerError::ConnectFailed(e.to_string()))?;

        if enable_logging {
            info!(addr = %local_addr, "broker ready");
        }

        Ok(Self {
            core,
            local_addr,
            state: BrokerState::Ready,
            accept_task: Some(accept_task),
            shutdown_tx: Some(shutdown_tx),
            _heartbeat: Some(heartbeat),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn running(&self) -> bool {
        self.state == BrokerState::Ready
    }

    pub async fn shutdown(&mut self) {
        if self.state == BrokerState::Stopped || self.state == BrokerState::Stopping {
            return;
        }
        self.state = BrokerState::Stopping;
        self._heartbeat.take();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "broker accept task join error during shutdown");
            }
        }
        self.state = BrokerState::Stopped;
        info!("broker stopped");
    }
}
