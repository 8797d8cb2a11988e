//! Subscribe-loop protocol tests (§4.4, §8) against a scripted [`Fetcher`]/
//! [`AckHandle`] pair, decoupled from the real broker so the loop's
//! cancellation, backoff, and ack/nak behavior can be verified without
//! waiting on real ack-wait timers.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use compozy_transport::{Fetcher, SubscribeConfig, SubscribeError, Subscriber};
use transport_ports::{AckError, AckHandle, HandlerError, Message, MessageHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AckOutcome {
    Acked,
    Naked,
}

#[derive(Clone)]
struct RecordingAck {
    id: u64,
    log: Arc<Mutex<Vec<(u64, AckOutcome)>>>,
}

impl AckHandle for RecordingAck {
    fn ack(&self) -> impl Future<Output = Result<(), AckError>> + Send {
        let (id, log) = (self.id, self.log.clone());
        async move {
            log.lock().unwrap().push((id, AckOutcome::Acked));
            Ok(())
        }
    }

    fn nak(&self) -> impl Future<Output = Result<(), AckError>> + Send {
        let (id, log) = (self.id, self.log.clone());
        async move {
            log.lock().unwrap().push((id, AckOutcome::Naked));
            Ok(())
        }
    }
}

enum Step {
    Batch(Vec<u64>),
    DeadlineExceeded,
    Transient,
    ConsumerNotFound,
}

/// Replays a fixed script of fetch outcomes, one per call; panics if the
/// loop asks for more than were scripted.
struct ScriptedFetcher {
    steps: Mutex<std::vec::IntoIter<Step>>,
    ack_log: Arc<Mutex<Vec<(u64, AckOutcome)>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter()),
            ack_log: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Fetcher for ScriptedFetcher {
    type Ack = RecordingAck;

    fn fetch(
        &self,
        _batch_size: usize,
        _timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Message<Self::Ack>>, compozy_transport::FetchError>> + Send
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().next();
        let ack_log = self.ack_log.clone();
        async move {
            match step {
                // Once the script runs out, behave like a real fetch whose
                // own `fetchTimeout` elapsed with nothing new. A short sleep
                // stands in for that elapsed wait so an exhausted script
                // can't busy-spin the loop between cancellation checks.
                None => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Err(compozy_transport::FetchError::DeadlineExceeded)
                }
                Some(Step::Batch(ids)) => Ok(ids
                    .into_iter()
                    .map(|id| Message {
                        subject: format!("evt.task.{id}"),
                        payload: bytes::Bytes::new(),
                        delivery_count: 1,
                        ack: RecordingAck {
                            id,
                            log: ack_log.clone(),
                        },
                    })
                    .collect()),
                Some(Step::DeadlineExceeded) => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Err(compozy_transport::FetchError::DeadlineExceeded)
                }
                Some(Step::Transient) => {
                    Err(compozy_transport::FetchError::Transient("blip".into()))
                }
                Some(Step::ConsumerNotFound) => Err(compozy_transport::FetchError::ConsumerNotFound),
            }
        }
    }
}

struct FailNTimesHandler {
    fail_until: u64,
}

impl MessageHandler<RecordingAck> for FailNTimesHandler {
    fn handle(
        &self,
        msg: &Message<RecordingAck>,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send {
        let should_fail = msg.delivery_count <= self.fail_until;
        async move {
            if should_fail {
                Err(HandlerError::new("not yet"))
            } else {
                Ok(())
            }
        }
    }
}

fn always_ok() -> impl MessageHandler<RecordingAck> {
    |_msg: &Message<RecordingAck>| async { Ok(()) }
}

#[tokio::test]
async fn handler_error_naks_and_loop_continues() {
    let fetcher = ScriptedFetcher::new(vec![Step::Batch(vec![1, 2])]);
    let ack_log = fetcher.ack_log.clone();
    let subscriber = Subscriber::new(test_client().await);
    let token = CancellationToken::new();
    let mut rx = subscriber.subscribe_consumer(
        token.clone(),
        fetcher,
        FailNTimesHandler { fail_until: 10 },
        SubscribeConfig::default(),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();
    assert_eq!(rx.recv().await, Some(SubscribeError::Canceled));
    let log = ack_log.lock().unwrap();
    assert_eq!(log.as_slice(), &[(1, AckOutcome::Naked), (2, AckOutcome::Naked)]);
}

#[tokio::test]
async fn empty_batch_with_deadline_exceeded_has_no_backoff() {
    let fetcher = ScriptedFetcher::new(vec![
        Step::DeadlineExceeded,
        Step::DeadlineExceeded,
        Step::DeadlineExceeded,
    ]);
    let subscriber = Subscriber::new(test_client().await);
    let token = CancellationToken::new();
    let mut rx = subscriber.subscribe_consumer(
        token.clone(),
        fetcher,
        always_ok(),
        SubscribeConfig::default(),
    );
    // Three scripted deadline-exceeded steps with no backoff should exhaust
    // well under the 1s fixed backoff used for transient errors.
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();
    assert_eq!(rx.recv().await, Some(SubscribeError::Canceled));
}

#[tokio::test]
async fn transient_error_backs_off_then_recovers() {
    let fetcher = ScriptedFetcher::new(vec![Step::Transient, Step::Batch(vec![7])]);
    let ack_log = fetcher.ack_log.clone();
    let subscriber = Subscriber::new(test_client().await);
    let token = CancellationToken::new();
    let mut rx = subscriber.subscribe_consumer(
        token.clone(),
        fetcher,
        always_ok(),
        SubscribeConfig::default(),
    );
    tokio::time::sleep(Duration::from_millis(1200)).await;
    token.cancel();
    assert_eq!(rx.recv().await, Some(SubscribeError::Canceled));
    assert_eq!(ack_log.lock().unwrap().as_slice(), &[(7, AckOutcome::Acked)]);
}

#[tokio::test]
async fn consumer_not_found_terminates_loop_and_closes_channel() {
    let fetcher = ScriptedFetcher::new(vec![Step::ConsumerNotFound]);
    let subscriber = Subscriber::new(test_client().await);
    let token = CancellationToken::new();
    let mut rx = subscriber.subscribe_consumer(
        token,
        fetcher,
        always_ok(),
        SubscribeConfig::default(),
    );
    assert_eq!(rx.recv().await, Some(SubscribeError::ConsumerNotFound));
    assert_eq!(rx.recv().await, None, "channel must close on termination");
}

#[tokio::test]
async fn cancellation_before_first_fetch_skips_the_broker() {
    let fetcher = ScriptedFetcher::new(vec![Step::Batch(vec![1])]);
    let calls = fetcher.calls.clone();
    let subscriber = Subscriber::new(test_client().await);
    let token = CancellationToken::new();
    token.cancel();
    let mut rx = subscriber.subscribe_consumer(
        token,
        fetcher,
        always_ok(),
        SubscribeConfig::default(),
    );
    assert_eq!(rx.recv().await, Some(SubscribeError::Canceled));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "fetch must not be called once canceled");
}

/// Subscriber needs a `Client` even when the test's own [`Fetcher`] never
/// touches it, since `client()` is part of the subscriber's public surface.
/// The broker handle itself can be dropped once the client's `Arc` is taken.
async fn test_client() -> compozy_transport::Client {
    let config = compozy_transport::BrokerConfig {
        enable_logging: false,
        enable_durable_log: false,
        ..compozy_transport::BrokerConfig::default()
    };
    let broker = compozy_transport::Broker::start(config).await.unwrap();
    compozy_transport::Client::new(&broker)
}
