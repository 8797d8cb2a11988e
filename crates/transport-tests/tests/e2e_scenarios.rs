//! End-to-end scenarios against the real embedded broker (§8 S1, S2, S4).

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use compozy_transport::{
    Broker, BrokerConfig, Client, Fetcher, Publisher, SubscribeConfig, Subscriber,
};
use transport_domain::{
    cmd_consumer_name, evt_consumer_name, parse_event, ComponentType, EventType, TaskIdentity,
    WorkflowIdentity,
};
use transport_ports::{AckHandle, HandlerError, Message, MessageHandler};

async fn started_client() -> (Broker, Client) {
    let config = BrokerConfig {
        enable_logging: false,
        enable_durable_log: false,
        ..BrokerConfig::default()
    };
    let broker = Broker::start(config).await.expect("broker starts");
    let client = Client::new(&broker);
    client.setup().await.expect("setup is idempotent");
    (broker, client)
}

#[tokio::test]
async fn s1_workflow_success_round_trip() {
    let (_broker, client) = started_client().await;
    let publisher = Publisher::new(client.clone());
    let token = CancellationToken::new();

    let event = WorkflowIdentity {
        workflow_id: "wf-1".into(),
        exec_id: "e-42".into(),
    };
    let typed = transport_domain::TypedEvent::WorkflowSuccess(event.clone());
    publisher.publish(&token, &typed).await.expect("publish succeeds");

    let name = evt_consumer_name(ComponentType::Workflow, EventType::Success);
    let consumer = client
        .get_evt_consumer(&name, vec!["evt.workflow.success".to_string()])
        .await
        .expect("consumer created");

    let delivered = consumer
        .fetch(10, Duration::from_secs(1))
        .await
        .expect("one message delivered");
    assert_eq!(delivered.len(), 1);
    let msg = &delivered[0];
    let parsed = parse_event(ComponentType::Workflow, EventType::Success, &msg.payload)
        .expect("decodes cleanly");
    assert_eq!(parsed, typed);
    msg.ack.ack().await.expect("ack succeeds");
}

#[tokio::test]
async fn s2_task_waiting_lifecycle_preserves_publish_order() {
    let (_broker, client) = started_client().await;
    let publisher = Publisher::new(client.clone());
    let token = CancellationToken::new();

    let identity = TaskIdentity {
        task_exec_id: "t-1".into(),
        workflow_exec_id: "wf-1".into(),
    };
    let sequence = [
        transport_domain::TypedEvent::TaskDispatched(identity.clone()),
        transport_domain::TypedEvent::TaskStarted(identity.clone()),
        transport_domain::TypedEvent::TaskWaitingStarted(identity.clone()),
        transport_domain::TypedEvent::TaskWaitingEnded(identity.clone()),
        transport_domain::TypedEvent::TaskSuccess(identity.clone()),
    ];
    for event in &sequence {
        publisher.publish(&token, event).await.expect("publish succeeds");
    }

    let name = evt_consumer_name(ComponentType::Task, EventType::All);
    let consumer = client
        .get_evt_consumer(&name, vec!["evt.task".to_string()])
        .await
        .expect("consumer created");

    let delivered = consumer
        .fetch(10, Duration::from_secs(1))
        .await
        .expect("all five delivered");
    assert_eq!(delivered.len(), 5);

    let expected_subjects = [
        "evt.task.dispatched",
        "evt.task.started",
        "evt.task.waiting_started",
        "evt.task.waiting_ended",
        "evt.task.success",
    ];
    for (msg, expected) in delivered.iter().zip(expected_subjects) {
        assert_eq!(msg.subject, expected);
        msg.ack.ack().await.expect("ack succeeds");
    }
}

#[tokio::test]
async fn s4_handler_nak_then_success_redelivers_once() {
    let (_broker, client) = started_client().await;
    let publisher = Publisher::new(client.clone());
    let token = CancellationToken::new();

    let identity = TaskIdentity {
        task_exec_id: "t-2".into(),
        workflow_exec_id: "wf-2".into(),
    };
    publisher
        .publish(&token, &transport_domain::TypedEvent::TaskStarted(identity))
        .await
        .expect("publish succeeds");

    let name = evt_consumer_name(ComponentType::Task, EventType::Started);
    let consumer = client
        .get_evt_consumer(&name, vec!["evt.task.started".to_string()])
        .await
        .expect("consumer created");

    let deliveries = Arc::new(AtomicUsize::new(0));
    let subscriber = Subscriber::new(client.clone());
    let loop_token = CancellationToken::new();

    struct NakFirstHandler {
        deliveries: Arc<AtomicUsize>,
    }
    impl MessageHandler<compozy_transport::BrokerAckHandle> for NakFirstHandler {
        fn handle(
            &self,
            msg: &Message<compozy_transport::BrokerAckHandle>,
        ) -> impl Future<Output = Result<(), HandlerError>> + Send {
            let count = self.deliveries.fetch_add(1, Ordering::SeqCst);
            let delivery_count = msg.delivery_count;
            async move {
                if count == 0 {
                    assert_eq!(delivery_count, 1);
                    Err(HandlerError::new("first delivery fails on purpose"))
                } else {
                    assert_eq!(delivery_count, 2);
                    Ok(())
                }
            }
        }
    }

    let mut rx = subscriber.subscribe_consumer(
        loop_token.clone(),
        consumer,
        NakFirstHandler {
            deliveries: deliveries.clone(),
        },
        SubscribeConfig {
            batch_size: 10,
            fetch_timeout: Duration::from_millis(200),
            ..SubscribeConfig::default()
        },
    );

    tokio::time::timeout(Duration::from_secs(5), async {
        while deliveries.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("message is redelivered and acked within the timeout");

    loop_token.cancel();
    assert_eq!(rx.recv().await, Some(compozy_transport::SubscribeError::Canceled));
}

#[tokio::test]
async fn consumer_names_share_cursor_for_horizontal_scaling() {
    let (_broker, client) = started_client().await;
    let name = cmd_consumer_name(ComponentType::Agent, transport_domain::CommandType::All);
    let a = client.get_cmd_consumer(&name, vec![]).await.unwrap();
    let b = client.get_cmd_consumer(&name, vec![]).await.unwrap();
    assert_eq!(a.name(), b.name());
}
