mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use move_forward::auth::Credential;
use move_forward::error::MoveForwardError;
use move_forward::relay::{EventRelay, RelayEvent, RelayObserver, RelayTarget};
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> Credential {
    Credential {
        token: "secret-token".to_string(),
        device_id: "device-id-1".to_string(),
        expires_at: None,
    }
}

fn recording_observer() -> (RelayObserver, Arc<Mutex<Vec<RelayEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let observer: RelayObserver = Arc::new(move |event: &RelayEvent| {
        sink.lock().expect("events lock").push(event.clone());
    });
    (observer, events)
}

async fn forwarded_bodies(sink: &MockServer) -> Vec<String> {
    sink.received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|req| String::from_utf8_lossy(&req.body).to_string())
        .collect()
}

fn relay() -> EventRelay {
    EventRelay::new(reqwest::Client::new(), Duration::from_secs(5))
}

#[tokio::test]
async fn forwards_events_in_receipt_order_then_reports_closed_stream() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&sink)
        .await;
    let (stream_url, query_rx) = support::spawn_event_server(vec![
        Message::text(r#"{"id":"A"}"#),
        Message::text(r#"{"id":"B"}"#),
        Message::binary(br#"{"id":"C"}"#.to_vec()),
    ])
    .await;
    let (observer, events) = recording_observer();
    let target = RelayTarget::new(format!("{}/hooks", sink.uri()));

    let err = relay()
        .with_observer(observer)
        .run(&stream_url, &credential(), &target)
        .await
        .unwrap_err();

    assert!(matches!(err, MoveForwardError::RelayRead(_)), "got {err:?}");
    assert_eq!(query_rx.await.expect("query captured"), "token=secret-token");
    assert_eq!(
        forwarded_bodies(&sink).await,
        vec![r#"{"id":"A"}"#, r#"{"id":"B"}"#, r#"{"id":"C"}"#]
    );

    let events = events.lock().expect("events lock");
    assert!(matches!(events.first(), Some(RelayEvent::Connected { .. })));
    assert!(matches!(events.last(), Some(RelayEvent::Closed { .. })));
    let forwarded: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            RelayEvent::Forwarded { seq } => Some(*seq),
            _ => None,
        })
        .collect();
    assert_eq!(forwarded, vec![1, 2, 3]);
}

#[tokio::test]
async fn failed_forward_is_skipped_and_next_event_still_delivered() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks"))
        .and(body_string("C"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&sink)
        .await;
    Mock::given(method("POST"))
        .and(path("/hooks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sink)
        .await;
    let (stream_url, _query_rx) =
        support::spawn_event_server(vec![Message::text("C"), Message::text("D")]).await;
    let (observer, events) = recording_observer();
    let target = RelayTarget::new(format!("{}/hooks", sink.uri()));

    let err = relay()
        .with_observer(observer)
        .run(&stream_url, &credential(), &target)
        .await
        .unwrap_err();

    assert!(matches!(err, MoveForwardError::RelayRead(_)));
    assert_eq!(forwarded_bodies(&sink).await, vec!["C", "D"]);
    let events = events.lock().expect("events lock");
    assert!(events
        .iter()
        .any(|e| matches!(e, RelayEvent::ForwardFailed { seq: 1, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, RelayEvent::Forwarded { seq: 2 })));
}

#[tokio::test]
async fn unreachable_sink_does_not_stop_the_relay() {
    let closed = support::closed_address().await;
    let (stream_url, _query_rx) =
        support::spawn_event_server(vec![Message::text("A"), Message::text("B")]).await;
    let (observer, events) = recording_observer();
    let target = RelayTarget::new(format!("http://{closed}/hooks"));

    let err = relay()
        .with_observer(observer)
        .run(&stream_url, &credential(), &target)
        .await
        .unwrap_err();

    assert!(matches!(err, MoveForwardError::RelayRead(_)));
    let failed = events
        .lock()
        .expect("events lock")
        .iter()
        .filter(|e| matches!(e, RelayEvent::ForwardFailed { .. }))
        .count();
    assert_eq!(failed, 2);
}

#[tokio::test]
async fn ping_frames_are_not_forwarded() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&sink)
        .await;
    let (stream_url, _query_rx) = support::spawn_event_server(vec![
        Message::Ping(Default::default()),
        Message::text("only-event"),
    ])
    .await;
    let target = RelayTarget::new(format!("{}/hooks", sink.uri()));

    let err = relay()
        .run(&stream_url, &credential(), &target)
        .await
        .unwrap_err();

    assert!(matches!(err, MoveForwardError::RelayRead(_)));
    assert_eq!(forwarded_bodies(&sink).await, vec!["only-event"]);
}

#[tokio::test]
async fn connection_failure_is_fatal_and_forwards_nothing() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sink)
        .await;
    let closed = support::closed_address().await;
    let target = RelayTarget::new(format!("{}/hooks", sink.uri()));

    let err = relay()
        .run(&format!("ws://{closed}/events"), &credential(), &target)
        .await
        .unwrap_err();

    assert!(matches!(err, MoveForwardError::RelayConnection(_)), "got {err:?}");
    assert!(err.is_fatal());
}
