#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use move_forward::config::{ServiceEndpoint, Settings};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{Request, Response},
        Message,
    },
};

/// Accepts one WebSocket client, sends `frames`, then closes the stream.
///
/// Returns the stream URL and a receiver for the client's query string.
pub async fn spawn_event_server(frames: Vec<Message>) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener
        .local_addr()
        .expect("local addr should be available");
    let (query_tx, query_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("server should accept");
        let query = Arc::new(Mutex::new(String::new()));
        let capture = Arc::clone(&query);
        let mut ws = accept_hdr_async(stream, move |req: &Request, response: Response| {
            *capture.lock().expect("query lock should not poison") =
                req.uri().query().unwrap_or_default().to_string();
            Ok(response)
        })
        .await
        .expect("handshake should succeed");
        let captured = query.lock().expect("query lock should not poison").clone();
        let _ = query_tx.send(captured);

        for frame in frames {
            ws.send(frame).await.expect("frame should send");
        }
        let _ = ws.close(None).await;
        while let Some(Ok(_)) = ws.next().await {}
    });

    (format!("ws://{address}/events"), query_rx)
}

/// A local address nothing listens on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener
        .local_addr()
        .expect("local addr should be available");
    drop(listener);
    address.to_string()
}

pub fn endpoint(api_base_url: &str, ws_base_url: &str) -> ServiceEndpoint {
    ServiceEndpoint {
        name: "acme".to_string(),
        api_base_url: api_base_url.to_string(),
        web_socket_base_url: ws_base_url.to_string(),
        description: "Acme webhooks".to_string(),
        poll_interval_seconds: Some(1),
        max_retries: Some(3),
    }
}

pub fn settings(dir: &tempfile::TempDir, directory_url: &str) -> Settings {
    let mut settings = Settings::default().with_config_path(dir.path().join("move-forward.json"));
    settings.directory_url = directory_url.to_string();
    settings
}
