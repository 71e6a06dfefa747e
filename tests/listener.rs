//! Listener tests against a local WebSocket node
//!
//! Each test binds its own port and plays the node side of the STOMP
//! conversation with tokio-tungstenite.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use nem_client::account::Address;
use nem_client::network::{Channel, Listener, ListenerConfig, StompFrame};

const ACCOUNT: &str = "TCTUIF557ZCQOQPW2M6GH4TCDPM2ZYBBL54KGNHR";
const WAIT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

async fn bind() -> (TcpListener, ListenerConfig) {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();
    let config = ListenerConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: WAIT,
        ..Default::default()
    };
    (server, config)
}

async fn accept(server: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = server.accept().await.unwrap();
    accept_async(stream).await.unwrap()
}

async fn next_frame(ws: &mut WebSocketStream<TcpStream>) -> Option<StompFrame> {
    while let Some(message) = ws.next().await {
        match message {
            Ok(Message::Text(text)) => return Some(StompFrame::decode(text.as_str()).unwrap()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}

async fn send_text(ws: &mut WebSocketStream<TcpStream>, text: &str) {
    ws.send(Message::text(text.to_string())).await.unwrap();
}

async fn wait_until_disconnected(listener: &Listener) {
    timeout(WAIT, async {
        while listener.is_connected() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_handshake_subscribe_and_dispatch() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (server, config) = bind().await;
    let address = Address::from_text(ACCOUNT).unwrap();

    let node = tokio::spawn(async move {
        let mut ws = accept(&server).await;

        let connect = next_frame(&mut ws).await.unwrap();
        assert_eq!(connect.command(), "CONNECT");
        send_text(&mut ws, "CONNECTED\nversion:1.1\n\n\0").await;

        let errors = next_frame(&mut ws).await.unwrap();
        assert_eq!(errors.command(), "SUBSCRIBE");
        assert_eq!(errors.subscription_id(), Some("sub-0"));
        assert_eq!(errors.destination(), Some("/errors"));

        let blocks = next_frame(&mut ws).await.unwrap();
        assert_eq!(blocks.subscription_id(), Some("sub-1"));
        assert_eq!(blocks.destination(), Some("/blocks/new"));

        let mosaics = next_frame(&mut ws).await.unwrap();
        assert_eq!(mosaics.subscription_id(), Some("sub-2"));
        let expected = format!("/account/mosaic/owned/{}", ACCOUNT);
        assert_eq!(mosaics.destination(), Some(expected.as_str()));

        let request = next_frame(&mut ws).await.unwrap();
        assert_eq!(request.command(), "SEND");
        assert_eq!(request.destination(), Some("/w/api/account/mosaic/owned"));
        assert_eq!(request.body(), format!("{{\"account\":\"{}\"}}", ACCOUNT));

        send_text(
            &mut ws,
            "MESSAGE\ndestination:/blocks/new\nsubscription:sub-1\n\n{\"height\":1234}\0",
        )
        .await;
        send_text(
            &mut ws,
            &format!(
                "MESSAGE\ndestination:/account/mosaic/owned/{}\nsubscription:sub-2\n\n{{\"quantity\":5}}\0",
                ACCOUNT
            ),
        )
        .await;
        send_text(&mut ws, "ERROR\nmessage:failed\n\nsomething failed\0").await;

        let unsubscribe = next_frame(&mut ws).await.unwrap();
        assert_eq!(unsubscribe.command(), "UNSUBSCRIBE");
        assert_eq!(unsubscribe.subscription_id(), Some("sub-1"));

        let disconnect = next_frame(&mut ws).await.unwrap();
        assert_eq!(disconnect.command(), "DISCONNECT");
        while next_frame(&mut ws).await.is_some() {}
    });

    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let mut listener = Listener::new(config);
    let connected = listener
        .connect(move |text| {
            let _ = error_tx.send(text.to_string());
        })
        .await;
    assert!(connected);
    assert!(listener.is_connected());

    let (block_tx, mut block_rx) = mpsc::unbounded_channel();
    let blocks = listener
        .subscribe_blocks(move |height| {
            let _ = block_tx.send(height);
        })
        .await
        .unwrap();
    assert_eq!(blocks.id, "sub-1");
    assert!(!blocks.replaced);

    let (mosaic_tx, mut mosaic_rx) = mpsc::unbounded_channel();
    listener
        .subscribe_owned_mosaics(&address, move |owner, body| {
            let _ = mosaic_tx.send((owner.clone(), body.to_string()));
        })
        .await
        .unwrap();

    assert_eq!(timeout(WAIT, block_rx.recv()).await.unwrap(), Some(1234));
    let (owner, body) = timeout(WAIT, mosaic_rx.recv()).await.unwrap().unwrap();
    assert_eq!(owner, address);
    assert_eq!(body, "{\"quantity\":5}");
    assert_eq!(
        timeout(WAIT, error_rx.recv()).await.unwrap(),
        Some("something failed".to_string())
    );

    listener.unsubscribe(&blocks).await.unwrap();
    assert!(listener.disconnect().await);
    assert!(!listener.is_connected());

    node.await.unwrap();
}

#[tokio::test]
async fn test_rejected_handshake() {
    let (server, config) = bind().await;

    let node = tokio::spawn(async move {
        let mut ws = accept(&server).await;
        let connect = next_frame(&mut ws).await.unwrap();
        assert_eq!(connect.command(), "CONNECT");
        send_text(&mut ws, "ERROR\nmessage:not accepted\n\n\0").await;
        // drain until the client goes away
        while next_frame(&mut ws).await.is_some() {}
    });

    let mut listener = Listener::new(config);
    assert!(!listener.connect(|_| {}).await);
    assert!(!listener.is_connected());

    node.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_node() {
    let (server, config) = bind().await;
    drop(server);

    let mut listener = Listener::new(config);
    assert!(!listener.connect(|_| {}).await);
}

#[tokio::test]
async fn test_resubscribe_replaces_handler() {
    let (server, config) = bind().await;

    let node = tokio::spawn(async move {
        let mut ws = accept(&server).await;
        next_frame(&mut ws).await.unwrap();
        send_text(&mut ws, "CONNECTED\n\n\0").await;
        let mut ids = Vec::new();
        while let Some(frame) = next_frame(&mut ws).await {
            if frame.command() == "SUBSCRIBE" {
                ids.push(frame.subscription_id().unwrap_or_default().to_string());
            }
        }
        ids
    });

    let mut listener = Listener::new(config);
    assert!(listener.connect(|_| {}).await);

    let first = listener.subscribe_blocks(|_| {}).await.unwrap();
    let second = listener.subscribe_blocks(|_| {}).await.unwrap();
    assert!(!first.replaced);
    assert!(second.replaced);
    assert_ne!(first.id, second.id);

    assert!(listener.disconnect().await);
    let ids = node.await.unwrap();
    assert_eq!(ids, vec!["sub-0", "sub-1", "sub-2"]);
}

#[tokio::test]
async fn test_dropped_transport_reaches_error_handler() {
    let (server, config) = bind().await;

    let node = tokio::spawn(async move {
        let mut ws = accept(&server).await;
        next_frame(&mut ws).await.unwrap();
        send_text(&mut ws, "CONNECTED\n\n\0").await;
        let errors = next_frame(&mut ws).await.unwrap();
        assert_eq!(errors.destination(), Some("/errors"));
        // no closing handshake
        drop(ws);
    });

    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let mut listener = Listener::new(config);
    assert!(
        listener
            .connect(move |text| {
                let _ = error_tx.send(text.to_string());
            })
            .await
    );
    node.await.unwrap();

    let reported = timeout(WAIT, error_rx.recv()).await.unwrap().unwrap();
    assert!(!reported.is_empty());
    wait_until_disconnected(&listener).await;
    assert!(!listener.is_connected());
}

#[tokio::test]
async fn test_failed_subscribe_keeps_previous_handler() {
    let (server, config) = bind().await;

    let node = tokio::spawn(async move {
        let mut ws = accept(&server).await;
        next_frame(&mut ws).await.unwrap();
        send_text(&mut ws, "CONNECTED\n\n\0").await;
        next_frame(&mut ws).await.unwrap();
        let blocks = next_frame(&mut ws).await.unwrap();
        assert_eq!(blocks.subscription_id(), Some("sub-1"));
        ws.close(None).await.unwrap();
    });

    let mut listener = Listener::new(config);
    assert!(listener.connect(|_| {}).await);
    let first = listener.subscribe_blocks(|_| {}).await.unwrap();
    assert_eq!(first.id, "sub-1");

    node.await.unwrap();
    wait_until_disconnected(&listener).await;

    assert!(listener.subscribe_blocks(|_| {}).await.is_err());
    assert_eq!(
        listener.active_subscription(Channel::Blocks).await,
        Some("sub-1".to_string())
    );
    assert_eq!(
        listener.active_subscription(Channel::Errors).await,
        Some("sub-0".to_string())
    );
}
