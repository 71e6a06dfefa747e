//! Real-time listener
//!
//! Connects to a node's WebSocket endpoint, performs the STOMP handshake and
//! runs a dispatch task that hands pushed events to registered callbacks.

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::codec::{Decoder, Encoder};
use tokio_util::sync::CancellationToken;

use super::channel::{snapshot_request_body, Channel};
use super::message::{client_commands, server_commands, subscription_id, StompCodec, StompFrame};
use super::router::{Handler, Router};
use crate::account::{Address, AddressError};

/// Default WebSocket port of a NIS node
pub const DEFAULT_PORT: u16 = 7778;

/// Default WebSocket path of a NIS node
pub const DEFAULT_PATH: &str = "/w/messages/websocket";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Errors that can occur in the listener
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
    #[error("Invalid message body: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("Handshake rejected: expected CONNECTED, got {0}")]
    HandshakeRejected(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Listener is not connected")]
    NotConnected,
    #[error("Channel {0} requires an account address")]
    MissingAddress(Channel),
    #[error("Handler kind does not match channel {0}")]
    HandlerMismatch(Channel),
}

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Node host name or IP
    pub host: String,
    /// WebSocket port
    pub port: u16,
    /// WebSocket endpoint path
    pub path: String,
    /// Limit for opening the socket and for the CONNECTED reply
    pub connect_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ListenerConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, self.path)
    }
}

/// Handle for an active subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// `sub-N` identifier sent to the node
    pub id: String,
    pub channel: Channel,
    pub destination: String,
    /// A previous handler for the same channel was replaced
    pub replaced: bool,
}

/// WebSocket listener for chain events
///
/// Each channel has at most one handler; subscribing again replaces it.
/// Callbacks run on the dispatch task and should return quickly.
pub struct Listener {
    config: ListenerConfig,
    router: Arc<RwLock<Router>>,
    sink: Option<WsSink>,
    next_subscription: u32,
    shutdown: CancellationToken,
    dispatch_task: Option<JoinHandle<()>>,
}

impl Listener {
    pub fn new(config: ListenerConfig) -> Self {
        Self {
            config,
            router: Arc::new(RwLock::new(Router::new())),
            sink: None,
            next_subscription: 0,
            shutdown: CancellationToken::new(),
            dispatch_task: None,
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Whether the socket is open and the dispatch task is running
    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
            && self
                .dispatch_task
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }

    /// Open the connection and subscribe `on_error` to `/errors`
    ///
    /// Returns false if the socket cannot be opened or the node does not
    /// answer the CONNECT frame with CONNECTED.
    pub async fn connect<F>(&mut self, on_error: F) -> bool
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if self.sink.is_some() {
            self.disconnect().await;
        }

        let url = self.config.url();
        let (sink, source, buffer) = match self.handshake(&url).await {
            Ok(parts) => parts,
            Err(e) => {
                log::warn!("Failed to connect listener to {}: {}", url, e);
                return false;
            }
        };

        self.sink = Some(sink);
        self.next_subscription = 0;
        self.shutdown = CancellationToken::new();
        *self.router.write().await = Router::new();

        if let Err(e) = self.subscribe_errors(on_error).await {
            log::warn!("Failed to subscribe to errors on {}: {}", url, e);
            self.disconnect().await;
            return false;
        }

        self.dispatch_task = Some(tokio::spawn(dispatch_loop(
            source,
            buffer,
            self.router.clone(),
            self.shutdown.clone(),
        )));

        log::info!("Listener connected to {}", url);
        true
    }

    async fn handshake(&self, url: &str) -> Result<(WsSink, WsSource, BytesMut), ListenerError> {
        let limit = self.config.connect_timeout;
        let (stream, _) = timeout(limit, connect_async(url))
            .await
            .map_err(|_| ListenerError::Timeout(limit))??;
        let (mut sink, mut source) = stream.split();

        send_frame(&mut sink, StompFrame::connect()).await?;

        let mut buffer = BytesMut::new();
        let reply = timeout(limit, read_frame(&mut source, &mut buffer))
            .await
            .map_err(|_| ListenerError::Timeout(limit))??;

        if reply.command() != server_commands::CONNECTED {
            if let Err(e) = sink.close().await {
                log::debug!("Failed to close rejected connection: {}", e);
            }
            return Err(ListenerError::HandshakeRejected(reply.command().to_string()));
        }

        log::debug!("Handshake complete: {}", reply);
        Ok((sink, source, buffer))
    }

    /// Close the connection and stop the dispatch task
    ///
    /// Returns true once the transport is no longer open, false if closing
    /// the socket failed.
    pub async fn disconnect(&mut self) -> bool {
        self.shutdown.cancel();

        let mut closed = true;
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = send_frame(&mut sink, StompFrame::new(client_commands::DISCONNECT)).await {
                log::debug!("Failed to send DISCONNECT: {}", e);
            }
            closed = close_succeeded(sink.close().await);
        }

        if let Some(task) = self.dispatch_task.take() {
            if let Err(e) = task.await {
                log::warn!("Dispatch task failed: {}", e);
            }
        }

        if closed {
            log::info!("Listener disconnected from {}", self.config.url());
        }
        closed
    }

    /// Subscription id currently owning `channel`
    pub async fn active_subscription(&self, channel: Channel) -> Option<String> {
        self.router
            .read()
            .await
            .subscription_id(channel)
            .map(str::to_string)
    }

    /// Cancel a subscription
    pub async fn unsubscribe(&mut self, subscription: &Subscription) -> Result<(), ListenerError> {
        let sink = self.sink.as_mut().ok_or(ListenerError::NotConnected)?;
        send_frame(sink, StompFrame::unsubscribe(&subscription.id)).await?;
        self.router
            .write()
            .await
            .unregister(subscription.channel, &subscription.id);
        log::debug!("Unsubscribed {} from {}", subscription.id, subscription.destination);
        Ok(())
    }

    pub async fn subscribe_errors<F>(&mut self, handler: F) -> Result<Subscription, ListenerError>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.subscribe(Channel::Errors, None, Handler::error(handler))
            .await
    }

    /// Receive the height of every new block
    pub async fn subscribe_blocks<F>(&mut self, handler: F) -> Result<Subscription, ListenerError>
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.subscribe(Channel::Blocks, None, Handler::block(handler))
            .await
    }

    /// Receive account state changes, starting with the current state
    pub async fn subscribe_account<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(Channel::Account, Some(address), Handler::account(handler))
            .await
    }

    pub async fn subscribe_owned_namespaces<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(Channel::OwnedNamespaces, Some(address), Handler::account(handler))
            .await
    }

    pub async fn subscribe_owned_mosaics<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(Channel::OwnedMosaics, Some(address), Handler::account(handler))
            .await
    }

    pub async fn subscribe_owned_mosaic_definitions<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(
            Channel::OwnedMosaicDefinitions,
            Some(address),
            Handler::account(handler),
        )
        .await
    }

    pub async fn subscribe_recent_transactions<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(Channel::RecentTransactions, Some(address), Handler::account(handler))
            .await
    }

    pub async fn subscribe_unconfirmed_transactions<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(
            Channel::UnconfirmedTransactions,
            Some(address),
            Handler::account(handler),
        )
        .await
    }

    pub async fn subscribe_confirmed_transactions<F>(
        &mut self,
        address: &Address,
        handler: F,
    ) -> Result<Subscription, ListenerError>
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        self.subscribe(
            Channel::ConfirmedTransactions,
            Some(address),
            Handler::account(handler),
        )
        .await
    }

    async fn subscribe(
        &mut self,
        channel: Channel,
        address: Option<&Address>,
        handler: Handler,
    ) -> Result<Subscription, ListenerError> {
        if channel.is_per_account() && address.is_none() {
            return Err(ListenerError::MissingAddress(channel));
        }
        let sink = self.sink.as_mut().ok_or(ListenerError::NotConnected)?;

        let number = self.next_subscription;
        self.next_subscription += 1;
        let id = subscription_id(number);
        let destination = channel.destination(address);

        // Installed before SUBSCRIBE goes out so the first push is not missed
        let previous = self.router.write().await.register(channel, id.clone(), handler)?;
        let replaced = previous.is_some();

        if let Err(e) = send_subscription(sink, number, &destination, channel, address).await {
            self.router.write().await.restore(channel, previous);
            return Err(e);
        }
        if replaced {
            log::warn!("Replaced existing handler for {}", channel);
        }

        log::debug!("Subscribed {} to {}", id, destination);
        Ok(Subscription {
            id,
            channel,
            destination,
            replaced,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn send_subscription(
    sink: &mut WsSink,
    number: u32,
    destination: &str,
    channel: Channel,
    address: Option<&Address>,
) -> Result<(), ListenerError> {
    send_frame(sink, StompFrame::subscribe(number, destination)).await?;
    if let (Some(path), Some(address)) = (channel.request_path(), address) {
        send_frame(sink, StompFrame::send(path, &snapshot_request_body(address))).await?;
    }
    Ok(())
}

async fn send_frame(sink: &mut WsSink, frame: StompFrame) -> Result<(), ListenerError> {
    log::trace!("Sending {}", frame);
    let mut buffer = BytesMut::new();
    StompCodec.encode(frame, &mut buffer)?;
    let text = String::from_utf8(buffer.to_vec())
        .map_err(|e| ListenerError::MalformedFrame(e.to_string()))?;
    sink.send(Message::text(text)).await?;
    Ok(())
}

/// Whether a socket close left the transport shut
fn close_succeeded(result: Result<(), tungstenite::Error>) -> bool {
    match result {
        Ok(()) | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            true
        }
        Err(e) => {
            log::warn!("Failed to close listener socket: {}", e);
            false
        }
    }
}

/// Append a WebSocket message to the frame buffer; false once the peer closes
fn append_message(buffer: &mut BytesMut, message: Message) -> bool {
    match message {
        Message::Text(text) => buffer.extend_from_slice(text.as_str().as_bytes()),
        Message::Binary(data) => buffer.extend_from_slice(&data),
        Message::Close(_) => return false,
        _ => {}
    }
    true
}

async fn read_frame(source: &mut WsSource, buffer: &mut BytesMut) -> Result<StompFrame, ListenerError> {
    let mut codec = StompCodec;
    loop {
        if let Some(frame) = codec.decode(buffer)? {
            return Ok(frame);
        }
        match source.next().await {
            Some(Ok(message)) => {
                if !append_message(buffer, message) {
                    return Err(ListenerError::ConnectionClosed);
                }
            }
            Some(Err(e)) => return Err(e.into()),
            None => return Err(ListenerError::ConnectionClosed),
        }
    }
}

// =============================================================================
// Dispatch loop
// =============================================================================

async fn dispatch_loop(
    mut source: WsSource,
    mut buffer: BytesMut,
    router: Arc<RwLock<Router>>,
    shutdown: CancellationToken,
) {
    let mut codec = StompCodec;
    loop {
        // Deliver every complete frame before waiting for more data
        loop {
            match codec.decode(&mut buffer) {
                Ok(Some(frame)) => {
                    log::trace!("Received {}", frame);
                    if let Err(e) = router.read().await.dispatch(&frame) {
                        log::warn!("Failed to dispatch {} frame: {}", frame.command(), e);
                    }
                }
                Ok(None) => break,
                Err(e) => log::warn!("Dropping unreadable frame: {}", e),
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                log::debug!("Dispatch loop stopped");
                break;
            }
            message = source.next() => match message {
                Some(Ok(message)) => {
                    if !append_message(&mut buffer, message) {
                        log::info!("Node closed the listener connection");
                        break;
                    }
                }
                Some(Err(e)) => {
                    log::warn!("Listener transport error: {}", e);
                    router.read().await.report_error(&e.to_string());
                    break;
                }
                None => {
                    log::info!("Listener connection ended");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ListenerConfig::default();
        assert_eq!(config.port, 7778);
        assert_eq!(config.url(), "ws://localhost:7778/w/messages/websocket");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));

        let custom = ListenerConfig::new("192.168.0.2").with_port(7779);
        assert_eq!(custom.url(), "ws://192.168.0.2:7779/w/messages/websocket");
    }

    #[tokio::test]
    async fn test_subscribe_requires_connection() {
        let mut listener = Listener::new(ListenerConfig::default());
        assert!(!listener.is_connected());
        assert!(matches!(
            listener.subscribe_blocks(|_| {}).await,
            Err(ListenerError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_per_account_channel_requires_address() {
        let mut listener = Listener::new(ListenerConfig::default());
        assert!(matches!(
            listener
                .subscribe(Channel::Account, None, Handler::account(|_, _| {}))
                .await,
            Err(ListenerError::MissingAddress(Channel::Account))
        ));
    }

    #[test]
    fn test_close_result() {
        assert!(close_succeeded(Ok(())));
        assert!(close_succeeded(Err(tungstenite::Error::ConnectionClosed)));
        assert!(close_succeeded(Err(tungstenite::Error::AlreadyClosed)));

        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        assert!(!close_succeeded(Err(tungstenite::Error::Io(broken))));
    }

    #[tokio::test]
    async fn test_disconnect_when_never_connected() {
        let mut listener = Listener::new(ListenerConfig::default());
        assert!(listener.disconnect().await);
        assert_eq!(listener.active_subscription(Channel::Errors).await, None);
    }

    #[test]
    fn test_append_message() {
        let mut buffer = BytesMut::new();
        assert!(append_message(&mut buffer, Message::text("CONNECTED\n\n\0")));
        assert!(append_message(&mut buffer, Message::Ping(Default::default())));
        assert!(!append_message(&mut buffer, Message::Close(None)));
        assert_eq!(&buffer[..], b"CONNECTED\n\n\0");
    }
}
