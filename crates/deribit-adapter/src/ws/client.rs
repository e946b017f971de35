/*
[INPUT]:  WebSocket URL, client configuration, optional API credentials
[OUTPUT]: Multiplexed JSON-RPC calls and a server notification channel
[POS]:    WebSocket layer - persistent connection and response correlation
[UPDATE]: When changing connection lifecycle or frame routing
*/

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, info, warn};

use super::message::{InboundFrame, Notification};
use super::pending::{Correlation, PendingCalls, PendingGuard};
use crate::config::{ClientConfig, Credentials};
use crate::http::{DeribitError, Result};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcTransport, RequestId, RequestIdGenerator};
use crate::logging::{RAW_LOG_MAX_BYTES, truncate_for_log};
use crate::types::decode_record;
use crate::types::requests::{ClientCredentialsParams, SubscriptionParams};
use crate::types::responses::AuthToken;

const OUTBOUND_CAPACITY: usize = 100;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A frame queued for the writer, tagged with the call it belongs to
#[derive(Debug)]
struct Outbound {
    frame: WsMessage,
    id: Option<RequestId>,
}

#[derive(Debug)]
struct Connection {
    generation: u64,
    outbound_tx: mpsc::Sender<Outbound>,
}

/// JSON-RPC client over a single persistent Deribit WebSocket.
///
/// Many calls may be in flight at once; responses are matched to callers by
/// id, in whatever order the server sends them.
#[derive(Debug)]
pub struct DeribitWebSocket {
    url: String,
    config: ClientConfig,
    credentials: Option<Credentials>,
    ids: RequestIdGenerator,
    pending: Arc<PendingCalls>,
    connection: Arc<Mutex<Option<Connection>>>,
    generation: AtomicU64,
    task: parking_lot::Mutex<Option<JoinHandle<()>>>,
    notification_tx: mpsc::Sender<Notification>,
    notification_rx: Option<mpsc::Receiver<Notification>>,
}

impl DeribitWebSocket {
    /// Create a client for the endpoint selected by `config.testnet`
    pub fn new(config: ClientConfig) -> Self {
        let url = config.ws_url().to_string();
        Self::with_url(config, url)
    }

    /// Create a client against an explicit WebSocket URL
    pub fn with_url(config: ClientConfig, url: impl Into<String>) -> Self {
        let (notification_tx, notification_rx) = mpsc::channel(config.notification_capacity.max(1));
        Self {
            url: url.into(),
            ids: RequestIdGenerator::new(config.id_strategy),
            config,
            credentials: None,
            pending: Arc::new(PendingCalls::new()),
            connection: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
            task: parking_lot::Mutex::new(None),
            notification_tx,
            notification_rx: Some(notification_rx),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Take the server notification receiver (available once)
    pub fn take_notifications(&mut self) -> Option<mpsc::Receiver<Notification>> {
        self.notification_rx.take()
    }

    /// Number of calls currently awaiting a response
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Open the connection and start the reader/writer task.
    ///
    /// Authenticates with `public/auth` when credentials are configured.
    pub async fn connect(&self) -> Result<()> {
        if self.connection.lock().await.is_some() {
            return Err(DeribitError::Config("already connected".to_string()));
        }

        // Handshake without holding the slot so concurrent calls fail fast.
        let (mut ws_stream, _response) =
            tokio::time::timeout(self.config.connect_timeout, connect_async(self.url.as_str()))
                .await
                .map_err(|_| DeribitError::WebSocket("connect timed out".to_string()))?
                .map_err(|err| DeribitError::WebSocket(err.to_string()))?;

        {
            let mut slot = self.connection.lock().await;
            if slot.is_some() {
                drop(slot);
                let _ = ws_stream.close(None).await;
                return Err(DeribitError::Config("already connected".to_string()));
            }

            let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);
            *slot = Some(Connection {
                generation,
                outbound_tx,
            });

            let handle = tokio::spawn(run_connection(
                ws_stream,
                outbound_rx,
                generation,
                self.connection.clone(),
                self.pending.clone(),
                self.notification_tx.clone(),
            ));
            *self.task.lock() = Some(handle);
            info!(url = %self.url, generation, "ws connected");
        }

        if self.credentials.is_some()
            && let Err(err) = self.authenticate().await
        {
            self.close().await;
            return Err(err);
        }
        Ok(())
    }

    /// Send a Close frame and wait for the connection task to finish
    pub async fn close(&self) {
        let sender = self
            .connection
            .lock()
            .await
            .as_ref()
            .map(|connection| connection.outbound_tx.clone());
        if let Some(sender) = sender {
            let _ = sender
                .send(Outbound {
                    frame: WsMessage::Close(None),
                    id: None,
                })
                .await;
        }

        let handle = self.task.lock().take();
        if let Some(handle) = handle
            && let Err(err) = handle.await
        {
            warn!(error = %err, "ws connection task ended abnormally");
        }
    }

    /// Authenticate the session with the configured client credentials
    pub async fn authenticate(&self) -> Result<AuthToken> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            DeribitError::InvalidArgument("authenticate requires API credentials".to_string())
        })?;
        let params = ClientCredentialsParams {
            grant_type: "client_credentials",
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        };
        let value = self.call_typed("public/auth", params).await?;
        let token: AuthToken = decode_record("AuthToken", value)?;
        info!(scope = %token.scope, expires_in = token.expires_in, "ws authenticated");
        Ok(token)
    }

    /// Subscribe to channels; returns the channels the server confirmed
    pub async fn subscribe(&self, channels: &[String]) -> Result<Vec<String>> {
        let value = self
            .call_typed("public/subscribe", SubscriptionParams { channels })
            .await?;
        decode_record("SubscribedChannels", value)
    }

    pub async fn unsubscribe(&self, channels: &[String]) -> Result<Vec<String>> {
        let value = self
            .call_typed("public/unsubscribe", SubscriptionParams { channels })
            .await?;
        decode_record("SubscribedChannels", value)
    }

    async fn outbound_sender(&self) -> Result<mpsc::Sender<Outbound>> {
        self.connection
            .lock()
            .await
            .as_ref()
            .map(|connection| connection.outbound_tx.clone())
            .ok_or(DeribitError::NotConnected)
    }
}

#[async_trait]
impl JsonRpcTransport for DeribitWebSocket {
    fn next_request_id(&self) -> RequestId {
        self.ids.next_id()
    }

    fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send_request(&self, request: JsonRpcRequest) -> Result<Value> {
        let sender = self.outbound_sender().await?;
        let frame = request.to_json()?;
        let id = request.id().clone();

        let rx = self.pending.insert(id.clone())?;
        let _guard = PendingGuard::new(self.pending.clone(), id.clone());
        debug!(method = request.method(), id = %id, "ws rpc request");

        sender
            .send(Outbound {
                frame: WsMessage::Text(frame.into()),
                id: Some(id),
            })
            .await
            .map_err(|_| DeribitError::WebSocket("connection writer is gone".to_string()))?;

        match tokio::time::timeout(self.config.request_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(DeribitError::ConnectionClosed),
            Err(_) => Err(DeribitError::Timeout {
                method: request.method().to_string(),
                after_ms: self.config.request_timeout.as_millis() as u64,
            }),
        }
    }
}

async fn run_connection(
    ws_stream: WsStream,
    mut outbound_rx: mpsc::Receiver<Outbound>,
    generation: u64,
    connection: Arc<Mutex<Option<Connection>>>,
    pending: Arc<PendingCalls>,
    notification_tx: mpsc::Sender<Notification>,
) {
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(outbound) => {
                        if write_outbound(&mut write, outbound, &pending).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(frame))) => {
                        debug!(?frame, "ws close frame received");
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(WsMessage::Text(text))) => {
                        route_frame(&text, &pending, &notification_tx);
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => route_frame(&text, &pending, &notification_tx),
                        Err(_) => warn!(bytes = bytes.len(), "ws binary frame is not utf-8"),
                    },
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "ws read failed");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    // Refuse new frames first so no call can slip in after the sweep.
    drop(outbound_rx);
    let failed = pending.fail_all();
    {
        let mut slot = connection.lock().await;
        if slot
            .as_ref()
            .is_some_and(|current| current.generation == generation)
        {
            *slot = None;
        }
    }
    info!(generation, pending_failed = failed, "ws disconnected");
}

/// Write one queued frame. A write error fails that frame's call with
/// `WebSocket(..)`; the caller then tears the connection down.
async fn write_outbound<S>(write: &mut S, outbound: Outbound, pending: &PendingCalls) -> ControlFlow<()>
where
    S: Sink<WsMessage, Error = WsError> + Unpin,
{
    let Outbound { frame, id } = outbound;
    let closing = matches!(frame, WsMessage::Close(_));
    if let Err(err) = write.send(frame).await {
        warn!(error = %err, "ws write failed");
        if let Some(id) = id {
            pending.fail(&id, DeribitError::WebSocket(err.to_string()));
        }
        return ControlFlow::Break(());
    }
    if closing {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

fn route_frame(text: &str, pending: &PendingCalls, notification_tx: &mpsc::Sender<Notification>) {
    debug!(bytes = text.len(), "ws frame received");
    match InboundFrame::parse(text) {
        Ok(InboundFrame::Response(response)) => {
            if let Correlation::Delivered(id) = pending.resolve(response) {
                debug!(id = %id, "ws rpc response delivered");
            }
        }
        Ok(InboundFrame::Notification(notification)) => {
            if let Err(err) = notification_tx.try_send(notification) {
                match err {
                    mpsc::error::TrySendError::Full(dropped) => warn!(
                        method = %dropped.method,
                        channel = dropped.channel().unwrap_or_default(),
                        "ws notification dropped, channel full"
                    ),
                    mpsc::error::TrySendError::Closed(dropped) => debug!(
                        method = %dropped.method,
                        "ws notification dropped, receiver closed"
                    ),
                }
            }
        }
        Ok(InboundFrame::Invalid { id, error }) => {
            let preview = truncate_for_log(text, RAW_LOG_MAX_BYTES);
            match id {
                Some(id) if pending.contains(&id) => {
                    warn!(id = %id, error = %error, message = %preview, "ws invalid response failed its call");
                    pending.fail(&id, error);
                }
                id => {
                    let id = id.map(|id| id.to_string()).unwrap_or_default();
                    warn!(id = %id, error = %error, message = %preview, "ws invalid response dropped");
                }
            }
        }
        Ok(InboundFrame::Unrecognized(_)) => {
            let preview = truncate_for_log(text, RAW_LOG_MAX_BYTES);
            debug!(message = %preview, "ws frame unrecognized");
        }
        Err(err) => {
            let preview = truncate_for_log(text, RAW_LOG_MAX_BYTES);
            warn!(error = %err, message = %preview, "ws frame parse failed");
        }
    }
}
