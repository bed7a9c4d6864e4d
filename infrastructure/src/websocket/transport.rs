//! Per-account gateway connection.
//!
//! [`WebSocketTransport`] is the [`ConnectionHandle`] the supervisor
//! registers. `start` spawns one background task which loops:
//!
//! ```text
//! begin_connect ─► connect ─► serve (read / write / keepalive) ─► on_close
//!       ▲                                                            │
//!       └──────────── sleep(delay) ◄── schedule_reconnect ◄──────────┘
//! ```
//!
//! The loop exits when the lifecycle halts or the cancellation token
//! fires. `send` never touches the socket directly: frames are encoded and
//! pushed to the live connection's writer channel, which is dropped (with
//! anything still in it) when that connection ends.

use super::error::TransportError;
use futures::{SinkExt, StreamExt};
use relay_application::ports::connection::{ConnectionHandle, ConnectionLink, SendError};
use relay_application::ports::inbound_handler::InboundHandler;
use relay_application::ports::status_sink::{NoStatus, StatusPatch, StatusSink};
use relay_domain::{
    AccountId, ConnectionLifecycle, ConnectionState, InboundEvent, OutboundFrame,
    ReconnectDecision, ReconnectPolicy, ResolvedAccount,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::AUTHORIZATION};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

type GatewaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How one served connection ended.
enum SessionEnd {
    /// Stop or cancellation was requested; no reconnect.
    Stopped,
    /// The connection dropped, with the error if there was one.
    Lost(Option<String>),
}

/// State shared by the handle and its background task.
///
/// Also the [`ConnectionLink`] handed to the inbound handler, so replies
/// always go out on the connection the event arrived on.
struct LinkState {
    account_id: AccountId,
    lifecycle: Mutex<ConnectionLifecycle>,
    connected: AtomicBool,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    shutdown: Mutex<Option<CancellationToken>>,
}

impl LinkState {
    fn lifecycle(&self) -> MutexGuard<'_, ConnectionLifecycle> {
        self.lifecycle.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn outbound(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<String>>> {
        self.outbound.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark the connection open with `writer` as its frame sink.
    ///
    /// Returns `false` when the lifecycle has already been stopped.
    fn attach(&self, writer: mpsc::UnboundedSender<String>) -> bool {
        if !self.lifecycle().on_open() {
            return false;
        }
        *self.outbound() = Some(writer);
        self.connected.store(true, Ordering::SeqCst);
        true
    }

    fn detach(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.outbound().take();
    }
}

impl ConnectionLink for LinkState {
    fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), SendError> {
        if !self.is_connected() {
            return Err(SendError::NotConnected(self.account_id.clone()));
        }
        let text = frame
            .encode()
            .map_err(|e| SendError::Encode(e.to_string()))?;

        match self.outbound().as_ref() {
            Some(writer) if writer.send(text).is_ok() => {
                trace!(
                    "Queued {} frame on account {}",
                    frame.frame_type(),
                    self.account_id
                );
                Ok(())
            }
            _ => Err(SendError::NotConnected(self.account_id.clone())),
        }
    }
}

/// WebSocket connection to the gateway for one account.
pub struct WebSocketTransport {
    account: ResolvedAccount,
    handler: Arc<dyn InboundHandler>,
    status: Arc<dyn StatusSink>,
    state: Arc<LinkState>,
    started: AtomicBool,
}

impl WebSocketTransport {
    pub fn new(account: ResolvedAccount, handler: Arc<dyn InboundHandler>) -> Self {
        let policy = ReconnectPolicy::from(&account.settings);
        let state = Arc::new(LinkState {
            account_id: account.id.clone(),
            lifecycle: Mutex::new(ConnectionLifecycle::new(policy)),
            connected: AtomicBool::new(false),
            outbound: Mutex::new(None),
            shutdown: Mutex::new(None),
        });
        Self {
            account,
            handler,
            status: Arc::new(NoStatus),
            state,
            started: AtomicBool::new(false),
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }
}

impl ConnectionLink for WebSocketTransport {
    fn account_id(&self) -> &AccountId {
        self.state.account_id()
    }

    fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), SendError> {
        self.state.send(frame)
    }
}

impl ConnectionHandle for WebSocketTransport {
    fn start(&self, cancel: CancellationToken) {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!(
                "Connection for account {} is already started",
                self.state.account_id
            );
            return;
        }

        let token = cancel.child_token();
        *self.state.shutdown.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());

        let worker = Worker {
            account: self.account.clone(),
            handler: Arc::clone(&self.handler),
            status: Arc::clone(&self.status),
            state: Arc::clone(&self.state),
            cancel: token,
        };
        tokio::spawn(worker.run());
    }

    fn stop(&self) {
        if !self.state.lifecycle().stop() {
            return;
        }
        info!("Stopping connection for account {}", self.state.account_id);

        let token = self
            .state
            .shutdown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(token) = token {
            token.cancel();
        }
        self.state.detach();
    }

    fn state(&self) -> ConnectionState {
        self.state.lifecycle().state()
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background task owning the socket.
struct Worker {
    account: ResolvedAccount,
    handler: Arc<dyn InboundHandler>,
    status: Arc<dyn StatusSink>,
    state: Arc<LinkState>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        let id = self.state.account_id.clone();

        if let Err(e) = self.account.ensure_startable() {
            warn!("Not connecting account {}: {}", id, e);
            self.status.update(&id, StatusPatch::error(e.to_string()));
            self.state.lifecycle().stop();
            return;
        }

        loop {
            if !self.state.lifecycle().begin_connect() {
                break;
            }

            let end = tokio::select! {
                _ = self.cancel.cancelled() => SessionEnd::Stopped,
                connected = self.connect() => match connected {
                    Ok(socket) => self.serve(socket).await,
                    Err(e) => SessionEnd::Lost(Some(e.to_string())),
                },
            };

            let error = match end {
                SessionEnd::Stopped => break,
                SessionEnd::Lost(error) => error,
            };
            match &error {
                Some(e) => warn!("Connection for account {} failed: {}", id, e),
                None => info!("Connection for account {} closed", id),
            }
            self.state.lifecycle().on_close(error.clone());
            self.status.update(&id, StatusPatch::disconnected(error));

            let decision = self.state.lifecycle().schedule_reconnect();
            match decision {
                ReconnectDecision::Halt => break,
                ReconnectDecision::Retry { attempt, delay } => {
                    info!(
                        "Reconnecting account {} in {}ms (attempt {})",
                        id,
                        delay.as_millis(),
                        attempt
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        self.state.lifecycle().stop();
        self.state.detach();
        debug!("Connection task for account {} finished", id);
    }

    async fn connect(&self) -> Result<GatewaySocket, TransportError> {
        let endpoint = self.account.endpoint()?;
        info!(
            "Connecting account {} to {}",
            self.state.account_id, endpoint
        );

        let mut request = endpoint.into_client_request()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.account.token))
            .map_err(|_| TransportError::InvalidToken)?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (socket, _response) = tokio_tungstenite::connect_async(request).await?;
        Ok(socket)
    }

    async fn serve(&self, socket: GatewaySocket) -> SessionEnd {
        let id = &self.state.account_id;
        let (writer, mut outbound) = mpsc::unbounded_channel::<String>();
        if !self.state.attach(writer) {
            return SessionEnd::Stopped;
        }
        info!("Account {} connected", id);
        self.status.update(id, StatusPatch::opened());

        let (mut sink, mut stream) = socket.split();
        let period = self.account.settings.keepalive;
        let mut keepalive = tokio::time::interval_at(Instant::now() + period, period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let link: Arc<dyn ConnectionLink> = self.state.clone();

        let end = loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    break SessionEnd::Stopped;
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        // A slow handler must not keep the socket open past stop.
                        let cancelled = tokio::select! {
                            _ = self.cancel.cancelled() => true,
                            _ = self.dispatch(text.as_str(), &link) => false,
                        };
                        if cancelled {
                            let _ = sink.send(Message::Close(None)).await;
                            break SessionEnd::Stopped;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        debug!("Ignoring {} byte binary frame on account {}", data.len(), id);
                    }
                    Some(Ok(Message::Close(frame))) => {
                        if let Some(frame) = frame {
                            info!(
                                "Gateway closed connection for account {}: {} {}",
                                id,
                                u16::from(frame.code),
                                frame.reason.as_str()
                            );
                        }
                        break SessionEnd::Lost(None);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break SessionEnd::Lost(Some(e.to_string())),
                    None => break SessionEnd::Lost(None),
                },
                Some(text) = outbound.recv() => {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        break SessionEnd::Lost(Some(e.to_string()));
                    }
                }
                _ = keepalive.tick() => match OutboundFrame::Ping.encode() {
                    Ok(ping) => {
                        trace!("Sending keepalive on account {}", id);
                        if let Err(e) = sink.send(Message::Text(ping.into())).await {
                            break SessionEnd::Lost(Some(e.to_string()));
                        }
                    }
                    Err(e) => warn!("Could not encode keepalive: {}", e),
                },
            }
        };

        self.state.detach();
        end
    }

    async fn dispatch(&self, text: &str, link: &Arc<dyn ConnectionLink>) {
        match InboundEvent::decode(text) {
            Ok(event) => {
                trace!(
                    "Account {} received {}",
                    self.state.account_id,
                    event.event_type()
                );
                self.handler.handle(event, Arc::clone(link)).await;
            }
            Err(e) => warn!(
                "Discarding malformed frame on account {}: {}",
                self.state.account_id, e
            ),
        }
    }
}
