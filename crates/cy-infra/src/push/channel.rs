use std::future::pending;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep, sleep_until, timeout, Instant};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use cy_core::config::{AccountConfig, PushConfig};
use cy_core::ports::{PushChannelPort, PushEvent, PushSubscription};
use cy_core::RetryPolicy;

use super::codec::{self, EnginePacket, SocketPacket, PONG_FRAME};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";
const DOORBELL_EVENT: &str = "clipboard_update";

#[derive(Debug, Clone)]
pub struct PushSettings {
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
    pub keepalive_interval: Duration,
    pub keepalive_timeout: Duration,
}

impl PushSettings {
    pub fn from_config(push: &PushConfig) -> Self {
        Self {
            retry: push.retry_policy(),
            connect_timeout: push.connect_timeout(),
            keepalive_interval: push.keepalive_interval().max(Duration::from_millis(1)),
            keepalive_timeout: push.keepalive_timeout(),
        }
    }
}

/// Doorbell subscription keyed by the app key. Reconnects with the
/// configured [`RetryPolicy`] and reports [`PushEvent::GaveUp`] once it is
/// exhausted; it never touches clipboard data.
#[derive(Clone)]
pub struct SocketIoPushChannel {
    endpoint: String,
    app_key: String,
    settings: PushSettings,
}

impl SocketIoPushChannel {
    pub fn new(account: &AccountConfig, settings: PushSettings) -> Result<Self> {
        Ok(Self {
            endpoint: socket_url(&account.api_base_url)?,
            app_key: account.app_key.clone(),
            settings,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self) -> Result<Request> {
        let mut request = self
            .endpoint
            .as_str()
            .into_client_request()
            .context("invalid push endpoint")?;
        request.headers_mut().insert(
            "AppKey",
            HeaderValue::from_str(&self.app_key).context("app key is not a valid header value")?,
        );
        Ok(request)
    }

    async fn run(self, events: mpsc::Sender<PushEvent>, mut shutdown: oneshot::Receiver<()>) {
        let mut attempt = 0u32;

        loop {
            let end = tokio::select! {
                _ = &mut shutdown => {
                    debug!("Push channel shut down");
                    return;
                }
                end = self.session(&events) => end,
            };

            let (reason, was_connected) = match end {
                SessionEnd::ReceiverGone => return,
                SessionEnd::Lost {
                    reason,
                    was_connected,
                } => (reason, was_connected),
            };

            if was_connected {
                attempt = 0;
                warn!(reason = %reason, "Push channel lost");
                let lost = PushEvent::Disconnected {
                    reason: reason.clone(),
                };
                if events.send(lost).await.is_err() {
                    return;
                }
            }

            attempt += 1;
            let Some(delay) = self.settings.retry.delay_for(attempt) else {
                warn!(reason = %reason, attempts = attempt - 1, "Push channel giving up");
                let _ = events.send(PushEvent::GaveUp { reason }).await;
                return;
            };

            info!(
                attempt,
                max_attempts = self.settings.retry.max_attempts,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "Reconnecting push channel"
            );
            tokio::select! {
                _ = &mut shutdown => return,
                _ = sleep(delay) => {}
            }
        }
    }

    async fn session(&self, events: &mpsc::Sender<PushEvent>) -> SessionEnd {
        let request = match self.request() {
            Ok(request) => request,
            Err(err) => return SessionEnd::lost(format!("{err:#}"), false),
        };

        let connecting = timeout(self.settings.connect_timeout, connect_async(request));
        let mut ws = match connecting.await {
            Ok(Ok((ws, _))) => ws,
            Ok(Err(err)) => return SessionEnd::lost(format!("connect failed: {err}"), false),
            Err(_) => {
                return SessionEnd::lost(
                    format!("connect timed out after {:?}", self.settings.connect_timeout),
                    false,
                )
            }
        };
        debug!(endpoint = %self.endpoint, "Push websocket open");

        let period = self.settings.keepalive_interval;
        let mut keepalive = interval_at(Instant::now() + period, period);
        let mut session = Session::default();

        loop {
            tokio::select! {
                frame = ws.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | None => {
                            return session.lost("server closed the connection");
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => return session.lost(format!("websocket error: {err}")),
                    };
                    let handled = self.on_frame(&mut ws, text.as_str(), &mut session, events);
                    if let Some(end) = handled.await {
                        return end;
                    }
                }
                _ = keepalive.tick(), if session.connected => {
                    if let Err(err) = send_frame(&mut ws, codec::encode_event("ping", &[])).await {
                        return session.lost(format!("keepalive failed: {err}"));
                    }
                    if session.pong_deadline.is_none() {
                        session.pong_deadline =
                            Some(Instant::now() + self.settings.keepalive_timeout);
                    }
                }
                _ = wait_until(session.pong_deadline) => {
                    return session.lost("keepalive pong not received in time");
                }
            }
        }
    }

    /// `Some` ends the session.
    async fn on_frame(
        &self,
        ws: &mut WsStream,
        frame: &str,
        session: &mut Session,
        events: &mpsc::Sender<PushEvent>,
    ) -> Option<SessionEnd> {
        let packet = match codec::decode(frame) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(error = %err, "Ignoring malformed push frame");
                return None;
            }
        };

        match packet {
            EnginePacket::Open(_) => {
                let connect = codec::encode_connect(&json!({ "appKey": self.app_key }));
                if let Err(err) = send_frame(ws, connect).await {
                    return Some(session.lost(format!("handshake failed: {err}")));
                }
            }
            EnginePacket::Ping => {
                if let Err(err) = send_frame(ws, PONG_FRAME.to_string()).await {
                    return Some(session.lost(format!("pong failed: {err}")));
                }
            }
            EnginePacket::Close => return Some(session.lost("server closed the session")),
            EnginePacket::Message(SocketPacket::Connect(_)) => {
                session.connected = true;
                info!("Push channel connected");
                if events.send(PushEvent::Connected).await.is_err() {
                    return Some(SessionEnd::ReceiverGone);
                }
            }
            EnginePacket::Message(SocketPacket::Event { name, .. }) => match name.as_str() {
                DOORBELL_EVENT => {
                    debug!("Received clipboard_update");
                    if events.send(PushEvent::ClipboardUpdated).await.is_err() {
                        return Some(SessionEnd::ReceiverGone);
                    }
                }
                "pong" => session.pong_deadline = None,
                other => debug!(event = other, "Ignoring push event"),
            },
            EnginePacket::Message(SocketPacket::ConnectError(payload)) => {
                return Some(session.lost(format!("connection refused: {payload}")));
            }
            EnginePacket::Message(SocketPacket::Disconnect) => {
                return Some(session.lost("server disconnected"));
            }
            EnginePacket::Pong | EnginePacket::Other | EnginePacket::Message(_) => {}
        }
        None
    }
}

#[derive(Default)]
struct Session {
    connected: bool,
    pong_deadline: Option<Instant>,
}

impl Session {
    fn lost(&self, reason: impl Into<String>) -> SessionEnd {
        SessionEnd::lost(reason, self.connected)
    }
}

#[async_trait]
impl PushChannelPort for SocketIoPushChannel {
    async fn subscribe(&self) -> Result<PushSubscription> {
        // Fail fast on configuration problems instead of burning retries.
        self.request()?;

        let (events_tx, events_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(self.clone().run(events_tx, shutdown_rx));

        Ok(PushSubscription::new(events_rx, shutdown_tx))
    }
}

enum SessionEnd {
    Lost { reason: String, was_connected: bool },
    ReceiverGone,
}

impl SessionEnd {
    fn lost(reason: impl Into<String>, was_connected: bool) -> Self {
        SessionEnd::Lost {
            reason: reason.into(),
            was_connected,
        }
    }
}

async fn send_frame(
    ws: &mut WsStream,
    frame: String,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    ws.send(Message::text(frame)).await
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

/// `https://host` → `wss://host/socket.io/?EIO=4&transport=websocket`
fn socket_url(base: &str) -> Result<String> {
    let base = base.trim().trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("wss://") || base.starts_with("ws://") {
        base.to_string()
    } else {
        bail!("unsupported API base URL: {base}");
    };
    Ok(format!("{ws_base}{SOCKET_PATH}"))
}
