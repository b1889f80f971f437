//! Connection lifecycle.
//!
//! A [`RemoteListener`] accepts WebSocket peers on a local address. The first
//! peer to finish the handshake takes ownership of the outbound queue and is
//! served by two tasks: a writer draining the queue onto the socket and a
//! reader dispatching inbound events to the handler table.
//!
//! ```text
//! Idle --handshake--> Connected --read end / write failure--> Closed
//! ```
//!
//! Shutdown has one path. Whichever of the two tasks finishes first, the
//! other is aborted and awaited, which drops the queue's receiver. From then
//! on every enqueue fails with [`Error::QueueClosed`](crate::Error::QueueClosed)
//! and the state is `Closed`.
//!
//! Each accepted connection is upgraded on its own task under a deadline, so
//! a client that never finishes the handshake cannot hold up a real peer.
//! Only one peer is ever served. The queue has a single consumer, so a peer
//! that connects once the queue is taken is dropped with a warning.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::handlers::HandlerTable;
use super::protocol::InboundEvent;
use super::renderer::{RemoteBackend, RemoteRenderer};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// How long an accepted connection gets to finish the WebSocket upgrade.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed `accept` so a persistent error does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Lifecycle of the single remote connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Listening, no peer yet.
    Idle,
    /// A peer completed the handshake and is being served.
    Connected,
    /// The peer went away or a write failed. Nothing more is delivered.
    Closed,
}

/// A bound listener whose renderer is not handed out until a peer attaches.
pub struct RemoteListener {
    local_addr: SocketAddr,
    connect_timeout: Duration,
    backend: Arc<RemoteBackend>,
    state: watch::Receiver<ConnectionState>,
}

impl RemoteListener {
    /// Bind `config.bind_addr` and start accepting peers in the background.
    pub async fn bind(config: RemoteConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "remote renderer listening");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let handlers = Arc::new(HandlerTable::new());

        let accept_task = tokio::spawn(accept_loop(
            listener,
            outbound_rx,
            Arc::clone(&handlers),
            Arc::new(state_tx),
        ));

        let backend = RemoteBackend::new(outbound_tx, handlers, state_rx.clone(), Some(accept_task));

        Ok(Self {
            local_addr,
            connect_timeout: config.connect_timeout,
            backend: Arc::new(backend),
            state: state_rx,
        })
    }

    /// The address actually bound, useful when the config asked for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the first peer, then hand out the renderer.
    pub async fn wait_for_peer(self) -> Result<RemoteRenderer> {
        let mut state = self.state.clone();
        let attached = tokio::time::timeout(
            self.connect_timeout,
            state.wait_for(|s| *s != ConnectionState::Idle),
        )
        .await;

        match attached {
            Ok(Ok(_)) => Ok(RemoteRenderer::from_backend(self.backend)),
            Ok(Err(_)) => Err(Error::ListenerStopped),
            Err(_) => {
                warn!(timeout = ?self.connect_timeout, "no peer connected");
                Err(Error::ConnectTimeout(self.connect_timeout))
            }
        }
    }
}

/// Outbound queue waiting for the first peer to claim it.
type QueueSlot = Arc<Mutex<Option<mpsc::UnboundedReceiver<String>>>>;

async fn accept_loop(
    listener: TcpListener,
    outbound: mpsc::UnboundedReceiver<String>,
    handlers: Arc<HandlerTable>,
    state: Arc<watch::Sender<ConnectionState>>,
) {
    let slot: QueueSlot = Arc::new(Mutex::new(Some(outbound)));

    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let claimed = slot.lock().is_none();
        if claimed {
            warn!(%addr, "rejecting peer: renderer already has a connection");
            continue;
        }

        debug!(%addr, "new connection");
        tokio::spawn(handshake(
            stream,
            addr,
            Arc::clone(&slot),
            Arc::clone(&handlers),
            Arc::clone(&state),
        ));
    }
}

/// Upgrade one connection and, if no other peer got there first, serve it.
async fn handshake(
    stream: TcpStream,
    addr: SocketAddr,
    slot: QueueSlot,
    handlers: Arc<HandlerTable>,
    state: Arc<watch::Sender<ConnectionState>>,
) {
    let ws = match tokio::time::timeout(HANDSHAKE_TIMEOUT, accept_async(stream)).await {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => {
            warn!(%addr, "websocket handshake failed: {}", e);
            return;
        }
        Err(_) => {
            warn!(%addr, timeout = ?HANDSHAKE_TIMEOUT, "websocket handshake timed out");
            return;
        }
    };

    let claimed = slot.lock().take();
    let Some(queue) = claimed else {
        warn!(%addr, "rejecting peer: renderer already has a connection");
        return;
    };

    info!(%addr, "peer connected");
    state.send_replace(ConnectionState::Connected);
    let (sink, stream) = ws.split();
    serve(sink, stream, addr, queue, handlers, state).await;
}

async fn serve<S, R, E>(
    sink: S,
    stream: R,
    addr: SocketAddr,
    outbound: mpsc::UnboundedReceiver<String>,
    handlers: Arc<HandlerTable>,
    state: Arc<watch::Sender<ConnectionState>>,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: fmt::Display + Send,
    R: Stream<Item = std::result::Result<Message, E>> + Unpin + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let mut write_task = tokio::spawn(write_loop(sink, outbound));
    let mut read_task = tokio::spawn(read_loop(stream, handlers));

    tokio::select! {
        _ = &mut write_task => {
            read_task.abort();
            let _ = read_task.await;
        }
        _ = &mut read_task => {
            write_task.abort();
            let _ = write_task.await;
        }
    }

    state.send_replace(ConnectionState::Closed);
    info!(%addr, "peer disconnected");
}

/// Drain the outbound queue onto the socket, in enqueue order.
async fn write_loop<S>(mut sink: S, mut outbound: mpsc::UnboundedReceiver<String>)
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    while let Some(frame) = outbound.recv().await {
        debug!(%frame, "writing");
        if let Err(e) = sink.send(Message::Text(frame)).await {
            warn!("write failed, closing outbound queue: {}", e);
            outbound.close();
            return;
        }
    }

    // Every sender is gone: the renderer was dropped.
    let _ = sink.close().await;
}

/// Decode inbound events and run their handlers until the stream ends.
async fn read_loop<R, E>(mut stream: R, handlers: Arc<HandlerTable>)
where
    R: Stream<Item = std::result::Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    warn!("skipping non-UTF-8 frame: {}", e);
                    continue;
                }
            },
            Ok(Message::Close(_)) => {
                debug!("peer sent close");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("read failed: {}", e);
                break;
            }
        };

        debug!(frame = %text, "received");
        match InboundEvent::decode(&text) {
            Ok(event) => {
                handlers.dispatch(&event);
            }
            Err(e) => warn!("skipping malformed event: {}", e),
        }
    }
}
