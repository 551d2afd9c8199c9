//! Reconnecting websocket transport.
//!
//! [`Transport`] is the cheap, cloneable handle views use to emit commands;
//! the connection itself lives in a single background task that owns the
//! socket, the outbound queue and the [`Dispatcher`]. Running everything
//! connection-related on one task keeps the queue and the subscription
//! table single-owner even though callers sit on other runtime threads.
//!
//! Guarantees:
//! * [`send`](Transport::send) never blocks and never fails; while
//!   disconnected, commands queue up and are drained strictly in FIFO
//!   order the moment the socket opens
//! * a lost connection schedules exactly one reconnection attempt after a
//!   fixed delay, indefinitely
//! * malformed inbound frames are logged and dropped, never forwarded

use std::{collections::VecDeque, ops::ControlFlow, time::Duration};

use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};
use url::Url;

use crate::{
    config::Config,
    dispatcher::Dispatcher,
    error::{ErrorKind, Result},
    protocol::{Command, Update},
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// Do not parse exceedingly large frames to prevent out of memory
/// conditions. Playlist snapshots are the largest legitimate frames.
const MAX_FRAME_SIZE: usize = 1 << 20;

/// Handle to the connection task.
///
/// Clones share the same connection; dropping the last clone tears the
/// task down after the socket closes.
#[derive(Clone, Debug)]
pub struct Transport {
    tx: mpsc::UnboundedSender<Command>,
}

impl Transport {
    /// Creates the handle and the not-yet-started connector.
    ///
    /// Two-step construction lets observers capture handle clones before
    /// the fully registered dispatcher moves into the connection task:
    ///
    /// ```ignore
    /// let (transport, connector) = Transport::prepare(&config)?;
    /// let player = Player::attach(&mut dispatcher, transport.clone(), &config);
    /// connector.spawn(dispatcher);
    /// ```
    pub fn prepare(config: &Config) -> Result<(Self, Connector)> {
        let url = config.ws_url()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let connector = Connector {
            url,
            reconnect_delay: config.reconnect_delay,
            rx,
        };

        Ok((Self { tx }, connector))
    }

    /// Convenience for the one-shot case: prepare and spawn in one call.
    pub fn start(config: &Config, dispatcher: Dispatcher) -> Result<Self> {
        let (transport, connector) = Self::prepare(config)?;
        connector.spawn(dispatcher);
        Ok(transport)
    }

    /// Hands a command to the connection task.
    ///
    /// Queuing is the failure-absorption mechanism: whatever the
    /// connection state, this neither blocks nor reports an error. A send
    /// after teardown is dropped with a diagnostic.
    pub fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            debug!("transport task gone, dropping command");
        }
    }
}

/// A transport whose connection task has not started yet.
pub struct Connector {
    url: Url,
    reconnect_delay: Duration,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl Connector {
    /// Consumes the fully registered dispatcher and spawns the connection
    /// task. The dispatcher is not reachable afterwards.
    pub fn spawn(self, dispatcher: Dispatcher) {
        let connection = Connection {
            url: self.url,
            reconnect_delay: self.reconnect_delay,
            rx: self.rx,
            dispatcher,
            queue: VecDeque::new(),
        };
        tokio::spawn(connection.run());
    }
}

/// The connection task: owns the socket, the queue and the dispatcher.
struct Connection {
    url: Url,
    reconnect_delay: Duration,
    rx: mpsc::UnboundedReceiver<Command>,
    dispatcher: Dispatcher,
    queue: VecDeque<Command>,
}

impl Connection {
    async fn run(mut self) {
        loop {
            debug!("connecting to {}", self.url);
            match tokio_tungstenite::connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    info!("connected to {}", self.url);
                    if self.drive(stream).await.is_break() {
                        return;
                    }
                    warn!("connection to {} lost", self.url);
                }
                Err(e) => warn!("error connecting to {}: {e}", self.url),
            }

            // Exactly one reconnection attempt per close, after a fixed
            // delay. No retry cap: the session reconnects indefinitely.
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Runs one connection session until the socket closes or all handles
    /// are gone.
    async fn drive(
        &mut self,
        stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    ) -> ControlFlow<()> {
        let (mut ws_tx, mut ws_rx) = stream.split();

        // The socket just opened: drain queued commands in arrival order.
        // This is the only place queued commands are sent.
        while let Some(command) = self.queue.pop_front() {
            if let Err(e) = Self::transmit(&mut ws_tx, &command).await {
                warn!("error sending queued {command}: {e}");
                self.queue.push_front(command);
                return ControlFlow::Continue(());
            }
        }

        loop {
            tokio::select! {
                command = self.rx.recv() => {
                    let Some(command) = command else {
                        // All handles dropped: process teardown.
                        return ControlFlow::Break(());
                    };
                    if let Err(e) = Self::transmit(&mut ws_tx, &command).await {
                        warn!("error sending {command}: {e}");
                        self.queue.push_front(command);
                        return ControlFlow::Continue(());
                    }
                }

                message = ws_rx.next() => {
                    match message {
                        Some(Ok(message)) => self.handle_frame(&message),
                        Some(Err(e)) => {
                            warn!("error receiving message: {e}");
                            return ControlFlow::Continue(());
                        }
                        None => return ControlFlow::Continue(()),
                    }
                }
            }
        }
    }

    async fn transmit(ws_tx: &mut WsSink, command: &Command) -> Result<()> {
        // Command encoding cannot fail for this closed enum; if it ever
        // does, that is a programming error and the frame is dropped.
        let json = match serde_json::to_string(command) {
            Ok(json) => json,
            Err(e) => {
                error!("error encoding {command}: {e}");
                return Ok(());
            }
        };

        trace!("sending {command}");
        ws_tx.send(WsMessage::text(json)).await?;
        Ok(())
    }

    /// Decodes one inbound frame and fans it out.
    ///
    /// A frame that fails to decode must never crash the client or reach
    /// an observer; it degrades to a diagnostic.
    fn handle_frame(&self, message: &WsMessage) {
        match message {
            WsMessage::Text(frame) => {
                let frame_size = frame.len();
                if frame_size > MAX_FRAME_SIZE {
                    error!("ignoring oversized frame with {frame_size} bytes");
                    return;
                }

                match Update::from_frame(frame.as_str()) {
                    Ok(update) => {
                        trace!("received {} update", update.kind());
                        self.dispatcher.deliver(&update);
                    }
                    Err(e) if e.kind == ErrorKind::Unimplemented => {
                        debug!("discarding frame: {e}");
                    }
                    Err(e) => debug!("error parsing frame: {e}"),
                }
            }
            WsMessage::Close(payload) => {
                debug!("connection closed by server: {payload:?}");
            }
            // Pings are answered by the protocol layer on the next poll.
            _ => trace!("frame type unimplemented"),
        }
    }
}
