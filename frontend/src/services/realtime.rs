//! Real-time payment notifications over the hub WebSocket.
//!
//! A [`PaymentHub`] is a scoped connection: the component that opens it owns
//! it, and dropping it leaves the joined group and closes the socket. The
//! connection task drives [`ConnectionMachine`] and [`GroupSubscription`]
//! from `common` and reports every state change through a callback, so
//! connection trouble never surfaces as a panic or an unhandled error.

use std::time::Duration;

use common::hub::protocol::{handshake_request, websocket_url, HANDSHAKE_TIMEOUT};
use common::hub::{
    ConnectionMachine, ConnectionState, FrameReader, GroupSubscription, HubInvocation,
    HubMessage, HubStatus, NextStep, ReconnectPolicy, TransitionError,
};
use common::model::payment::{ContractId, PaymentSuccess};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::future::{select, Either};
use futures::stream::SplitSink;
use futures::{pin_mut, SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use gloo_timers::future::sleep;
use log::{debug, info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

enum HubCommand {
    Subscribe(ContractId),
    Unsubscribe,
    Close,
}

pub struct PaymentHub {
    commands: UnboundedSender<HubCommand>,
}

impl PaymentHub {
    /// Starts connecting to `hub_url` in the background.
    pub fn open(
        hub_url: &str,
        on_status: Callback<HubStatus>,
        on_payment: Callback<PaymentSuccess>,
    ) -> Self {
        let (commands, inbox) = unbounded();
        let driver = Driver {
            url: websocket_url(hub_url),
            machine: ConnectionMachine::new(ReconnectPolicy::forever()),
            subscription: GroupSubscription::new(),
            on_status,
            on_payment,
        };
        spawn_local(driver.run(inbox));
        Self { commands }
    }

    /// Leaves the current contract group (if any) and joins `contract`'s.
    pub fn subscribe(&self, contract: ContractId) {
        self.send(HubCommand::Subscribe(contract));
    }

    pub fn unsubscribe(&self) {
        self.send(HubCommand::Unsubscribe);
    }

    pub fn close(&self) {
        self.send(HubCommand::Close);
    }

    fn send(&self, command: HubCommand) {
        if self.commands.unbounded_send(command).is_err() {
            debug!("payment hub task already stopped");
        }
    }
}

impl Drop for PaymentHub {
    fn drop(&mut self) {
        self.close();
    }
}

type Sink = SplitSink<WebSocket, Message>;
type Connection = (WebSocket, FrameReader, Vec<HubMessage>);

/// How a connected session ended.
enum SessionEnd {
    Closed,
    Lost(String),
}

struct Driver {
    url: String,
    machine: ConnectionMachine,
    subscription: GroupSubscription,
    on_status: Callback<HubStatus>,
    on_payment: Callback<PaymentSuccess>,
}

impl Driver {
    async fn run(mut self, mut inbox: UnboundedReceiver<HubCommand>) {
        loop {
            let idle = self.machine.state() == ConnectionState::Disconnected;
            if idle && !self.transition(|m| m.start()) {
                return;
            }

            let Some(attempt) = self.connect(&mut inbox).await else {
                break;
            };
            let step = match attempt {
                Ok((socket, reader, early)) => {
                    if !self.transition(|m| m.connected()) {
                        return;
                    }
                    info!("payment hub connected");
                    match self.session(socket, reader, early, &mut inbox).await {
                        SessionEnd::Closed => break,
                        SessionEnd::Lost(error) => {
                            self.subscription.on_disconnected();
                            self.machine.lost(error)
                        }
                    }
                }
                Err(error) => self.machine.failed(error),
            };
            self.report();

            match step {
                Ok(NextStep::RetryAfter(delay)) => {
                    if !self.wait(delay, &mut inbox).await {
                        break;
                    }
                }
                Ok(NextStep::GiveUp) => {
                    warn!("payment hub gave up reconnecting");
                    return;
                }
                Err(e) => {
                    warn!("payment hub state error: {e}");
                    return;
                }
            }
        }

        self.machine.close();
        self.report();
        debug!("payment hub closed");
    }

    /// Applies a state change and reports it. `false` when the change was
    /// illegal, which stops the driver.
    fn transition(
        &mut self,
        apply: impl FnOnce(&mut ConnectionMachine) -> Result<(), TransitionError>,
    ) -> bool {
        match apply(&mut self.machine) {
            Ok(()) => {
                self.report();
                true
            }
            Err(e) => {
                warn!("payment hub state error: {e}");
                false
            }
        }
    }

    /// Opens the socket and completes the handshake while still taking
    /// commands. `None` when the hub was closed meanwhile.
    async fn connect(
        &mut self,
        inbox: &mut UnboundedReceiver<HubCommand>,
    ) -> Option<Result<Connection, String>> {
        let url = self.url.clone();
        let opening = open_connection(&url);
        pin_mut!(opening);
        loop {
            match select(opening.as_mut(), inbox.next()).await {
                Either::Left((result, _)) => return Some(result),
                Either::Right((command, _)) => {
                    if !self.apply_offline(command) {
                        return None;
                    }
                }
            }
        }
    }

    /// Records a command received while no session is open; the group is
    /// joined on the next connect. `false` on close.
    fn apply_offline(&mut self, command: Option<HubCommand>) -> bool {
        match command {
            Some(HubCommand::Subscribe(contract)) => {
                self.subscription.subscribe(contract);
                true
            }
            Some(HubCommand::Unsubscribe) => {
                self.subscription.unsubscribe();
                true
            }
            Some(HubCommand::Close) | None => false,
        }
    }

    fn report(&self) {
        self.on_status.emit(self.machine.status());
    }

    async fn session(
        &mut self,
        socket: WebSocket,
        mut reader: FrameReader,
        early: Vec<HubMessage>,
        inbox: &mut UnboundedReceiver<HubCommand>,
    ) -> SessionEnd {
        let (mut sink, mut stream) = socket.split();

        let rejoin = self.subscription.on_connected();
        if let Err(error) = send_all(&mut sink, rejoin).await {
            return SessionEnd::Lost(error);
        }
        for message in early {
            if let Some(end) = self.handle(message) {
                return end;
            }
        }

        loop {
            match select(stream.next(), inbox.next()).await {
                Either::Left((Some(Ok(Message::Text(text))), _)) => match reader.feed(&text) {
                    Ok(messages) => {
                        for message in messages {
                            if let Some(end) = self.handle(message) {
                                return end;
                            }
                        }
                    }
                    Err(e) => warn!("dropping undecodable hub frame: {e}"),
                },
                Either::Left((Some(Ok(Message::Bytes(_))), _)) => {}
                Either::Left((Some(Err(e)), _)) => return SessionEnd::Lost(e.to_string()),
                Either::Left((None, _)) => {
                    return SessionEnd::Lost("el servidor cerró la conexión".to_string())
                }
                Either::Right((Some(HubCommand::Subscribe(contract)), _)) => {
                    let invocations = self.subscription.subscribe(contract);
                    if let Err(error) = send_all(&mut sink, invocations).await {
                        return SessionEnd::Lost(error);
                    }
                }
                Either::Right((Some(HubCommand::Unsubscribe), _)) => {
                    let invocations = self.subscription.unsubscribe();
                    if let Err(error) = send_all(&mut sink, invocations).await {
                        return SessionEnd::Lost(error);
                    }
                }
                Either::Right((Some(HubCommand::Close) | None, _)) => {
                    let leave = self.subscription.unsubscribe();
                    if let Err(error) = send_all(&mut sink, leave).await {
                        debug!("could not leave payment group on close: {error}");
                    }
                    sink.close().await.ok();
                    return SessionEnd::Closed;
                }
            }
        }
    }

    fn handle(&self, message: HubMessage) -> Option<SessionEnd> {
        match message {
            HubMessage::Invocation { .. } => match message.payment() {
                Ok(Some(payment)) if self.subscription.accepts(&payment) => {
                    self.on_payment.emit(payment);
                }
                Ok(Some(payment)) => {
                    debug!("ignoring payment for contract {}", payment.contract_id);
                }
                Ok(None) => {}
                Err(e) => warn!("{e}"),
            },
            HubMessage::Completion { error: Some(error) } => {
                warn!("hub invocation failed: {error}");
            }
            HubMessage::Close {
                error,
                allow_reconnect,
            } => {
                if !allow_reconnect {
                    warn!("hub asked not to reconnect; retrying on the fixed schedule anyway");
                }
                return Some(SessionEnd::Lost(
                    error.unwrap_or_else(|| "el servidor cerró la conexión".to_string()),
                ));
            }
            HubMessage::Completion { error: None } | HubMessage::Ping | HubMessage::Other(_) => {}
        }
        None
    }

    /// Sleeps before the next attempt while still taking commands. Returns
    /// `false` when the hub was closed meanwhile.
    async fn wait(&mut self, delay: Duration, inbox: &mut UnboundedReceiver<HubCommand>) -> bool {
        let mut timer = sleep(delay);
        loop {
            match select(&mut timer, inbox.next()).await {
                Either::Left(_) => return true,
                Either::Right((command, _)) => {
                    if !self.apply_offline(command) {
                        return false;
                    }
                }
            }
        }
    }
}

/// Opens the socket and completes the handshake, giving up after
/// [`HANDSHAKE_TIMEOUT`]. Messages that arrived in the same frame as the
/// handshake answer are returned with the reader.
async fn open_connection(url: &str) -> Result<Connection, String> {
    let mut socket = WebSocket::open(url).map_err(|e| e.to_string())?;
    let outcome = {
        let exchange = handshake(&mut socket);
        pin_mut!(exchange);
        match select(exchange, sleep(HANDSHAKE_TIMEOUT)).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(format!(
                "sin respuesta al saludo inicial tras {} s",
                HANDSHAKE_TIMEOUT.as_secs()
            )),
        }
    };
    let (reader, early) = outcome?;
    Ok((socket, reader, early))
}

async fn handshake(socket: &mut WebSocket) -> Result<(FrameReader, Vec<HubMessage>), String> {
    socket
        .send(Message::Text(handshake_request()))
        .await
        .map_err(|e| e.to_string())?;

    let mut reader = FrameReader::new();
    let mut early = Vec::new();
    while !reader.handshake_done() {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => {
                early.extend(reader.feed(&text).map_err(|e| e.to_string())?);
            }
            Some(Ok(Message::Bytes(_))) => {}
            Some(Err(e)) => return Err(e.to_string()),
            None => return Err("conexión cerrada durante el saludo inicial".to_string()),
        }
    }
    Ok((reader, early))
}

async fn send_all(sink: &mut Sink, invocations: Vec<HubInvocation>) -> Result<(), String> {
    for invocation in invocations {
        sink.send(Message::Text(invocation.encode()))
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}
