//! Transport seam between the core and an external chat network.
//!
//! The core never talks to a network itself; it exchanges
//! [`InboundMessage`]/[`OutboundMessage`] values with whatever implements
//! [`Transport`]. Delivery failures belong to the transport (logged here,
//! never escalated into the core).
//!
//! [`ConsoleTransport`] is the only implementation shipped in-tree: it
//! reads lines from stdin as a single synthetic conversation and prints
//! replies to stdout, which makes the binary usable without network
//! credentials.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{BotResult, Error},
    event_bus::{Event, EventError},
    message::{ConversationId, InboundMessage, OutboundMessage},
    system::System,
};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Waits for the next message from the chat network. `None` means the
    /// stream has ended and the bot should stop.
    async fn next_message(&self) -> BotResult<Option<InboundMessage>>;

    /// Delivers one reply to the chat network.
    async fn deliver(&self, message: &OutboundMessage) -> BotResult<()>;
}

/// Pumps a transport against a running [`System`] until the transport's
/// stream ends or the system shuts down.
pub async fn run<T: Transport>(system: &System, transport: T) -> BotResult<()> {
    let bus = system.event_bus();
    let (mut events, _) = bus.subscribe();
    let mut shutdown_rx = system.subscribe_shutdown();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            next = transport.next_message() => match next? {
                Some(message) => {
                    debug!(conversation = %message.conversation, "inbound message");
                    bus.publish(Event::Inbound(message)).await?;
                }
                None => break,
            },
            received = events.recv() => match received {
                Ok(Event::Outbound(outbound)) => {
                    if let Err(e) = transport.deliver(&outbound).await {
                        warn!(error = %e, "failed to deliver outbound message");
                    }
                }
                Ok(Event::Inbound(_)) => {}
                Err(EventError::Lagged { count }) => {
                    warn!(count, "transport lagged behind the event bus");
                }
                Err(_) => break,
            }
        }
    }
    Ok(())
}

/// Stdin/stdout transport. Every line typed is one inbound message in a
/// single synthetic conversation.
pub struct ConsoleTransport {
    conversation: ConversationId,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            conversation: ConversationId::new("console"),
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn next_message(&self) -> BotResult<Option<InboundMessage>> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(Some(InboundMessage::new(self.conversation.clone(), line))),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::internal(format!("failed to read stdin: {}", e))),
        }
    }

    async fn deliver(&self, message: &OutboundMessage) -> BotResult<()> {
        println!("{}", message.text);
        Ok(())
    }
}
