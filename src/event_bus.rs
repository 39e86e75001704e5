//! # Event Bus
//!
//! Broadcast channel connecting the transport to the message-handling task.
//! The transport publishes [`Event::Inbound`] values; the system publishes
//! [`Event::Outbound`] replies for the transport to deliver. A second
//! channel carries [`ErrorEvent`] values for observability.

use thiserror::Error;
use tokio::sync::broadcast;

use crate::message::{InboundMessage, OutboundMessage};

/// A message crossing the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Inbound(InboundMessage),
    Outbound(OutboundMessage),
}

/// Non-fatal fault surfaced for logging. The originating conversation keeps
/// working; nothing is retried here.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub error_type: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to send event: {message}")]
    SendFailed { message: String },
    #[error("failed to receive event: {message}")]
    ReceiveFailed { message: String },
    #[error("receiver lagged behind by {count} events")]
    Lagged { count: u64 },
}

pub struct EventBus {
    event_sender: broadcast::Sender<Event>,
    error_sender: broadcast::Sender<ErrorEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (event_sender, _) = broadcast::channel(capacity);
        let (error_sender, _) = broadcast::channel(capacity);
        Self {
            event_sender,
            error_sender,
        }
    }

    pub fn subscribe(&self) -> (EventReceiver, ErrorReceiver) {
        (
            EventReceiver::new(self.event_sender.subscribe()),
            ErrorReceiver::new(self.error_sender.subscribe()),
        )
    }

    pub async fn publish(&self, event: Event) -> Result<(), EventError> {
        self.event_sender
            .send(event)
            .map(|_| ())
            .map_err(|e| EventError::SendFailed {
                message: e.to_string(),
            })
    }

    pub async fn publish_error(&self, error: ErrorEvent) -> Result<(), EventError> {
        self.error_sender
            .send(error)
            .map(|_| ())
            .map_err(|e| EventError::SendFailed {
                message: e.to_string(),
            })
    }
}

pub struct EventReceiver {
    receiver: broadcast::Receiver<Event>,
}

impl EventReceiver {
    fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Receives the next event. On lag the receiver resubscribes and
    /// reports how many events were skipped; callers should keep calling
    /// `recv` promptly to avoid lagging in the first place.
    pub async fn recv(&mut self) -> Result<Event, EventError> {
        match self.receiver.recv().await {
            Ok(event) => Ok(event),
            Err(broadcast::error::RecvError::Lagged(count)) => {
                self.receiver = self.receiver.resubscribe();
                Err(EventError::Lagged { count })
            }
            Err(e) => Err(EventError::ReceiveFailed {
                message: e.to_string(),
            }),
        }
    }
}

pub struct ErrorReceiver {
    receiver: broadcast::Receiver<ErrorEvent>,
}

impl ErrorReceiver {
    fn new(receiver: broadcast::Receiver<ErrorEvent>) -> Self {
        Self { receiver }
    }

    pub async fn recv(&mut self) -> Result<ErrorEvent, EventError> {
        self.receiver
            .recv()
            .await
            .map_err(|e| EventError::ReceiveFailed {
                message: e.to_string(),
            })
    }
}
