//! # System
//!
//! Owns the event bus and the message-handling task. Inbound events are
//! routed, evaluated and formatted by one logical flow per message; the
//! reply is published back on the bus for the transport to deliver.
//!
//! There is no blocked thread behind an "awaiting argument" interaction:
//! the suspension is an entry in the router's pending table, so messages
//! for unrelated conversations keep flowing while one conversation is
//! mid-interaction.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::{
    config::BotConfig,
    error::{BotResult, Error},
    event_bus::{ErrorEvent, Event, EventBus, EventError},
    formatter::{MarkupStyle, ResponseFormatter},
    message::{InboundMessage, OutboundMessage},
    pattern::PatternEvaluator,
    random::RandomSource,
    router::{Command, CommandKind, CommandRouter, RouterOutcome},
};

/// Resolves one inbound message to at most one reply.
pub struct MessageHandler {
    router: CommandRouter,
    evaluator: PatternEvaluator,
    formatter: ResponseFormatter,
}

impl MessageHandler {
    pub fn new(config: &BotConfig, random: Arc<RandomSource>) -> Self {
        Self {
            router: CommandRouter::new(config.bot_name.clone(), config.pending_ttl),
            evaluator: PatternEvaluator::new(random),
            formatter: ResponseFormatter::new(MarkupStyle::Markdown),
        }
    }

    #[instrument(skip(self, message), fields(conversation = %message.conversation))]
    pub fn handle(&self, message: &InboundMessage) -> Option<OutboundMessage> {
        match self.router.route(message) {
            RouterOutcome::Dispatch { command }
            | RouterOutcome::ResolvedFromPending { command } => {
                Some(self.dispatch(&command, message))
            }
            RouterOutcome::AwaitingArgument { .. } => Some(OutboundMessage::plain(
                message.conversation.clone(),
                self.formatter.prompt(),
                Some(message.message_id.clone()),
            )),
            RouterOutcome::Ignored => None,
        }
    }

    fn dispatch(&self, command: &Command, origin: &InboundMessage) -> OutboundMessage {
        let text = match command.kind {
            CommandKind::Start | CommandKind::Help => self.formatter.usage(),
            CommandKind::Random => {
                let result = self.evaluator.evaluate(&command.argument);
                self.formatter.render(&result)
            }
        };
        OutboundMessage::emphasized(
            origin.conversation.clone(),
            text,
            Some(origin.message_id.clone()),
        )
    }
}

pub struct System {
    event_bus: Arc<EventBus>,
    handler: Arc<MessageHandler>,
    shutdown_tx: broadcast::Sender<()>,
}

impl System {
    pub fn new(config: &BotConfig) -> Self {
        Self::with_random(config, Arc::new(RandomSource::from_entropy()))
    }

    /// Builds a system with an explicit random source, so tests can seed it.
    pub fn with_random(config: &BotConfig, random: Arc<RandomSource>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            event_bus: Arc::new(EventBus::new(config.event_buffer_size)),
            handler: Arc::new(MessageHandler::new(config, random)),
            shutdown_tx,
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Spawns the message-handling task.
    pub fn start(&self) {
        let bus = self.event_bus.clone();
        let handler = self.handler.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let (mut events, _) = bus.subscribe();

        tokio::spawn(async move {
            info!("message handling started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    received = events.recv() => match received {
                        Ok(Event::Inbound(message)) => {
                            let Some(reply) = handler.handle(&message) else {
                                continue;
                            };
                            if let Err(e) = bus.publish(Event::Outbound(reply)).await {
                                let _ = bus
                                    .publish_error(ErrorEvent {
                                        error_type: "publish_failed".to_string(),
                                        message: e.to_string(),
                                    })
                                    .await;
                            }
                        }
                        Ok(Event::Outbound(_)) => {}
                        Err(EventError::Lagged { count }) => {
                            warn!(count, "handler lagged behind the event bus");
                        }
                        Err(_) => break,
                    }
                }
            }
            info!("message handling stopped");
        });
    }

    pub fn shutdown(&self) -> BotResult<()> {
        self.shutdown_tx
            .send(())
            .map(|_| ())
            .map_err(|_| Error::internal("failed to send shutdown signal"))
    }
}
