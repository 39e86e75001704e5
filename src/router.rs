//! # Command Router
//!
//! Maps an inbound text message to a named command plus a raw argument
//! string, and holds the per-conversation "awaiting argument" state.
//!
//! A message is a command when it starts with `/` followed by a name of
//! letters and underscores, optionally addressed to the bot with an
//! `@botname` suffix, optionally followed by whitespace and a free-form
//! argument. Name matching is case-insensitive.
//!
//! When an argument-requiring command arrives without one, the router
//! registers a [`PendingInteraction`] keyed by conversation id and asks the
//! caller to prompt the user. The *next* message from that conversation is
//! consumed as the argument, whatever it looks like, even another command.
//! The pending table is a [`DashMap`] so that register and consume
//! stay atomic under concurrent delivery: of two near-simultaneous messages
//! for the same conversation, exactly one wins the pending entry and the
//! other is routed as a fresh message. Conversations never block each other.
//!
//! Entries that outlive their time-to-live are discarded lazily at consume
//! time; there is no background sweeper.

use std::str::FromStr;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::message::{ConversationId, InboundMessage};

lazy_static! {
    static ref COMMAND_PATTERN: Regex =
        Regex::new(r"(?s)^/([A-Za-z_]+)(?:@([A-Za-z0-9_]+))?(?:\s+(.*))?$").unwrap();
}

/// Commands the router recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandKind {
    Start,
    Help,
    Random,
}

impl CommandKind {
    pub fn requires_argument(&self) -> bool {
        matches!(self, CommandKind::Random)
    }
}

/// A recognized command together with its raw argument (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub argument: String,
}

/// Transient record that a command is awaiting a follow-up message from a
/// specific conversation. Lives in the router's pending table for at most
/// one round trip.
#[derive(Debug, Clone)]
pub struct PendingInteraction {
    command: CommandKind,
    registered_at: Instant,
}

impl PendingInteraction {
    fn new(command: CommandKind) -> Self {
        Self {
            command,
            registered_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.registered_at.elapsed() >= ttl
    }
}

/// How the router resolved one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOutcome {
    /// A recognized command with its argument, ready to act on.
    Dispatch { command: Command },
    /// A command that needs an argument arrived without one; the caller
    /// should prompt the user and feed the next message back in.
    AwaitingArgument { command: CommandKind },
    /// The message supplied the argument for a previously registered
    /// pending interaction, which has now been consumed.
    ResolvedFromPending { command: Command },
    /// Not a recognized command and nothing was pending.
    Ignored,
}

pub struct CommandRouter {
    bot_name: Option<String>,
    pending_ttl: Duration,
    pending: DashMap<ConversationId, PendingInteraction>,
}

impl CommandRouter {
    pub fn new(bot_name: Option<String>, pending_ttl: Duration) -> Self {
        Self {
            bot_name,
            pending_ttl,
            pending: DashMap::new(),
        }
    }

    /// Resolves one inbound message against the command grammar and the
    /// pending table.
    #[instrument(skip(self, message), fields(conversation = %message.conversation))]
    pub fn route(&self, message: &InboundMessage) -> RouterOutcome {
        // `remove` is the atomic consume: under concurrent delivery only one
        // message gets the entry.
        if let Some((_, pending)) = self.pending.remove(&message.conversation) {
            if pending.is_expired(self.pending_ttl) {
                warn!(command = %pending.command, "discarding expired pending interaction");
            } else {
                debug!(command = %pending.command, "resolved pending interaction");
                return RouterOutcome::ResolvedFromPending {
                    command: Command {
                        kind: pending.command,
                        argument: message.text.trim().to_string(),
                    },
                };
            }
        }

        let Some(command) = self.parse_command(&message.text) else {
            return RouterOutcome::Ignored;
        };

        if command.kind.requires_argument() && command.argument.is_empty() {
            self.pending.insert(
                message.conversation.clone(),
                PendingInteraction::new(command.kind),
            );
            debug!(command = %command.kind, "registered pending interaction");
            return RouterOutcome::AwaitingArgument {
                command: command.kind,
            };
        }

        RouterOutcome::Dispatch { command }
    }

    /// Number of conversations currently awaiting an argument.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn parse_command(&self, text: &str) -> Option<Command> {
        let captures = COMMAND_PATTERN.captures(text.trim())?;
        // A command addressed to a different bot is not for us.
        if let (Some(addressed), Some(bot_name)) = (captures.get(2), self.bot_name.as_deref()) {
            if !addressed.as_str().eq_ignore_ascii_case(bot_name) {
                return None;
            }
        }
        let kind = CommandKind::from_str(&captures[1]).ok()?;
        let argument = captures
            .get(3)
            .map(|m| m.as_str().trim())
            .unwrap_or("")
            .to_string();
        Some(Command { kind, argument })
    }
}
