//! Message records exchanged with the external chat transport.
//!
//! These are the only types that cross the transport boundary: an
//! [`InboundMessage`] enters the system, an [`OutboundMessage`] leaves it.
//! Everything in between is transient per-message state.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of the chat/channel a message belongs to.
///
/// The transport assigns these; the core only compares and clones them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque identifier of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Globally unique id for transports that do not assign their own.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the text of an outbound message should be interpreted by the
/// transport when rendering it to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Markup {
    /// Text carries no markers and is displayed verbatim.
    Plain,
    /// Text carries lightweight emphasis markers (`_label_`, `*value*`).
    LightweightEmphasis,
}

/// A text message delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub conversation: ConversationId,
    pub text: String,
    pub message_id: MessageId,
}

impl InboundMessage {
    pub fn new(conversation: ConversationId, text: impl Into<String>) -> Self {
        Self {
            conversation,
            text: text.into(),
            message_id: MessageId::random(),
        }
    }
}

/// A reply handed back to the transport for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub conversation: ConversationId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub markup: Markup,
}

impl OutboundMessage {
    pub fn plain(
        conversation: ConversationId,
        text: impl Into<String>,
        reply_to: Option<MessageId>,
    ) -> Self {
        Self {
            conversation,
            text: text.into(),
            reply_to,
            markup: Markup::Plain,
        }
    }

    pub fn emphasized(
        conversation: ConversationId,
        text: impl Into<String>,
        reply_to: Option<MessageId>,
    ) -> Self {
        Self {
            conversation,
            text: text.into(),
            reply_to,
            markup: Markup::LightweightEmphasis,
        }
    }
}
