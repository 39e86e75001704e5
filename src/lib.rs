//! # Omikuji: a random-draw chat bot
//!
//! Omikuji answers chat commands with pseudo-random results: a uniformly
//! distributed integer from a `1-10` style range, or a uniformly selected
//! token from an `apple|pear|lemon` style list.
//!
//! ## Components
//!
//! - Pattern parsing and drawing ([`pattern`], [`random`])
//! - Command recognition and the per-conversation "awaiting argument"
//!   state ([`router`])
//! - Reply rendering with lightweight emphasis markup ([`formatter`])
//! - Event-based async wiring between transport and handler
//!   ([`event_bus`], [`system`], [`transport`])
//! - Startup configuration ([`config`])
//!
//! ## Message flow
//!
//! ```text
//! Transport → EventBus → CommandRouter → PatternEvaluator → ResponseFormatter → EventBus → Transport
//! ```
//!
//! A command whose required argument is missing suspends as an entry in the
//! router's pending table; the next message from the same conversation
//! resumes it. No thread is ever parked on a conversation, so unrelated
//! conversations are always processed without delay.

pub mod config;
pub mod error;
pub mod event_bus;
pub mod formatter;
pub mod message;
pub mod pattern;
pub mod random;
pub mod router;
pub mod system;
pub mod transport;

// Re-exports
pub use error::*;
pub use event_bus::*;
pub use message::*;
