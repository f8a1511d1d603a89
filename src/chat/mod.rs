//! Chat transport boundary and the IRC implementation.
//!
//! The bot only sees [`ChatEvent`]s and drives the connection through
//! [`ChatTransport`]; framing and registration live in [`irc`].

use async_trait::async_trait;
use thiserror::Error;

pub mod irc;
pub mod message;

pub use irc::{DEFAULT_PORT, IrcSettings, IrcTransport};
pub use message::IrcMessage;

/// Errors raised by a chat transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// Socket-level failure.
    #[error("connection I/O failed: {message}")]
    Io {
        /// Error detail from the socket.
        message: String,
    },

    /// An operation needed a live connection but there is none.
    #[error("not connected")]
    Closed,

    /// The server sent something the client could not interpret.
    #[error("protocol error: {message}")]
    Protocol {
        /// Offending input or explanation.
        message: String,
    },
}

/// Inbound events the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A message the bot can answer.
    Message {
        /// Channel or nick the reply goes to.
        reply_to: String,
        /// Message text.
        text: String,
    },
    /// The bot was removed from a channel.
    Kicked {
        /// Channel the bot was kicked from.
        channel: String,
    },
    /// The connection was lost.
    Disconnected {
        /// What ended the connection.
        reason: String,
    },
}

/// Operations the bot needs from a chat connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send {
    /// Waits for the next event the bot should handle.
    ///
    /// A lost connection is reported as [`ChatEvent::Disconnected`] rather
    /// than an error.
    async fn next_event(&mut self) -> ChatEvent;

    /// Joins a channel.
    async fn join(&mut self, channel: &str) -> Result<(), ConnectionError>;

    /// Sends a message to a channel or nick.
    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), ConnectionError>;

    /// Requests a new nickname.
    async fn set_nickname(&mut self, name: &str) -> Result<(), ConnectionError>;

    /// Drops any existing connection and establishes a fresh one.
    async fn reconnect(&mut self) -> Result<(), ConnectionError>;

    /// Nickname currently held.
    fn nickname(&self) -> String;
}
