//! In-memory chat transport that records what the bot does.

use std::collections::VecDeque;

use async_trait::async_trait;
use neobot::{ChatEvent, ChatTransport, ConnectionError};

/// Transport replaying scripted events and recording outbound traffic.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    nickname: String,
    events: VecDeque<ChatEvent>,
    sent: Vec<(String, String)>,
    joins: Vec<String>,
    reconnects: usize,
    failures_left: usize,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new(nickname: &str) -> Self {
        Self {
            nickname: nickname.to_owned(),
            ..Self::default()
        }
    }

    /// Makes the next `count` join or reconnect attempts fail.
    pub const fn fail_next(&mut self, count: usize) {
        self.failures_left = count;
    }

    /// Queues an event for [`ChatTransport::next_event`].
    pub fn push_event(&mut self, event: ChatEvent) {
        self.events.push_back(event);
    }

    /// Messages sent so far as `(target, text)` pairs.
    #[must_use]
    pub fn sent(&self) -> &[(String, String)] {
        &self.sent
    }

    /// Channels successfully joined.
    #[must_use]
    pub fn joins(&self) -> &[String] {
        &self.joins
    }

    /// Successful reconnections.
    #[must_use]
    pub const fn reconnects(&self) -> usize {
        self.reconnects
    }

    fn attempt(&mut self) -> Result<(), ConnectionError> {
        if self.failures_left == 0 {
            return Ok(());
        }
        self.failures_left -= 1;
        Err(ConnectionError::Io {
            message: "connection refused".to_owned(),
        })
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn next_event(&mut self) -> ChatEvent {
        self.events
            .pop_front()
            .unwrap_or_else(|| ChatEvent::Disconnected {
                reason: "script exhausted".to_owned(),
            })
    }

    async fn join(&mut self, channel: &str) -> Result<(), ConnectionError> {
        self.attempt()?;
        self.joins.push(channel.to_owned());
        Ok(())
    }

    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), ConnectionError> {
        self.sent.push((target.to_owned(), text.to_owned()));
        Ok(())
    }

    async fn set_nickname(&mut self, name: &str) -> Result<(), ConnectionError> {
        name.clone_into(&mut self.nickname);
        Ok(())
    }

    async fn reconnect(&mut self) -> Result<(), ConnectionError> {
        self.attempt()?;
        self.reconnects += 1;
        Ok(())
    }

    fn nickname(&self) -> String {
        self.nickname.clone()
    }
}
