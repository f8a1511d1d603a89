//! Event loop turning chat messages into entity summaries.
//!
//! Events are handled one at a time: a message is scanned for references,
//! each reference is resolved and run through the policy chain, and approved
//! entities are answered in the conversation they came from. Connection
//! losses are handed to a reconnection supervisor before the next event is
//! read.

use tracing::{info, warn};

use crate::chat::{ChatEvent, ChatTransport};
use crate::github::{EntityGateway, EntityResolver};
use crate::policy::{Lookup, PolicyChain, Verdict};
use crate::reconnect::{Backoff, RecoveryAction, ReconnectSupervisor};
use crate::scanner::scan;
use crate::time::Sleeper;

/// Chat bot answering references to GitHub entities.
pub struct Bot<Gateway, Transport, Sleep>
where
    Gateway: EntityGateway,
    Transport: ChatTransport,
    Sleep: Sleeper,
{
    resolver: EntityResolver<Gateway>,
    transport: Transport,
    policies: PolicyChain,
    channel: String,
    rejoin: ReconnectSupervisor<Sleep>,
    reconnect: ReconnectSupervisor<Sleep>,
}

impl<Gateway, Transport, Sleep> Bot<Gateway, Transport, Sleep>
where
    Gateway: EntityGateway,
    Transport: ChatTransport,
    Sleep: Sleeper + Clone,
{
    /// Assembles a bot. Kicks and disconnections each get their own
    /// supervisor sharing the standard backoff shape.
    #[must_use]
    pub fn new(
        resolver: EntityResolver<Gateway>,
        transport: Transport,
        policies: PolicyChain,
        channel: String,
        sleeper: Sleep,
    ) -> Self {
        Self {
            resolver,
            transport,
            policies,
            channel,
            rejoin: ReconnectSupervisor::new(Backoff::default(), sleeper.clone()),
            reconnect: ReconnectSupervisor::new(Backoff::default(), sleeper),
        }
    }

    /// Borrow the transport.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Processes events forever.
    pub async fn run(&mut self) {
        loop {
            self.step().await;
        }
    }

    /// Waits for the next event and handles it.
    pub async fn step(&mut self) {
        let event = self.transport.next_event().await;
        self.handle_event(event).await;
    }

    /// Handles a single inbound event.
    pub async fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Message { reply_to, text } => self.handle_message(&reply_to, &text).await,
            ChatEvent::Kicked { channel } => {
                warn!(%channel, "kicked from channel");
                let action = RecoveryAction::Rejoin {
                    channel: self.channel.clone(),
                };
                self.rejoin.recover(&mut self.transport, &action).await;
            }
            ChatEvent::Disconnected { reason } => {
                warn!(%reason, "disconnected");
                self.reconnect
                    .recover(&mut self.transport, &RecoveryAction::Reconnect)
                    .await;
            }
        }
    }

    /// Answers every reference in `text` that resolves and passes the
    /// policy chain. A failing reference never stops the remaining ones.
    pub async fn handle_message(&mut self, reply_to: &str, text: &str) {
        let nickname = self.transport.nickname();

        for reference in scan(text) {
            let locator = match self.resolver.locate(&reference) {
                Ok(locator) => locator,
                Err(error) => {
                    warn!(number = %reference.number, %error, "skipping reference");
                    continue;
                }
            };

            let entity = match self.resolver.resolve(&locator).await {
                Ok(Some(entity)) => entity,
                Ok(None) => {
                    info!(%locator, "entity not found");
                    continue;
                }
                Err(error) => {
                    warn!(%locator, %error, "lookup failed");
                    continue;
                }
            };

            let verdict = self.policies.evaluate(&Lookup {
                message: text,
                nickname: &nickname,
                entity: &entity,
            });
            if let Verdict::Rejected { reason } = verdict {
                info!(%locator, %reason, "lookup suppressed");
                continue;
            }

            let reply = entity.to_string();
            match self.transport.send_message(reply_to, &reply).await {
                Ok(()) => info!(%locator, target = reply_to, %reply, "reply sent"),
                Err(error) => warn!(%locator, %error, "reply failed"),
            }
        }
    }
}
