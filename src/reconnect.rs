//! Capped exponential backoff for recovering a lost channel or connection.
//!
//! A supervisor moves from [`SupervisorState::Connected`] to
//! [`SupervisorState::Backoff`] when a loss is reported, sleeps, attempts
//! recovery, and doubles the delay (up to a cap) after every failure. It
//! never gives up.

use std::time::Duration;

use tracing::{info, warn};

use crate::chat::{ChatTransport, ConnectionError};
use crate::time::Sleeper;

/// Delay before the first recovery attempt of an episode.
pub const BASE_DELAY: Duration = Duration::from_secs(10);

/// Upper bound on the delay between attempts.
pub const MAX_DELAY: Duration = Duration::from_secs(300);

/// Doubling delay clamped at a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// Creates a backoff starting at `base` and never exceeding `max`.
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: base.min(max),
        }
    }

    /// Delay to wait before the next attempt.
    #[must_use]
    pub const fn current(&self) -> Duration {
        self.current
    }

    /// Starts a new episode at the base delay.
    pub fn reset(&mut self) -> Duration {
        self.current = self.base.min(self.max);
        self.current
    }

    /// Records a failed attempt and returns the next delay.
    pub fn fail(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.max);
        self.current
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BASE_DELAY, MAX_DELAY)
    }
}

/// What to do once the delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Join the channel again after a kick.
    Rejoin {
        /// Channel to rejoin.
        channel: String,
    },
    /// Re-establish the transport after a disconnection.
    Reconnect,
}

/// Supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Nothing to recover.
    Connected,
    /// Waiting `delay` before the next attempt.
    Backoff(Duration),
}

/// Drives recovery attempts until one succeeds.
#[derive(Debug)]
pub struct ReconnectSupervisor<Sleep>
where
    Sleep: Sleeper,
{
    backoff: Backoff,
    state: SupervisorState,
    sleeper: Sleep,
}

impl<Sleep> ReconnectSupervisor<Sleep>
where
    Sleep: Sleeper,
{
    /// Creates a supervisor in the connected state.
    #[must_use]
    pub const fn new(backoff: Backoff, sleeper: Sleep) -> Self {
        Self {
            backoff,
            state: SupervisorState::Connected,
            sleeper,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SupervisorState {
        self.state
    }

    /// Recovers from a connection-loss event, retrying forever.
    ///
    /// Returns the number of attempts made once recovery succeeds.
    pub async fn recover<Transport>(
        &mut self,
        transport: &mut Transport,
        action: &RecoveryAction,
    ) -> u32
    where
        Transport: ChatTransport + ?Sized,
    {
        let mut delay = self.backoff.reset();
        let mut attempts: u32 = 0;
        loop {
            self.state = SupervisorState::Backoff(delay);
            self.sleeper.sleep(delay).await;
            attempts = attempts.saturating_add(1);

            match attempt(transport, action).await {
                Ok(()) => {
                    self.state = SupervisorState::Connected;
                    info!(?action, attempts, "recovered");
                    return attempts;
                }
                Err(error) => {
                    delay = self.backoff.fail();
                    warn!(
                        ?action,
                        %error,
                        delay_secs = delay.as_secs(),
                        "recovery attempt failed"
                    );
                }
            }
        }
    }
}

async fn attempt<Transport>(
    transport: &mut Transport,
    action: &RecoveryAction,
) -> Result<(), ConnectionError>
where
    Transport: ChatTransport + ?Sized,
{
    match action {
        RecoveryAction::Rejoin { channel } => {
            info!(%channel, "rejoining");
            match transport.join(channel).await {
                // Registration joins the channel again once the server
                // welcomes the new connection.
                Err(ConnectionError::Closed) => {
                    warn!(%channel, "connection gone while rejoining; reconnecting");
                    transport.reconnect().await
                }
                outcome => outcome,
            }
        }
        RecoveryAction::Reconnect => {
            info!("reconnecting");
            transport.reconnect().await
        }
    }
}
