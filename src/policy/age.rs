//! Suppresses lookups of old entities unless the bot was addressed.

use chrono::TimeDelta;

use super::{Lookup, ReportPolicy, Verdict};
use crate::time::Clock;

/// Rejects entities created at least `max_age` ago.
///
/// A message starting with the bot's nickname is an explicit request and
/// bypasses the age check.
#[derive(Debug)]
pub struct AgePolicy<Time>
where
    Time: Clock,
{
    max_age: TimeDelta,
    clock: Time,
}

impl<Time> AgePolicy<Time>
where
    Time: Clock,
{
    /// Creates the policy.
    #[must_use]
    pub const fn new(max_age: TimeDelta, clock: Time) -> Self {
        Self { max_age, clock }
    }
}

impl<Time> ReportPolicy for AgePolicy<Time>
where
    Time: Clock,
{
    fn evaluate(&mut self, lookup: &Lookup<'_>) -> Verdict {
        let is_old = lookup
            .entity
            .created_at()
            .checked_add_signed(self.max_age)
            .is_some_and(|expires_at| expires_at <= self.clock.now());

        if is_old && !lookup.is_mention() {
            Verdict::Rejected {
                reason: format!("{} is too old", lookup.entity.number()),
            }
        } else {
            Verdict::Approved
        }
    }
}
