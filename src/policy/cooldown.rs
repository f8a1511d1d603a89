//! Suppresses repeated lookups of the same number within a window.

use chrono::TimeDelta;

use super::{Lookup, ReportPolicy, Verdict};
use crate::time::Clock;
use crate::ttl_set::TtlSet;

/// Rejects a number that was reported within the cooldown window.
///
/// Only approved lookups mark a number as seen, so a rejection never
/// extends the window.
#[derive(Debug)]
pub struct CooldownPolicy<Time>
where
    Time: Clock,
{
    seen: TtlSet<u64, Time>,
}

impl<Time> CooldownPolicy<Time>
where
    Time: Clock,
{
    /// Creates the policy with an empty seen set.
    #[must_use]
    pub const fn new(window: TimeDelta, clock: Time) -> Self {
        Self {
            seen: TtlSet::new(window, clock),
        }
    }

    /// Returns true while `number` is cooling down.
    pub fn is_cooling_down(&mut self, number: u64) -> bool {
        self.seen.contains(&number)
    }
}

impl<Time> ReportPolicy for CooldownPolicy<Time>
where
    Time: Clock,
{
    fn evaluate(&mut self, lookup: &Lookup<'_>) -> Verdict {
        let number = lookup.entity.number();
        if self.seen.contains(&number) {
            return Verdict::Rejected {
                reason: format!("{number} in cooldown period"),
            };
        }
        self.seen.add(number);
        Verdict::Approved
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rstest::rstest;

    use super::CooldownPolicy;
    use crate::policy::test_support::{issue, start};
    use crate::policy::{Lookup, ReportPolicy, Verdict};
    use crate::time::ManualClock;

    fn lookup_verdict(policy: &mut CooldownPolicy<ManualClock>, number: u64) -> Verdict {
        let entity = issue(number, start());
        policy.evaluate(&Lookup {
            message: "#7",
            nickname: "neobot",
            entity: &entity,
        })
    }

    #[rstest]
    fn repeats_are_suppressed_until_window_closes() {
        let clock = ManualClock::new(start());
        let mut policy = CooldownPolicy::new(TimeDelta::minutes(5), clock.clone());

        assert_eq!(lookup_verdict(&mut policy, 7), Verdict::Approved);

        clock.advance(TimeDelta::minutes(2));
        assert_eq!(
            lookup_verdict(&mut policy, 7),
            Verdict::Rejected {
                reason: "7 in cooldown period".to_owned()
            }
        );

        clock.advance(TimeDelta::minutes(4));
        assert_eq!(lookup_verdict(&mut policy, 7), Verdict::Approved);
    }

    #[rstest]
    fn rejection_does_not_extend_window() {
        let clock = ManualClock::new(start());
        let mut policy = CooldownPolicy::new(TimeDelta::minutes(5), clock.clone());

        lookup_verdict(&mut policy, 7);
        clock.advance(TimeDelta::minutes(4));
        lookup_verdict(&mut policy, 7);
        clock.advance(TimeDelta::minutes(1));

        assert!(!policy.is_cooling_down(7), "window counts from the approval");
    }

    #[rstest]
    fn numbers_cool_down_independently() {
        let clock = ManualClock::new(start());
        let mut policy = CooldownPolicy::new(TimeDelta::minutes(5), clock);

        assert_eq!(lookup_verdict(&mut policy, 7), Verdict::Approved);
        assert_eq!(lookup_verdict(&mut policy, 8), Verdict::Approved);
        assert!(policy.is_cooling_down(7));
        assert!(policy.is_cooling_down(8));
    }
}
