//! Ordered suppression policies deciding whether a resolved entity is
//! reported.
//!
//! Each bot owns one [`PolicyChain`]; policies keep their own state and are
//! consulted in order until one rejects.

use chrono::TimeDelta;

use crate::github::Entity;
use crate::time::Clock;

pub mod age;
pub mod cooldown;

pub use age::AgePolicy;
pub use cooldown::CooldownPolicy;

/// Outcome of evaluating a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The entity should be reported.
    Approved,
    /// The entity should not be reported.
    Rejected {
        /// Why the lookup was suppressed.
        reason: String,
    },
}

/// A resolved lookup awaiting a verdict.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    /// Text of the message that triggered the lookup.
    pub message: &'a str,
    /// Nickname the bot currently holds.
    pub nickname: &'a str,
    /// The resolved entity.
    pub entity: &'a Entity,
}

impl Lookup<'_> {
    /// Returns true when the message addresses the bot by leading nickname.
    #[must_use]
    pub fn is_mention(&self) -> bool {
        !self.nickname.is_empty() && self.message.starts_with(self.nickname)
    }
}

/// A single suppression rule.
pub trait ReportPolicy: Send {
    /// Decides whether the lookup may be reported.
    fn evaluate(&mut self, lookup: &Lookup<'_>) -> Verdict;
}

/// Policies applied in order; the first rejection wins.
#[derive(Default)]
pub struct PolicyChain {
    policies: Vec<Box<dyn ReportPolicy>>,
}

impl PolicyChain {
    /// Creates an empty chain, which approves everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// Builds the default chain: age filter, then cooldown.
    #[must_use]
    pub fn standard<Time>(max_age: TimeDelta, cooldown: TimeDelta, clock: Time) -> Self
    where
        Time: Clock + Clone + 'static,
    {
        Self::new()
            .with(AgePolicy::new(max_age, clock.clone()))
            .with(CooldownPolicy::new(cooldown, clock))
    }

    /// Appends a policy to the end of the chain.
    #[must_use]
    pub fn with(mut self, policy: impl ReportPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Runs the policies in order, stopping at the first rejection.
    pub fn evaluate(&mut self, lookup: &Lookup<'_>) -> Verdict {
        for policy in &mut self.policies {
            let verdict = policy.evaluate(lookup);
            if verdict != Verdict::Approved {
                return verdict;
            }
        }
        Verdict::Approved
    }
}


#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rstest::rstest;

    use super::test_support::{issue, start};
    use super::{Lookup, PolicyChain, ReportPolicy, Verdict};
    use crate::time::ManualClock;

    struct Fixed(Verdict);

    impl ReportPolicy for Fixed {
        fn evaluate(&mut self, _lookup: &Lookup<'_>) -> Verdict {
            self.0.clone()
        }
    }

    struct Unreachable;

    impl ReportPolicy for Unreachable {
        fn evaluate(&mut self, _lookup: &Lookup<'_>) -> Verdict {
            panic!("policies after a rejection must not run");
        }
    }

    #[rstest]
    fn empty_chain_approves() {
        let entity = issue(1, start());
        let mut chain = PolicyChain::new();

        let verdict = chain.evaluate(&Lookup {
            message: "#1",
            nickname: "neobot",
            entity: &entity,
        });

        assert_eq!(verdict, Verdict::Approved);
    }

    #[rstest]
    fn first_rejection_wins() {
        let entity = issue(1, start());
        let mut chain = PolicyChain::new()
            .with(Fixed(Verdict::Approved))
            .with(Fixed(Verdict::Rejected {
                reason: "first".to_owned(),
            }))
            .with(Unreachable);

        let verdict = chain.evaluate(&Lookup {
            message: "#1",
            nickname: "neobot",
            entity: &entity,
        });

        assert_eq!(
            verdict,
            Verdict::Rejected {
                reason: "first".to_owned()
            }
        );
    }

    #[rstest]
    fn stale_lookup_does_not_start_cooldown() {
        let clock = ManualClock::new(start());
        let mut chain =
            PolicyChain::standard(TimeDelta::days(365), TimeDelta::minutes(5), clock.clone());
        let stale = issue(3, start() - TimeDelta::days(400));

        let passive = chain.evaluate(&Lookup {
            message: "look at #3",
            nickname: "neobot",
            entity: &stale,
        });
        let mention = chain.evaluate(&Lookup {
            message: "neobot: look at #3",
            nickname: "neobot",
            entity: &stale,
        });

        assert!(matches!(passive, Verdict::Rejected { .. }), "got {passive:?}");
        assert_eq!(
            mention,
            Verdict::Approved,
            "age rejection must not have marked the number as seen"
        );
    }

    #[rstest]
    #[case::leading_nickname("neobot: hi", true)]
    #[case::nickname_elsewhere("hi neobot", false)]
    #[case::no_nickname("hi", false)]
    fn detects_mentions(#[case] message: &str, #[case] expected: bool) {
        let entity = issue(1, start());
        let lookup = Lookup {
            message,
            nickname: "neobot",
            entity: &entity,
        };

        assert_eq!(lookup.is_mention(), expected);
    }
}
