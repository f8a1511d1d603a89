//! Set whose members expire a fixed window after insertion.

use chrono::{DateTime, TimeDelta, Utc};

use crate::time::Clock;

/// Membership set with per-entry expiry.
///
/// An entry is live while `now - inserted_at < window`. Entries are kept in
/// insertion order, which is also timestamp order, so expired entries always
/// form a prefix and are dropped in one slice operation before every query.
///
/// The set is not synchronised; it belongs to exactly one owner.
#[derive(Debug)]
pub struct TtlSet<Key, Time>
where
    Time: Clock,
{
    entries: Vec<(DateTime<Utc>, Key)>,
    window: TimeDelta,
    clock: Time,
}

impl<Key, Time> TtlSet<Key, Time>
where
    Key: PartialEq,
    Time: Clock,
{
    /// Creates an empty set whose entries live for `window`.
    #[must_use]
    pub const fn new(window: TimeDelta, clock: Time) -> Self {
        Self {
            entries: Vec::new(),
            window,
            clock,
        }
    }

    /// Inserts `key` unless it is already live.
    ///
    /// A live key keeps its original timestamp, so repeated inserts never
    /// extend its window.
    pub fn add(&mut self, key: Key) {
        let now = self.evict_expired();
        if self.is_live(&key) {
            return;
        }
        // A clock that stepped backwards must not break timestamp order.
        let inserted_at = self
            .entries
            .last()
            .map_or(now, |(newest, _)| now.max(*newest));
        self.entries.push((inserted_at, key));
    }

    /// Returns true if `key` was inserted within the window.
    pub fn contains(&mut self, key: &Key) -> bool {
        self.evict_expired();
        self.is_live(key)
    }

    /// Removes the live entry equal to `key`, returning whether one existed.
    pub fn discard(&mut self, key: &Key) -> bool {
        self.evict_expired();
        let Some(position) = self.entries.iter().position(|(_, live)| live == key) else {
            return false;
        };
        self.entries.remove(position);
        true
    }

    /// Number of live entries.
    pub fn len(&mut self) -> usize {
        self.evict_expired();
        self.entries.len()
    }

    /// Returns true if no entry is live.
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, key: &Key) -> bool {
        self.entries.iter().any(|(_, live)| live == key)
    }

    /// Drops every entry whose window has closed and returns the time used.
    fn evict_expired(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        if let Some(cutoff) = now.checked_sub_signed(self.window) {
            let expired = self
                .entries
                .partition_point(|(inserted_at, _)| *inserted_at <= cutoff);
            self.entries.drain(..expired);
        }
        now
    }
}
