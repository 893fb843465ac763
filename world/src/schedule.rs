//! Deferred events fired by the tick driver.

use std::time::Duration;

/// Deferred callbacks understood by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Timer {
    /// Returns the player's attack motion to idle.
    AttackRecovery,
    /// Lifts the creature's post-damage movement freeze.
    CreatureThaw,
    /// Forces the creature's wander algorithm to pick a new heading.
    DirectionChange,
}

impl Timer {
    /// Reports whether the timer references the creature.
    pub(crate) const fn targets_creature(self) -> bool {
        matches!(self, Self::CreatureThaw | Self::DirectionChange)
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    due: Duration,
    sequence: u64,
    timer: Timer,
    period: Option<Duration>,
}

/// Simulation clock plus the ordered set of pending timers.
///
/// Timers that share a due time fire in the order they were scheduled.
/// Repeating timers re-arm relative to their previous due time so a long
/// frame fires every missed period instead of drifting.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    now: Duration,
    next_sequence: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Total simulated time advanced so far.
    pub(crate) const fn now(&self) -> Duration {
        self.now
    }

    /// Fires `timer` once, `delay` after the current time.
    pub(crate) fn schedule(&mut self, delay: Duration, timer: Timer) {
        let due = self.now.saturating_add(delay);
        self.insert(due, timer, None);
    }

    /// Fires `timer` every `period`, starting one period from now.
    ///
    /// A zero period degrades to a single shot.
    pub(crate) fn schedule_repeating(&mut self, period: Duration, timer: Timer) {
        let due = self.now.saturating_add(period);
        let period = (!period.is_zero()).then_some(period);
        self.insert(due, timer, period);
    }

    /// Drops every pending timer matching `predicate`, returning how many were removed.
    pub(crate) fn cancel<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(Timer) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry.timer));
        before - self.entries.len()
    }

    /// Advances the clock by `dt`, returning every timer that came due in firing order.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<Timer> {
        self.now = self.now.saturating_add(dt);
        let mut fired = Vec::new();

        while let Some(index) = self.next_due() {
            let entry = self.entries.swap_remove(index);
            fired.push(entry.timer);
            if let Some(period) = entry.period {
                self.insert(entry.due.saturating_add(period), entry.timer, Some(period));
            }
        }

        fired
    }

    fn next_due(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= self.now)
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(index, _)| index)
    }

    fn insert(&mut self, due: Duration, timer: Timer, period: Option<Duration>) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(Entry {
            due,
            sequence,
            timer,
            period,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_once_their_delay_elapses() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_secs(1), Timer::AttackRecovery);

        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(
            scheduler.advance(Duration::from_millis(1)),
            vec![Timer::AttackRecovery]
        );
        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(scheduler.now(), Duration::from_millis(6_000));
    }

    #[test]
    fn firing_order_follows_due_time_then_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_secs(3), Timer::CreatureThaw);
        scheduler.schedule(Duration::from_secs(1), Timer::AttackRecovery);
        scheduler.schedule(Duration::from_secs(3), Timer::AttackRecovery);

        assert_eq!(
            scheduler.advance(Duration::from_secs(4)),
            vec![
                Timer::AttackRecovery,
                Timer::CreatureThaw,
                Timer::AttackRecovery
            ]
        );
    }

    #[test]
    fn repeating_timers_fire_every_missed_period() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(Duration::from_secs(2), Timer::DirectionChange);

        assert!(scheduler.advance(Duration::from_millis(1_500)).is_empty());
        assert_eq!(
            scheduler.advance(Duration::from_millis(500)),
            vec![Timer::DirectionChange]
        );
        assert_eq!(
            scheduler.advance(Duration::from_secs(5)),
            vec![Timer::DirectionChange, Timer::DirectionChange]
        );
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_secs(1), Timer::CreatureThaw);
        scheduler.schedule_repeating(Duration::from_secs(1), Timer::DirectionChange);
        scheduler.schedule(Duration::from_secs(1), Timer::AttackRecovery);

        assert_eq!(scheduler.cancel(Timer::targets_creature), 2);
        assert_eq!(
            scheduler.advance(Duration::from_secs(10)),
            vec![Timer::AttackRecovery]
        );
    }
}
