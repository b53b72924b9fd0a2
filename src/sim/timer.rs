//! Countdown timer
//!
//! One tick per second from `initial` down to zero, then a one-shot grace
//! action that rearms the timer. The countdown owns the handles of its live
//! interval and grace action; every start, expiry and reset cancels whatever
//! it supersedes, so at most one of each is ever live.

use super::effect::{Effect, TimerId};
use crate::consts::TICK_PERIOD_SECS;

/// Result of delivering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Handle was not the live interval
    Ignored,
    /// Counted down, time remains
    Ticked { remaining: u32 },
    /// Reached zero on this tick
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    initial: u32,
    grace_secs: u32,
    remaining: u32,
    running: bool,
    interval: Option<TimerId>,
    grace: Option<TimerId>,
    next_id: u64,
}

impl Countdown {
    pub fn new(initial: u32, grace_secs: u32) -> Self {
        Self {
            initial,
            grace_secs,
            remaining: initial,
            running: false,
            interval: None,
            grace: None,
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Expired and waiting for the grace action
    pub fn in_grace(&self) -> bool {
        self.grace.is_some()
    }

    pub fn live_interval(&self) -> Option<TimerId> {
        self.interval
    }

    pub fn live_grace(&self) -> Option<TimerId> {
        self.grace
    }

    fn cancel_interval(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.interval.take() {
            effects.push(Effect::CancelInterval(id));
        }
    }

    fn cancel_grace(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.grace.take() {
            effects.push(Effect::CancelGrace(id));
        }
    }

    /// Start counting down. Returns false (and does nothing) if already running.
    ///
    /// An exhausted countdown is rearmed to the full time first.
    pub fn start(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.running {
            return false;
        }
        self.cancel_grace(effects);
        if self.remaining == 0 {
            self.remaining = self.initial;
        }
        let id = self.alloc_id();
        self.interval = Some(id);
        self.running = true;
        effects.push(Effect::StartInterval {
            id,
            period_secs: TICK_PERIOD_SECS,
        });
        true
    }

    /// Deliver one tick from interval `id`
    pub fn tick(&mut self, id: TimerId, effects: &mut Vec<Effect>) -> TickOutcome {
        if self.interval != Some(id) {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Ticked {
                remaining: self.remaining,
            };
        }

        self.cancel_interval(effects);
        self.running = false;
        let grace = self.alloc_id();
        self.grace = Some(grace);
        effects.push(Effect::ScheduleGrace {
            id: grace,
            delay_secs: self.grace_secs,
        });
        TickOutcome::Expired
    }

    /// Deliver the grace action `id`. Returns false if it was not live.
    pub fn grace_elapsed(&mut self, id: TimerId) -> bool {
        if self.grace != Some(id) {
            return false;
        }
        self.grace = None;
        self.remaining = self.initial;
        self.running = false;
        true
    }

    /// Stop everything and rearm to the full time
    pub fn reset(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_interval(effects);
        self.cancel_grace(effects);
        self.remaining = self.initial;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(initial: u32) -> (Countdown, TimerId) {
        let mut timer = Countdown::new(initial, 10);
        let mut effects = Vec::new();
        assert!(timer.start(&mut effects));
        let id = timer.live_interval().unwrap();
        assert_eq!(
            effects,
            vec![Effect::StartInterval { id, period_secs: 1 }]
        );
        (timer, id)
    }

    #[test]
    fn test_counts_down_to_expiry() {
        let (mut timer, id) = started(3);
        let mut effects = Vec::new();
        assert_eq!(timer.tick(id, &mut effects), TickOutcome::Ticked { remaining: 2 });
        assert_eq!(timer.tick(id, &mut effects), TickOutcome::Ticked { remaining: 1 });
        assert!(effects.is_empty());
        assert_eq!(timer.tick(id, &mut effects), TickOutcome::Expired);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        let grace = timer.live_grace().unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::CancelInterval(id),
                Effect::ScheduleGrace { id: grace, delay_secs: 10 },
            ]
        );
        // Interval is gone: further ticks do nothing
        assert_eq!(timer.tick(id, &mut effects), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (mut timer, id) = started(5);
        let mut effects = Vec::new();
        assert!(!timer.start(&mut effects));
        assert!(effects.is_empty());
        assert_eq!(timer.live_interval(), Some(id));
    }

    #[test]
    fn test_grace_rearms() {
        let (mut timer, id) = started(1);
        let mut effects = Vec::new();
        timer.tick(id, &mut effects);
        let grace = timer.live_grace().unwrap();
        assert!(timer.grace_elapsed(grace));
        assert_eq!(timer.remaining(), 1);
        assert!(!timer.in_grace());
        assert!(!timer.grace_elapsed(grace));
    }

    #[test]
    fn test_start_during_grace_cancels_it() {
        let (mut timer, id) = started(1);
        let mut effects = Vec::new();
        timer.tick(id, &mut effects);
        let grace = timer.live_grace().unwrap();
        effects.clear();

        assert!(timer.start(&mut effects));
        let new_id = timer.live_interval().unwrap();
        assert_ne!(new_id, id);
        assert_eq!(timer.remaining(), 1);
        assert_eq!(
            effects,
            vec![
                Effect::CancelGrace(grace),
                Effect::StartInterval { id: new_id, period_secs: 1 },
            ]
        );
        assert!(!timer.grace_elapsed(grace));
    }

    #[test]
    fn test_reset_cancels_everything() {
        let (mut timer, id) = started(10);
        let mut effects = Vec::new();
        timer.tick(id, &mut effects);
        timer.reset(&mut effects);
        assert_eq!(effects, vec![Effect::CancelInterval(id)]);
        assert_eq!(timer.remaining(), 10);
        assert!(!timer.is_running());
        assert_eq!(timer.tick(id, &mut effects), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), 10);

        // Reset with nothing live emits nothing
        effects.clear();
        timer.reset(&mut effects);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let (mut timer, first) = started(2);
        let mut effects = Vec::new();
        timer.reset(&mut effects);
        timer.start(&mut effects);
        let second = timer.live_interval().unwrap();
        assert_ne!(first, second);
    }
}
