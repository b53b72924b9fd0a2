//! Headless effect executor
//!
//! Runs the selection core against a simulated clock with one-second
//! resolution, standing in for the browser's `setInterval`/`setTimeout`.
//! Used by the native binary and by scenario tests.

use crate::sim::{Command, Cue, Effect, Selection, TimerId, step};

#[derive(Debug, Clone, Copy)]
struct ScheduledInterval {
    id: TimerId,
    period: u64,
    next_due: u64,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledGrace {
    id: TimerId,
    due: u64,
}

/// Drives a `Selection`, executing its effects against simulated time
pub struct HeadlessDriver {
    selection: Selection,
    /// Simulated seconds since start
    now: u64,
    interval: Option<ScheduledInterval>,
    grace: Option<ScheduledGrace>,
    /// Cues played so far, in order
    played: Vec<Cue>,
}

impl HeadlessDriver {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            now: 0,
            interval: None,
            grace: None,
            played: Vec::new(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn played(&self) -> &[Cue] {
        &self.played
    }

    /// Number of live scheduled callbacks (interval + grace)
    pub fn live_callbacks(&self) -> usize {
        self.interval.is_some() as usize + self.grace.is_some() as usize
    }

    /// Send a command and execute the resulting effects
    pub fn send(&mut self, command: Command) {
        let effects = step(&mut self.selection, command);
        self.execute(effects);
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Play(cue) => {
                    log::info!("[t={}s] cue {:?}", self.now, cue);
                    self.played.push(cue);
                }
                Effect::StartInterval { id, period_secs } => {
                    let period = u64::from(period_secs.max(1));
                    if let Some(old) = self.interval.replace(ScheduledInterval {
                        id,
                        period,
                        next_due: self.now + period,
                    }) {
                        log::warn!("Interval {:?} replaced without cancel", old.id);
                    }
                }
                Effect::CancelInterval(id) => {
                    if self.interval.is_some_and(|i| i.id == id) {
                        self.interval = None;
                    }
                }
                Effect::ScheduleGrace { id, delay_secs } => {
                    if let Some(old) = self.grace.replace(ScheduledGrace {
                        id,
                        due: self.now + u64::from(delay_secs),
                    }) {
                        log::warn!("Grace {:?} replaced without cancel", old.id);
                    }
                }
                Effect::CancelGrace(id) => {
                    if self.grace.is_some_and(|g| g.id == id) {
                        self.grace = None;
                    }
                }
            }
        }
    }

    /// Advance simulated time by `secs`, firing due callbacks
    pub fn advance(&mut self, secs: u64) {
        for _ in 0..secs {
            self.now += 1;
            self.fire_due();
        }
    }

    fn fire_due(&mut self) {
        if let Some(interval) = self.interval.filter(|i| i.next_due <= self.now) {
            self.interval = Some(ScheduledInterval {
                next_due: interval.next_due + interval.period,
                ..interval
            });
            self.send(Command::Tick(interval.id));
        }
        if let Some(grace) = self.grace.filter(|g| g.due <= self.now) {
            self.grace = None;
            self.send(Command::GraceElapsed(grace.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RemovalPolicy, Settings};
    use crate::sim::Phase;

    fn driver(policy: RemovalPolicy) -> HeadlessDriver {
        let settings = Settings {
            removal_policy: policy,
            ..Default::default()
        };
        HeadlessDriver::new(Selection::with_names(settings, 99, "Alice\nBob\nCharlie"))
    }

    fn completions(d: &HeadlessDriver) -> usize {
        d.played().iter().filter(|c| **c == Cue::Completion).count()
    }

    #[test]
    fn test_bob_scenario() {
        let mut d = driver(RemovalPolicy::OnExpiry);
        d.send(Command::SpinAt(1));
        d.send(Command::SpinFinished);
        assert_eq!(d.selection().winner(), Some("Bob"));

        d.send(Command::StartTimer);
        d.advance(59);
        assert_eq!(d.selection().remaining_seconds(), 1);
        assert_eq!(completions(&d), 0);
        d.advance(1);
        assert_eq!(d.selection().remaining_seconds(), 0);
        assert_eq!(completions(&d), 1);
        assert_eq!(d.selection().phase(), Phase::TimerExpiredGrace);
        assert_eq!(d.selection().pool().len(), 2);
        assert_eq!(
            d.played(),
            &[Cue::SpinStart, Cue::CountdownImminent, Cue::Completion]
        );
    }

    #[test]
    fn test_double_start_ticks_once_per_second() {
        let mut d = driver(RemovalPolicy::OnExpiry);
        d.send(Command::StartTimer);
        d.send(Command::StartTimer);
        d.advance(30);
        assert_eq!(d.selection().remaining_seconds(), 30);
        d.advance(30);
        assert_eq!(d.selection().remaining_seconds(), 0);
        assert_eq!(completions(&d), 1);

        // Rest of 2x the countdown: grace fires at 70s and rearms, nothing more
        d.advance(60);
        assert_eq!(completions(&d), 1);
        assert_eq!(d.selection().remaining_seconds(), 60);
        assert!(!d.selection().timer_running());
        assert_eq!(d.live_callbacks(), 0);
    }

    #[test]
    fn test_grace_closes_display_after_delay() {
        let mut d = driver(RemovalPolicy::OnExpiry);
        d.send(Command::SpinAt(0));
        d.send(Command::SpinFinished);
        d.send(Command::StartTimer);
        d.advance(60);
        assert_eq!(d.selection().winner(), Some("Alice"));
        d.advance(9);
        assert_eq!(d.selection().winner(), Some("Alice"));
        assert_eq!(d.selection().remaining_seconds(), 0);
        d.advance(1);
        assert_eq!(d.selection().winner(), None);
        assert_eq!(d.selection().remaining_seconds(), 60);
        assert_eq!(d.selection().phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_before_grace_deadline() {
        let mut d = driver(RemovalPolicy::OnGraceClose);
        d.send(Command::SpinAt(2));
        d.send(Command::SpinFinished);
        d.send(Command::StartTimer);
        d.advance(63);
        d.send(Command::ResetTimer);
        assert_eq!(d.live_callbacks(), 0);
        let pool = d.selection().pool().to_vec();

        // Past the original grace deadline: nothing happens
        d.advance(20);
        assert_eq!(d.selection().pool(), pool.as_slice());
        assert_eq!(d.selection().remaining_seconds(), 60);
        assert_eq!(d.selection().phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_at_any_point_restores_full_time() {
        for elapsed in [0, 1, 30, 59, 60, 65] {
            let mut d = driver(RemovalPolicy::OnExpiry);
            d.send(Command::StartTimer);
            d.advance(elapsed);
            d.send(Command::ResetTimer);
            assert_eq!(d.selection().remaining_seconds(), 60, "after {}s", elapsed);
            assert_eq!(d.live_callbacks(), 0);
            d.advance(120);
            assert_eq!(d.selection().remaining_seconds(), 60);
        }
    }

    #[test]
    fn test_restart_after_expiry() {
        let mut d = driver(RemovalPolicy::OnExpiry);
        d.send(Command::StartTimer);
        d.advance(62);
        d.send(Command::StartTimer);
        assert_eq!(d.selection().remaining_seconds(), 60);
        assert_eq!(d.live_callbacks(), 1);
        d.advance(60);
        assert_eq!(completions(&d), 2);
    }
}
