//! Selection state machine
//!
//! Every transition mutates the `Selection` and returns the effects the
//! platform layer must carry out. Requests that are not valid in the current
//! state are absorbed as no-ops.

use super::effect::{Cue, Effect, TimerId};
use super::roster::parse_names;
use super::selector::{SpinPlan, plan_spin, plan_spin_to};
use super::state::{Selection, SpinTicket};
use super::timer::TickOutcome;
use crate::settings::RemovalPolicy;

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace roster and pool with the names in this text
    UpdateNames(String),
    /// Spin to a random segment
    Spin,
    /// Spin to a specific segment
    SpinAt(usize),
    /// Wheel animation finished
    SpinFinished,
    /// Close the winner display
    DismissWinner,
    StartTimer,
    Tick(TimerId),
    GraceElapsed(TimerId),
    ResetTimer,
    /// Put the last winner back on the wheel
    ReaddWinner,
    /// Restore the full roster
    ResetWheel,
}

/// Apply one command
pub fn step(state: &mut Selection, command: Command) -> Vec<Effect> {
    match command {
        Command::UpdateNames(text) => state.update_names(&text),
        Command::Spin => state.request_spin(),
        Command::SpinAt(index) => state.request_spin_at(index),
        Command::SpinFinished => state.finish_spin(),
        Command::DismissWinner => state.dismiss_winner(),
        Command::StartTimer => state.start_timer(),
        Command::Tick(id) => state.tick(id),
        Command::GraceElapsed(id) => state.grace_elapsed(id),
        Command::ResetTimer => state.reset_timer(),
        Command::ReaddWinner => state.readd_winner(),
        Command::ResetWheel => state.reset_wheel(),
    }
}

impl Selection {
    /// Why a spin would be refused right now
    fn spin_blocker(&self) -> Option<&'static str> {
        if self.ticket.is_some() {
            Some("already spinning")
        } else if self.pool.is_empty() {
            Some("pool is empty")
        } else if self.pending_removal.is_some() {
            Some("winner removal pending")
        } else {
            None
        }
    }

    pub fn update_names(&mut self, text: &str) -> Vec<Effect> {
        self.roster = parse_names(text);
        self.pool = self.roster.clone();
        // The staged removal referred to the old pool
        self.pending_removal = None;
        self.winner = None;
        log::info!("Wheel updated with {} names", self.pool.len());
        Vec::new()
    }

    pub fn request_spin(&mut self) -> Vec<Effect> {
        if let Some(reason) = self.spin_blocker() {
            log::debug!("Spin ignored: {}", reason);
            return Vec::new();
        }
        let turns = self.settings.min_extra_turns..=self.settings.max_extra_turns;
        let plan = plan_spin(&mut self.rng, self.pool.len(), self.rotation, turns);
        self.begin_spin(plan)
    }

    /// Spin to a chosen segment (same rules as a random spin)
    pub fn request_spin_at(&mut self, index: usize) -> Vec<Effect> {
        if let Some(reason) = self.spin_blocker() {
            log::debug!("Spin ignored: {}", reason);
            return Vec::new();
        }
        if index >= self.pool.len() {
            log::debug!("Spin ignored: index {} outside pool of {}", index, self.pool.len());
            return Vec::new();
        }
        let extra_turns = self.settings.min_extra_turns;
        let plan = plan_spin_to(index, self.pool.len(), self.rotation, extra_turns);
        self.begin_spin(plan)
    }

    fn begin_spin(&mut self, plan: SpinPlan) -> Vec<Effect> {
        self.ticket = Some(SpinTicket {
            index: plan.index,
            snapshot: self.pool.clone(),
        });
        self.winner = None;
        self.rotation += plan.delta;
        log::info!(
            "Spinning to segment {} of {} (+{:.1} deg)",
            plan.index,
            self.pool.len(),
            plan.delta
        );
        vec![Effect::Play(Cue::SpinStart)]
    }

    /// The wheel stopped: declare the winner from the pinned snapshot
    pub fn finish_spin(&mut self) -> Vec<Effect> {
        let Some(ticket) = self.ticket.take() else {
            log::debug!("Spin end ignored: not spinning");
            return Vec::new();
        };
        match ticket.name() {
            Some(name) if self.pool.iter().any(|n| n == name) => {
                log::info!("Winner: {}", name);
                self.winner = Some(name.to_owned());
                self.last_winner = Some(name.to_owned());
                self.pending_removal = Some(name.to_owned());
            }
            // Names were replaced mid-spin: show the result, nothing to remove
            Some(name) => {
                log::info!("Winner: {} (no longer on the wheel)", name);
                self.winner = Some(name.to_owned());
            }
            None => log::warn!(
                "Spin ticket index {} outside snapshot of {}",
                ticket.index,
                ticket.snapshot.len()
            ),
        }
        Vec::new()
    }

    pub fn dismiss_winner(&mut self) -> Vec<Effect> {
        self.winner = None;
        Vec::new()
    }

    pub fn start_timer(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.timer.start(&mut effects) {
            log::info!("Timer started at {}s", self.timer.remaining());
        } else {
            log::debug!("Timer already running");
        }
        effects
    }

    pub fn tick(&mut self, id: TimerId) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.timer.tick(id, &mut effects) {
            TickOutcome::Ignored => log::debug!("Stale tick {:?} ignored", id),
            TickOutcome::Ticked { remaining } => {
                if remaining == self.settings.countdown_cue_at {
                    effects.push(Effect::Play(Cue::CountdownImminent));
                }
            }
            TickOutcome::Expired => {
                log::info!("Timer expired");
                effects.push(Effect::Play(Cue::Completion));
                if self.settings.removal_policy == RemovalPolicy::OnExpiry {
                    self.commit_pending_removal();
                }
            }
        }
        effects
    }

    pub fn grace_elapsed(&mut self, id: TimerId) -> Vec<Effect> {
        if !self.timer.grace_elapsed(id) {
            log::debug!("Stale grace action {:?} ignored", id);
            return Vec::new();
        }
        if self.settings.removal_policy == RemovalPolicy::OnGraceClose {
            self.commit_pending_removal();
        }
        self.winner = None;
        log::info!("Grace window closed, timer rearmed");
        Vec::new()
    }

    /// Stop the timer and commit the staged removal
    pub fn reset_timer(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.timer.reset(&mut effects);
        self.commit_pending_removal();
        self.winner = None;
        log::info!("Timer reset");
        effects
    }

    /// Stop the timer and keep the last winner on the wheel
    pub fn readd_winner(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.timer.reset(&mut effects);
        self.pending_removal = None;
        if let Some(name) = self.readd_candidate().map(str::to_owned) {
            log::info!("Re-added {} to the wheel", name);
            self.pool.push(name);
            self.last_winner = None;
        }
        self.winner = None;
        effects
    }

    pub fn reset_wheel(&mut self) -> Vec<Effect> {
        self.pool = self.roster.clone();
        self.last_winner = None;
        self.winner = None;
        self.pending_removal = None;
        self.ticket = None;
        log::info!("Wheel reset to {} names", self.pool.len());
        Vec::new()
    }
}
