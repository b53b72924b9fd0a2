//! Selection state and core types
//!
//! Everything the presentation layer reads lives here. Mutation happens in
//! `machine`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::roster::parse_names;
use super::timer::Countdown;
use crate::settings::Settings;

/// Where the selector is in its spin/timer cycle.
///
/// Derived from the data on demand rather than stored, so it can never
/// disagree with the pool, winner and timer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// Wheel animation running
    Spinning,
    /// Winner shown, timer not started
    WinnerDeclared,
    /// Winner display dismissed, removal still pending
    TimerArmed,
    /// Countdown ticking
    TimerRunning,
    /// Countdown hit zero, waiting for the grace action
    TimerExpiredGrace,
}

/// A spin in flight: the chosen index and the pool it indexes into
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    pub index: usize,
    /// Pool as it was when the spin started
    pub snapshot: Vec<String>,
}

impl SpinTicket {
    /// Name the wheel will land on
    pub fn name(&self) -> Option<&str> {
        self.snapshot.get(self.index).map(String::as_str)
    }
}

/// Complete selector state
#[derive(Debug, Clone)]
pub struct Selection {
    pub(crate) settings: Settings,
    /// Names from the last update; "reset wheel" restores the pool to this
    pub(crate) roster: Vec<String>,
    /// Names currently on the wheel
    pub(crate) pool: Vec<String>,
    /// Cumulative wheel rotation in degrees (only ever grows)
    pub(crate) rotation: f64,
    pub(crate) ticket: Option<SpinTicket>,
    /// Winner currently on display
    pub(crate) winner: Option<String>,
    /// Most recent winner, kept after removal so it can be re-added
    pub(crate) last_winner: Option<String>,
    /// Winner staged for removal from the pool
    pub(crate) pending_removal: Option<String>,
    pub(crate) timer: Countdown,
    pub(crate) rng: Pcg32,
}

impl Selection {
    /// Create a selector with an empty pool
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.validated();
        let timer = Countdown::new(settings.initial_seconds, settings.grace_seconds);
        Self {
            settings,
            roster: Vec::new(),
            pool: Vec::new(),
            rotation: 0.0,
            ticket: None,
            winner: None,
            last_winner: None,
            pending_removal: None,
            timer,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create a selector with the pool filled from newline-delimited text
    pub fn with_names(settings: Settings, seed: u64, text: &str) -> Self {
        let mut selection = Self::new(settings, seed);
        selection.roster = parse_names(text);
        selection.pool = selection.roster.clone();
        selection
    }

    pub fn phase(&self) -> Phase {
        if self.ticket.is_some() {
            Phase::Spinning
        } else if self.timer.is_running() {
            Phase::TimerRunning
        } else if self.timer.in_grace() {
            Phase::TimerExpiredGrace
        } else if self.winner.is_some() {
            Phase::WinnerDeclared
        } else if self.pending_removal.is_some() {
            Phase::TimerArmed
        } else {
            Phase::Idle
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.ticket.is_some()
    }

    pub fn ticket(&self) -> Option<&SpinTicket> {
        self.ticket.as_ref()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.last_winner.as_deref()
    }

    pub fn pending_removal(&self) -> Option<&str> {
        self.pending_removal.as_deref()
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// A spin request would be accepted
    pub fn can_spin(&self) -> bool {
        !self.pool.is_empty() && self.ticket.is_none() && self.pending_removal.is_none()
    }

    /// The last winner is off the wheel and can be put back
    pub fn readd_candidate(&self) -> Option<&str> {
        self.last_winner
            .as_deref()
            .filter(|name| !self.pool.iter().any(|p| p == name))
    }

    /// Remove the first occurrence of `name` from the pool
    pub(crate) fn remove_from_pool(&mut self, name: &str) -> bool {
        match self.pool.iter().position(|p| p == name) {
            Some(i) => {
                self.pool.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove the staged winner, if any
    pub(crate) fn commit_pending_removal(&mut self) {
        if let Some(name) = self.pending_removal.take() {
            if self.remove_from_pool(&name) {
                log::info!("Removed {} from the wheel", name);
            } else {
                log::debug!("Pending winner {} already off the wheel", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_from_text() {
        let s = Selection::with_names(Settings::default(), 1, "Alice\n\n Bob \n");
        assert_eq!(s.pool(), names(&["Alice", "Bob"]).as_slice());
        assert_eq!(s.roster(), s.pool());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.remaining_seconds(), 60);
        assert!(s.can_spin());
    }

    #[test]
    fn test_empty_pool_cannot_spin() {
        let s = Selection::new(Settings::default(), 1);
        assert!(!s.can_spin());
    }

    #[test]
    fn test_remove_first_occurrence_only() {
        let mut s = Selection::with_names(Settings::default(), 1, "Bob\nAlice\nBob");
        assert!(s.remove_from_pool("Bob"));
        assert_eq!(s.pool(), names(&["Alice", "Bob"]).as_slice());
        assert!(!s.remove_from_pool("Zed"));
    }

    #[test]
    fn test_readd_candidate_only_when_absent() {
        let mut s = Selection::with_names(Settings::default(), 1, "Alice\nBob");
        s.last_winner = Some("Bob".into());
        assert_eq!(s.readd_candidate(), None);
        s.remove_from_pool("Bob");
        assert_eq!(s.readd_candidate(), Some("Bob"));
    }

    #[test]
    fn test_ticket_name() {
        let ticket = SpinTicket {
            index: 1,
            snapshot: names(&["A", "B"]),
        };
        assert_eq!(ticket.name(), Some("B"));
    }
}
