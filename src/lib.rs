//! Spin Selector - A name wheel with a countdown timer
//!
//! Core modules:
//! - `sim`: Deterministic selection core (random selector, countdown, state machine)
//! - `driver`: Headless effect executor with a simulated clock
//! - `settings`: Tunables (timer length, grace window, removal policy)
//! - `wheel`: SVG wheel geometry and label fitting
//! - `view`: Snapshot and timer display helpers for the presentation layer
//! - `audio`: Web Audio cues (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod driver;
pub mod settings;
pub mod sim;
pub mod view;
pub mod wheel;

pub use driver::HeadlessDriver;
pub use settings::{RemovalPolicy, Settings};
pub use sim::{Command, Cue, Effect, Phase, Selection, TimerId, step};
pub use view::Snapshot;

use glam::Vec2;

/// Widget configuration constants
pub mod consts {
    /// Countdown length in seconds
    pub const INITIAL_SECONDS: u32 = 60;
    /// Delay after expiry before the winner display closes and the timer rearms
    pub const GRACE_SECONDS: u32 = 10;
    /// Remaining seconds at which the countdown-imminent cue plays
    pub const COUNTDOWN_CUE_AT: u32 = 10;
    /// Countdown tick period
    pub const TICK_PERIOD_SECS: u32 = 1;

    /// Extra full turns added to every spin (inclusive range)
    pub const MIN_EXTRA_TURNS: u32 = 3;
    pub const MAX_EXTRA_TURNS: u32 = 5;

    /// Must match the CSS transition on the wheel rotor
    pub const SPIN_DURATION_MS: u32 = 4000;

    /// Wheel dimensions (SVG user units)
    pub const WHEEL_RADIUS: f32 = 180.0;
    pub const LABEL_RADIUS: f32 = WHEEL_RADIUS * 0.7;

    /// Tolerance for angle comparisons (degrees)
    pub const ANGLE_EPSILON: f64 = 1e-9;

    /// Roster shown on first load
    pub const DEFAULT_NAMES: &str = "Alice\nBob\nCharlie\nDiana\nEve\nFrank";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
