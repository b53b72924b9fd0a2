//! Side effects requested by state transitions
//!
//! The core never touches timers or audio directly. Each transition returns
//! a list of effects for the platform layer to carry out.

use serde::{Deserialize, Serialize};

/// Handle for a scheduled tick interval or grace action.
///
/// Handles are never reused within a session, so a callback carrying a
/// handle that is no longer live can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Wheel starts spinning
    SpinStart,
    /// Countdown nearly done
    CountdownImminent,
    /// Countdown reached zero
    Completion,
}

/// Work the platform layer must perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Play an audio cue (fire and forget)
    Play(Cue),
    /// Start a repeating interval that sends `Command::Tick(id)`
    StartInterval { id: TimerId, period_secs: u32 },
    /// Stop the interval with this handle
    CancelInterval(TimerId),
    /// Schedule a one-shot `Command::GraceElapsed(id)`
    ScheduleGrace { id: TimerId, delay_secs: u32 },
    /// Drop the pending grace action with this handle
    CancelGrace(TimerId),
}
