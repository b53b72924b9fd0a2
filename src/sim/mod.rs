//! Deterministic selection core
//!
//! All selection and timer logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only through tick/grace commands
//! - Side effects are returned as data, never performed
//! - No rendering or platform dependencies

pub mod effect;
pub mod machine;
pub mod roster;
pub mod selector;
pub mod state;
pub mod timer;

pub use effect::{Cue, Effect, TimerId};
pub use machine::{Command, step};
pub use roster::parse_names;
pub use selector::{SpinPlan, pick_index, plan_spin, plan_spin_to, segment_under_pointer};
pub use state::{Phase, Selection, SpinTicket};
pub use timer::{Countdown, TickOutcome};
