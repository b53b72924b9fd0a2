//! Read-only view of the selector for the presentation layer

use serde::Serialize;

use crate::sim::{Phase, Selection};

/// Countdown colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerBand {
    Calm,
    Warning,
    Critical,
}

impl TimerBand {
    pub fn for_remaining(remaining: u32) -> Self {
        if remaining <= 10 {
            TimerBand::Critical
        } else if remaining <= 30 {
            TimerBand::Warning
        } else {
            TimerBand::Calm
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TimerBand::Calm => "band-calm",
            TimerBand::Warning => "band-warning",
            TimerBand::Critical => "band-critical",
        }
    }
}

/// Format seconds as `mm:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Share of the countdown left, 0-100
pub fn progress_percent(remaining: u32, initial: u32) -> f32 {
    if initial == 0 {
        return 0.0;
    }
    (remaining as f32 / initial as f32 * 100.0).clamp(0.0, 100.0)
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub pool: Vec<String>,
    /// Cumulative rotation in degrees
    pub rotation: f64,
    pub spinning: bool,
    pub phase: Phase,
    pub winner: Option<String>,
    /// Name offered for "add back" (last winner, only when off the wheel)
    pub readd_candidate: Option<String>,
    pub remaining_seconds: u32,
    pub initial_seconds: u32,
    pub timer_running: bool,
    pub can_spin: bool,
    pub clock: String,
    pub band: TimerBand,
}

impl Snapshot {
    pub fn of(selection: &Selection) -> Self {
        let remaining = selection.remaining_seconds();
        Self {
            pool: selection.pool().to_vec(),
            rotation: selection.rotation(),
            spinning: selection.is_spinning(),
            phase: selection.phase(),
            winner: selection.winner().map(str::to_owned),
            readd_candidate: selection.readd_candidate().map(str::to_owned),
            remaining_seconds: remaining,
            initial_seconds: selection.timer().initial(),
            timer_running: selection.timer_running(),
            can_spin: selection.can_spin(),
            clock: format_clock(remaining),
            band: TimerBand::for_remaining(remaining),
        }
    }

    /// Start is accepted whenever the countdown is stopped (an expired one rearms)
    pub fn can_start_timer(&self) -> bool {
        !self.timer_running
    }

    pub fn progress_percent(&self) -> f32 {
        progress_percent(self.remaining_seconds, self.initial_seconds)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Command, step};

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(605), "10:05");
    }

    #[test]
    fn test_bands() {
        assert_eq!(TimerBand::for_remaining(60), TimerBand::Calm);
        assert_eq!(TimerBand::for_remaining(31), TimerBand::Calm);
        assert_eq!(TimerBand::for_remaining(30), TimerBand::Warning);
        assert_eq!(TimerBand::for_remaining(11), TimerBand::Warning);
        assert_eq!(TimerBand::for_remaining(10), TimerBand::Critical);
        assert_eq!(TimerBand::for_remaining(0), TimerBand::Critical);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress_percent(30, 60), 50.0);
        assert_eq!(progress_percent(0, 60), 0.0);
        assert_eq!(progress_percent(5, 0), 0.0);
    }

    #[test]
    fn test_snapshot_tracks_selection() {
        let mut s = Selection::with_names(Settings::default(), 3, "Alice\nBob\nCharlie");
        let snap = Snapshot::of(&s);
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.can_spin);
        assert_eq!(snap.clock, "01:00");
        assert_eq!(snap.progress_percent(), 100.0);

        step(&mut s, Command::SpinAt(1));
        step(&mut s, Command::SpinFinished);
        let snap = Snapshot::of(&s);
        assert_eq!(snap.winner.as_deref(), Some("Bob"));
        assert_eq!(snap.readd_candidate, None);
        assert!(!snap.can_spin);

        let json = snap.to_json().unwrap();
        assert!(json.contains(r#""winner":"Bob""#));
        assert!(json.contains(r#""phase":"WinnerDeclared""#));
        assert!(json.contains(r#""band":"calm""#));
    }
}
