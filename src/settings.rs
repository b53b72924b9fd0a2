//! Widget settings
//!
//! Not persisted: read once at startup from the page (wasm) or the
//! environment (native), then fixed for the session.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// When a declared winner leaves the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove as soon as the countdown reaches zero; the grace window only
    /// controls when the winner display closes
    #[default]
    OnExpiry,
    /// Keep the winner in the pool until the grace window closes
    OnGraceClose,
}

impl RemovalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::OnExpiry => "on_expiry",
            RemovalPolicy::OnGraceClose => "on_grace_close",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "on_expiry" | "expiry" | "immediate" => Some(RemovalPolicy::OnExpiry),
            "on_grace_close" | "grace" | "deferred" => Some(RemovalPolicy::OnGraceClose),
            _ => None,
        }
    }
}

/// Selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timer ===
    /// Countdown length in seconds
    pub initial_seconds: u32,
    /// Grace window after expiry, in seconds
    pub grace_seconds: u32,
    /// Remaining seconds at which the countdown-imminent cue plays (0 = never)
    pub countdown_cue_at: u32,
    /// When the winner is removed from the pool
    pub removal_policy: RemovalPolicy,

    // === Wheel ===
    /// Fewest extra full turns per spin
    pub min_extra_turns: u32,
    /// Most extra full turns per spin
    pub max_extra_turns: u32,
    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_seconds: INITIAL_SECONDS,
            grace_seconds: GRACE_SECONDS,
            countdown_cue_at: COUNTDOWN_CUE_AT,
            removal_policy: RemovalPolicy::default(),

            min_extra_turns: MIN_EXTRA_TURNS,
            max_extra_turns: MAX_EXTRA_TURNS,
            seed: None,

            master_volume: 0.8,
            muted: false,
        }
    }
}

/// Longest countdown the mm:ss display can show
const MAX_INITIAL_SECONDS: u32 = 99 * 60 + 59;

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::validated)
    }

    /// Clamp out-of-range values into something the selector can run with
    pub fn validated(mut self) -> Self {
        if self.initial_seconds == 0 || self.initial_seconds > MAX_INITIAL_SECONDS {
            log::warn!(
                "initial_seconds {} out of range, clamping",
                self.initial_seconds
            );
            self.initial_seconds = self.initial_seconds.clamp(1, MAX_INITIAL_SECONDS);
        }
        if self.countdown_cue_at >= self.initial_seconds {
            log::warn!(
                "countdown_cue_at {} not below initial_seconds {}, disabling cue",
                self.countdown_cue_at,
                self.initial_seconds
            );
            self.countdown_cue_at = 0;
        }
        // At least one extra turn keeps every spin visibly moving
        self.min_extra_turns = self.min_extra_turns.max(1);
        if self.max_extra_turns < self.min_extra_turns {
            log::warn!(
                "max_extra_turns {} below min_extra_turns {}, raising",
                self.max_extra_turns,
                self.min_extra_turns
            );
            self.max_extra_turns = self.min_extra_turns;
        }
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective audio volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Load settings from the `data-settings` attribute of `#app` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .and_then(|el| el.get_attribute("data-settings"));

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed data-settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Environment variable holding a JSON settings object (native only)
    #[cfg(not(target_arch = "wasm32"))]
    const ENV_KEY: &'static str = "SPIN_SELECTOR_SETTINGS";

    /// Load settings from `SPIN_SELECTOR_SETTINGS` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        if let Ok(json) = std::env::var(Self::ENV_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::ENV_KEY);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed {}: {}", Self::ENV_KEY, e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
