//! Audio cues using the Web Audio API
//!
//! Procedurally generated - no sound files to load. Playback is fire and
//! forget: any failure is logged and the selector carries on.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::Cue;

/// Audio manager for the selector
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended && ctx.resume().is_err() {
            log::warn!("AudioContext resume rejected");
        }
    }

    /// Play a cue
    pub fn play(&self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        let played = match cue {
            Cue::SpinStart => self.play_spin_start(ctx, self.volume),
            Cue::CountdownImminent => self.play_countdown(ctx, self.volume),
            Cue::Completion => self.play_bell(ctx, self.volume),
        };
        if played.is_none() {
            log::error!("Failed to play {:?} cue", cue);
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Spin start - rising whoosh with a ratchet
    fn play_spin_start(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let t = ctx.current_time();

        let (osc, gain) = self.create_osc(ctx, 180.0, OscillatorType::Triangle)?;
        gain.gain().set_value_at_time(vol * 0.3, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok()?;
        osc.frequency().set_value_at_time(180.0, t).ok()?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(720.0, t + 0.3)
            .ok()?;
        osc.start().ok()?;
        osc.stop_with_when(t + 0.4).ok()?;

        // Ratchet clicks
        for i in 0..6 {
            let at = t + i as f64 * 0.05;
            let (osc, gain) = self.create_osc(ctx, 1400.0, OscillatorType::Square)?;
            gain.gain().set_value_at_time(vol * 0.08, at).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, at + 0.02)
                .ok()?;
            osc.start_with_when(at).ok()?;
            osc.stop_with_when(at + 0.03).ok()?;
        }
        Some(())
    }

    /// Countdown imminent - three short pips
    fn play_countdown(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        for i in 0..3 {
            let at = ctx.current_time() + i as f64 * 0.25;
            let (osc, gain) = self.create_osc(ctx, 880.0, OscillatorType::Sine)?;
            gain.gain().set_value_at_time(vol * 0.3, at).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, at + 0.12)
                .ok()?;
            osc.start_with_when(at).ok()?;
            osc.stop_with_when(at + 0.15).ok()?;
        }
        Some(())
    }

    /// Completion - bell with a few inharmonic partials
    fn play_bell(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let t = ctx.current_time();
        for (freq, level) in [(660.0, 0.35), (1320.0, 0.18), (1782.0, 0.12), (2640.0, 0.06)] {
            let (osc, gain) = self.create_osc(ctx, freq, OscillatorType::Sine)?;
            gain.gain().set_value_at_time(vol * level, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 1.6)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 1.7).ok()?;
        }
        Some(())
    }
}
