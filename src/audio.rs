//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started - push off
    Start,
    /// Skied through a gate
    GatePass,
    /// Hit an obstacle
    Crash,
    /// Crossed a trail's finish line
    Finish,
    /// New best score
    NewBest,
    /// Button press
    Tap,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RunStarted { .. } => Some(SoundEffect::Start),
            GameEvent::GatePassed { .. } => Some(SoundEffect::GatePass),
            GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
            GameEvent::Finished { .. } => Some(SoundEffect::Finish),
            GameEvent::ReturnedToMenu => Some(SoundEffect::Tap),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Effective volume (0 mutes)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.sweep(ctx, vol * 0.3, OscillatorType::Triangle, 180.0, 520.0, 0.25),
            SoundEffect::GatePass => {
                self.arpeggio(ctx, vol * 0.25, OscillatorType::Sine, &[880.0, 1320.0], 0.07, 0.15)
            }
            SoundEffect::Crash => {
                self.sweep(ctx, vol * 0.5, OscillatorType::Sawtooth, 220.0, 40.0, 0.45);
                self.sweep(ctx, vol * 0.4, OscillatorType::Sine, 120.0, 30.0, 0.3);
            }
            SoundEffect::Finish => self.arpeggio(
                ctx,
                vol * 0.3,
                OscillatorType::Triangle,
                &[400.0, 500.0, 600.0, 800.0],
                0.1,
                0.4,
            ),
            SoundEffect::NewBest => self.arpeggio(
                ctx,
                vol * 0.25,
                OscillatorType::Triangle,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                0.25,
            ),
            SoundEffect::Tap => self.sweep(ctx, vol * 0.2, OscillatorType::Sine, 600.0, 400.0, 0.06),
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

    /// Single tone gliding from `from` to `to` Hz while decaying
    fn sweep(
        &self,
        ctx: &AudioContext,
        level: f32,
        osc_type: OscillatorType,
        from: f32,
        to: f32,
        duration: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    /// Notes played one after another, `step` seconds apart
    fn arpeggio(
        &self,
        ctx: &AudioContext,
        level: f32,
        osc_type: OscillatorType,
        notes: &[f32],
        step: f64,
        decay: f64,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(level, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + decay)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + decay + 0.1).ok();
            }
        }
    }
}
