//! Audio collaborator
//!
//! The engine only ever asks for one sound: the pop. `()` is the silent
//! sink. On the web, `WebAudio` synthesizes it procedurally with the Web
//! Audio API - no external files needed!

/// Sound output used by the engine
pub trait Audio {
    /// A bubble was popped
    fn play_pop(&mut self);
}

/// Silent
impl Audio for () {
    fn play_pop(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::Audio;

    /// Pop sweep: start/end frequency (Hz) and duration (s)
    const POP_FREQ_START: f32 = 800.0;
    const POP_FREQ_END: f32 = 400.0;
    const POP_DURATION: f64 = 0.1;
    const POP_GAIN: f32 = 0.3;

    /// Web Audio pop synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        /// Short downward sine sweep with an exponential fade
        fn synth_pop(ctx: &AudioContext, vol: f32) -> Option<()> {
            let now = ctx.current_time();
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Sine);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            osc.frequency().set_value_at_time(POP_FREQ_START, now).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(POP_FREQ_END, now + POP_DURATION)
                .ok()?;
            gain.gain().set_value_at_time(POP_GAIN * vol, now).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, now + POP_DURATION)
                .ok()?;

            osc.start_with_when(now).ok()?;
            osc.stop_with_when(now + POP_DURATION).ok()?;
            Some(())
        }
    }

    impl Audio for WebAudio {
        fn play_pop(&mut self) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            if Self::synth_pop(ctx, vol).is_none() {
                log::warn!("Pop sound failed");
            }
        }
    }
}
