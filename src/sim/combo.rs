//! Combo tracking and decay
//!
//! Combo counts consecutive scoring pops. It scales points by
//! `min(1 + 0.1 * combo, 3.0)` and falls back to zero after a quiet window.

use serde::{Deserialize, Serialize};

use super::game::Game;
use super::scheduler::{TimerEvent, TimerId};
use crate::audio::Audio;
use crate::consts::MAX_COMBO_MULTIPLIER_TENTHS;
use crate::renderer::Renderer;

/// Score multiplier for a combo count
pub fn combo_multiplier(combo: u32) -> f64 {
    multiplier_tenths(combo) as f64 / 10.0
}

/// Multiplier in tenths; integer so scoring never suffers float rounding
fn multiplier_tenths(combo: u32) -> i64 {
    (10 + combo as i64).min(MAX_COMBO_MULTIPLIER_TENTHS)
}

/// Current and best combo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    combo: u32,
    max_combo: u32,
    /// Pending decay timer
    #[serde(skip)]
    pub(crate) reset_timer: Option<TimerId>,
}

impl ComboTracker {
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn multiplier(&self) -> f64 {
        combo_multiplier(self.combo)
    }

    /// Scale points by the current multiplier, rounding toward negative infinity
    pub fn apply(&self, points: i64) -> i64 {
        (points * multiplier_tenths(self.combo)).div_euclid(10)
    }

    /// One more scoring pop; returns the new combo
    pub fn increment(&mut self) -> u32 {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo
    }

    /// Chain reaction bonus
    pub fn add_bonus(&mut self, bonus: u32) -> u32 {
        self.combo += bonus;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo
    }

    /// Drop to zero; returns true if the value changed
    pub fn reset(&mut self) -> bool {
        let changed = self.combo > 0;
        self.combo = 0;
        changed
    }
}

impl<R: Renderer, A: Audio> Game<R, A> {
    /// Cancel-and-restart the decay window
    pub(crate) fn arm_combo_reset(&mut self) {
        if let Some(timer) = self.session.combo.reset_timer.take() {
            self.scheduler.cancel(timer);
        }
        let timer = self
            .scheduler
            .schedule_once(self.tuning.combo_window_ms, TimerEvent::ComboReset);
        self.session.combo.reset_timer = Some(timer);
    }

    pub(crate) fn on_combo_timeout(&mut self) {
        self.session.combo.reset_timer = None;
        if !self.session.is_running() || self.session.is_paused() {
            return;
        }
        log::debug!("Combo window elapsed at {}", self.session.combo.combo());
        self.reset_combo();
    }

    pub(crate) fn reset_combo(&mut self) {
        if self.session.combo.reset() {
            self.renderer.update_combo_display(0);
        }
    }
}
