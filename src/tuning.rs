//! Data-driven game balance
//!
//! Every gameplay number lives here with a default matching `consts`.
//! Tunings load from JSON; missing fields keep their defaults and
//! out-of-range values are logged and corrected.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::bubble_types::{BubbleKind, BubbleTypeDef, default_bubble_types};
use crate::sim::powerup::{PowerUpDef, default_power_ups};

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round ===
    /// Countdown length (seconds)
    pub round_seconds: u32,

    // === Spawning ===
    pub initial_spawn_rate_ms: u64,
    pub min_spawn_rate_ms: u64,
    pub spawn_rate_step_ms: u64,
    pub min_bubble_size: u32,
    pub max_bubble_size: u32,
    pub base_lifetime_secs: f32,
    pub lifetime_decay_per_level: f32,
    pub min_lifetime_secs: f32,

    // === Combo / levels ===
    pub combo_per_level: u32,
    pub combo_window_ms: u64,

    // === Chain reactions ===
    pub chain_radius: f32,
    pub chain_combo_bonus: u32,

    // === Power-ups ===
    pub slow_motion_spawn_delay_ms: u64,
    pub slow_motion_lifetime_scale: f32,
    pub power_ups: Vec<PowerUpDef>,

    // === Bubble catalogue ===
    /// Ordered; order matters for weighted selection
    pub bubble_types: Vec<BubbleTypeDef>,
    /// Used when a draw falls past the last cumulative weight
    pub default_bubble: BubbleKind,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,

            initial_spawn_rate_ms: INITIAL_SPAWN_RATE_MS,
            min_spawn_rate_ms: MIN_SPAWN_RATE_MS,
            spawn_rate_step_ms: SPAWN_RATE_STEP_MS,
            min_bubble_size: MIN_BUBBLE_SIZE,
            max_bubble_size: MAX_BUBBLE_SIZE,
            base_lifetime_secs: BASE_LIFETIME_SECS,
            lifetime_decay_per_level: LIFETIME_DECAY_PER_LEVEL,
            min_lifetime_secs: MIN_LIFETIME_SECS,

            combo_per_level: COMBO_PER_LEVEL,
            combo_window_ms: COMBO_WINDOW_MS,

            chain_radius: CHAIN_RADIUS,
            chain_combo_bonus: CHAIN_COMBO_BONUS,

            slow_motion_spawn_delay_ms: SLOW_MOTION_SPAWN_DELAY_MS,
            slow_motion_lifetime_scale: SLOW_MOTION_LIFETIME_SCALE,
            power_ups: default_power_ups(),

            bubble_types: default_bubble_types(),
            default_bubble: BubbleKind::Normal,
        }
    }
}

/// Finite and strictly greater than zero (rejects NaN)
fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl Tuning {
    /// Parse a tuning from JSON and sanitize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace out-of-range values, logging each correction
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        if self.round_seconds == 0 {
            log::warn!("round_seconds must be positive, using {}", defaults.round_seconds);
            self.round_seconds = defaults.round_seconds;
        }
        if self.min_spawn_rate_ms == 0 {
            log::warn!(
                "min_spawn_rate_ms must be positive, using {}",
                defaults.min_spawn_rate_ms
            );
            self.min_spawn_rate_ms = defaults.min_spawn_rate_ms;
        }
        if self.initial_spawn_rate_ms < self.min_spawn_rate_ms {
            log::warn!(
                "initial_spawn_rate_ms {} below min_spawn_rate_ms {}, clamping",
                self.initial_spawn_rate_ms,
                self.min_spawn_rate_ms
            );
            self.initial_spawn_rate_ms = self.min_spawn_rate_ms;
        }
        if self.min_bubble_size > self.max_bubble_size {
            log::warn!(
                "Bubble size range {}..={} is inverted, swapping",
                self.min_bubble_size,
                self.max_bubble_size
            );
            std::mem::swap(&mut self.min_bubble_size, &mut self.max_bubble_size);
        }
        if !is_positive(self.min_lifetime_secs) {
            log::warn!(
                "min_lifetime_secs {} must be positive, using {}",
                self.min_lifetime_secs,
                defaults.min_lifetime_secs
            );
            self.min_lifetime_secs = defaults.min_lifetime_secs;
        }
        if !self.base_lifetime_secs.is_finite() || !self.lifetime_decay_per_level.is_finite() {
            log::warn!("Non-finite lifetime settings, using defaults");
            self.base_lifetime_secs = defaults.base_lifetime_secs;
            self.lifetime_decay_per_level = defaults.lifetime_decay_per_level;
        }
        if self.combo_per_level == 0 {
            log::warn!("combo_per_level must be positive, using {}", defaults.combo_per_level);
            self.combo_per_level = defaults.combo_per_level;
        }
        if self.combo_window_ms == 0 {
            log::warn!("combo_window_ms must be positive, using {}", defaults.combo_window_ms);
            self.combo_window_ms = defaults.combo_window_ms;
        }
        if !is_positive(self.chain_radius) {
            log::warn!(
                "chain_radius {} must be positive, using {}",
                self.chain_radius,
                defaults.chain_radius
            );
            self.chain_radius = defaults.chain_radius;
        }
        if !is_positive(self.slow_motion_lifetime_scale) {
            log::warn!(
                "slow_motion_lifetime_scale {} must be positive, using {}",
                self.slow_motion_lifetime_scale,
                defaults.slow_motion_lifetime_scale
            );
            self.slow_motion_lifetime_scale = defaults.slow_motion_lifetime_scale;
        }
        for def in &mut self.power_ups {
            if def.duration_ms == 0 {
                let fallback = default_power_ups()
                    .into_iter()
                    .find(|d| d.kind == def.kind)
                    .map(|d| d.duration_ms)
                    .unwrap_or(5000);
                log::warn!("Power-up {} has zero duration, using {fallback} ms", def.name);
                def.duration_ms = fallback;
            }
        }
        if self.bubble_types.is_empty() {
            log::warn!("Empty bubble type table, using stock catalogue");
            self.bubble_types = defaults.bubble_types;
        }

        self
    }

    /// Bubble lifetime at a level, floored so it never reaches zero
    pub fn lifetime_secs(&self, level: u32) -> f32 {
        (self.base_lifetime_secs - level as f32 * self.lifetime_decay_per_level)
            .max(self.min_lifetime_secs)
    }

    /// Spawn interval after one more level-up
    pub fn next_spawn_rate(&self, current_ms: u64) -> u64 {
        current_ms
            .saturating_sub(self.spawn_rate_step_ms)
            .max(self.min_spawn_rate_ms)
    }
}
