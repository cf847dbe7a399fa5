//! Power-ups - time-limited global modifiers.
//!
//! Popping a power-up bubble activates one power-up picked uniformly at
//! random. Only one is active at a time: a new activation force-reverts the
//! current one first. Each activation gets a unique id, and the revert timer
//! only acts if that id is still the active one.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::game::Game;
use super::scheduler::TimerEvent;
use super::state::{ActivePowerUp, Modifiers};
use crate::audio::Audio;
use crate::renderer::{LabelVariant, Renderer};
use crate::tuning::Tuning;

/// Available power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    SlowMotion,
    DoublePoints,
    Shield,
}

impl PowerUpKind {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "SLOW MOTION",
            PowerUpKind::DoublePoints => "2X POINTS",
            PowerUpKind::Shield => "SHIELD",
        }
    }

    /// Get the description.
    pub fn description(&self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "Bubbles rise slower and spawn less often",
            PowerUpKind::DoublePoints => "Every pop scores double",
            PowerUpKind::Shield => "Missed bombs cost nothing",
        }
    }

    /// Whether the effect changes the spawner cadence
    pub fn affects_spawn_rate(&self) -> bool {
        matches!(self, PowerUpKind::SlowMotion)
    }

    pub fn apply(&self, modifiers: &mut Modifiers, tuning: &Tuning) {
        match self {
            PowerUpKind::SlowMotion => {
                modifiers.spawn_delay_ms += tuning.slow_motion_spawn_delay_ms;
                modifiers.lifetime_scale *= tuning.slow_motion_lifetime_scale;
            }
            PowerUpKind::DoublePoints => modifiers.points_multiplier *= 2,
            PowerUpKind::Shield => modifiers.shield = true,
        }
    }

    pub fn revert(&self, modifiers: &mut Modifiers, tuning: &Tuning) {
        match self {
            PowerUpKind::SlowMotion => {
                modifiers.spawn_delay_ms = modifiers
                    .spawn_delay_ms
                    .saturating_sub(tuning.slow_motion_spawn_delay_ms);
                modifiers.lifetime_scale /= tuning.slow_motion_lifetime_scale;
            }
            PowerUpKind::DoublePoints => {
                modifiers.points_multiplier = (modifiers.points_multiplier / 2).max(1)
            }
            PowerUpKind::Shield => modifiers.shield = false,
        }
    }
}

/// A power-up entry in the tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpDef {
    pub kind: PowerUpKind,
    /// Banner text
    pub name: String,
    pub duration_ms: u64,
}

impl PowerUpDef {
    pub fn new(kind: PowerUpKind, duration_ms: u64) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            duration_ms,
        }
    }
}

/// The stock power-up set
pub fn default_power_ups() -> Vec<PowerUpDef> {
    vec![
        PowerUpDef::new(PowerUpKind::SlowMotion, 5000),
        PowerUpDef::new(PowerUpKind::DoublePoints, 8000),
        PowerUpDef::new(PowerUpKind::Shield, 6000),
    ]
}

impl<R: Renderer, A: Audio> Game<R, A> {
    /// Pick and activate a power-up. Runs to completion before returning.
    pub(crate) fn activate_power_up(&mut self, at: Vec2) {
        if self.tuning.power_ups.is_empty() {
            log::warn!("Power-up popped but no power-ups are configured");
            return;
        }

        if self.session.active_power_up.is_some() {
            self.revert_active_power_up();
        }

        let index = self.rng.random_range(0..self.tuning.power_ups.len());
        let def = self.tuning.power_ups[index].clone();
        self.next_activation += 1;
        let activation = self.next_activation;

        def.kind.apply(&mut self.session.modifiers, &self.tuning);
        if def.kind == PowerUpKind::SlowMotion {
            self.stretch_bubble_lifetimes(self.tuning.slow_motion_lifetime_scale);
        }
        if def.kind.affects_spawn_rate() {
            self.restart_spawner();
        }

        let revert_timer = self.scheduler.schedule_once(
            def.duration_ms,
            TimerEvent::RevertPowerUp { activation },
        );

        log::info!("Power-up {} for {} ms", def.name, def.duration_ms);
        self.renderer
            .show_power_up_banner(&format!("✦ {} ✦", def.name));
        self.renderer
            .show_floating_label(at, &def.name, LabelVariant::PowerUp);

        self.session.active_power_up = Some(ActivePowerUp {
            def,
            activation,
            revert_timer: Some(revert_timer),
        });
    }

    /// Undo the active power-up immediately, cancelling its timer
    pub(crate) fn revert_active_power_up(&mut self) {
        let Some(active) = self.session.active_power_up.take() else {
            return;
        };
        if let Some(timer) = active.revert_timer {
            self.scheduler.cancel(timer);
        }

        active
            .def
            .kind
            .revert(&mut self.session.modifiers, &self.tuning);
        if active.def.kind.affects_spawn_rate() && self.session.is_running() {
            self.restart_spawner();
        }

        log::info!("Power-up {} ended", active.def.name);
        self.renderer.hide_power_up_banner();
    }

    /// Revert timer fired
    pub(crate) fn on_power_up_expired(&mut self, activation: u64) {
        let current = self
            .session
            .active_power_up
            .as_ref()
            .map(|active| active.activation);
        if current != Some(activation) {
            log::debug!("Stale power-up revert {activation} ignored");
            return;
        }
        if let Some(active) = self.session.active_power_up.as_mut() {
            // Already fired; nothing to cancel
            active.revert_timer = None;
        }
        self.revert_active_power_up();
    }

    /// Scale the remaining lifetime of every bubble on screen
    fn stretch_bubble_lifetimes(&mut self, scale: f32) {
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_active()) {
            let Some(timer) = bubble.expiry else { continue };
            let Some(remaining) = self.scheduler.remaining(timer) else {
                continue;
            };
            let stretched = (remaining as f32 * scale).round() as u64;
            self.scheduler.reschedule(timer, stretched);
            bubble.lifetime_secs += (stretched as f32 - remaining as f32) / 1000.0;
            if let Some(handle) = bubble.visual {
                self.renderer
                    .retime_bubble(handle, stretched as f32 / 1000.0);
            }
        }
    }
}
