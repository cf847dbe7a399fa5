//! Session state and core entity types
//!
//! `GameSession` holds every value a round mutates. It is owned by `Game`
//! and rebuilt from `Tuning` on every (re)start.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble_types::BubbleKind;
use super::combo::ComboTracker;
use super::powerup::PowerUpDef;
use super::scheduler::TimerId;
use crate::renderer::{Rect, VisualHandle};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first round; tutorial on screen
    Tutorial,
    /// Active gameplay
    Playing,
    /// Round suspended
    Paused,
    /// Round over, stats frozen
    Ended,
}

/// Stable bubble identifier, unique for the lifetime of a `Game`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// Bubble lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    Rising,
    Popped,
    Expired,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub kind: BubbleKind,
    /// Virtual time of creation (ms)
    pub spawn_time_ms: u64,
    /// Top-left corner at spawn
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    pub lifetime_secs: f32,
    pub state: BubbleState,
    /// Host visual, once created
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
    /// Pending expiry timer
    #[serde(skip)]
    pub expiry: Option<TimerId>,
}

impl Bubble {
    /// Box at the spawn position
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn is_active(&self) -> bool {
        self.state == BubbleState::Rising
    }
}

/// Session-wide modifiers that power-ups toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Base-points multiplier (2x points)
    pub points_multiplier: i64,
    /// Added to the spawn interval (slow motion)
    pub spawn_delay_ms: u64,
    /// Applied to new bubble lifetimes (slow motion)
    pub lifetime_scale: f32,
    /// Missed negative bubbles cost nothing
    pub shield: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            points_multiplier: 1,
            spawn_delay_ms: 0,
            lifetime_scale: 1.0,
            shield: false,
        }
    }
}

/// The power-up currently in effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub def: PowerUpDef,
    /// Unique per activation; the revert timer carries the same value
    pub activation: u64,
    #[serde(skip)]
    pub revert_timer: Option<TimerId>,
}

/// Everything a round mutates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub score: i64,
    pub combo: ComboTracker,
    pub level: u32,
    /// Level-derived spawn interval, always within [min, initial]
    pub spawn_rate_ms: u64,
    pub time_left_sec: u32,
    pub modifiers: Modifiers,
    pub active_power_up: Option<ActivePowerUp>,
}

impl GameSession {
    /// Fresh session with the given phase
    pub fn new(tuning: &Tuning, phase: GamePhase) -> Self {
        Self {
            phase,
            score: 0,
            combo: ComboTracker::default(),
            level: 1,
            spawn_rate_ms: tuning.initial_spawn_rate_ms,
            time_left_sec: tuning.round_seconds,
            modifiers: Modifiers::default(),
            active_power_up: None,
        }
    }

    /// Round in progress (playing or paused)
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Interval the spawner actually runs at
    pub fn effective_spawn_interval_ms(&self) -> u64 {
        self.spawn_rate_ms + self.modifiers.spawn_delay_ms
    }

    pub fn final_stats(&self) -> FinalStats {
        FinalStats {
            score: self.score,
            max_combo: self.combo.max_combo(),
            level: self.level,
        }
    }
}

/// Summary shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStats {
    pub score: i64,
    pub max_combo: u32,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new(&Tuning::default(), GamePhase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.combo.combo(), 0);
        assert_eq!(session.combo.max_combo(), 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.spawn_rate_ms, 1000);
        assert_eq!(session.time_left_sec, 60);
        assert!(session.active_power_up.is_none());
        assert!(session.is_running());
        assert!(!session.is_paused());
    }

    #[test]
    fn test_effective_spawn_interval() {
        let mut session = GameSession::new(&Tuning::default(), GamePhase::Playing);
        session.spawn_rate_ms = 400;
        session.modifiers.spawn_delay_ms = 300;
        assert_eq!(session.effective_spawn_interval_ms(), 700);
    }

    #[test]
    fn test_phase_flags() {
        let mut session = GameSession::new(&Tuning::default(), GamePhase::Tutorial);
        assert!(!session.is_running());
        session.phase = GamePhase::Paused;
        assert!(session.is_running());
        assert!(session.is_paused());
        session.phase = GamePhase::Ended;
        assert!(!session.is_running());
    }
}
