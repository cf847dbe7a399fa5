//! Deterministic gameplay engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (advanced by the host)
//! - Seeded RNG only
//! - Stable iteration order (by bubble ID)
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod bubble_types;
pub mod chain;
pub mod combo;
pub mod game;
pub mod powerup;
pub mod scheduler;
pub mod scoring;
pub mod spawner;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use bubble_types::{BubbleKind, BubbleTypeDef, BubbleTypeTable, PopRole, default_bubble_types};
pub use chain::blast_targets;
pub use combo::{ComboTracker, combo_multiplier};
pub use game::Game;
pub use powerup::{PowerUpDef, PowerUpKind, default_power_ups};
pub use scheduler::{Scheduler, TimerEvent, TimerId};
pub use scoring::pop_points;
pub use state::{
    ActivePowerUp, Bubble, BubbleId, BubbleState, FinalStats, GamePhase, GameSession, Modifiers,
};
