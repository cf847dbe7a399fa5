//! Bubble Pop - A timed bubble-popping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay engine (bubbles, scoring, combos, chains, power-ups)
//! - `renderer`: Renderer collaborator interface and a headless implementation
//! - `audio`: Audio collaborator interface
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use audio::Audio;
pub use renderer::{HeadlessRenderer, Renderer};
pub use sim::{FinalStats, Game, GamePhase};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Round length (seconds)
    pub const ROUND_SECONDS: u32 = 60;
    /// Countdown tick interval (ms)
    pub const CLOCK_TICK_MS: u64 = 1000;

    /// Spawn cadence at level 1 (ms between bubbles)
    pub const INITIAL_SPAWN_RATE_MS: u64 = 1000;
    /// Fastest allowed spawn cadence
    pub const MIN_SPAWN_RATE_MS: u64 = 300;
    /// Cadence reduction per level-up
    pub const SPAWN_RATE_STEP_MS: u64 = 50;

    /// Combo increments needed per level-up
    pub const COMBO_PER_LEVEL: u32 = 5;
    /// Combo decays to zero after this long without a scoring pop
    pub const COMBO_WINDOW_MS: u64 = 3000;
    /// Multiplier cap, in tenths (3.0x)
    pub const MAX_COMBO_MULTIPLIER_TENTHS: i64 = 30;

    /// Bomb blast radius (same units as bubble position/size)
    pub const CHAIN_RADIUS: f32 = 150.0;
    /// Combo bonus per chained bubble
    pub const CHAIN_COMBO_BONUS: u32 = 2;

    /// Bubble lifetime at level 0 (seconds)
    pub const BASE_LIFETIME_SECS: f32 = 8.0;
    /// Lifetime lost per level
    pub const LIFETIME_DECAY_PER_LEVEL: f32 = 0.3;
    /// Lifetime floor so high levels never produce instant expiry
    pub const MIN_LIFETIME_SECS: f32 = 2.0;

    /// Bubble diameter range (inclusive)
    pub const MIN_BUBBLE_SIZE: u32 = 80;
    pub const MAX_BUBBLE_SIZE: u32 = 140;

    /// Extra spawn delay while slow motion is active (ms)
    pub const SLOW_MOTION_SPAWN_DELAY_MS: u64 = 300;
    /// Lifetime stretch while slow motion is active
    pub const SLOW_MOTION_LIFETIME_SCALE: f32 = 2.0;
}
