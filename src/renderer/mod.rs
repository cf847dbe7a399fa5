//! Renderer collaborator
//!
//! The engine never touches drawing primitives. Everything visual goes
//! through the `Renderer` trait using plain numeric positions, sizes and
//! times; the host decides how to draw, animate and lay out.

pub mod headless;

pub use headless::HeadlessRenderer;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Bubble, FinalStats};

/// RGB colour packed as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// CSS-style hex string (`#rrggbb`)
    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// Opaque handle to a host-side bubble visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Axis-aligned box in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Floating label styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelVariant {
    /// Score gains and chain callouts
    Combo,
    /// Power-up names
    PowerUp,
    /// Penalties from missed negative bubbles
    Penalty,
}

/// Everything the engine asks of the display layer.
///
/// All calls are fire-and-forget except `create_bubble_visual`,
/// `container_width` and `bubble_rect`. Defaults are no-ops so a host only
/// implements what it draws.
pub trait Renderer {
    /// Create the on-screen bubble; the handle is passed back on later calls
    fn create_bubble_visual(&mut self, bubble: &Bubble) -> VisualHandle;

    fn remove_bubble_visual(&mut self, _handle: VisualHandle) {}

    /// Width of the play area, in bubble position units
    fn container_width(&self) -> f32;

    /// Current laid-out box of a bubble, if the host tracks layout.
    /// `None` makes the engine use the bubble's spawn position.
    fn bubble_rect(&self, _handle: VisualHandle) -> Option<Rect> {
        None
    }

    /// Bubble lifetime changed; `remaining_secs` is the new time to expiry
    fn retime_bubble(&mut self, _handle: VisualHandle, _remaining_secs: f32) {}

    fn show_sparkle_burst(&mut self, _center: Vec2, _color: Color) {}

    fn show_floating_label(&mut self, _center: Vec2, _text: &str, _variant: LabelVariant) {}

    fn show_power_up_banner(&mut self, _text: &str) {}

    fn hide_power_up_banner(&mut self) {}

    fn show_tutorial(&mut self) {}

    fn hide_tutorial(&mut self) {}

    fn show_pause_overlay(&mut self) {}

    fn hide_pause_overlay(&mut self) {}

    fn show_game_over_screen(&mut self, _stats: &FinalStats) {}

    fn hide_game_over_screen(&mut self) {}

    fn update_score_display(&mut self, _score: i64) {}

    fn update_combo_display(&mut self, _combo: u32) {}

    fn update_level_display(&mut self, _level: u32) {}

    fn update_timer_display(&mut self, _seconds_left: u32) {}
}
