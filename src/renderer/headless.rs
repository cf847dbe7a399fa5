//! Headless renderer
//!
//! Draws nothing; logs what a real display would show. Used by the demo
//! host and handy when driving the engine from a server or a bot.

use glam::Vec2;

use super::{Color, LabelVariant, Renderer, VisualHandle};
use crate::sim::{Bubble, FinalStats};

/// Renderer that only logs
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    width: f32,
    next_handle: u64,
    /// Last values pushed to the HUD
    pub score: i64,
    pub combo: u32,
    pub level: u32,
    pub seconds_left: u32,
    pub visible_bubbles: usize,
}

impl HeadlessRenderer {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            next_handle: 1,
            score: 0,
            combo: 0,
            level: 1,
            seconds_left: 0,
            visible_bubbles: 0,
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(800.0)
    }
}

impl Renderer for HeadlessRenderer {
    fn create_bubble_visual(&mut self, bubble: &Bubble) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.visible_bubbles += 1;
        log::trace!(
            "bubble {} ({}) at x={} size={} lifetime={:.1}s",
            bubble.id.0,
            bubble.kind.as_str(),
            bubble.pos.x,
            bubble.size,
            bubble.lifetime_secs
        );
        handle
    }

    fn remove_bubble_visual(&mut self, _handle: VisualHandle) {
        self.visible_bubbles = self.visible_bubbles.saturating_sub(1);
    }

    fn container_width(&self) -> f32 {
        self.width
    }

    fn show_sparkle_burst(&mut self, center: Vec2, color: Color) {
        log::trace!("sparkles {} at ({:.0}, {:.0})", color.to_hex(), center.x, center.y);
    }

    fn show_floating_label(&mut self, _center: Vec2, text: &str, variant: LabelVariant) {
        log::debug!("label [{variant:?}] {text}");
    }

    fn show_power_up_banner(&mut self, text: &str) {
        log::info!("banner: {text}");
    }

    fn show_game_over_screen(&mut self, stats: &FinalStats) {
        log::info!(
            "GAME OVER - score {} | best combo {}x | final wave {}",
            stats.score,
            stats.max_combo,
            stats.level
        );
    }

    fn update_score_display(&mut self, score: i64) {
        self.score = score;
    }

    fn update_combo_display(&mut self, combo: u32) {
        self.combo = combo;
    }

    fn update_level_display(&mut self, level: u32) {
        self.level = level;
    }

    fn update_timer_display(&mut self, seconds_left: u32) {
        self.seconds_left = seconds_left;
    }
}
