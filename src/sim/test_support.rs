//! Test doubles for the renderer and audio collaborators

use std::collections::HashMap;

use glam::Vec2;

use super::game::Game;
use super::state::{Bubble, BubbleId, FinalStats};
use crate::audio::Audio;
use crate::renderer::{Color, LabelVariant, Rect, Renderer, VisualHandle};
use crate::tuning::Tuning;

pub type TestGame = Game<RecordingRenderer, CountingAudio>;

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(BubbleId),
    Remove(VisualHandle),
    Retime(VisualHandle, f32),
    Sparkle(Color),
    Label(String, LabelVariant),
    ShowBanner(String),
    HideBanner,
    ShowTutorial,
    HideTutorial,
    ShowPause,
    HidePause,
    GameOver(i64, u32, u32),
    HideGameOver,
    Score(i64),
    Combo(u32),
    Level(u32),
    Timer(u32),
}

/// Renderer that records every call
#[derive(Debug)]
pub struct RecordingRenderer {
    pub width: f32,
    pub calls: Vec<Call>,
    /// Host-reported layout, by handle
    pub rects: HashMap<VisualHandle, Rect>,
    next_handle: u64,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            width: 800.0,
            calls: Vec::new(),
            rects: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl Renderer for RecordingRenderer {
    fn create_bubble_visual(&mut self, bubble: &Bubble) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(Call::Create(bubble.id));
        handle
    }

    fn remove_bubble_visual(&mut self, handle: VisualHandle) {
        self.calls.push(Call::Remove(handle));
    }

    fn container_width(&self) -> f32 {
        self.width
    }

    fn bubble_rect(&self, handle: VisualHandle) -> Option<Rect> {
        self.rects.get(&handle).copied()
    }

    fn retime_bubble(&mut self, handle: VisualHandle, remaining_secs: f32) {
        self.calls.push(Call::Retime(handle, remaining_secs));
    }

    fn show_sparkle_burst(&mut self, _center: Vec2, color: Color) {
        self.calls.push(Call::Sparkle(color));
    }

    fn show_floating_label(&mut self, _center: Vec2, text: &str, variant: LabelVariant) {
        self.calls.push(Call::Label(text.to_string(), variant));
    }

    fn show_power_up_banner(&mut self, text: &str) {
        self.calls.push(Call::ShowBanner(text.to_string()));
    }

    fn hide_power_up_banner(&mut self) {
        self.calls.push(Call::HideBanner);
    }

    fn show_tutorial(&mut self) {
        self.calls.push(Call::ShowTutorial);
    }

    fn hide_tutorial(&mut self) {
        self.calls.push(Call::HideTutorial);
    }

    fn show_pause_overlay(&mut self) {
        self.calls.push(Call::ShowPause);
    }

    fn hide_pause_overlay(&mut self) {
        self.calls.push(Call::HidePause);
    }

    fn show_game_over_screen(&mut self, stats: &FinalStats) {
        self.calls
            .push(Call::GameOver(stats.score, stats.max_combo, stats.level));
    }

    fn hide_game_over_screen(&mut self) {
        self.calls.push(Call::HideGameOver);
    }

    fn update_score_display(&mut self, score: i64) {
        self.calls.push(Call::Score(score));
    }

    fn update_combo_display(&mut self, combo: u32) {
        self.calls.push(Call::Combo(combo));
    }

    fn update_level_display(&mut self, level: u32) {
        self.calls.push(Call::Level(level));
    }

    fn update_timer_display(&mut self, seconds_left: u32) {
        self.calls.push(Call::Timer(seconds_left));
    }
}

/// Audio sink that counts pops
#[derive(Debug, Default)]
pub struct CountingAudio {
    pub pops: u32,
}

impl Audio for CountingAudio {
    fn play_pop(&mut self) {
        self.pops += 1;
    }
}

/// Game in the tutorial phase
pub fn game_with(tuning: Tuning) -> TestGame {
    Game::new(tuning, 12345, RecordingRenderer::default(), CountingAudio::default())
}

/// Game with a round in progress
pub fn playing_game_with(tuning: Tuning) -> TestGame {
    let mut game = game_with(tuning);
    game.start_session();
    game
}

pub fn playing_game() -> TestGame {
    playing_game_with(Tuning::default())
}
