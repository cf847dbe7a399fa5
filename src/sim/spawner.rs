//! Bubble spawning and expiry
//!
//! The spawner runs on a repeating timer at the session's effective spawn
//! interval. Each bubble gets a one-shot expiry timer for its lifetime.

use glam::Vec2;
use rand::Rng;

use super::bubble_types::BubbleKind;
use super::game::Game;
use super::scheduler::TimerEvent;
use super::state::{Bubble, BubbleId, BubbleState};
use crate::audio::Audio;
use crate::renderer::{LabelVariant, Renderer};

impl<R: Renderer, A: Audio> Game<R, A> {
    /// (Re)arm the spawner at the current effective interval.
    /// Cancelling first means a cadence change never double-fires.
    pub(crate) fn restart_spawner(&mut self) {
        if let Some(timer) = self.timers.spawn.take() {
            self.scheduler.cancel(timer);
        }
        let interval = self.session.effective_spawn_interval_ms();
        self.timers.spawn = Some(self.scheduler.schedule_every(interval, TimerEvent::Spawn));
        log::debug!("Spawner every {interval} ms");
    }

    pub(crate) fn on_spawn_tick(&mut self) {
        if !self.session.is_running() || self.session.is_paused() {
            return;
        }
        self.spawn_one();
    }

    /// Spawn a bubble of a weighted-random type at a random size and column
    pub(crate) fn spawn_one(&mut self) -> BubbleId {
        let kind = self.table.pick(&mut self.rng).kind;
        let size = self
            .rng
            .random_range(self.tuning.min_bubble_size..=self.tuning.max_bubble_size)
            as f32;

        let span = self.renderer.container_width() - size;
        let x = if span >= 1.0 {
            self.rng.random_range(0..=span.floor() as u32) as f32
        } else {
            log::debug!("Container narrower than bubble ({size}), placing at 0");
            0.0
        };

        self.place_bubble(kind, Vec2::new(x, 0.0), size)
    }

    /// Create a bubble at an explicit position, register its visual and expiry
    pub(crate) fn place_bubble(&mut self, kind: BubbleKind, pos: Vec2, size: f32) -> BubbleId {
        let id = BubbleId(self.next_bubble_id);
        self.next_bubble_id += 1;

        let lifetime_secs =
            self.tuning.lifetime_secs(self.session.level) * self.session.modifiers.lifetime_scale;
        let lifetime_ms = ((lifetime_secs * 1000.0).round() as u64).max(1);

        let mut bubble = Bubble {
            id,
            kind,
            spawn_time_ms: self.scheduler.now(),
            pos,
            size,
            lifetime_secs,
            state: BubbleState::Rising,
            visual: None,
            expiry: None,
        };
        bubble.visual = Some(self.renderer.create_bubble_visual(&bubble));
        bubble.expiry = Some(
            self.scheduler
                .schedule_once(lifetime_ms, TimerEvent::Expire(id)),
        );
        self.bubbles.push(bubble);
        id
    }

    /// Lifetime elapsed without a pop
    pub(crate) fn on_expiry(&mut self, id: BubbleId) {
        if !self.session.is_running() || self.session.is_paused() {
            return;
        }
        let Some(index) = self.bubbles.iter().position(|b| b.id == id) else {
            log::debug!("Expiry for resolved bubble {} ignored", id.0);
            return;
        };

        let mut bubble = self.bubbles.remove(index);
        bubble.state = BubbleState::Expired;
        bubble.expiry = None;

        let (negative, points) = {
            let def = self.table.get(bubble.kind);
            (def.negative, def.points)
        };
        if negative {
            if self.session.modifiers.shield {
                log::debug!("Shield absorbed missed {}", bubble.kind.as_str());
            } else {
                self.session.score += points;
                self.renderer.update_score_display(self.session.score);
                let center = self.bubble_center(&bubble);
                self.renderer.show_floating_label(
                    center,
                    &points.to_string(),
                    LabelVariant::Penalty,
                );
            }
        }
        self.reset_combo();

        if let Some(handle) = bubble.visual {
            self.renderer.remove_bubble_visual(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::bubble_types::BubbleKind;
    use crate::sim::state::BubbleState;
    use crate::sim::test_support::{Call, playing_game, playing_game_with};
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_spawned_bubbles_within_bounds() {
        let mut game = playing_game();
        let width = game.renderer().width;
        game.advance(20_000);
        assert!(!game.bubbles().is_empty());
        for bubble in game.bubbles() {
            assert!((80.0..=140.0).contains(&bubble.size));
            assert_eq!(bubble.size.fract(), 0.0);
            assert!(bubble.pos.x >= 0.0);
            assert!(bubble.pos.x + bubble.size <= width);
            assert_eq!(bubble.state, BubbleState::Rising);
        }
    }

    #[test]
    fn test_narrow_container_places_at_zero() {
        let mut game = playing_game();
        game.renderer_mut().width = 50.0;
        let id = game.spawn_one();
        assert_eq!(game.bubble(id).map(|b| b.pos.x), Some(0.0));
    }

    #[test]
    fn test_lifetime_follows_level() {
        let mut game = playing_game();
        let id = game.place_bubble(BubbleKind::Normal, Vec2::ZERO, 100.0);
        assert!((game.bubble(id).map(|b| b.lifetime_secs).unwrap_or(0.0) - 7.7).abs() < 1e-4);

        game.session.level = 40;
        let id = game.place_bubble(BubbleKind::Normal, Vec2::ZERO, 100.0);
        assert_eq!(game.bubble(id).map(|b| b.lifetime_secs), Some(2.0));
    }

    #[test]
    fn test_expiry_resets_combo_without_scoring() {
        let tuning = Tuning {
            combo_window_ms: 60_000,
            ..Tuning::default()
        };
        let mut game = playing_game_with(tuning);
        let a = game.place_bubble(BubbleKind::Normal, Vec2::ZERO, 100.0);
        let b = game.place_bubble(BubbleKind::Double, Vec2::new(500.0, 0.0), 100.0);
        game.on_bubble_popped(a);
        assert_eq!(game.session().combo.combo(), 1);
        let score = game.session().score;

        // Double bubble expires at 7700
        game.advance(7_699);
        assert!(game.bubble(b).is_some());
        assert_eq!(game.session().combo.combo(), 1);
        game.advance(1);
        assert!(game.bubble(b).is_none());
        assert_eq!(game.session().combo.combo(), 0);
        assert_eq!(game.session().score, score);
    }

    #[test]
    fn test_negative_expiry_applies_penalty() {
        let tuning = Tuning {
            initial_spawn_rate_ms: 100_000,
            min_spawn_rate_ms: 100_000,
            round_seconds: 600,
            ..Tuning::default()
        };
        let mut game = playing_game_with(tuning);
        let bomb = game.place_bubble(BubbleKind::Bomb, Vec2::ZERO, 100.0);
        game.advance(7_700);
        assert!(game.bubble(bomb).is_none());
        assert_eq!(game.session().score, -30);
        assert!(
            game.renderer()
                .calls
                .contains(&Call::Label("-30".into(), crate::renderer::LabelVariant::Penalty))
        );
    }

    #[test]
    fn test_popped_bubble_never_expires() {
        let mut game = playing_game();
        let bomb = game.place_bubble(BubbleKind::Bomb, Vec2::ZERO, 100.0);
        game.on_bubble_popped(bomb);
        let score = game.session().score;
        game.on_expiry(bomb);
        assert_eq!(game.session().score, score);
    }
}
