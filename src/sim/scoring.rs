//! Pop handling
//!
//! `pop` is the single entry point for scoring a bubble, used both for
//! player input and for chain reactions. The bubble leaves the active set
//! before anything else happens, which makes a second pop of the same id
//! (including one reached recursively through a chain) a no-op.

use super::bubble_types::PopRole;
use super::combo::ComboTracker;
use super::game::Game;
use super::state::{BubbleId, BubbleState};
use crate::audio::Audio;
use crate::renderer::{LabelVariant, Renderer};

/// Points for a pop before any session state changes
pub fn pop_points(base_points: i64, points_multiplier: i64, combo: &ComboTracker) -> i64 {
    combo.apply(base_points * points_multiplier)
}

impl<R: Renderer, A: Audio> Game<R, A> {
    /// Pop a bubble. Returns false (and changes nothing) when the round is
    /// not running, is paused, or the bubble is already resolved.
    pub(crate) fn pop(&mut self, id: BubbleId) -> bool {
        if !self.session.is_running() || self.session.is_paused() {
            log::debug!("Pop of {} ignored in {:?}", id.0, self.session.phase);
            return false;
        }
        let Some(index) = self.bubbles.iter().position(|b| b.id == id) else {
            log::debug!("Pop of resolved or unknown bubble {} ignored", id.0);
            return false;
        };

        // Resolve first; everything below may recurse back into `pop`
        let mut bubble = self.bubbles.remove(index);
        bubble.state = BubbleState::Popped;
        if let Some(timer) = bubble.expiry.take() {
            self.scheduler.cancel(timer);
        }
        let center = self.bubble_center(&bubble);

        let def = self.table.get(bubble.kind);
        let (role, base_points, color) = (def.role(), def.points, def.color);

        self.audio.play_pop();
        self.renderer.show_sparkle_burst(center, color);
        if let Some(handle) = bubble.visual {
            self.renderer.remove_bubble_visual(handle);
        }

        let points = pop_points(
            base_points,
            self.session.modifiers.points_multiplier,
            &self.session.combo,
        );
        self.session.score += points;
        self.renderer.update_score_display(self.session.score);

        match role {
            PopRole::Bomb => {
                self.explode(center);
            }
            PopRole::PowerUp => self.activate_power_up(center),
            PopRole::Hazard => self.reset_combo(),
            PopRole::Scoring => {
                let combo = self.session.combo.increment();
                self.renderer.update_combo_display(combo);
                self.renderer
                    .show_floating_label(center, &format!("+{points}"), LabelVariant::Combo);

                if combo % self.tuning.combo_per_level == 0 {
                    self.level_up();
                }
                self.arm_combo_reset();
            }
        }
        true
    }

    /// Next difficulty tier: faster spawning, shorter lifetimes
    fn level_up(&mut self) {
        self.session.level += 1;
        self.session.spawn_rate_ms = self.tuning.next_spawn_rate(self.session.spawn_rate_ms);
        self.renderer.update_level_display(self.session.level);
        self.restart_spawner();
        log::info!(
            "Level {} (spawn every {} ms)",
            self.session.level,
            self.session.spawn_rate_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bubble_types::{BubbleKind, default_bubble_types};
    use crate::sim::test_support::{Call, TestGame, playing_game, playing_game_with};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn pop_new(game: &mut TestGame, kind: BubbleKind) -> bool {
        let id = game.place_bubble(kind, Vec2::ZERO, 100.0);
        game.on_bubble_popped(id)
    }

    #[test]
    fn test_pop_points() {
        let mut combo = ComboTracker::default();
        assert_eq!(pop_points(10, 1, &combo), 10);
        assert_eq!(pop_points(10, 2, &combo), 20);
        combo.add_bonus(25);
        assert_eq!(pop_points(50, 1, &combo), 150);
        assert_eq!(pop_points(-30, 2, &combo), -180);
    }

    #[test]
    fn test_scoring_pop_builds_combo() {
        let mut game = playing_game();
        for expected in 1..=4u32 {
            assert!(pop_new(&mut game, BubbleKind::Normal));
            assert_eq!(game.session().combo.combo(), expected);
            assert_eq!(game.session().combo.max_combo(), expected);
        }
        // 10 + 11 + 12 + 13
        assert_eq!(game.session().score, 46);
        assert_eq!(game.audio.pops, 4);
        assert!(
            game.renderer()
                .calls
                .contains(&Call::Label("+13".into(), LabelVariant::Combo))
        );
    }

    #[test]
    fn test_pop_is_idempotent() {
        let mut game = playing_game();
        let id = game.place_bubble(BubbleKind::Triple, Vec2::ZERO, 100.0);
        assert!(game.on_bubble_popped(id));
        assert!(!game.on_bubble_popped(id));
        assert_eq!(game.session().score, 50);
        assert_eq!(game.session().combo.combo(), 1);
        assert_eq!(game.audio.pops, 1);
    }

    #[test]
    fn test_unknown_bubble_ignored() {
        let mut game = playing_game();
        assert!(!game.on_bubble_popped(BubbleId(9999)));
        assert_eq!(game.session().score, 0);
    }

    #[test]
    fn test_level_up_every_five() {
        let mut game = playing_game();
        for _ in 0..4 {
            pop_new(&mut game, BubbleKind::Normal);
        }
        assert_eq!(game.session().level, 1);
        pop_new(&mut game, BubbleKind::Normal);
        assert_eq!(game.session().level, 2);
        assert_eq!(game.session().spawn_rate_ms, 950);
        assert!(game.renderer().calls.contains(&Call::Level(2)));

        for _ in 0..5 {
            pop_new(&mut game, BubbleKind::Normal);
        }
        assert_eq!(game.session().level, 3);
        assert_eq!(game.session().spawn_rate_ms, 900);
    }

    #[test]
    fn test_spawn_rate_floor() {
        let mut game = playing_game();
        for _ in 0..(5 * 20) {
            pop_new(&mut game, BubbleKind::Normal);
        }
        assert_eq!(game.session().level, 21);
        assert_eq!(game.session().spawn_rate_ms, 300);
    }

    #[test]
    fn test_level_up_reschedules_spawner() {
        let tuning = Tuning {
            combo_window_ms: 60_000,
            ..Tuning::default()
        };
        let mut game = playing_game_with(tuning);
        game.advance(600);
        for _ in 0..5 {
            pop_new(&mut game, BubbleKind::Normal);
        }
        let before = game.bubbles().len();

        // Old cadence would fire at 1000; new one fires 950 after the level-up
        game.advance(400);
        assert_eq!(game.bubbles().len(), before);
        game.advance(549);
        assert_eq!(game.bubbles().len(), before);
        game.advance(1);
        assert_eq!(game.bubbles().len(), before + 1);
        game.advance(950);
        assert_eq!(game.bubbles().len(), before + 2);
    }

    #[test]
    fn test_combo_decays_after_window() {
        let mut game = playing_game();
        pop_new(&mut game, BubbleKind::Normal);
        game.advance(2_000);
        pop_new(&mut game, BubbleKind::Double);
        assert_eq!(game.session().combo.combo(), 2);

        // Window restarted at 2000
        game.advance(2_999);
        assert_eq!(game.session().combo.combo(), 2);
        game.advance(1);
        assert_eq!(game.session().combo.combo(), 0);
        assert_eq!(game.session().combo.max_combo(), 2);
        assert!(game.renderer().calls.contains(&Call::Combo(0)));
    }

    #[test]
    fn test_bomb_pop_does_not_build_combo() {
        let mut game = playing_game();
        pop_new(&mut game, BubbleKind::Normal);
        pop_new(&mut game, BubbleKind::Bomb);
        assert_eq!(game.session().combo.combo(), 1);
        // -30 * 1.1 = -33
        assert_eq!(game.session().score, 10 - 33);
    }

    #[test]
    fn test_hazard_resets_combo() {
        let mut types = default_bubble_types();
        types[1].negative = true;
        types[1].points = -15;
        let mut game = playing_game_with(Tuning {
            bubble_types: types,
            ..Tuning::default()
        });

        pop_new(&mut game, BubbleKind::Normal);
        pop_new(&mut game, BubbleKind::Normal);
        assert_eq!(game.session().combo.combo(), 2);
        pop_new(&mut game, BubbleKind::Double);
        assert_eq!(game.session().combo.combo(), 0);
        // 10 + 11 + floor(-15 * 1.2)
        assert_eq!(game.session().score, 10 + 11 - 18);
    }

    #[test]
    fn test_power_up_pop_scores_without_combo() {
        let mut game = playing_game();
        pop_new(&mut game, BubbleKind::PowerUp);
        assert_eq!(game.session().score, 100);
        assert_eq!(game.session().combo.combo(), 0);
        assert!(game.session().active_power_up.is_some());
    }
}
