//! Bomb chain reactions
//!
//! A bomb pops every active bubble whose center lies strictly within the
//! blast radius of the bomb's center. Targets are snapshotted before any
//! of them is popped; a bubble popped by a nested bomb is gone from the
//! active set by the time the outer loop reaches it, so it is neither
//! scored twice nor counted twice.

use glam::Vec2;

use super::game::Game;
use super::state::{Bubble, BubbleId};
use crate::audio::Audio;
use crate::renderer::{LabelVariant, Renderer};

/// Ids of active bubbles within `radius` of `center`, in id order
pub fn blast_targets<'a>(
    bubbles: impl IntoIterator<Item = &'a Bubble>,
    center: Vec2,
    radius: f32,
    center_of: impl Fn(&Bubble) -> Vec2,
) -> Vec<BubbleId> {
    bubbles
        .into_iter()
        .filter(|b| b.is_active())
        .filter(|b| center_of(b).distance(center) < radius)
        .map(|b| b.id)
        .collect()
}

impl<R: Renderer, A: Audio> Game<R, A> {
    /// Where a bubble currently is: the host's layout if it reports one,
    /// otherwise the spawn position
    pub(crate) fn bubble_center(&self, bubble: &Bubble) -> Vec2 {
        bubble
            .visual
            .and_then(|handle| self.renderer.bubble_rect(handle))
            .unwrap_or_else(|| bubble.rect())
            .center()
    }

    /// Resolve a bomb popped at `center`. The bomb itself has already left
    /// the active set. Returns the number of bubbles chain-popped.
    pub(crate) fn explode(&mut self, center: Vec2) -> u32 {
        let targets = blast_targets(
            &self.bubbles,
            center,
            self.tuning.chain_radius,
            |b| self.bubble_center(b),
        );

        let mut chain_count = 0;
        for id in targets {
            if self.pop(id) {
                chain_count += 1;
            }
        }

        if chain_count > 0 {
            let combo = self
                .session
                .combo
                .add_bonus(chain_count * self.tuning.chain_combo_bonus);
            self.renderer.update_combo_display(combo);
            self.renderer.show_floating_label(
                center,
                &format!("Chain x{chain_count}!"),
                LabelVariant::Combo,
            );
            log::debug!("Chain x{chain_count}, combo now {combo}");
        }
        chain_count
    }
}
