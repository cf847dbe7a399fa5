//! Game state machine and event loop
//!
//! `Game` owns the session, the active bubbles and the scheduler. Hosts
//! drive it with `advance` (time) and `on_bubble_popped` (input); every
//! mutation runs to completion on the caller's thread, one callback at a
//! time. A multi-threaded host must keep the whole `Game` behind a single
//! owner (actor or mutex).
//!
//! Phases: `Tutorial -> Playing <-> Paused`, `Playing -> Ended`,
//! `Ended -> Playing` on restart.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bubble_types::BubbleTypeTable;
use super::scheduler::{Scheduler, TimerEvent, TimerId};
use super::state::{Bubble, BubbleId, FinalStats, GamePhase, GameSession};
use crate::audio::Audio;
use crate::consts::CLOCK_TICK_MS;
use crate::renderer::Renderer;
use crate::tuning::Tuning;

/// Repeating timers owned by a running round
#[derive(Debug, Default)]
pub(crate) struct RoundTimers {
    pub spawn: Option<TimerId>,
    pub clock: Option<TimerId>,
}

/// The gameplay engine
pub struct Game<R: Renderer, A: Audio = ()> {
    pub(crate) tuning: Tuning,
    pub(crate) table: BubbleTypeTable,
    pub(crate) session: GameSession,
    /// Active bubbles, sorted by id
    pub(crate) bubbles: Vec<Bubble>,
    pub(crate) scheduler: Scheduler,
    pub(crate) timers: RoundTimers,
    pub(crate) rng: Pcg32,
    pub(crate) next_bubble_id: u32,
    pub(crate) next_activation: u64,
    pub(crate) renderer: R,
    pub(crate) audio: A,
    seed: u64,
}

impl<R: Renderer, A: Audio> Game<R, A> {
    /// Create a game in the tutorial phase
    pub fn new(tuning: Tuning, seed: u64, renderer: R, audio: A) -> Self {
        let tuning = tuning.sanitized();
        let table = BubbleTypeTable::new(tuning.bubble_types.clone(), tuning.default_bubble);
        let session = GameSession::new(&tuning, GamePhase::Tutorial);

        let mut game = Self {
            tuning,
            table,
            session,
            bubbles: Vec::new(),
            scheduler: Scheduler::new(),
            timers: RoundTimers::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_bubble_id: 1,
            next_activation: 0,
            renderer,
            audio,
            seed,
        };
        game.renderer.show_tutorial();
        game
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Bubbles still on screen, oldest first
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn table(&self) -> &BubbleTypeTable {
        &self.table
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    /// Stats of the finished round, once ended
    pub fn final_stats(&self) -> Option<FinalStats> {
        (self.session.phase == GamePhase::Ended).then(|| self.session.final_stats())
    }

    /// Start a fresh round from any phase
    pub fn start_session(&mut self) {
        if self.session.phase == GamePhase::Tutorial {
            self.renderer.hide_tutorial();
        }

        // Stale timers must never touch the new session
        self.scheduler.clear();
        self.timers = RoundTimers::default();
        for bubble in self.bubbles.drain(..) {
            if let Some(handle) = bubble.visual {
                self.renderer.remove_bubble_visual(handle);
            }
        }

        self.session = GameSession::new(&self.tuning, GamePhase::Playing);

        self.renderer.hide_game_over_screen();
        self.renderer.hide_pause_overlay();
        self.renderer.hide_power_up_banner();
        self.renderer.update_score_display(self.session.score);
        self.renderer.update_timer_display(self.session.time_left_sec);
        self.renderer.update_combo_display(0);
        self.renderer.update_level_display(self.session.level);

        self.timers.clock = Some(
            self.scheduler
                .schedule_every(CLOCK_TICK_MS, TimerEvent::ClockTick),
        );
        self.restart_spawner();

        log::info!(
            "Round started ({} s, spawn every {} ms)",
            self.session.time_left_sec,
            self.session.spawn_rate_ms
        );
    }

    pub fn restart_session(&mut self) {
        self.start_session();
    }

    /// Flip between playing and paused. No-op outside a running round.
    pub fn toggle_pause(&mut self) -> bool {
        match self.session.phase {
            GamePhase::Playing => {
                self.session.phase = GamePhase::Paused;
                self.renderer.show_pause_overlay();
                log::info!("Paused with {} s left", self.session.time_left_sec);
                true
            }
            GamePhase::Paused => {
                self.session.phase = GamePhase::Playing;
                self.renderer.hide_pause_overlay();
                log::info!("Resumed");
                true
            }
            phase => {
                log::debug!("Pause toggle ignored in {phase:?}");
                false
            }
        }
    }

    /// User popped a bubble
    pub fn on_bubble_popped(&mut self, id: BubbleId) -> bool {
        self.pop(id)
    }

    /// Move virtual time forward, firing due timers in deadline order.
    /// Paused rounds do not advance: every schedule is suspended.
    pub fn advance(&mut self, dt_ms: u64) {
        if self.session.is_paused() {
            return;
        }
        let until = self.scheduler.now() + dt_ms;
        while let Some((_, event)) = self.scheduler.pop_due(until) {
            self.dispatch(event);
            if self.session.is_paused() {
                // Nothing in the engine pauses itself, but honour it if a callback did
                return;
            }
        }
        self.scheduler.advance_to(until);
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Spawn => self.on_spawn_tick(),
            TimerEvent::ClockTick => self.on_clock_tick(),
            TimerEvent::ComboReset => self.on_combo_timeout(),
            TimerEvent::Expire(id) => self.on_expiry(id),
            TimerEvent::RevertPowerUp { activation } => self.on_power_up_expired(activation),
        }
    }

    /// Countdown tick
    fn on_clock_tick(&mut self) {
        if !self.session.is_running() || self.session.is_paused() {
            return;
        }
        self.session.time_left_sec = self.session.time_left_sec.saturating_sub(1);
        self.renderer.update_timer_display(self.session.time_left_sec);
        if self.session.time_left_sec == 0 {
            self.end();
        }
    }

    /// Stop the round and freeze its stats.
    /// Power-up revert timers survive; they check identity when they fire.
    pub(crate) fn end(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.phase = GamePhase::Ended;
        self.scheduler
            .retain(|event| matches!(event, TimerEvent::RevertPowerUp { .. }));
        self.timers = RoundTimers::default();
        self.session.combo.reset_timer = None;
        for bubble in &mut self.bubbles {
            bubble.expiry = None;
        }

        let stats = self.session.final_stats();
        log::info!(
            "Round over: score {}, best combo {}, level {}",
            stats.score,
            stats.max_combo,
            stats.level
        );
        self.renderer.hide_pause_overlay();
        self.renderer.show_game_over_screen(&stats);
    }
}
