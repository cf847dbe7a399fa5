//! Bubble Pop headless host
//!
//! Plays one full round against the headless renderer with a simple
//! autopilot, stepping virtual time the way a browser frame loop would.
//! Pass a seed as the first argument to replay a round.

#[cfg(not(target_arch = "wasm32"))]
use bubble_pop::sim::BubbleId;
#[cfg(not(target_arch = "wasm32"))]
use bubble_pop::{Game, GamePhase, HeadlessRenderer, Renderer, Tuning, platform};

/// Virtual time per host frame (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 100;
/// Autopilot reaction time (ms between pops)
#[cfg(not(target_arch = "wasm32"))]
const POP_EVERY_MS: u64 = 300;

/// Oldest bubble worth popping, skipping the negative ones
#[cfg(not(target_arch = "wasm32"))]
fn pick_target<R: Renderer>(game: &Game<R>) -> Option<BubbleId> {
    game.bubbles()
        .iter()
        .filter(|b| b.is_active() && !game.table().get(b.kind).negative)
        .min_by_key(|b| (b.spawn_time_ms, b.id))
        .map(|b| b.id)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    platform::init_logging();

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(err) => {
                log::warn!("Ignoring seed {arg:?}: {err}");
                platform::entropy_seed()
            }
        },
        None => platform::entropy_seed(),
    };
    log::info!("Bubble Pop (headless) starting with seed {seed}");

    let mut game = Game::new(Tuning::default(), seed, HeadlessRenderer::default(), ());
    game.start_session();

    let mut since_pop = 0;
    while game.phase() != GamePhase::Ended {
        game.advance(FRAME_MS);
        since_pop += FRAME_MS;
        if since_pop >= POP_EVERY_MS {
            since_pop = 0;
            if let Some(id) = pick_target(&game) {
                game.on_bubble_popped(id);
            }
        }
    }

    match game.final_stats() {
        Some(stats) => log::info!(
            "Final score {} | max combo {} | level {}",
            stats.score,
            stats.max_combo,
            stats.level
        ),
        None => log::error!("Round ended without final stats"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
