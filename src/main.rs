//! Arcade Core headless runner
//!
//! Plays a seeded run with a scripted input policy and prints the end-of-run
//! summary as JSON.
//!
//! Usage: `arcade-core [seed] [frames] [continuous|tabular|settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use arcade_core::audio::{LogSink, dispatch};
#[cfg(not(target_arch = "wasm32"))]
use arcade_core::sim::{RunPhase, RunState, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use arcade_core::{ScheduleStyle, Settings};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let frames = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3_600u32);
    let settings = match args.get(2) {
        Some(arg) => match ScheduleStyle::from_str(arg) {
            Some(style) => Settings::with_schedule(style),
            None => match std::fs::read_to_string(arg) {
                Ok(json) => Settings::load_or_default(&json),
                Err(e) => {
                    log::warn!("Could not read {}: {}; using defaults", arg, e);
                    Settings::default()
                }
            },
        },
        None => Settings::default(),
    };

    log::info!("Arcade Core (headless) seed {} for {} frames", seed, frames);
    let dt = settings.max_step;
    let mut state = RunState::new(settings, seed);
    let mut sink = LogSink::new();
    let mut analytics = Vec::new();

    for _ in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, dt);
        let events = state.take_events();
        dispatch(&events, &mut sink);
        analytics.extend(events.iter().filter_map(|e| e.analytics_record()));
        if state.phase == RunPhase::GameOver {
            break;
        }
    }

    let report = serde_json::json!({
        "summary": state.summary(),
        "analytics": analytics,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

/// Jump over whatever is about to reach the player
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &RunState) -> TickInput {
    let player = state.player.bounds();
    let world = &state.world;
    let threat = world
        .obstacles
        .iter()
        .chain(world.enemies.iter())
        .chain(world.projectiles.iter())
        .filter(|e| e.alive)
        .map(|e| e.bounds())
        .any(|b| {
            b.right() > player.left()
                && b.left() < player.right() + 72.0
                && b.bottom() > player.top() - 24.0
        });
    TickInput {
        jump: threat,
        ..Default::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; hosts drive `tick` directly
}
