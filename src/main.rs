//! Orb Weaver headless demo
//!
//! Runs the simulation core without a renderer: a scripted drag gesture
//! loops around the level's insects and every emitted game event is
//! printed as a JSON line. Useful for eyeballing the capture pipeline and
//! as a smoke test of the public API.
//!
//! Usage: `orb-weaver [level] [seed]`

use glam::Vec2;

use orb_weaver::sim::{GameState, TickInput, tick};

/// Fixed demo timestep (ms), roughly one 60 Hz frame
const DT_MS: f32 = 16.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let level: usize = args
        .next()
        .and_then(|a| a.parse().ok())
        .map(|l: usize| l.saturating_sub(1))
        .unwrap_or(0);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0xC0FFEE);

    let mut state = GameState::new(seed, level);

    // A wide counter-clockwise sweep of the insect half of the world,
    // closed by crossing the first leg
    let gesture = [
        Vec2::new(350.0, 100.0),
        Vec2::new(350.0, -350.0),
        Vec2::new(-350.0, -350.0),
        Vec2::new(-350.0, 100.0),
        Vec2::new(400.0, 250.0),
    ];

    for target in gesture {
        run_leg(&mut state, Some(target));
    }
    // Let fades and retractions play out
    for _ in 0..250 {
        step(&mut state, None);
    }

    log::info!(
        "demo finished: phase {:?}, {} insects left, {} segments",
        state.phase,
        state.insects.len(),
        state.threads.len(),
    );
}

/// Tap toward `target`, then tick until the spider stops moving
fn run_leg(state: &mut GameState, target: Option<Vec2>) {
    step(state, target);
    while state.player.target.is_some() {
        step(state, None);
    }
}

fn step(state: &mut GameState, tap: Option<Vec2>) {
    tick(state, &TickInput { tap }, DT_MS);
    for event in state.take_events() {
        match serde_json::to_string(&event) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("unserializable event: {e}"),
        }
    }
}
