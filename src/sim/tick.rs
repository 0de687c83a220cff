//! Per-tick simulation update
//!
//! One discrete step per animation frame, dt in milliseconds. The order is
//! fixed: tap handling, spider movement extending the active thread, loop
//! resolution, insect movement and thread cutting, break retraction, and
//! the level-complete check. All chain mutation happens synchronously
//! inside the call that triggered it.

use glam::Vec2;

use super::capture::resolve_capture;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::PLAYER_SCARE_RADIUS;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Tap position in world coordinates: sets the spider's movement
    /// target and starts a new thread segment chained onto the current one
    pub tap: Option<Vec2>,
}

/// Advance the game state by one tick of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.time_ms += dt_ms as f64;

    if let Some(target) = input.tap {
        state.begin_thread(target);
    }

    // Spider movement drags the active thread tip; any loop it closes
    // comes back as a capture polygon (recursive truncation can emit more
    // than one per tick)
    let mut polygons = Vec::new();
    if state.player.update(dt_ms) {
        if let Some(segment) = state.active_segment {
            let anchor = state.player.thread_anchor();
            state.threads.extend_to(segment, anchor, &mut polygons);
        }
    }

    for polygon in polygons {
        let result = resolve_capture(&polygon, &mut state.insects, &mut state.blueprints);
        for &(id, kind) in &result.collected {
            state.events.push(GameEvent::InsectCaptured { id, kind });
        }
        log::debug!(
            "loop closed: {} vertices, {} caught, outcome {:?}",
            polygon.points.len(),
            result.collected.len(),
            result.outcome,
        );
        // The resolved loop stays on screen as a frozen decorative web
        state.threads.freeze_polygon_edges(&polygon);
        state.events.push(GameEvent::WebSpun {
            polygon,
            success: result.outcome.is_success(),
            outcome: result.outcome,
        });
    }

    // Insects: scare check, movement/despawn, then the thread-cut sweep
    let player_pos = state.player.pos;
    for insect in &mut state.insects {
        if !insect.captured
            && !insect.escaping
            && (insect.pos - player_pos).length() < PLAYER_SCARE_RADIUS
        {
            insect.escape(player_pos);
        }
    }

    let rng = &mut state.rng;
    state.insects.retain_mut(|insect| insect.update_movement(dt_ms, rng));

    let mut cuts = Vec::new();
    for insect in &state.insects {
        cuts.extend(insect.sweep_threads(&mut state.threads));
    }
    for point in cuts {
        log::debug!("thread cut at {point:?}");
        state.events.push(GameEvent::ThreadCut { point });
    }

    state.threads.update_breaking(dt_ms);

    if state.phase == GamePhase::Playing && state.all_blueprints_completed() {
        state.phase = GamePhase::Complete;
        state.events.push(GameEvent::LevelComplete);
        log::info!("level {} complete at {:.0} ms", state.level_index + 1, state.time_ms);
    }
}
