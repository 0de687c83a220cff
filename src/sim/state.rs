//! Game state and the event interface to external collaborators
//!
//! [`GameState`] owns everything the simulation mutates: the thread arena,
//! the insects, the level's blueprints, the spider and the seeded RNG.
//! Outputs cross the boundary as [`GameEvent`] values queued on the state
//! and drained by the embedding layer (renderer, HUD, audio).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::capture::{Blueprint, CaptureOutcome, CapturePolygon};
use super::insect::{Insect, InsectKind};
use super::level::{LevelSetup, levels};
use super::thread::{SegmentId, ThreadSet};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every blueprint completed
    Complete,
}

/// Output event for external collaborators (HUD, audio, renderer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A loop closed and was resolved; the polygon is rendered as a web
    WebSpun {
        polygon: CapturePolygon,
        success: bool,
        outcome: CaptureOutcome,
    },
    /// An insect was enclosed by a capture polygon
    InsectCaptured { id: u32, kind: InsectKind },
    /// An insect tore a thread at this point
    ThreadCut { point: Vec2 },
    /// All blueprints are completed
    LevelComplete,
}

/// The player-controlled spider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing, radians; forward is `(sin h, -cos h)`
    pub heading: f32,
    /// Current movement target (tap position), if any
    pub target: Option<Vec2>,
    speed: f32,
}

impl Player {
    fn new() -> Self {
        Self {
            pos: Vec2::new(0.0, PLAYER_START_Y),
            heading: 0.0,
            target: None,
            speed: 0.0,
        }
    }

    /// The point the thread is spun from, just ahead of the spider
    pub fn thread_anchor(&self) -> Vec2 {
        self.pos + Vec2::new(self.heading.sin(), -self.heading.cos()) * THREAD_ANCHOR_OFFSET
    }

    /// Accelerate toward the current target. Returns true if the spider
    /// moved this tick (the active thread then follows the anchor).
    pub fn update(&mut self, dt_ms: f32) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        self.speed = (self.speed + PLAYER_ACCELERATION * dt_ms).min(PLAYER_MAX_SPEED);
        let vector = target - self.pos;
        let distance = vector.length();
        if distance == 0.0 {
            self.speed = 0.0;
            self.target = None;
            return false;
        }

        let step = (self.speed * dt_ms).min(distance);
        let next = self.pos + vector / distance * step;
        if next.x.abs() > WORLD_HALF || next.y.abs() > WORLD_HALF {
            // The world edge stops the spider dead
            self.speed = 0.0;
            self.target = None;
            return false;
        }

        self.pos = next;
        self.heading = vector.y.atan2(vector.x) + std::f32::consts::FRAC_PI_2;
        true
    }
}

/// Complete simulation state for one level run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Index into [`levels`]
    pub level_index: usize,
    pub phase: GamePhase,
    /// Elapsed simulated time (ms)
    pub time_ms: f64,
    pub player: Player,
    pub threads: ThreadSet,
    /// The segment currently being dragged, if a gesture is in progress
    pub active_segment: Option<SegmentId>,
    pub insects: Vec<Insect>,
    pub blueprints: Vec<Blueprint>,
    /// Queued output events; drained by the embedding layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_insect_id: u32,
}

impl GameState {
    /// Start a level with the given run seed
    pub fn new(seed: u64, level_index: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = &levels()[level_index.min(levels().len() - 1)];
        let setup = LevelSetup::generate(level, &mut rng);

        let mut state = Self {
            seed,
            rng,
            level_index,
            phase: GamePhase::Playing,
            time_ms: 0.0,
            player: Player::new(),
            threads: ThreadSet::new(),
            active_segment: None,
            insects: Vec::new(),
            blueprints: setup.blueprints,
            events: Vec::new(),
            next_insect_id: 1,
        };

        for kind in setup.spawn_kinds {
            state.spawn_insect(kind);
        }

        log::info!(
            "level {} start: {} blueprints, {} insects (seed {seed})",
            level_index + 1,
            state.blueprints.len(),
            state.insects.len(),
        );
        state
    }

    /// Spawn one insect outside the central exclusion disk and outside the
    /// spider's starting half-plane.
    fn spawn_insect(&mut self, kind: InsectKind) {
        let mut pos = Vec2::new(0.0, -INSECT_BOUNDS / 2.0);
        // Rejection sampling with a bounded retry budget
        for _ in 0..64 {
            let candidate = Vec2::new(
                self.rng.random_range(-INSECT_BOUNDS..INSECT_BOUNDS),
                self.rng.random_range(-INSECT_BOUNDS..0.0),
            );
            if candidate.length() >= SPAWN_EXCLUSION_RADIUS {
                pos = candidate;
                break;
            }
        }

        let id = self.next_insect_id;
        self.next_insect_id += 1;
        self.insects.push(Insect::new(id, kind, pos, &mut self.rng));
    }

    /// Begin a new thread segment from the current anchor, chained onto
    /// the previous gesture segment, and head for `target`.
    pub fn begin_thread(&mut self, target: Vec2) {
        let anchor = self.player.thread_anchor();
        let segment = self.threads.spawn(anchor, anchor, self.active_segment);
        self.active_segment = Some(segment);
        self.player.target = Some(target);
    }

    pub fn all_blueprints_completed(&self) -> bool {
        self.blueprints.iter().all(|b| b.is_completed())
    }

    /// Drain all queued events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
