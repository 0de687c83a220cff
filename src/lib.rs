//! Orb Weaver - a spider web-weaving insect capture game
//!
//! This crate is the deterministic gameplay core: thread geometry, the
//! chain extension/truncation algorithm, capture polygon assembly and
//! composition matching. Rendering, audio, UI and persistence are external
//! collaborators that consume the [`sim::GameEvent`] stream.
//!
//! Core modules:
//! - `sim`: deterministic simulation (geometry, thread chains, insects,
//!   capture resolution, game state)

pub mod sim;

pub use sim::{GameEvent, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Half-extent of the square world (world spans ±WORLD_HALF on each axis)
    pub const WORLD_HALF: f32 = 750.0;

    /// Insects roam inside this smaller square (±INSECT_BOUNDS)
    pub const INSECT_BOUNDS: f32 = 400.0;
    /// Escaping insects despawn past twice the roaming bounds
    pub const INSECT_DESPAWN_BOUNDS: f32 = 2.0 * INSECT_BOUNDS;
    /// Circular hitbox radius used for thread cutting
    pub const INSECT_RADIUS: f32 = 10.0;
    /// Insect wander speed range (px/ms)
    pub const INSECT_SPEED_MIN: f32 = 0.02;
    pub const INSECT_SPEED_MAX: f32 = 0.05;
    /// Speed of an insect fleeing the spider (px/ms)
    pub const INSECT_ESCAPE_SPEED: f32 = 1.0;
    /// Fade-out time of a captured insect before removal (ms)
    pub const CAPTURED_FADE_MS: f32 = 3000.0;

    /// Player (spider) movement (px/ms and px/ms²)
    pub const PLAYER_MAX_SPEED: f32 = 3.0;
    pub const PLAYER_ACCELERATION: f32 = 0.01;
    /// The thread is anchored this far ahead of the spider
    pub const THREAD_ANCHOR_OFFSET: f32 = 20.0;
    /// Insects closer than this to the spider bolt for the world edge
    pub const PLAYER_SCARE_RADIUS: f32 = 30.0;
    /// Spider starting position (lower half of the world)
    pub const PLAYER_START_Y: f32 = 300.0;

    /// Breaking segments retract toward their `from` end at this rate (px/ms)
    pub const BREAK_RETRACT_SPEED: f32 = 5.0;

    /// Insects never spawn inside this central disk
    pub const SPAWN_EXCLUSION_RADIUS: f32 = 150.0;

    /// Shared interior-point tolerance for all intersection tests
    pub const EPSILON: f32 = 1e-6;
}
