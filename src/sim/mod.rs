//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only, dt in milliseconds
//! - Seeded RNG only
//! - Stable iteration order (arena insertion order / entity id)
//! - No rendering or platform dependencies

pub mod capture;
pub mod geometry;
pub mod insect;
pub mod level;
pub mod state;
pub mod thread;
pub mod tick;

pub use capture::{Blueprint, CaptureOutcome, CapturePolygon, CaptureResult, resolve_capture};
pub use geometry::{point_in_polygon, segment_disk_exit, segment_intersection};
pub use insect::{Insect, InsectKind};
pub use level::{Level, LevelSetup, levels};
pub use state::{GameEvent, GamePhase, GameState, Player};
pub use thread::{SegmentId, SegmentState, ThreadSegment, ThreadSet};
pub use tick::{TickInput, tick};
