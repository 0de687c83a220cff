//! Insects: the mobile capturable objects
//!
//! Insects wander inside the roaming bounds, bolt for the world edge when
//! the spider gets too close, and tear through any live thread their
//! circular hitbox sweeps across. The per-tick thread sweep is the
//! collision feed back into the chain engine: each hit cuts the thread at
//! the point where the insect is about to exit it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::segment_disk_exit;
use super::thread::{SegmentState, ThreadSet};
use crate::consts::*;

/// Composition kind tag of an insect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InsectKind {
    Bee,
    Butterfly,
    Dragonfly,
    Fly,
    Ladybug,
    Moth,
}

impl InsectKind {
    pub const ALL: [InsectKind; 6] = [
        InsectKind::Bee,
        InsectKind::Butterfly,
        InsectKind::Dragonfly,
        InsectKind::Fly,
        InsectKind::Ladybug,
        InsectKind::Moth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsectKind::Bee => "bee",
            InsectKind::Butterfly => "butterfly",
            InsectKind::Dragonfly => "dragonfly",
            InsectKind::Fly => "fly",
            InsectKind::Ladybug => "ladybug",
            InsectKind::Moth => "moth",
        }
    }
}

/// A moving, collidable, capturable insect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insect {
    pub id: u32,
    pub kind: InsectKind,
    pub pos: Vec2,
    /// Heading in radians; forward is `(sin h, -cos h)`
    pub heading: f32,
    /// Forward speed (px/ms); zero once captured
    pub speed: f32,
    /// Circular hitbox radius for thread cutting
    pub radius: f32,
    pub captured: bool,
    /// Fleeing the spider - ignores bounds, despawns far outside
    pub escaping: bool,
    /// Time until the next wander-turn retarget (ms)
    rotation_timeout: f32,
    /// Current wander turn rate (rad/s)
    rotational_speed: f32,
    /// Remaining fade time after capture (ms)
    fade_ms: f32,
}

impl Insect {
    pub fn new(id: u32, kind: InsectKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            id,
            kind,
            pos,
            heading: rng.random_range(0.0..std::f32::consts::TAU),
            speed: rng.random_range(INSECT_SPEED_MIN..INSECT_SPEED_MAX),
            radius: INSECT_RADIUS,
            captured: false,
            escaping: false,
            rotation_timeout: 0.0,
            rotational_speed: 0.0,
            fade_ms: 0.0,
        }
    }

    /// Fixed-heading constructor for tests and scripted demos
    pub fn at(id: u32, kind: InsectKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            heading: 0.0,
            speed: INSECT_SPEED_MIN,
            radius: INSECT_RADIUS,
            captured: false,
            escaping: false,
            rotation_timeout: f32::INFINITY,
            rotational_speed: 0.0,
            fade_ms: 0.0,
        }
    }

    /// Mark this insect captured. Idempotent: re-marking is a no-op.
    pub fn mark_captured(&mut self) {
        if self.captured {
            return;
        }
        self.captured = true;
        self.speed = 0.0;
        self.fade_ms = CAPTURED_FADE_MS;
    }

    /// Bolt away from `threat` toward the world edge
    pub fn escape(&mut self, threat: Vec2) {
        let away = self.pos - threat;
        self.heading = away.y.atan2(away.x) + std::f32::consts::FRAC_PI_2;
        self.speed = INSECT_ESCAPE_SPEED;
        self.rotation_timeout /= 10.0;
        self.escaping = true;
    }

    /// Advance movement by one tick.
    ///
    /// Returns `false` when the insect should be removed (captured fade
    /// finished, or escaped far outside the world).
    pub fn update_movement(&mut self, dt_ms: f32, rng: &mut impl Rng) -> bool {
        if self.captured {
            self.fade_ms -= dt_ms;
            return self.fade_ms > 0.0;
        }

        // Wander: periodically pick a new turn rate; slower insects
        // retarget less often
        self.rotation_timeout -= dt_ms;
        if self.rotation_timeout <= 0.0 {
            self.rotation_timeout += rng.random_range(1000.0..3000.0) * 0.05 / self.speed;
            self.rotational_speed = rng.random_range(-1.0..1.0) * self.speed / 0.05;
        }
        self.heading += dt_ms * self.rotational_speed / 1000.0;

        let h = self.heading;
        if self.escaping {
            if self.pos.x.abs() > INSECT_DESPAWN_BOUNDS || self.pos.y.abs() > INSECT_DESPAWN_BOUNDS
            {
                return false;
            }
        } else {
            // Bounce off the roaming bounds
            if self.pos.x > INSECT_BOUNDS && h.sin() > 0.0 {
                self.heading = -h;
            }
            if self.pos.x < -INSECT_BOUNDS && h.sin() < 0.0 {
                self.heading = -h;
            }
            if self.pos.y > INSECT_BOUNDS && -h.cos() > 0.0 {
                self.heading = std::f32::consts::PI - h;
            }
            if self.pos.y < -INSECT_BOUNDS && -h.cos() < 0.0 {
                self.heading = std::f32::consts::PI - h;
            }
        }

        let h = self.heading;
        self.pos += Vec2::new(h.sin(), -h.cos()) * self.speed * dt_ms;
        true
    }

    /// Sweep this insect's hitbox against every Active segment, cutting
    /// each thread hit. Returns the cut points.
    ///
    /// The arena is snapshotted before cutting; anything that stops being
    /// Active mid-sweep is dropped by `cut_at`'s state guard.
    pub fn sweep_threads(&self, threads: &mut ThreadSet) -> Vec<Vec2> {
        if self.captured || self.escaping {
            return Vec::new();
        }

        let live: Vec<_> = threads
            .iter()
            .filter(|s| s.state == SegmentState::Active)
            .map(|s| (s.id, s.from, s.to))
            .collect();

        let mut cuts = Vec::new();
        for (id, from, to) in live {
            if let Some(point) = segment_disk_exit(from, to, self.pos, self.radius) {
                threads.cut_at(id, point);
                cuts.push(point);
            }
        }
        cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn test_mark_captured_is_idempotent() {
        let mut insect = Insect::at(1, InsectKind::Fly, v(0.0, 0.0));
        insect.mark_captured();
        let fade = insect.fade_ms;
        insect.update_movement(100.0, &mut Pcg32::seed_from_u64(0));
        insect.mark_captured();
        assert!(insect.fade_ms < fade, "re-marking must not reset the fade");
        assert_eq!(insect.speed, 0.0);
    }

    #[test]
    fn test_captured_insect_fades_out() {
        let mut insect = Insect::at(1, InsectKind::Fly, v(0.0, 0.0));
        insect.mark_captured();
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(insect.update_movement(CAPTURED_FADE_MS / 2.0, &mut rng));
        assert!(!insect.update_movement(CAPTURED_FADE_MS, &mut rng));
    }

    #[test]
    fn test_escaping_insect_despawns_far_out() {
        let mut insect = Insect::at(1, InsectKind::Moth, v(0.0, 0.0));
        insect.escape(v(1.0, 0.0));
        assert!(insect.escaping);
        assert_eq!(insect.speed, INSECT_ESCAPE_SPEED);

        insect.pos = v(INSECT_DESPAWN_BOUNDS + 1.0, 0.0);
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(!insect.update_movement(16.0, &mut rng));
    }

    #[test]
    fn test_wandering_insect_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut insect = Insect::new(1, InsectKind::Bee, v(0.0, 0.0), &mut rng);
        for _ in 0..20_000 {
            assert!(insect.update_movement(16.0, &mut rng));
        }
        // One bounce step of slack at the border
        let slack = INSECT_SPEED_MAX * 16.0;
        assert!(insect.pos.x.abs() < INSECT_BOUNDS + slack);
        assert!(insect.pos.y.abs() < INSECT_BOUNDS + slack);
    }

    #[test]
    fn test_sweep_cuts_overlapping_thread() {
        let mut threads = ThreadSet::new();
        let id = threads.spawn(v(-50.0, 0.0), v(50.0, 0.0), None);

        let insect = Insect::at(1, InsectKind::Fly, v(0.0, 0.0));
        let cuts = insect.sweep_threads(&mut threads);

        assert_eq!(cuts.len(), 1);
        // Cut at the disk exit: the far rim of the hitbox along the segment
        assert!((cuts[0] - v(INSECT_RADIUS, 0.0)).length() < 1e-3);
        // The thread was severed: surviving segment restarts at the cut
        assert_eq!(threads.get(id).unwrap().from, cuts[0]);
        assert!(threads.iter().any(|s| s.state == SegmentState::Breaking));
    }

    #[test]
    fn test_sweep_ignores_frozen_and_distant_threads() {
        let mut threads = ThreadSet::new();
        let frozen = threads.spawn(v(-50.0, 0.0), v(50.0, 0.0), None);
        threads.freeze(frozen);
        threads.spawn(v(-50.0, 200.0), v(50.0, 200.0), None);

        let insect = Insect::at(1, InsectKind::Fly, v(0.0, 0.0));
        let cuts = insect.sweep_threads(&mut threads);
        assert!(cuts.is_empty());
        assert_eq!(threads.len(), 2);
    }

    #[test]
    fn test_captured_insect_does_not_cut() {
        let mut threads = ThreadSet::new();
        threads.spawn(v(-50.0, 0.0), v(50.0, 0.0), None);

        let mut insect = Insect::at(1, InsectKind::Fly, v(0.0, 0.0));
        insect.mark_captured();
        assert!(insect.sweep_threads(&mut threads).is_empty());
    }
}
