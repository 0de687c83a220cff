//! Thread segments and the chain extension engine
//!
//! A thread is the player-controlled polyline, stored as a flat arena of
//! segments. Each segment carries an optional `previous` handle to the
//! segment it extends from, forming a backward-linked chain per drag
//! gesture. `extend_to` is the central algorithm: it grows the active
//! segment, detects the first intersection against any other live segment,
//! truncates both chains at the hit point and walks the predecessor links
//! to assemble the capture polygon.
//!
//! Handles are plain ids resolved through the arena on every access, so a
//! dangling `previous` link simply reads as "no predecessor" - chain walks
//! can never fault.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::capture::CapturePolygon;
use super::geometry::{point_in_polygon, segment_intersection};
use crate::consts::BREAK_RETRACT_SPEED;

/// Handle to a segment in a [`ThreadSet`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

/// Lifecycle state of a thread segment
///
/// `Active -> {Frozen | Breaking}`, `Breaking -> Destroyed`. Frozen is
/// terminal for the simulation (decorative web boundary); Destroyed
/// segments are removed from the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentState {
    /// Live gameplay segment, participates in intersection tests
    Active,
    /// Part of a resolved web boundary - immobile, ignored by all tests
    Frozen,
    /// Retracting toward its `from` end, then destroyed
    Breaking,
}

/// A single thread segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSegment {
    pub id: SegmentId,
    pub from: Vec2,
    pub to: Vec2,
    /// The segment this one extends from in the same drag gesture
    pub previous: Option<SegmentId>,
    pub state: SegmentState,
}

impl ThreadSegment {
    /// Direction and remaining length for break retraction
    fn span(&self) -> Vec2 {
        self.to - self.from
    }
}

/// Flat arena owning every live thread segment
///
/// Iteration order is insertion order (ascending id), which is also the
/// tie-break order for intersection scans: the first hit wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadSet {
    segments: Vec<ThreadSegment>,
    next_id: u32,
}

impl ThreadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new Active segment
    pub fn spawn(&mut self, from: Vec2, to: Vec2, previous: Option<SegmentId>) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.segments.push(ThreadSegment {
            id,
            from,
            to,
            previous,
            state: SegmentState::Active,
        });
        id
    }

    pub fn get(&self, id: SegmentId) -> Option<&ThreadSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: SegmentId) -> Option<&mut ThreadSegment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// All segments, in arena order
    pub fn iter(&self) -> impl Iterator<Item = &ThreadSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the segment's tip to `point`, resolving any intersection.
    ///
    /// On a hit against segment *T* at point *P*:
    /// 1. *T*'s own chain is extended to *P* first (recursion - *T*'s
    ///    clamped tail may collide with something else; each level
    ///    truncates, so the recursion is bounded);
    /// 2. the capture polygon is assembled from `[P, self.from]` plus the
    ///    `from` points of every predecessor walked back toward *T*, each
    ///    predecessor being marked Breaking as the now-redundant tail;
    /// 3. the live segment is truncated to start at *P*;
    /// 4. if the polygon already contains *T*'s `from`, any predecessors
    ///    remaining beyond the walk are broken too - the thread re-entered
    ///    a loop it closed, and the dangling sub-chain must not survive;
    /// 5. the polygon is appended to `polygons` (inner recursion levels
    ///    append theirs first).
    ///
    /// Extending a Breaking, Frozen or absent segment is a no-op.
    pub fn extend_to(&mut self, id: SegmentId, point: Vec2, polygons: &mut Vec<CapturePolygon>) {
        match self.get_mut(id) {
            Some(seg) if seg.state == SegmentState::Active => seg.to = point,
            _ => return,
        }

        let Some((hit_id, hit_point)) = self.find_intersection(id) else {
            return;
        };

        self.extend_to(hit_id, hit_point, polygons);

        let Some(from) = self.get(id).map(|s| s.from) else {
            return;
        };
        let mut points = vec![hit_point, from];
        if let Some(seg) = self.get_mut(id) {
            seg.from = hit_point;
        }

        // Walk the predecessor chain back toward the hit segment, recording
        // each `from` as a polygon vertex and breaking the superseded tail.
        loop {
            let prev_id = match self.get(id).and_then(|s| s.previous) {
                Some(p) if p != hit_id => p,
                _ => break,
            };
            match self.get(prev_id) {
                Some(prev) => {
                    let (prev_prev, prev_from) = (prev.previous, prev.from);
                    points.push(prev_from);
                    if let Some(seg) = self.get_mut(id) {
                        seg.previous = prev_prev;
                    }
                    self.break_segment(prev_id);
                }
                None => {
                    // Dangling link: detach and stop at the chain head
                    if let Some(seg) = self.get_mut(id) {
                        seg.previous = None;
                    }
                    break;
                }
            }
        }

        // Re-entry guard: the loop already encloses the hit segment's tail,
        // so everything still chained behind us is unreachable - break it.
        let enclosed_tail = self
            .get(hit_id)
            .is_some_and(|hit| point_in_polygon(hit.from, &points));
        if enclosed_tail {
            while let Some(prev_id) = self.get(id).and_then(|s| s.previous) {
                let prev_prev = self.get(prev_id).and_then(|s| s.previous);
                if let Some(seg) = self.get_mut(id) {
                    seg.previous = prev_prev;
                }
                self.break_segment(prev_id);
            }
        }

        polygons.push(CapturePolygon::new(points));
    }

    /// First Active segment (arena order) intersecting `id`'s span.
    ///
    /// Self, Breaking and Frozen segments are skipped. No nearest-point
    /// tie-break across candidates: the first hit wins.
    fn find_intersection(&self, id: SegmentId) -> Option<(SegmentId, Vec2)> {
        let seg = self.get(id)?;
        for other in &self.segments {
            if other.id == id || other.state != SegmentState::Active {
                continue;
            }
            if let Some(point) = segment_intersection(seg.from, seg.to, other.from, other.to) {
                return Some((other.id, point));
            }
        }
        None
    }

    /// Transition a segment Active -> Breaking. Idempotent; no-op on
    /// Frozen, already-Breaking or absent segments.
    pub fn break_segment(&mut self, id: SegmentId) {
        if let Some(seg) = self.get_mut(id) {
            if seg.state == SegmentState::Active {
                seg.state = SegmentState::Breaking;
            }
        }
    }

    /// Sever a segment at `point` (insect collision cut).
    ///
    /// The severed span `from -> point` becomes a Breaking stub that
    /// inherits the `previous` link (so the break later propagates down
    /// the chain); the surviving segment restarts at the cut point with no
    /// predecessor. No-op unless the segment is Active.
    pub fn cut_at(&mut self, id: SegmentId, point: Vec2) {
        let (from, previous) = match self.get(id) {
            Some(seg) if seg.state == SegmentState::Active => (seg.from, seg.previous),
            _ => return,
        };

        let stub = self.spawn(from, point, previous);
        if let Some(seg) = self.get_mut(stub) {
            seg.state = SegmentState::Breaking;
        }

        if let Some(seg) = self.get_mut(id) {
            seg.from = point;
            seg.previous = None;
        }
    }

    /// Transition a segment Active -> Frozen (resolved web boundary).
    pub fn freeze(&mut self, id: SegmentId) {
        if let Some(seg) = self.get_mut(id) {
            if seg.state == SegmentState::Active {
                seg.state = SegmentState::Frozen;
            }
        }
    }

    /// Spawn the edges of a resolved capture polygon as Frozen segments.
    pub fn freeze_polygon_edges(&mut self, polygon: &CapturePolygon) {
        let n = polygon.points.len();
        for i in 0..n {
            let from = polygon.points[i];
            let to = polygon.points[(i + 1) % n];
            let id = self.spawn(from, to, None);
            self.freeze(id);
        }
    }

    /// Advance break retraction by one tick.
    ///
    /// Breaking segments pull their tip toward `from`; once fully
    /// retracted the break propagates to the `previous` link and the
    /// segment is removed from the arena.
    pub fn update_breaking(&mut self, dt_ms: f32) {
        let mut propagate = Vec::new();
        let mut done = Vec::new();

        for seg in &mut self.segments {
            if seg.state != SegmentState::Breaking {
                continue;
            }
            let span = seg.span();
            let length = span.length();
            let step = (BREAK_RETRACT_SPEED * dt_ms).min(length);
            if step == 0.0 {
                if let Some(prev) = seg.previous {
                    propagate.push(prev);
                }
                done.push(seg.id);
            } else {
                seg.to -= span / length * step;
            }
        }

        for id in propagate {
            self.break_segment(id);
        }
        self.segments.retain(|s| !done.contains(&s.id));
    }
}
