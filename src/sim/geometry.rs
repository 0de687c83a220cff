//! Geometry primitives for thread intersection
//!
//! The three tests everything else is built on: segment-vs-segment
//! intersection (thread self/cross hits), segment-vs-disk sweep (insects
//! tearing through threads), and point-in-polygon (capture containment).
//!
//! All degeneracies resolve to "no intersection" - the simulation never
//! faults on parallel, collinear or zero-length input.

use glam::Vec2;

use crate::consts::EPSILON;

/// Intersection point of segments A (`a1->a2`) and B (`b1->b2`), if any.
///
/// Solves the 2x2 parametric system and accepts only strict-interior hits:
/// `EPSILON < s < 1 - EPSILON` on both segments. Exact endpoint touches are
/// deliberately excluded so that consecutive chain segments sharing a vertex
/// never report a spurious self-intersection. Parallel and collinear pairs
/// return `None`.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let da = a2 - a1;
    let db = b2 - b1;

    let denom = da.x * db.y - da.y * db.x;
    if denom == 0.0 {
        // Parallel (or collinear)
        return None;
    }

    let s = ((b1.x - a1.x) * db.y - (b1.y - a1.y) * db.x) / denom;
    let t = ((b1.x - a1.x) * da.y - (b1.y - a1.y) * da.x) / denom;

    if s > EPSILON && s < 1.0 - EPSILON && t > EPSILON && t < 1.0 - EPSILON {
        return Some(a1 + da * s);
    }

    None
}

/// Exit point of the sweep `from->to` through a stationary disk.
///
/// `from->to` is the relative displacement of a point against a disk of
/// `radius` at `center` (an insect moving through a nearly-stationary thread
/// within one tick). Solves the quadratic for the parametric interval where
/// the distance to the center is <= radius, clamps the usable window to
/// `(0.001, 1)`, and returns the *furthest* in-range point `min(1, u_max)` -
/// the point where the sweep is about to leave the disk, which is where the
/// thread gets cut.
pub fn segment_disk_exit(from: Vec2, to: Vec2, center: Vec2, radius: f32) -> Option<Vec2> {
    let d = to - from;
    let a = d.length_squared();
    if a == 0.0 {
        // Zero-length segments never intersect anything
        return None;
    }

    // |from + u*d - center|^2 <= radius^2, quadratic in u
    let m = from - center;
    let b = m.dot(d);
    let c = m.length_squared() - radius * radius;

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let u_min = (-b - sqrt_disc) / a;
    let u_max = (-b + sqrt_disc) / a;

    // Overlap the solution interval with the usable window (0.001, 1)
    if u_max <= 0.001 || u_min >= 1.0 {
        return None;
    }

    Some(from + d * u_max.min(1.0))
}

/// Even-odd (crossing number) point-in-polygon test.
///
/// The polygon is the implicit closed loop over `polygon` (last vertex
/// connects back to the first). Winding direction does not matter.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
