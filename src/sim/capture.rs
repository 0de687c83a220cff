//! Capture polygons, blueprints and the capture resolver
//!
//! When a thread loop closes, the chain engine hands the assembled polygon
//! here. The resolver selects every uncaptured insect inside it, reduces
//! the catch to a canonical multiset signature and matches it against the
//! level's still-open blueprints, classifying the outcome for the HUD.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::point_in_polygon;
use super::insect::{Insect, InsectKind};

/// The closed loop assembled from a chain walk.
///
/// Vertices are ordered; the edge from the last vertex back to the first is
/// implicit. Transient: built fresh on each capture event, consumed by the
/// resolver and only echoed in the resulting [`GameEvent`].
///
/// [`GameEvent`]: super::state::GameEvent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturePolygon {
    pub points: Vec<Vec2>,
}

impl CapturePolygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Even-odd containment test over the implicit closed loop
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.points)
    }
}

/// A required insect composition ("blueprint")
///
/// Compared by sorted multiset equality against the captured kinds; the
/// `completed` flag is set exactly once, by the first capture that matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    kinds: Vec<InsectKind>,
    completed: bool,
}

impl Blueprint {
    pub fn new(mut kinds: Vec<InsectKind>) -> Self {
        kinds.sort();
        Self {
            kinds,
            completed: false,
        }
    }

    pub fn kinds(&self) -> &[InsectKind] {
        &self.kinds
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Canonical order-independent signature, e.g. `"bee/fly/fly"`
    pub fn signature(&self) -> String {
        signature_of(&self.kinds)
    }
}

fn signature_of(sorted_kinds: &[InsectKind]) -> String {
    sorted_kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Classified result of a capture attempt, in the order the checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    /// The catch exactly matched an open blueprint
    Matched,
    /// Empty loop - nothing caught, no feedback shown
    Nothing,
    /// Every open blueprint needs more insects than were caught
    TooFew,
    /// Every open blueprint needs fewer insects than were caught
    TooMany,
    /// A single insect of a kind no open blueprint wants on its own
    WrongSingle(InsectKind),
    /// More than one insect, matching no open blueprint
    WrongCombination,
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Matched)
    }

    /// Feedback text for the HUD collaborator; empty for silent outcomes
    pub fn message(&self) -> &'static str {
        match self {
            CaptureOutcome::Matched => "Nice catch!",
            CaptureOutcome::Nothing => "",
            CaptureOutcome::TooFew => "Too few!",
            CaptureOutcome::TooMany => "Too many!",
            CaptureOutcome::WrongSingle(_) => "Wrong insect!",
            CaptureOutcome::WrongCombination => "Wrong combination!",
        }
    }
}

/// Outcome plus the insects the polygon actually swallowed
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub outcome: CaptureOutcome,
    /// `(insect id, kind)` of every newly captured insect
    pub collected: Vec<(u32, InsectKind)>,
}

/// Resolve a capture polygon against the live insects and open blueprints.
///
/// Marks every contained, not-yet-captured insect as captured (idempotent
/// per insect), then matches the sorted catch against the blueprints
/// first-fit - no best-fit search across multiple equal candidates. The
/// classification checks are mutually exclusive and run in declaration
/// order of [`CaptureOutcome`].
pub fn resolve_capture(
    polygon: &CapturePolygon,
    insects: &mut [Insect],
    blueprints: &mut [Blueprint],
) -> CaptureResult {
    let mut collected: Vec<(u32, InsectKind)> = Vec::new();
    for insect in insects.iter_mut() {
        if insect.captured || !polygon.contains(insect.pos) {
            continue;
        }
        insect.mark_captured();
        collected.push((insect.id, insect.kind));
    }

    let mut kinds: Vec<InsectKind> = collected.iter().map(|&(_, k)| k).collect();
    kinds.sort();
    let signature = signature_of(&kinds);

    // First open blueprint with the same signature wins
    let matched = blueprints
        .iter_mut()
        .find(|b| !b.completed && b.signature() == signature);
    if let Some(blueprint) = matched {
        blueprint.completed = true;
        log::info!("blueprint completed: {}", blueprint.signature());
        return CaptureResult {
            outcome: CaptureOutcome::Matched,
            collected,
        };
    }

    let outcome = if kinds.is_empty() {
        CaptureOutcome::Nothing
    } else {
        let open: Vec<&Blueprint> = blueprints.iter().filter(|b| !b.completed).collect();
        if open.iter().all(|b| b.len() > kinds.len()) {
            CaptureOutcome::TooFew
        } else if open.iter().all(|b| b.len() < kinds.len()) {
            CaptureOutcome::TooMany
        } else if kinds.len() == 1 {
            CaptureOutcome::WrongSingle(kinds[0])
        } else {
            CaptureOutcome::WrongCombination
        }
    };

    CaptureResult { outcome, collected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::insect::Insect;
    use glam::Vec2;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn square() -> CapturePolygon {
        CapturePolygon::new(vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)])
    }

    fn insect(id: u32, kind: InsectKind, pos: Vec2) -> Insect {
        Insect::at(id, kind, pos)
    }

    #[test]
    fn test_exact_match_completes_blueprint() {
        let polygon = square();
        let mut insects = vec![
            insect(1, InsectKind::Fly, v(3.0, 3.0)),
            insect(2, InsectKind::Fly, v(7.0, 7.0)),
            insect(3, InsectKind::Bee, v(50.0, 50.0)), // outside
        ];
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly, InsectKind::Fly])];

        let result = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::Matched);
        assert!(result.outcome.is_success());
        assert_eq!(result.collected.len(), 2);
        assert!(blueprints[0].is_completed());
        assert!(insects[0].captured && insects[1].captured);
        assert!(!insects[2].captured);
    }

    #[test]
    fn test_match_is_order_independent() {
        // [Bee, Fly] and [Fly, Bee] reduce to the same signature
        let polygon = square();
        let mut insects = vec![
            insect(1, InsectKind::Bee, v(3.0, 3.0)),
            insect(2, InsectKind::Fly, v(7.0, 7.0)),
        ];
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly, InsectKind::Bee])];

        let result = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::Matched);
    }

    #[test]
    fn test_first_fit_blueprint_wins() {
        let polygon = square();
        let mut insects = vec![insect(1, InsectKind::Fly, v(5.0, 5.0))];
        let mut blueprints = vec![
            Blueprint::new(vec![InsectKind::Fly]),
            Blueprint::new(vec![InsectKind::Fly]),
        ];

        resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert!(blueprints[0].is_completed());
        assert!(!blueprints[1].is_completed());
    }

    #[test]
    fn test_empty_catch_is_silent() {
        let polygon = square();
        let mut insects = vec![insect(1, InsectKind::Fly, v(50.0, 50.0))];
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly])];

        let result = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::Nothing);
        assert_eq!(result.outcome.message(), "");
        assert!(result.collected.is_empty());
    }

    #[test]
    fn test_too_few_and_too_many() {
        // Requirement ["fly","fly"]: one fly -> too few, three -> too many
        let polygon = square();
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly, InsectKind::Fly])];

        let mut one = vec![insect(1, InsectKind::Fly, v(5.0, 5.0))];
        let result = resolve_capture(&polygon, &mut one, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::TooFew);

        let mut three = vec![
            insect(1, InsectKind::Fly, v(2.0, 2.0)),
            insect(2, InsectKind::Fly, v(5.0, 5.0)),
            insect(3, InsectKind::Fly, v(8.0, 8.0)),
        ];
        let result = resolve_capture(&polygon, &mut three, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::TooMany);
    }

    #[test]
    fn test_wrong_single_kind() {
        let polygon = square();
        let mut insects = vec![insect(1, InsectKind::Bee, v(5.0, 5.0))];
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly])];

        let result = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::WrongSingle(InsectKind::Bee));
    }

    #[test]
    fn test_wrong_combination() {
        // ["fly","bee"] against a same-length but different requirement
        let polygon = square();
        let mut insects = vec![
            insect(1, InsectKind::Fly, v(3.0, 3.0)),
            insect(2, InsectKind::Bee, v(7.0, 7.0)),
        ];
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly, InsectKind::Fly])];

        let result = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(result.outcome, CaptureOutcome::WrongCombination);
    }

    #[test]
    fn test_captured_insects_are_not_recaptured() {
        let polygon = square();
        let mut insects = vec![insect(1, InsectKind::Fly, v(5.0, 5.0))];
        let mut blueprints = vec![
            Blueprint::new(vec![InsectKind::Fly]),
            Blueprint::new(vec![InsectKind::Fly]),
        ];

        let first = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(first.outcome, CaptureOutcome::Matched);
        // Same polygon again: the insect is already captured
        let second = resolve_capture(&polygon, &mut insects, &mut blueprints);
        assert_eq!(second.outcome, CaptureOutcome::Nothing);
        assert!(second.collected.is_empty());
    }

    #[test]
    fn test_completed_blueprints_do_not_match_again() {
        let polygon = square();
        let mut blueprints = vec![Blueprint::new(vec![InsectKind::Fly])];
        let mut first = vec![insect(1, InsectKind::Fly, v(5.0, 5.0))];
        resolve_capture(&polygon, &mut first, &mut blueprints);
        assert!(blueprints[0].is_completed());

        let mut second = vec![insect(2, InsectKind::Fly, v(5.0, 5.0))];
        let result = resolve_capture(&polygon, &mut second, &mut blueprints);
        assert_ne!(result.outcome, CaptureOutcome::Matched);
    }
}
