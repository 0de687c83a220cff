//! Level content: blueprint shapes and spawn counts
//!
//! A level is defined abstractly: blueprint *shapes* over letter slots
//! (`"aa"` = two of one kind, `"ab"` = two distinct kinds) plus spawn
//! counts. Concrete insect kinds are bound to the letters at level start
//! with the run's seeded RNG, so every run of a level asks for a different
//! catch while the difficulty curve stays fixed.

use rand::Rng;
use rand::seq::SliceRandom;

use super::capture::Blueprint;
use super::insect::InsectKind;

/// Static definition of one level
#[derive(Debug, Clone, Copy)]
pub struct Level {
    /// Blueprint shapes; each letter is a distinct kind slot within one shape
    pub shapes: &'static [&'static str],
    /// Copies of every required insect spawned
    pub multiples: u32,
    /// Extra random insects spawned on top
    pub additional: u32,
}

/// The campaign, easiest first
pub fn levels() -> &'static [Level] {
    const LEVELS: &[Level] = &[
        Level { shapes: &["a"], multiples: 3, additional: 0 },
        Level { shapes: &["a", "a"], multiples: 3, additional: 0 },
        Level { shapes: &["a", "a"], multiples: 1, additional: 4 },
        Level { shapes: &["a", "a", "a", "a"], multiples: 3, additional: 2 },
        Level { shapes: &["aa", "aa"], multiples: 2, additional: 3 },
        Level { shapes: &["ab", "aa"], multiples: 2, additional: 3 },
        Level { shapes: &["ab", "aa", "ab"], multiples: 1, additional: 0 },
        Level { shapes: &["abc"], multiples: 1, additional: 5 },
        Level { shapes: &["aaa", "aaa", "aaa"], multiples: 2, additional: 0 },
        Level { shapes: &["aa", "abc", "aa"], multiples: 10, additional: 0 },
    ];
    LEVELS
}

/// A level with its letter slots bound to concrete kinds
#[derive(Debug, Clone)]
pub struct LevelSetup {
    pub blueprints: Vec<Blueprint>,
    /// Every insect to spawn: required kinds x `multiples`, then extras
    pub spawn_kinds: Vec<InsectKind>,
}

impl LevelSetup {
    /// Bind a level's shapes to concrete kinds.
    ///
    /// Each blueprint shuffles the kind table independently, so `"a"` in
    /// one blueprint and `"a"` in another may resolve to different kinds,
    /// while distinct letters within one shape always stay distinct.
    pub fn generate(level: &Level, rng: &mut impl Rng) -> Self {
        let mut blueprints = Vec::with_capacity(level.shapes.len());
        let mut required = Vec::new();

        for shape in level.shapes {
            let mut slots = InsectKind::ALL;
            slots.shuffle(rng);
            let kinds: Vec<InsectKind> = shape
                .bytes()
                .map(|letter| slots[(letter.wrapping_sub(b'a') as usize) % slots.len()])
                .collect();
            required.extend_from_slice(&kinds);
            blueprints.push(Blueprint::new(kinds));
        }

        let mut spawn_kinds = Vec::new();
        for kind in &required {
            for _ in 0..level.multiples {
                spawn_kinds.push(*kind);
            }
        }
        for _ in 0..level.additional {
            spawn_kinds.push(InsectKind::ALL[rng.random_range(0..InsectKind::ALL.len())]);
        }

        Self {
            blueprints,
            spawn_kinds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_campaign_has_ten_levels() {
        assert_eq!(levels().len(), 10);
        for level in levels() {
            assert!(!level.shapes.is_empty());
            assert!(level.multiples >= 1);
        }
    }

    #[test]
    fn test_distinct_letters_bind_distinct_kinds() {
        let level = Level {
            shapes: &["abc"],
            multiples: 1,
            additional: 0,
        };
        for seed in 0..50 {
            let setup = LevelSetup::generate(&level, &mut Pcg32::seed_from_u64(seed));
            let kinds = setup.blueprints[0].kinds();
            assert_eq!(kinds.len(), 3);
            assert!(kinds[0] != kinds[1] && kinds[1] != kinds[2] && kinds[0] != kinds[2]);
        }
    }

    #[test]
    fn test_repeated_letters_bind_same_kind() {
        let level = Level {
            shapes: &["aaa"],
            multiples: 1,
            additional: 0,
        };
        let setup = LevelSetup::generate(&level, &mut Pcg32::seed_from_u64(3));
        let kinds = setup.blueprints[0].kinds();
        assert!(kinds.iter().all(|k| *k == kinds[0]));
    }

    #[test]
    fn test_spawn_counts() {
        let level = Level {
            shapes: &["aa", "b"],
            multiples: 2,
            additional: 3,
        };
        let setup = LevelSetup::generate(&level, &mut Pcg32::seed_from_u64(9));
        // 3 required insects x 2 multiples + 3 additional
        assert_eq!(setup.spawn_kinds.len(), 9);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let level = &levels()[5];
        let a = LevelSetup::generate(level, &mut Pcg32::seed_from_u64(42));
        let b = LevelSetup::generate(level, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.spawn_kinds, b.spawn_kinds);
        let sigs_a: Vec<String> = a.blueprints.iter().map(|bp| bp.signature()).collect();
        let sigs_b: Vec<String> = b.blueprints.iter().map(|bp| bp.signature()).collect();
        assert_eq!(sigs_a, sigs_b);
    }
}
