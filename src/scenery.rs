//! Background decoration layout
//!
//! Purely cosmetic: clouds and hills behind the playfield. Layout is seeded
//! so the same run seed always dresses a level the same way. The simulation
//! never reads any of this.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{LevelState, Theme};

/// One background prop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decoration {
    /// Flat cloud slab; `pos.z` is depth behind the playfield
    Cloud { pos: Vec3, width: f32 },
    /// Half-buried mound centered at `pos`
    Hill { pos: Vec3, height: f32 },
}

/// Hills sit with their center below the ground line
const HILL_BASE_Y: f32 = -2.0;

/// Lay out decorations across `level_width` units. Night levels are bare.
pub fn generate(level_width: f32, theme: Theme, seed: u64) -> Vec<Decoration> {
    if theme == Theme::Night {
        return Vec::new();
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut decorations = Vec::new();

    let mut x = 0.0;
    while x < level_width {
        let y = rng.random_range(9.0..15.0);
        let width = rng.random_range(2.0..5.0);
        let depth = rng.random_range(5.0..10.0);
        decorations.push(Decoration::Cloud {
            pos: Vec3::new(x, y, depth),
            width,
        });
        x += rng.random_range(4.0..12.0);
    }

    let mut x = 0.0;
    while x < level_width {
        let height = rng.random_range(4.0..9.0);
        let depth = rng.random_range(4.0..7.0);
        decorations.push(Decoration::Hill {
            pos: Vec3::new(x, HILL_BASE_Y, depth),
            height,
        });
        x += rng.random_range(6.0..18.0);
    }

    decorations
}

/// Decorations for a loaded level; each level index gets its own stream
pub fn for_level(level: &LevelState, seed: u64) -> Vec<Decoration> {
    generate(
        level.level_width as f32,
        level.theme,
        seed.wrapping_add(level.index as u64),
    )
}

impl Decoration {
    /// Position projected onto the playfield plane
    pub fn xy(&self) -> Vec2 {
        match self {
            Decoration::Cloud { pos, .. } | Decoration::Hill { pos, .. } => pos.truncate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate(60.0, Theme::Day, 7);
        let b = generate(60.0, Theme::Day, 7);
        assert_eq!(a, b);
        assert_ne!(a, generate(60.0, Theme::Day, 8));
    }

    #[test]
    fn test_night_is_bare() {
        assert!(generate(60.0, Theme::Night, 7).is_empty());
    }

    #[test]
    fn test_layout_stays_in_bounds() {
        let decorations = generate(80.0, Theme::Day, 3);
        assert!(decorations.iter().any(|d| matches!(d, Decoration::Cloud { .. })));
        assert!(decorations.iter().any(|d| matches!(d, Decoration::Hill { .. })));

        for d in &decorations {
            assert!(d.xy().x >= 0.0 && d.xy().x < 80.0);
            match *d {
                Decoration::Cloud { pos, width } => {
                    assert!((9.0..15.0).contains(&pos.y));
                    assert!((2.0..5.0).contains(&width));
                }
                Decoration::Hill { height, .. } => assert!((4.0..9.0).contains(&height)),
            }
        }
    }

    #[test]
    fn test_builtin_levels_have_scenery_by_theme() {
        let levels = crate::sim::LevelSet::builtin();
        let tuning = crate::Tuning::default();
        for index in 0..levels.count() {
            let level = levels.load(index, &tuning).unwrap();
            let decorations = for_level(&level, 1);
            assert_eq!(decorations.is_empty(), level.theme == Theme::Night);
        }
    }
}
