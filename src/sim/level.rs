//! Level model: character grids parsed into typed entities
//!
//! Grid rows are listed top to bottom; the bottom row becomes `y = 0`.
//! Every `#`, `?` and `T` cell is registered individually in the solid
//! index. Runs of `#` are additionally merged into [`GroundSpan`]s, which
//! only the presentation layer reads.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::blocks::{BlockKind, InteractiveBlock};
use super::collision::{Aabb, SolidTileIndex};
use super::enemy::Enemy;
use crate::consts::*;
use crate::tuning::Tuning;

/// Errors raised by the level model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level index {index} out of range (have {count} levels)")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Visual theme of a level (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Day,
    Night,
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub pos: Vec2,
    pub collected: bool,
}

/// The level-end trigger region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagTrigger {
    pub center: Vec2,
    pub size: Vec2,
}

impl FlagTrigger {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.center, self.size)
    }
}

/// A merged horizontal run of ground tiles (render hint)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundSpan {
    pub start_x: i32,
    pub y: i32,
    pub width: i32,
}

impl GroundSpan {
    /// Center x of the merged block
    pub fn center_x(&self) -> f32 {
        self.start_x as f32 + self.width as f32 / 2.0 - TILE_HALF
    }
}

/// One level's source grid and theme
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    pub grid: String,
    pub theme: Theme,
}

/// The ordered set of levels a run plays through
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<LevelDef>,
}

impl LevelSet {
    /// The three shipped levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDef {
                    grid: include_str!("../../levels/level_1.txt").to_string(),
                    theme: Theme::Day,
                },
                LevelDef {
                    grid: include_str!("../../levels/level_2.txt").to_string(),
                    theme: Theme::Night,
                },
                LevelDef {
                    grid: include_str!("../../levels/level_3.txt").to_string(),
                    theme: Theme::Day,
                },
            ],
        }
    }

    /// Build a set from raw grids (all day-themed)
    pub fn from_maps<I, S>(maps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: maps
                .into_iter()
                .map(|grid| LevelDef {
                    grid: grid.into(),
                    theme: Theme::Day,
                })
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Parse level `index` into a fresh [`LevelState`]
    pub fn load(&self, index: usize, tuning: &Tuning) -> Result<LevelState, LevelError> {
        let def = self.levels.get(index).ok_or(LevelError::IndexOutOfRange {
            index,
            count: self.levels.len(),
        })?;
        let level = LevelState::parse(index, &def.grid, def.theme, tuning);
        log::info!(
            "Level {} loaded: width={}, solids={}, coins={}, enemies={}, blocks={}",
            index + 1,
            level.level_width,
            level.solid.len(),
            level.coins.len(),
            level.enemies.len(),
            level.blocks.len()
        );
        Ok(level)
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Live per-level simulation data
#[derive(Debug, Clone)]
pub struct LevelState {
    pub index: usize,
    pub theme: Theme,
    pub solid: SolidTileIndex,
    pub blocks: Vec<InteractiveBlock>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub flag: Option<FlagTrigger>,
    /// Spawn tile (origin if the grid has no `P`)
    pub player_spawn: IVec2,
    /// Length of the longest row, in tiles
    pub level_width: usize,
    pub ground_spans: Vec<GroundSpan>,
    pub pipes: Vec<IVec2>,
}

impl LevelState {
    /// Parse a grid. Unknown characters are empty space and short rows are fine.
    pub fn parse(index: usize, grid: &str, theme: Theme, tuning: &Tuning) -> Self {
        let rows: Vec<&str> = grid.lines().collect();
        let height = rows.len() as i32;

        let mut level = Self {
            index,
            theme,
            solid: SolidTileIndex::default(),
            blocks: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            flag: None,
            player_spawn: IVec2::ZERO,
            level_width: 0,
            ground_spans: Vec::new(),
            pipes: Vec::new(),
        };
        let mut unknown = 0usize;

        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            let cells: Vec<char> = line.chars().collect();
            level.level_width = level.level_width.max(cells.len());

            let mut col = 0;
            while col < cells.len() {
                let x = col as i32;
                match cells[col] {
                    GROUND_CHAR => {
                        let run = cells[col..].iter().take_while(|&&c| c == GROUND_CHAR).count();
                        for k in 0..run as i32 {
                            level.solid.insert(IVec2::new(x + k, y));
                        }
                        level.ground_spans.push(GroundSpan {
                            start_x: x,
                            y,
                            width: run as i32,
                        });
                        col += run;
                        continue;
                    }
                    QUESTION_CHAR => {
                        let pos = IVec2::new(x, y);
                        level.solid.insert(pos);
                        level.blocks.push(InteractiveBlock::new(pos, BlockKind::Question));
                    }
                    PIPE_CHAR => {
                        let pos = IVec2::new(x, y);
                        level.solid.insert(pos);
                        level.pipes.push(pos);
                    }
                    SPAWN_CHAR => level.player_spawn = IVec2::new(x, y),
                    ENEMY_CHAR => level.enemies.push(Enemy::new(
                        Vec2::new(x as f32, y as f32),
                        tuning.enemy_speed,
                    )),
                    COIN_CHAR => level.coins.push(Coin {
                        pos: Vec2::new(x as f32, y as f32),
                        collected: false,
                    }),
                    FLAG_CHAR => {
                        level.flag = Some(FlagTrigger {
                            center: Vec2::new(x as f32, y as f32 + tuning.flag_height / 2.0),
                            size: Vec2::new(tuning.flag_width, tuning.flag_height),
                        })
                    }
                    '.' => {}
                    _ => unknown += 1,
                }
                col += 1;
            }
        }

        if unknown > 0 {
            log::warn!("Level {}: {} unrecognized cells treated as empty", index + 1, unknown);
        }

        level
    }

    /// Look up the interactive block at a grid cell
    pub fn block_at_mut(&mut self, cell: IVec2) -> Option<&mut InteractiveBlock> {
        self.blocks.iter_mut().find(|b| b.pos == cell)
    }

    /// World position the player respawns at
    pub fn spawn_position(&self, tuning: &Tuning) -> Vec2 {
        self.player_spawn.as_vec2() + Vec2::new(0.0, tuning.spawn_drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
....F
.?.C.
P.E.T
#####
";

    #[test]
    fn test_parse_flips_rows_and_registers_each_ground_column() {
        let level = LevelState::parse(0, GRID, Theme::Day, &Tuning::default());

        for x in 0..5 {
            assert!(level.solid.contains(IVec2::new(x, 0)), "ground column {x}");
        }
        assert_eq!(
            level.ground_spans,
            vec![GroundSpan {
                start_x: 0,
                y: 0,
                width: 5
            }]
        );
        assert!((level.ground_spans[0].center_x() - 2.0).abs() < 1e-6);

        assert_eq!(level.player_spawn, IVec2::new(0, 1));
        assert!(level.solid.contains(IVec2::new(4, 1)), "pipe is solid");
        assert!(level.solid.contains(IVec2::new(1, 2)), "question block is solid");
        assert_eq!(level.solid.len(), 7);

        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].pos, Vec2::new(2.0, 1.0));
        assert_eq!(level.coins[0].pos, Vec2::new(3.0, 2.0));

        let flag = level.flag.expect("flag");
        assert_eq!(flag.center, Vec2::new(4.0, 8.0));
        assert_eq!(level.level_width, 5);
    }

    #[test]
    fn test_short_rows_and_unknown_chars_are_tolerated() {
        let grid = "..\n.x?..Z\n###\n";
        let level = LevelState::parse(0, grid, Theme::Day, &Tuning::default());
        assert_eq!(level.level_width, 6);
        assert_eq!(level.solid.len(), 4);
        assert_eq!(level.blocks.len(), 1);
        assert_eq!(level.player_spawn, IVec2::ZERO, "missing P defaults to origin");
    }

    #[test]
    fn test_multiple_ground_runs_in_one_row() {
        let level = LevelState::parse(0, "##..###", Theme::Day, &Tuning::default());
        assert_eq!(level.ground_spans.len(), 2);
        assert_eq!(level.ground_spans[1].start_x, 4);
        assert_eq!(level.ground_spans[1].width, 3);
        assert!(!level.solid.contains(IVec2::new(2, 0)));
    }

    #[test]
    fn test_load_out_of_range() {
        let set = LevelSet::from_maps(["P\n#"]);
        let err = set.load(1, &Tuning::default()).unwrap_err();
        assert_eq!(err, LevelError::IndexOutOfRange { index: 1, count: 1 });
    }

    #[test]
    fn test_builtin_levels_parse() {
        let set = LevelSet::builtin();
        assert_eq!(set.count(), 3);
        for index in 0..set.count() {
            let level = set.load(index, &Tuning::default()).unwrap();
            assert!(level.flag.is_some(), "level {} has a flag", index + 1);
            assert!(level.level_width > 200);
            assert!(level.player_spawn.y > 0, "spawn sits above the ground rows");
        }
        assert_eq!(set.load(1, &Tuning::default()).unwrap().theme, Theme::Night);
    }
}
