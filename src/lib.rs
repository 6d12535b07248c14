//! Tile Runner - a side-scrolling tile platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level grid, AABB collision, actors, session phase)
//! - `session`: Host-facing wrapper (command queue, key table, snapshots)
//! - `tuning`: Data-driven game balance
//! - `settings`: Tuning plus key bindings, loaded from JSON
//! - `scenery`: Seeded background decoration layout

pub mod scenery;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{Command, Session};
pub use settings::{ConfigError, Settings};
pub use tuning::Tuning;

/// Structural constants that are not part of the tunable balance
pub mod consts {
    /// Distance an actor is pushed clear of a tile face when snapped
    pub const SNAP_EPSILON: f32 = 0.001;
    /// Half extent of a grid cell (cells are unit squares centered on integer coords)
    pub const TILE_HALF: f32 = 0.5;

    /// Grid characters
    pub const GROUND_CHAR: char = '#';
    pub const QUESTION_CHAR: char = '?';
    pub const PIPE_CHAR: char = 'T';
    pub const SPAWN_CHAR: char = 'P';
    pub const ENEMY_CHAR: char = 'E';
    pub const COIN_CHAR: char = 'C';
    pub const FLAG_CHAR: char = 'F';

    /// Rate at which the enemy animation phase advances (radians/s)
    pub const ENEMY_ANIM_RATE: f32 = 10.0;
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_clamps_to_target() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(-2.0, 0.0, 5.0), 0.0);
        assert_eq!(move_towards(5.0, 0.0, 1.5), 3.5);
    }
}
