//! Game session state and core simulation types
//!
//! One `GameState` owns everything the tick mutates: the phase machine,
//! score and clock, the loaded level and the player.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::blocks::BlockPopup;
use super::level::{LevelError, LevelSet, LevelState};
use super::player::Player;
use crate::tuning::Tuning;

/// Overall phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Player died or the clock ran out
    GameOver,
    /// Finished the last level
    Victory,
}

/// Why the run ended in `GameOver`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    TimeUp,
    Fell,
    Enemy,
}

/// Things that happened during a tick, for sound and particles.
/// Never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { pos: Vec2 },
    CoinCollected { pos: Vec2 },
    BlockBumped { cell: IVec2 },
    EnemyStomped { pos: Vec2 },
    PlayerDied { cause: DeathCause },
    LevelCompleted { level: usize },
    Victory,
}

/// Read-only view the presentation layer gets after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub time_remaining: f32,
    /// 1-based level number
    pub level: usize,
    pub phase: GamePhase,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for cosmetic randomness (scenery)
    pub seed: u64,
    pub tuning: Tuning,
    pub levels: LevelSet,
    pub phase: GamePhase,
    pub score: u32,
    pub time_remaining: f32,
    /// Current level index (0-based)
    pub level_index: usize,
    /// `None` once the last level is cleared
    pub level: Option<LevelState>,
    pub player: Player,
    /// Reward popups from bumped blocks (visual only)
    pub popups: Vec<BlockPopup>,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting in the menu with the built-in levels
    pub fn new(seed: u64) -> Self {
        Self::with_levels(seed, LevelSet::builtin(), Tuning::default())
    }

    /// Create a session with a custom level set and tuning
    pub fn with_levels(seed: u64, levels: LevelSet, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let time_remaining = tuning.time_budget;
        Self {
            seed,
            tuning,
            levels,
            phase: GamePhase::Menu,
            score: 0,
            time_remaining,
            level_index: 0,
            level: None,
            player,
            popups: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Reset score, clock and level, then enter `Playing` on the first level
    pub fn restart(&mut self) {
        log::info!("Run starting");
        self.score = 0;
        self.time_remaining = self.tuning.time_budget;
        // The one player is reset in place; `enter_level` puts it on the spawn
        self.player.respawn(Vec2::ZERO);
        self.player.jump_latched = false;
        self.popups.clear();
        self.phase = GamePhase::Playing;
        self.enter_level(0);
    }

    /// Load level `index` and respawn the player there. Past the last level
    /// the run is won instead.
    pub fn enter_level(&mut self, index: usize) {
        self.level_index = index;
        self.popups.clear();

        match self.levels.load(index, &self.tuning) {
            Ok(level) => {
                self.player.respawn(level.spawn_position(&self.tuning));
                self.level = Some(level);
            }
            Err(LevelError::IndexOutOfRange { count, .. }) => {
                log::info!("All {} levels cleared - victory with score {}", count, self.score);
                self.level = None;
                self.phase = GamePhase::Victory;
                self.events.push(GameEvent::Victory);
            }
        }
    }

    /// Advance to the next level (flag reached)
    pub fn complete_level(&mut self) {
        let finished = self.level_index;
        log::info!("Level {} complete (score {})", finished + 1, self.score);
        self.events.push(GameEvent::LevelCompleted { level: finished + 1 });
        self.enter_level(finished + 1);
    }

    /// End the run
    pub fn die(&mut self, cause: DeathCause) {
        if self.phase != GamePhase::Playing {
            return;
        }
        log::info!("Game over ({:?}) on level {}", cause, self.level_index + 1);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::PlayerDied { cause });
    }

    /// Add points; the score never goes down
    #[inline]
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn snapshot(&self) -> Snapshot {
        let count = self.levels.count().max(1);
        Snapshot {
            score: self.score,
            time_remaining: self.time_remaining.max(0.0),
            level: self.level_index.min(count - 1) + 1,
            phase: self.phase,
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_levels() -> LevelSet {
        LevelSet::from_maps(["P...F\n#####", "..P.F\n#####"])
    }

    #[test]
    fn test_new_state_waits_in_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.level.is_none());
        assert_eq!(state.snapshot().level, 1);
    }

    #[test]
    fn test_restart_resets_and_loads_first_level() {
        let mut state = GameState::with_levels(1, two_levels(), Tuning::default());
        state.score = 42;
        state.time_remaining = 3.0;
        state.level_index = 1;
        state.player.vel = Vec2::new(4.0, -12.0);
        state.player.is_jumping = true;
        state.player.facing_right = false;
        state.player.coyote_timer = 0.05;
        state.player.jump_buffer_timer = 0.1;
        state.player.jump_latched = true;

        state.restart();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining, state.tuning.time_budget);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.player.pos, Vec2::new(0.0, 1.0 + state.tuning.spawn_drop));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.player.is_jumping);
        assert!(state.player.facing_right);
        assert_eq!(state.player.coyote_timer, 0.0);
        assert_eq!(state.player.jump_buffer_timer, 0.0);
        assert!(!state.player.jump_latched);
        assert_eq!(state.player.size, state.tuning.player_size());
    }

    #[test]
    fn test_complete_level_preserves_score_then_wins() {
        let mut state = GameState::with_levels(1, two_levels(), Tuning::default());
        state.restart();
        state.award(7);

        state.complete_level();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.score, 7);
        assert_eq!(state.player.pos.x, 2.0);

        state.complete_level();
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.level.is_none());
        assert_eq!(state.snapshot().level, 2);
        assert!(state.drain_events().contains(&GameEvent::Victory));
    }

    #[test]
    fn test_die_only_from_playing() {
        let mut state = GameState::with_levels(1, two_levels(), Tuning::default());
        state.die(DeathCause::Fell);
        assert_eq!(state.phase, GamePhase::Menu);

        state.restart();
        state.die(DeathCause::Enemy);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PlayerDied {
                cause: DeathCause::Enemy
            }]
        );
    }
}
