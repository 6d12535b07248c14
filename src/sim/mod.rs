//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`'s `dt`
//! - No randomness
//! - Stable iteration order (grid scan order)
//! - No rendering or platform dependencies

pub mod blocks;
pub mod collision;
pub mod enemy;
pub mod input;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use blocks::{BlockHit, BlockKind, BlockPopup, InteractiveBlock, trigger_block};
pub use collision::{Aabb, SolidTileIndex, VerticalContact, resolve_x, resolve_y};
pub use enemy::{Enemy, EnemyContact};
pub use input::{Controls, InputState, KeyBindings};
pub use level::{Coin, FlagTrigger, GroundSpan, LevelError, LevelSet, LevelState, Theme};
pub use player::{Player, PlayerStep};
pub use state::{DeathCause, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::tick;
