//! Interactive blocks struck from below
//!
//! A question block pays out once; afterwards it stays solid but inert.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::level::LevelState;

/// Interactive block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Pays `block_reward` the first time it is bumped
    Question,
    /// Bumps without a reward (no shipped level uses it yet)
    Brick,
}

/// An interactive block keyed by its grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveBlock {
    pub pos: IVec2,
    pub kind: BlockKind,
    pub active: bool,
    /// Resting height, for the bump animation
    pub original_y: f32,
}

impl InteractiveBlock {
    pub fn new(pos: IVec2, kind: BlockKind) -> Self {
        Self {
            pos,
            kind,
            active: true,
            original_y: pos.y as f32,
        }
    }
}

/// Transient coin that pops out of a bumped block (visual only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPopup {
    pub pos: Vec2,
    pub age: f32,
}

/// Outcome of striking a cell from below
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHit {
    /// No interactive block there, or it was already spent
    Nothing,
    /// A block bumped; `reward` is the score it paid out
    Bumped { cell: IVec2, reward: u32 },
}

/// Strike the block at `cell` from below.
///
/// Only an active block reacts. A question block flips inactive for good and
/// pays `reward`; a brick flips without paying.
pub fn trigger_block(level: &mut LevelState, cell: IVec2, reward: u32) -> BlockHit {
    let Some(block) = level.block_at_mut(cell) else {
        return BlockHit::Nothing;
    };
    if !block.active {
        return BlockHit::Nothing;
    }

    block.active = false;
    let reward = match block.kind {
        BlockKind::Question => reward,
        BlockKind::Brick => 0,
    };
    log::debug!("Block bumped at ({}, {}), reward {}", cell.x, cell.y, reward);
    BlockHit::Bumped { cell, reward }
}

/// Age popups and drop the expired ones
pub fn update_popups(popups: &mut Vec<BlockPopup>, dt: f32, lifetime: f32) {
    for popup in popups.iter_mut() {
        popup.age += dt;
    }
    popups.retain(|p| p.age < lifetime);
}
