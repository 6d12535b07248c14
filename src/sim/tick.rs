//! Per-frame simulation tick
//!
//! Order within a tick: death check, player (including block bumps),
//! enemies, coins, flag, then cosmetic bookkeeping. A death or a level
//! change ends the tick.

use glam::Vec2;

use super::blocks::{BlockHit, BlockPopup, trigger_block, update_popups};
use super::enemy::{EnemyContact, update_removals};
use super::input::Controls;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};

/// How the tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Continue,
    Died(DeathCause),
    ReachedFlag,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, controls: Controls, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    // A stalled frame would tunnel through geometry
    if dt <= 0.0 || dt > state.tuning.max_frame_dt {
        log::warn!("Skipping frame with dt={:.3}s", dt);
        return;
    }

    let tuning = &state.tuning;
    let Some(level) = state.level.as_mut() else {
        return;
    };

    state.time_remaining = (state.time_remaining - dt).max(0.0);

    // Death is checked before any movement
    let doomed = if state.time_remaining <= 0.0 {
        Some(DeathCause::TimeUp)
    } else if state.player.pos.y < tuning.death_plane_y {
        Some(DeathCause::Fell)
    } else {
        None
    };

    let mut gained = 0u32;
    let mut outcome = doomed.map_or(Outcome::Continue, Outcome::Died);

    if outcome == Outcome::Continue {
        let player = &mut state.player;

        // Player
        let step = player.step(controls, &level.solid, tuning, dt);
        if step.jumped {
            state.events.push(GameEvent::Jumped { pos: player.pos });
        }
        if let Some(head_cell) = step.head_cell {
            if let BlockHit::Bumped { cell, reward } =
                trigger_block(level, head_cell, tuning.block_reward)
            {
                gained += reward;
                // Only a paying block shows the reward popup
                if reward > 0 {
                    state.popups.push(BlockPopup {
                        pos: cell.as_vec2() + Vec2::Y,
                        age: 0.0,
                    });
                }
                state.events.push(GameEvent::BlockBumped { cell });
            }
        }

        // Enemies
        for enemy in level.enemies.iter_mut().filter(|e| !e.dead) {
            enemy.patrol(&level.solid, tuning, dt);
            match enemy.contact(player.pos, player.vel.y, tuning) {
                EnemyContact::None => {}
                EnemyContact::Stomp => {
                    enemy.stomp(tuning);
                    player.vel.y = tuning.jump_force * tuning.stomp_bounce;
                    gained += tuning.stomp_reward;
                    log::debug!("Enemy stomped at ({:.2}, {:.2})", enemy.pos.x, enemy.pos.y);
                    state.events.push(GameEvent::EnemyStomped { pos: enemy.pos });
                }
                EnemyContact::Hurt => {
                    outcome = Outcome::Died(DeathCause::Enemy);
                    break;
                }
            }
        }
        update_removals(&mut level.enemies, dt);

        if outcome == Outcome::Continue {
            // Coins
            let reach_sq = tuning.coin_pickup_radius * tuning.coin_pickup_radius;
            for coin in level.coins.iter_mut().filter(|c| !c.collected) {
                if coin.pos.distance_squared(player.pos) < reach_sq {
                    coin.collected = true;
                    gained += tuning.coin_reward;
                    log::debug!("Coin collected at ({}, {})", coin.pos.x, coin.pos.y);
                    state.events.push(GameEvent::CoinCollected { pos: coin.pos });
                }
            }

            // Flag
            if level
                .flag
                .is_some_and(|flag| flag.aabb().overlaps(&player.aabb()))
            {
                outcome = Outcome::ReachedFlag;
            }
        }

        update_popups(&mut state.popups, dt, tuning.popup_lifetime);
    }

    state.award(gained);
    match outcome {
        Outcome::Continue => {}
        Outcome::Died(cause) => state.die(cause),
        Outcome::ReachedFlag => state.complete_level(),
    }
}
