//! Patrolling enemies
//!
//! Each enemy walks at constant speed and turns around at walls and ledges.
//! Touching one from above while falling defeats it; any other contact kills
//! the player.

use glam::Vec2;

use super::collision::SolidTileIndex;
use crate::consts::ENEMY_ANIM_RATE;
use crate::tuning::Tuning;

/// A patrolling enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    /// -1.0 (left) or 1.0 (right)
    pub direction: f32,
    pub speed: f32,
    pub dead: bool,
    /// Animation phase (presentation only)
    pub anim_time: f32,
    /// Seconds left before a stomped enemy is removed
    pub removal_timer: f32,
}

/// How the player touched an enemy this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    None,
    /// Player landed on top
    Stomp,
    /// Player ran into it
    Hurt,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            direction: -1.0,
            speed,
            dead: false,
            anim_time: 0.0,
            removal_timer: 0.0,
        }
    }

    /// Walk one tick, then turn around if the next step is a wall or a ledge
    pub fn patrol(&mut self, solid: &SolidTileIndex, tuning: &Tuning, dt: f32) {
        if self.dead {
            return;
        }

        self.pos.x += self.direction * self.speed * dt;
        self.anim_time += ENEMY_ANIM_RATE * dt;

        let probe_x = self.pos.x + self.direction * tuning.enemy_probe_distance;
        let wall = solid.is_solid(probe_x, self.pos.y, tuning.enemy_hitbox);
        let ledge = !solid.is_solid(probe_x, self.pos.y - 1.0, tuning.enemy_hitbox);
        if wall || ledge {
            self.direction = -self.direction;
        }
    }

    /// Top edge used for the stomp test
    #[inline]
    pub fn top(&self, tuning: &Tuning) -> f32 {
        self.pos.y + tuning.enemy_half_height
    }

    /// Classify contact with the player (center-distance test, not full AABB)
    pub fn contact(&self, player_pos: Vec2, player_vy: f32, tuning: &Tuning) -> EnemyContact {
        if self.dead || player_pos.distance(self.pos) >= tuning.stomp_radius {
            return EnemyContact::None;
        }

        let player_bottom = player_pos.y - tuning.player_height / 2.0;
        if player_bottom > self.top(tuning) - tuning.stomp_tolerance && player_vy < 0.0 {
            EnemyContact::Stomp
        } else {
            EnemyContact::Hurt
        }
    }

    /// Mark defeated; it lingers for `enemy_removal_delay` before removal
    pub fn stomp(&mut self, tuning: &Tuning) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.removal_timer = tuning.enemy_removal_delay;
    }
}

/// Count down stomped enemies and drop the ones whose grace period ended
pub fn update_removals(enemies: &mut Vec<Enemy>, dt: f32) {
    for enemy in enemies.iter_mut().filter(|e| e.dead) {
        enemy.removal_timer -= dt;
    }
    enemies.retain(|e| !e.dead || e.removal_timer > 0.0);
}
