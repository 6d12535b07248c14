//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON file can override any subset
//! of them without a rebuild. Defaults reproduce the shipped feel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Physics and gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player motion ===
    /// Gravity acceleration (units/s², negative is down)
    pub gravity: f32,
    /// Target horizontal speed while a direction is held
    pub move_speed: f32,
    /// Initial vertical velocity of a jump
    pub jump_force: f32,
    /// Horizontal acceleration toward the target speed (grounded)
    pub acceleration: f32,
    /// Fraction of `acceleration` available while airborne
    pub air_control: f32,
    /// Horizontal deceleration with no direction held (grounded only)
    pub friction: f32,
    /// Terminal fall velocity (negative)
    pub max_fall_speed: f32,
    /// Multiplier applied to upward velocity when jump is released early
    pub jump_cut: f32,
    /// Grace period after leaving ground during which a jump still works
    pub coyote_time: f32,
    /// Grace period before landing during which a jump press is remembered
    pub jump_buffer: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Player appears this far above the spawn tile
    pub spawn_drop: f32,

    // === Session ===
    /// Seconds on the clock at the start of a run
    pub time_budget: f32,
    /// Falling below this height kills the player
    pub death_plane_y: f32,
    /// Frames longer than this are skipped entirely
    pub max_frame_dt: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    /// Lookahead used for wall and ledge probes
    pub enemy_probe_distance: f32,
    /// Hitbox used for enemy tile probes
    pub enemy_hitbox: Vec2,
    /// Distance from enemy center to its top
    pub enemy_half_height: f32,
    /// Player/enemy contact distance (center to center)
    pub stomp_radius: f32,
    /// How far below the enemy top the player's feet may be and still stomp
    pub stomp_tolerance: f32,
    /// Rebound velocity after a stomp, as a fraction of `jump_force`
    pub stomp_bounce: f32,
    /// Seconds a stomped enemy lingers before removal
    pub enemy_removal_delay: f32,

    // === Pickups and triggers ===
    pub coin_pickup_radius: f32,
    pub flag_width: f32,
    pub flag_height: f32,
    /// Lifetime of the reward popup spawned by a block
    pub popup_lifetime: f32,

    // === Scoring ===
    pub coin_reward: u32,
    pub block_reward: u32,
    pub stomp_reward: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -65.0,
            move_speed: 10.0,
            jump_force: 24.0,
            acceleration: 40.0,
            air_control: 0.5,
            friction: 25.0,
            max_fall_speed: -30.0,
            jump_cut: 0.5,
            coyote_time: 0.1,
            jump_buffer: 0.15,
            player_width: 0.5,
            player_height: 0.9,
            spawn_drop: 2.0,

            time_budget: 400.0,
            death_plane_y: -5.0,
            max_frame_dt: 0.1,

            enemy_speed: 3.5,
            enemy_probe_distance: 0.5,
            enemy_hitbox: Vec2::new(0.5, 0.8),
            enemy_half_height: 0.4,
            stomp_radius: 0.8,
            stomp_tolerance: 0.2,
            stomp_bounce: 0.6,
            enemy_removal_delay: 0.2,

            coin_pickup_radius: 1.0,
            flag_width: 1.0,
            flag_height: 10.0,
            popup_lifetime: 0.5,

            coin_reward: 1,
            block_reward: 5,
            stomp_reward: 10,
        }
    }
}

impl Tuning {
    /// Player hitbox size
    #[inline]
    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    /// Acceleration available in the current grounded state
    #[inline]
    pub fn effective_acceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.acceleration
        } else {
            self.acceleration * self.air_control
        }
    }

    /// Friction available in the current grounded state (no air friction)
    #[inline]
    pub fn effective_friction(&self, grounded: bool) -> f32 {
        if grounded { self.friction } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": -40.0, "coin_reward": 3 }"#).unwrap();
        assert_eq!(tuning.gravity, -40.0);
        assert_eq!(tuning.coin_reward, 3);
        assert_eq!(tuning.jump_force, Tuning::default().jump_force);
        assert_eq!(tuning.enemy_hitbox, Vec2::new(0.5, 0.8));
    }

    #[test]
    fn test_air_control_halves_acceleration() {
        let tuning = Tuning::default();
        assert_eq!(tuning.effective_acceleration(true), 40.0);
        assert_eq!(tuning.effective_acceleration(false), 20.0);
        assert_eq!(tuning.effective_friction(false), 0.0);
    }
}
