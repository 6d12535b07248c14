//! Player motion controller
//!
//! Grounded/airborne/jumping is derived each tick from collision results;
//! only `is_grounded` and `is_jumping` are stored.

use glam::{IVec2, Vec2};

use super::collision::{Aabb, SolidTileIndex, VerticalContact, resolve_x, resolve_y};
use super::input::Controls;
use crate::move_towards;
use crate::tuning::Tuning;

/// The single player actor
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hitbox size
    pub size: Vec2,
    pub is_grounded: bool,
    pub is_jumping: bool,
    pub facing_right: bool,
    pub coyote_timer: f32,
    pub jump_buffer_timer: f32,
    /// Jump key was already down last tick (edge detection)
    pub jump_latched: bool,
}

/// Side effects of one player step the tick has to act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// A jump executed this tick
    pub jumped: bool,
    /// Head hit a ceiling; the cell above the snap point
    pub head_cell: Option<IVec2>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: tuning.player_size(),
            is_grounded: false,
            is_jumping: false,
            facing_right: true,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            jump_latched: false,
        }
    }

    /// Put the player back at `pos` at rest
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.is_grounded = false;
        self.is_jumping = false;
        self.facing_right = true;
        self.coyote_timer = 0.0;
        self.jump_buffer_timer = 0.0;
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Bottom edge of the hitbox
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    /// Advance one tick: horizontal steering, X resolve, jump logic,
    /// gravity, Y resolve.
    pub fn step(
        &mut self,
        controls: Controls,
        solid: &SolidTileIndex,
        tuning: &Tuning,
        dt: f32,
    ) -> PlayerStep {
        let mut result = PlayerStep::default();

        // Horizontal steering
        let target_speed = if controls.left {
            self.facing_right = false;
            -tuning.move_speed
        } else if controls.right {
            self.facing_right = true;
            tuning.move_speed
        } else {
            0.0
        };

        let rate = if target_speed != 0.0 {
            tuning.effective_acceleration(self.is_grounded)
        } else {
            tuning.effective_friction(self.is_grounded)
        };
        self.vel.x = move_towards(self.vel.x, target_speed, rate * dt);

        let horizontal = resolve_x(solid, self.pos, self.vel.x, dt, self.size);
        self.pos.x = horizontal.x;
        self.vel.x = horizontal.vx;

        // Coyote time
        if self.is_grounded {
            self.coyote_timer = tuning.coyote_time;
            self.is_jumping = false;
        } else {
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }

        // Jump buffer, armed only on a released -> pressed edge
        if controls.jump && !self.jump_latched {
            self.jump_buffer_timer = tuning.jump_buffer;
            self.jump_latched = true;
        } else if !controls.jump {
            self.jump_latched = false;
        }
        self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);

        if self.jump_buffer_timer > 0.0 && self.coyote_timer > 0.0 {
            self.vel.y = tuning.jump_force;
            self.jump_buffer_timer = 0.0;
            self.coyote_timer = 0.0;
            self.is_jumping = true;
            self.is_grounded = false;
            result.jumped = true;
        }

        // Variable height: one cut per release
        if !controls.jump && self.vel.y > 0.0 && self.is_jumping {
            self.vel.y *= tuning.jump_cut;
            self.is_jumping = false;
        }

        self.vel.y = (self.vel.y + tuning.gravity * dt).max(tuning.max_fall_speed);

        let vertical = resolve_y(solid, self.pos.x, self.pos.y, self.vel.y, dt, self.size);
        self.pos.y = vertical.y;
        self.vel.y = vertical.vy;
        self.is_grounded = matches!(vertical.contact, VerticalContact::Floor);
        if let VerticalContact::Ceiling { head_cell } = vertical.contact {
            result.head_cell = Some(head_cell);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{LevelState, Theme};

    const DT: f32 = 0.01;

    fn flat_ground() -> SolidTileIndex {
        LevelState::parse(0, ".........\n#########", Theme::Day, &Tuning::default()).solid
    }

    fn landed(tuning: &Tuning, solid: &SolidTileIndex, x: f32) -> Player {
        let mut player = Player::new(tuning);
        player.respawn(Vec2::new(x, 2.0));
        for _ in 0..200 {
            player.step(Controls::default(), solid, tuning, DT);
        }
        assert!(player.is_grounded);
        player
    }

    #[test]
    fn test_lands_and_rests_on_floor() {
        let tuning = Tuning::default();
        let solid = flat_ground();
        let player = landed(&tuning, &solid, 4.0);
        assert!((player.feet() - 0.5).abs() < 0.01);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_stays_grounded_at_high_frame_rate() {
        let tuning = Tuning::default();
        let solid = flat_ground();
        let mut player = landed(&tuning, &solid, 4.0);
        player.vel.x = tuning.move_speed;

        let dt = 1.0 / 360.0;
        for n in 0..180 {
            player.step(Controls::default(), &solid, &tuning, dt);
            assert!(player.is_grounded, "lost the floor on tick {n}");
        }
        // Ground friction alone stops a full-speed slide in 0.4s
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_acceleration_is_bounded_and_friction_stops() {
        let tuning = Tuning::default();
        let solid = flat_ground();
        let mut player = landed(&tuning, &solid, 1.0);

        let right = Controls {
            right: true,
            ..Default::default()
        };
        player.step(right, &solid, &tuning, DT);
        assert!((player.vel.x - tuning.acceleration * DT).abs() < 1e-4);
        for _ in 0..30 {
            player.step(right, &solid, &tuning, DT);
        }
        assert!(player.vel.x <= tuning.move_speed);
        assert!(player.facing_right);

        for _ in 0..200 {
            player.step(Controls::default(), &solid, &tuning, DT);
        }
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_held_jump_does_not_retrigger() {
        let tuning = Tuning::default();
        let solid = flat_ground();
        let mut player = landed(&tuning, &solid, 4.0);

        let jump = Controls {
            jump: true,
            ..Default::default()
        };
        assert!(player.step(jump, &solid, &tuning, DT).jumped);

        let mut jumps = 0;
        for _ in 0..300 {
            if player.step(jump, &solid, &tuning, DT).jumped {
                jumps += 1;
            }
        }
        assert_eq!(jumps, 0, "holding jump must not bounce");
        assert!(player.is_grounded);
    }

    #[test]
    fn test_release_cuts_jump_once() {
        let tuning = Tuning::default();
        let solid = flat_ground();
        let mut player = landed(&tuning, &solid, 4.0);

        let jump = Controls {
            jump: true,
            ..Default::default()
        };
        player.step(jump, &solid, &tuning, DT);
        let before = player.vel.y;

        player.step(Controls::default(), &solid, &tuning, DT);
        let expected = before * tuning.jump_cut + tuning.gravity * DT;
        assert!((player.vel.y - expected).abs() < 1e-4);
        assert!(!player.is_jumping);

        // Staying released only applies gravity from here on
        let before = player.vel.y;
        player.step(Controls::default(), &solid, &tuning, DT);
        assert!((player.vel.y - (before + tuning.gravity * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_fall_speed_is_clamped() {
        let tuning = Tuning::default();
        let solid = SolidTileIndex::default();
        let mut player = Player::new(&tuning);
        player.respawn(Vec2::new(0.0, 100.0));
        for _ in 0..200 {
            player.step(Controls::default(), &solid, &tuning, DT);
        }
        assert_eq!(player.vel.y, tuning.max_fall_speed);
    }

    #[test]
    fn test_ceiling_reports_head_cell() {
        let tuning = Tuning::default();
        let solid = LevelState::parse(0, "..?..\n.....\n.....\n#####", Theme::Day, &tuning).solid;
        let mut player = landed(&tuning, &solid, 2.0);

        let jump = Controls {
            jump: true,
            ..Default::default()
        };
        let mut head = None;
        for _ in 0..30 {
            if let Some(cell) = player.step(jump, &solid, &tuning, DT).head_cell {
                head = Some(cell);
                break;
            }
        }
        assert_eq!(head, Some(IVec2::new(2, 3)));
        assert_eq!(player.vel.y, 0.0);
    }
}
