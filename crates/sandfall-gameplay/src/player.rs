//! Player entity.
//!
//! The player lives in continuous world space and is independent of grid
//! coordinates. Movement rules are in [`crate::physics`].

use sandfall_common::Direction;
use serde::{Deserialize, Serialize};

use crate::input::Vec2;

/// What the player is doing, for the renderer and HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Standing still
    #[default]
    Idle,
    /// Moving over dry ground
    Walking,
    /// Standing or moving in liquid
    Wading,
}

/// The player entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    half_extent: f32,
    facing: Direction,
    state: PlayerState,
}

impl Player {
    /// Creates a player centred on `position` with a square footprint.
    #[must_use]
    pub fn new(position: Vec2, half_extent: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extent,
            facing: Direction::Down,
            state: PlayerState::Idle,
        }
    }

    /// Centre of the footprint in world units.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity from the last step.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Half the footprint edge length.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Direction of the last movement.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Position in grid units (not rounded).
    #[must_use]
    pub fn grid_position(&self, cell_size: f32) -> Vec2 {
        self.position.scale(1.0 / cell_size)
    }

    /// Moves the player without any collision checks.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Places the player at `position` at rest.
    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.state = PlayerState::Idle;
    }

    pub(crate) fn set_motion(&mut self, velocity: Vec2, in_liquid: bool) {
        self.velocity = velocity;
        if let Some(facing) = facing_from(velocity) {
            self.facing = facing;
        }
        self.state = if in_liquid {
            PlayerState::Wading
        } else if velocity == Vec2::ZERO {
            PlayerState::Idle
        } else {
            PlayerState::Walking
        };
    }
}

/// Dominant direction of a movement vector.
fn facing_from(v: Vec2) -> Option<Direction> {
    if v.x == 0.0 && v.y == 0.0 {
        return None;
    }

    if v.x.abs() > v.y.abs() {
        if v.x > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if v.y > 0.0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}
