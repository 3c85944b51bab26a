//! Player kinematics against the cell grid.
//!
//! Top-down movement with no gravity. Each axis is tried separately: the
//! candidate position is accepted only if no solid cell lies under the
//! footprint, so the player slides along walls instead of sticking to them.

use sandfall_common::GridCoord;
use sandfall_kernel::{CollisionQuery, Grid};
use serde::{Deserialize, Serialize};

use crate::input::Vec2;
use crate::player::Player;

/// Inset applied to the max edges so a footprint flush against a cell
/// boundary does not sample the next cell over.
const SKIN_WIDTH: f32 = 0.001;

/// Axis-aligned bounding box for collision detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl AABB {
    /// Creates an AABB from center and half-extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }
}

/// Which axes were refused during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Horizontal move hit a solid cell
    pub blocked_x: bool,
    /// Vertical move hit a solid cell
    pub blocked_y: bool,
}

/// Player movement configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerKinematics {
    /// Move speed in world units per second
    pub speed: f32,
    /// Cell edge length in world units
    pub cell_size: f32,
    /// Speed multiplier while the player's centre is in liquid (1.0 = none)
    pub liquid_drag: f32,
}

impl Default for PlayerKinematics {
    fn default() -> Self {
        Self {
            speed: 150.0,
            cell_size: 4.0,
            liquid_drag: 1.0,
        }
    }
}

impl PlayerKinematics {
    /// Creates kinematics with the given speed and cell size.
    #[must_use]
    pub fn new(speed: f32, cell_size: f32) -> Self {
        Self {
            speed,
            cell_size,
            ..Default::default()
        }
    }

    /// Sets the liquid speed multiplier.
    #[must_use]
    pub fn with_liquid_drag(mut self, liquid_drag: f32) -> Self {
        self.liquid_drag = liquid_drag;
        self
    }

    /// Moves the player one frame.
    ///
    /// The input is normalised, X is resolved before Y, and the final
    /// position is clamped to the world rectangle. Liquids and gases never
    /// block.
    pub fn step(
        &self,
        player: &mut Player,
        grid: &Grid,
        input_direction: Vec2,
        dt: f32,
    ) -> StepResult {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let bounds = Vec2::new(
            grid.width() as f32 * self.cell_size,
            grid.height() as f32 * self.cell_size,
        );
        let half = player.half_extent();

        let mut position = player.position();
        let center = GridCoord::from_world(position.x, position.y, self.cell_size);
        let in_liquid = grid.is_liquid(center.x, center.y);

        let speed = if in_liquid {
            self.speed * self.liquid_drag
        } else {
            self.speed
        };
        let velocity = input_direction.normalized() * speed;

        let mut result = StepResult::default();

        let candidate_x = (position.x + velocity.x * dt).clamp(0.0, bounds.x);
        if self.footprint_blocked(grid, Vec2::new(candidate_x, position.y), half) {
            result.blocked_x = true;
        } else {
            position.x = candidate_x;
        }

        let candidate_y = (position.y + velocity.y * dt).clamp(0.0, bounds.y);
        if self.footprint_blocked(grid, Vec2::new(position.x, candidate_y), half) {
            result.blocked_y = true;
        } else {
            position.y = candidate_y;
        }

        position.x = position.x.clamp(0.0, bounds.x);
        position.y = position.y.clamp(0.0, bounds.y);

        player.set_position(position);
        player.set_motion(velocity, in_liquid);
        result
    }

    /// Checks whether any solid cell lies under a square footprint.
    ///
    /// Samples a lattice covering the corners and edges with spacing no
    /// larger than one cell, so no cell the footprint touches is skipped.
    #[must_use]
    pub fn footprint_blocked<C: CollisionQuery>(
        &self,
        query: &C,
        center: Vec2,
        half_extent: f32,
    ) -> bool {
        let aabb = AABB::from_center(center, half_extent, half_extent);
        let xs = samples(aabb.min_x, aabb.max_x - SKIN_WIDTH, self.cell_size);
        let ys = samples(aabb.min_y, aabb.max_y - SKIN_WIDTH, self.cell_size);

        ys.iter().any(|&y| {
            xs.iter().any(|&x| {
                let cell = GridCoord::from_world(x, y, self.cell_size);
                query.is_solid(cell.x, cell.y)
            })
        })
    }
}

/// Evenly spaced points from `min` to `max` inclusive, at most `spacing` apart.
fn samples(min: f32, max: f32, spacing: f32) -> Vec<f32> {
    if max <= min || spacing <= 0.0 {
        return vec![min];
    }
    let span = max - min;
    let segments = (span / spacing).ceil().max(1.0) as usize;
    (0..=segments)
        .map(|i| min + span * i as f32 / segments as f32)
        .collect()
}
