//! Terrain editing with a brush.
//!
//! The brush writes straight into the grid's current buffer between ticks.
//! Solid cells can only be cleared, never painted over, so building never
//! destroys walls.

use sandfall_common::GridCoord;
use sandfall_kernel::{Cell, Grid, LifeTable, MaterialKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::input::Vec2;

/// Errors that can occur when editing terrain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrushError {
    /// Build target overlaps the player's surroundings
    #[error("build target is {distance:.2} cells from the player (clearance {clearance})")]
    TooCloseToPlayer {
        /// Distance from the brush centre to the player, in cells
        distance: f32,
        /// Required clearance, in cells
        clearance: f32,
    },
}

/// Neighbourhood covered by one brush stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushShape {
    /// Every cell within Chebyshev distance `radius`
    #[default]
    Square,
    /// Every cell within Manhattan distance `radius`
    Diamond,
}

impl BrushShape {
    /// Whether the offset `(dx, dy)` from the centre is covered.
    #[must_use]
    pub fn contains(self, dx: i64, dy: i64, radius: u32) -> bool {
        let radius = i64::from(radius);
        match self {
            Self::Square => dx.abs() <= radius && dy.abs() <= radius,
            Self::Diamond => dx.abs() + dy.abs() <= radius,
        }
    }
}

/// Modified cell tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifiedCell {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
    /// Previous cell state
    pub old_cell: Cell,
    /// New cell state
    pub new_cell: Cell,
}

/// Paints `material` over the brush neighbourhood of `center`.
///
/// Off-grid cells are skipped. A solid cell is only replaced when
/// `material` is [`MaterialKind::Empty`]. New cells get their default tag;
/// liquids and Fire also get their initial life from `lives`. Returns every
/// cell that changed.
pub fn apply(
    grid: &mut Grid,
    center: GridCoord,
    radius: u32,
    material: MaterialKind,
    shape: BrushShape,
    lives: &LifeTable,
) -> Vec<ModifiedCell> {
    let mut modified = Vec::new();
    let new_cell = Cell::painted(material, lives);

    // Clip the brush square to the grid before visiting any cell
    let reach = i64::from(radius);
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let x_range = (cx - reach).max(0)..=(cx + reach).min(i64::from(grid.width()) - 1);
    let y_range = (cy - reach).max(0)..=(cy + reach).min(i64::from(grid.height()) - 1);

    for y in y_range {
        for x in x_range.clone() {
            if !shape.contains(x - cx, y - cy, radius) {
                continue;
            }

            let at = GridCoord::new(x as i32, y as i32);
            let Some(old_cell) = grid.get(at.x, at.y) else {
                continue;
            };

            if material != MaterialKind::Empty && old_cell.is_solid() {
                continue;
            }
            if old_cell == new_cell {
                continue;
            }

            grid.set(at.x, at.y, new_cell);
            modified.push(ModifiedCell {
                x: at.x,
                y: at.y,
                old_cell,
                new_cell,
            });
        }
    }

    modified
}

/// Number of palette slots.
pub const PALETTE_SLOTS: usize = 8;

/// Materials the player can paint, in hotkey order.
const DEFAULT_PALETTE: [MaterialKind; PALETTE_SLOTS] = [
    MaterialKind::Stone,
    MaterialKind::Dirt,
    MaterialKind::Sand,
    MaterialKind::Water,
    MaterialKind::Lava,
    MaterialKind::Wood,
    MaterialKind::Fire,
    MaterialKind::Empty,
];

/// Fixed list of paintable materials with one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialPalette {
    slots: [MaterialKind; PALETTE_SLOTS],
    selected: usize,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            slots: DEFAULT_PALETTE,
            selected: 0,
        }
    }
}

impl MaterialPalette {
    /// All slots in order.
    #[must_use]
    pub fn slots(&self) -> &[MaterialKind; PALETTE_SLOTS] {
        &self.slots
    }

    /// Index of the selected slot.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Material in the selected slot.
    #[must_use]
    pub fn selected(&self) -> MaterialKind {
        self.slots[self.selected]
    }

    /// Selects a slot; out-of-range indices are ignored.
    ///
    /// Returns whether the selection changed to `index`.
    pub fn select(&mut self, index: usize) -> bool {
        if index < PALETTE_SLOTS {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Cycle to next material.
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % PALETTE_SLOTS;
    }

    /// Cycle to previous material.
    pub fn prev(&mut self) {
        self.selected = if self.selected == 0 {
            PALETTE_SLOTS - 1
        } else {
            self.selected - 1
        };
    }
}

/// Maximum brush radius.
pub const MAX_BRUSH_RADIUS: u32 = 8;
/// Default brush radius.
pub const DEFAULT_BRUSH_RADIUS: u32 = 2;
/// Default build clearance around the player, in cells.
pub const DEFAULT_CLEARANCE: f32 = 3.0;

/// The player's editing tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    palette: MaterialPalette,
    radius: u32,
    shape: BrushShape,
    clearance: f32,
    lives: LifeTable,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_RADIUS, BrushShape::default(), LifeTable::default())
    }
}

impl Brush {
    /// Creates a brush; the radius is clamped to `0..=MAX_BRUSH_RADIUS`.
    #[must_use]
    pub fn new(radius: u32, shape: BrushShape, lives: LifeTable) -> Self {
        Self {
            palette: MaterialPalette::default(),
            radius: radius.min(MAX_BRUSH_RADIUS),
            shape,
            clearance: DEFAULT_CLEARANCE,
            lives,
        }
    }

    /// The material palette.
    #[must_use]
    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Mutable access to the palette.
    pub fn palette_mut(&mut self) -> &mut MaterialPalette {
        &mut self.palette
    }

    /// Get brush radius.
    #[must_use]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Set brush radius (clamped to valid range).
    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.min(MAX_BRUSH_RADIUS);
    }

    /// Brush neighbourhood shape.
    #[must_use]
    pub fn shape(&self) -> BrushShape {
        self.shape
    }

    /// Build clearance in cells.
    #[must_use]
    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    /// Clears everything under the brush.
    pub fn mine(&self, grid: &mut Grid, center: GridCoord) -> Vec<ModifiedCell> {
        let modified = apply(
            grid,
            center,
            self.radius,
            MaterialKind::Empty,
            self.shape,
            &self.lives,
        );
        debug!(
            "Mined {} cells at ({}, {})",
            modified.len(),
            center.x,
            center.y
        );
        modified
    }

    /// Paints the selected material under the brush.
    ///
    /// `player_cell` is the player's position in grid units. Building is
    /// refused when the brush centre is within the clearance distance.
    pub fn build(
        &self,
        grid: &mut Grid,
        center: GridCoord,
        player_cell: Vec2,
    ) -> Result<Vec<ModifiedCell>, BrushError> {
        let distance = Vec2::new(center.x as f32, center.y as f32).distance(player_cell);
        if distance <= self.clearance {
            return Err(BrushError::TooCloseToPlayer {
                distance,
                clearance: self.clearance,
            });
        }

        let material = self.palette.selected();
        let modified = apply(grid, center, self.radius, material, self.shape, &self.lives);
        debug!(
            "Built {} cells of {} at ({}, {})",
            modified.len(),
            material.name(),
            center.x,
            center.y
        );
        Ok(modified)
    }
}
