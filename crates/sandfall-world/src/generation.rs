//! Procedural world generation.
//!
//! A generator fills both grid buffers and the floor layer. Running it again
//! with the same seed and config reproduces the same world exactly, which is
//! what a reset relies on.

use noise::{NoiseFn, Perlin};
use sandfall_common::{GridCoord, GridError};
use sandfall_kernel::{Cell, Grid, LifeTable, MaterialKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    /// Threshold a seeded noise field into lakes, beaches, open ground and rock
    #[default]
    Noise,
    /// Flat bands of stone and dirt along the bottom, open above
    Arena,
}

/// World generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Layout strategy
    pub mode: GeneratorMode,
    /// Terrain scale (larger = smoother)
    pub terrain_scale: f64,
    /// Normalized heights below this become water
    pub water_level: f64,
    /// Normalized heights below this (and above water) become sand
    pub sand_level: f64,
    /// Normalized heights at or above this become stone
    pub stone_level: f64,
    /// Stone rows along the bottom in arena mode
    pub arena_stone_rows: u32,
    /// Dirt rows above the stone in arena mode
    pub arena_dirt_rows: u32,
    /// Lives given to generated liquids
    pub lives: LifeTable,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            mode: GeneratorMode::Noise,
            terrain_scale: 24.0,
            water_level: 0.3,
            sand_level: 0.36,
            stone_level: 0.68,
            arena_stone_rows: 4,
            arena_dirt_rows: 6,
            lives: LifeTable::default(),
        }
    }
}

/// Procedural world generator.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: GeneratorConfig,
}

impl WorldGenerator {
    /// Creates a new generator with the given config.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds a fresh world for `seed`.
    ///
    /// Arena layouts ignore the seed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroDimension`] if the configured size is empty.
    pub fn generate(&self, seed: u32) -> Result<Grid, GridError> {
        let mut grid = Grid::new(self.config.width, self.config.height)?;
        self.fill(&mut grid, seed);
        Ok(grid)
    }

    /// Overwrites every cell and floor entry of an existing grid.
    ///
    /// Used for resets so the grid allocation is reused. The grid keeps its
    /// own dimensions.
    pub fn fill(&self, grid: &mut Grid, seed: u32) {
        match self.config.mode {
            GeneratorMode::Noise => self.fill_noise(grid, seed),
            GeneratorMode::Arena => self.fill_arena(grid),
        }
        grid.snapshot();

        info!(
            "Generated {:?} world {}x{} (seed {}): {} stone, {} water, {} sand",
            self.config.mode,
            grid.width(),
            grid.height(),
            seed,
            grid.count(MaterialKind::Stone),
            grid.count(MaterialKind::Water),
            grid.count(MaterialKind::Sand),
        );
    }

    fn fill_noise(&self, grid: &mut Grid, seed: u32) {
        let terrain_noise = Perlin::new(seed);
        let detail_noise = Perlin::new(seed.wrapping_add(1));
        let scale = self.config.terrain_scale;

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let wx = f64::from(x) / scale;
                let wy = f64::from(y) / scale;

                let height = terrain_noise.get([wx, wy]);
                let detail = detail_noise.get([wx * 4.0, wy * 4.0]);
                let combined = ((height + detail * 0.1 + 1.0) / 2.0).clamp(0.0, 1.0);

                let material = self.height_to_material(combined);
                let mut cell = Cell::spawn(material, &self.config.lives);
                if cell.is_solid() {
                    // Grain so flat regions are not one flat colour
                    cell = cell.with_tag(cell.tag.shaded((detail * 12.0) as i16));
                }

                grid.set(x, y, cell);
                grid.set_floor(x, y, MaterialKind::Dirt);
            }
        }
    }

    fn fill_arena(&self, grid: &mut Grid) {
        let height = grid.height();
        let stone_top = height.saturating_sub(self.config.arena_stone_rows);
        let dirt_top = stone_top.saturating_sub(self.config.arena_dirt_rows);

        for y in 0..height {
            let material = if y >= stone_top {
                MaterialKind::Stone
            } else if y >= dirt_top {
                MaterialKind::Dirt
            } else {
                MaterialKind::Empty
            };
            for x in 0..grid.width() {
                grid.set(x as i32, y as i32, Cell::spawn(material, &self.config.lives));
                grid.set_floor(x as i32, y as i32, MaterialKind::Dirt);
            }
        }
    }

    /// Converts a normalized height (0-1) to a foreground material.
    fn height_to_material(&self, height: f64) -> MaterialKind {
        match height {
            h if h < self.config.water_level => MaterialKind::Water,
            h if h < self.config.sand_level => MaterialKind::Sand,
            h if h < self.config.stone_level => MaterialKind::Empty,
            _ => MaterialKind::Stone,
        }
    }
}

/// Finds a world-space spawn position whose cell is not solid.
///
/// Searches square rings outward from the grid centre and returns the centre
/// of the first open cell, or `None` if every cell is solid.
#[must_use]
pub fn spawn_point(grid: &Grid, cell_size: f32) -> Option<(f32, f32)> {
    spawn_point_clear(grid, cell_size, 0)
}

/// Like [`spawn_point`], but every cell within Chebyshev distance `clearance`
/// of the chosen cell must also be open (off-grid cells count as open).
#[must_use]
pub fn spawn_point_clear(grid: &Grid, cell_size: f32, clearance: u32) -> Option<(f32, f32)> {
    let center = GridCoord::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
    let max_ring = grid.width().max(grid.height()) as i32;

    for ring in 0..=max_ring {
        for dy in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs() != ring && dy.abs() != ring {
                    continue;
                }
                let probe = center.offset(dx, dy);
                if grid.in_bounds(probe.x, probe.y) && area_open(grid, probe, clearance as i32) {
                    debug!("Spawn point at cell ({}, {})", probe.x, probe.y);
                    return Some((
                        (probe.x as f32 + 0.5) * cell_size,
                        (probe.y as f32 + 0.5) * cell_size,
                    ));
                }
            }
        }
    }

    None
}

fn area_open(grid: &Grid, center: GridCoord, clearance: i32) -> bool {
    (-clearance..=clearance).all(|dy| {
        (-clearance..=clearance).all(|dx| {
            let at = center.offset(dx, dy);
            grid.get(at.x, at.y).map_or(true, |cell| !cell.is_solid())
        })
    })
}
