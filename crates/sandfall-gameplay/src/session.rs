//! Frame sequencing.
//!
//! A [`Session`] owns the grid and everything that touches it. Each frame
//! runs in a fixed order so nothing ever interleaves with an automaton scan:
//!
//! 1. palette selection
//! 2. mine, then build
//! 3. world reset
//! 4. player movement
//! 5. one automaton tick

use sandfall_common::{GridCoord, SandfallResult};
use sandfall_kernel::{Automaton, Grid, MaterialKind, SeededEntropy, SimulationParams, TickStats};
use sandfall_world::{spawn_point, spawn_point_clear, GeneratorConfig, WorldGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::input::{FrameInput, Vec2};
use crate::physics::{PlayerKinematics, StepResult};
use crate::player::Player;
use crate::terrain_manipulation::{apply, Brush, BrushShape};

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// World layout and size
    pub generator: GeneratorConfig,
    /// Cell edge length in world units
    pub cell_size: f32,
    /// World and entropy seed
    pub seed: u32,
    /// Automaton rates and lives
    pub params: SimulationParams,
    /// Brush radius in cells
    pub brush_radius: u32,
    /// Brush neighbourhood
    pub brush_shape: BrushShape,
    /// Player speed in world units per second
    pub player_speed: f32,
    /// Half the player's footprint edge
    pub player_half_extent: f32,
    /// Player speed multiplier in liquid
    pub liquid_drag: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            cell_size: 4.0,
            seed: 12345,
            params: SimulationParams::default(),
            brush_radius: 2,
            brush_shape: BrushShape::Square,
            player_speed: 150.0,
            player_half_extent: 6.0,
            liquid_drag: 1.0,
        }
    }
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameReport {
    /// Cells changed by the brush
    pub edited: usize,
    /// A build was asked for but refused near the player
    pub build_refused: bool,
    /// The world was regenerated
    pub reset: bool,
    /// Player movement hit a wall on either axis
    pub player_blocked: bool,
    /// Moves committed by the automaton
    pub moves: u32,
    /// Moves dropped by the automaton
    pub conflicts: u32,
}

/// A running simulation with one player.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    generator: WorldGenerator,
    grid: Grid,
    automaton: Automaton,
    entropy: SeededEntropy,
    player: Player,
    kinematics: PlayerKinematics,
    brush: Brush,
    frames: u64,
    totals: TickStats,
}

impl Session {
    /// Generates the world and spawns the player.
    ///
    /// # Errors
    ///
    /// Returns a grid error if the configured world size is empty.
    pub fn new(config: SessionConfig) -> SandfallResult<Self> {
        let mut generator_config = config.generator.clone();
        generator_config.lives = config.params.lives;
        let generator = WorldGenerator::new(generator_config);

        let mut grid = generator.generate(config.seed)?;
        let spawn = place_player(&mut grid, &config);
        let player = Player::new(spawn, config.player_half_extent);

        let kinematics = PlayerKinematics::new(config.player_speed, config.cell_size)
            .with_liquid_drag(config.liquid_drag);
        let brush = Brush::new(config.brush_radius, config.brush_shape, config.params.lives);

        info!(
            "Session started: {}x{} cells, seed {}, player at ({:.1}, {:.1})",
            grid.width(),
            grid.height(),
            config.seed,
            spawn.x,
            spawn.y
        );

        Ok(Self {
            automaton: Automaton::new(config.params),
            entropy: SeededEntropy::new(u64::from(config.seed)),
            generator,
            grid,
            player,
            kinematics,
            brush,
            frames: 0,
            totals: TickStats::default(),
            config,
        })
    }

    /// Runs one frame.
    pub fn frame(&mut self, input: &FrameInput) -> FrameReport {
        let mut report = FrameReport::default();

        if let Some(slot) = input.select_slot {
            if self.brush.palette_mut().select(slot) {
                debug!("Selected slot {} ({})", slot, self.brush.palette().selected().name());
            }
        }

        if let Some(target) = input.mine {
            report.edited += self.brush.mine(&mut self.grid, target).len();
        }

        if let Some(target) = input.build {
            let player_cell = self.player.grid_position(self.config.cell_size);
            match self.brush.build(&mut self.grid, target, player_cell) {
                Ok(modified) => report.edited += modified.len(),
                Err(err) => {
                    debug!("Build refused: {}", err);
                    report.build_refused = true;
                },
            }
        }

        if input.reset {
            self.reset();
            report.reset = true;
        }

        let StepResult {
            blocked_x,
            blocked_y,
        } = self
            .kinematics
            .step(&mut self.player, &self.grid, input.movement, input.dt);
        report.player_blocked = blocked_x || blocked_y;

        let stats = self.automaton.step(&mut self.grid, &mut self.entropy);
        self.totals.accumulate(&stats);
        report.moves = stats.moves;
        report.conflicts = stats.conflicts;

        self.frames += 1;
        report
    }

    /// Regenerates the world from the session seed and respawns the player.
    ///
    /// The automaton's random stream restarts too, so a reset world evolves
    /// exactly like a freshly created one.
    pub fn reset(&mut self) {
        self.generator.fill(&mut self.grid, self.config.seed);
        self.entropy.reseed(u64::from(self.config.seed));
        let spawn = place_player(&mut self.grid, &self.config);
        self.player.respawn(spawn);
        info!("World reset, player respawned at ({:.1}, {:.1})", spawn.x, spawn.y);
    }

    /// The world grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The editing tool.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Mutable access to the editing tool.
    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Automaton ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.automaton.tick_count()
    }

    /// Automaton stats summed over the whole session.
    #[must_use]
    pub fn totals(&self) -> TickStats {
        self.totals
    }
}

/// Picks a spawn position, carving out room if the world has none.
fn place_player(grid: &mut Grid, config: &SessionConfig) -> Vec2 {
    let cell_size = config.cell_size;
    let clearance = (config.player_half_extent / cell_size).ceil() as u32;

    let found =
        spawn_point_clear(grid, cell_size, clearance).or_else(|| spawn_point(grid, cell_size));
    if let Some((x, y)) = found {
        return Vec2::new(x, y);
    }

    warn!("No open cell for the player; clearing the world centre");
    let center = GridCoord::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
    apply(
        grid,
        center,
        clearance,
        MaterialKind::Empty,
        BrushShape::Square,
        &config.params.lives,
    );
    grid.snapshot();
    Vec2::new(
        (center.x as f32 + 0.5) * cell_size,
        (center.y as f32 + 0.5) * cell_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandfall_kernel::{Cell, CollisionQuery};
    use sandfall_world::GeneratorMode;

    fn arena_config() -> SessionConfig {
        SessionConfig {
            generator: GeneratorConfig {
                width: 40,
                height: 30,
                mode: GeneratorMode::Arena,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn noise_config() -> SessionConfig {
        SessionConfig {
            generator: GeneratorConfig {
                width: 48,
                height: 36,
                mode: GeneratorMode::Noise,
                ..Default::default()
            },
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_player_spawns_in_open_space() {
        let session = Session::new(noise_config()).expect("session");
        let kinematics = PlayerKinematics::new(1.0, 4.0);
        let player = session.player();

        assert!(!kinematics.footprint_blocked(
            session.grid(),
            player.position(),
            player.half_extent()
        ));
    }

    #[test]
    fn test_zero_size_world_rejected() {
        let mut config = arena_config();
        config.generator.height = 0;
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_frame_advances_one_tick() {
        let mut session = Session::new(arena_config()).expect("session");

        session.frame(&FrameInput::idle(1.0 / 60.0));
        session.frame(&FrameInput::idle(1.0 / 60.0));

        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.tick_count(), 2);
    }

    #[test]
    fn test_slot_selection() {
        let mut session = Session::new(arena_config()).expect("session");

        session.frame(&FrameInput {
            select_slot: Some(3),
            ..FrameInput::idle(0.0)
        });
        assert_eq!(session.brush().palette().selected(), MaterialKind::Water);

        session.frame(&FrameInput {
            select_slot: Some(42),
            ..FrameInput::idle(0.0)
        });
        assert_eq!(session.brush().palette().selected(), MaterialKind::Water);
    }

    #[test]
    fn test_mine_then_build() {
        let mut session = Session::new(arena_config()).expect("session");
        // Arena: stone rows 26..=29, dirt rows 20..=25
        let target = GridCoord::new(3, 24);

        let report = session.frame(&FrameInput {
            mine: Some(target),
            ..FrameInput::idle(0.0)
        });
        assert_eq!(report.edited, 25);
        assert!(!session.grid().is_solid(3, 24));

        session.brush_mut().palette_mut().select(5);
        let report = session.frame(&FrameInput {
            build: Some(target),
            ..FrameInput::idle(0.0)
        });
        assert!(!report.build_refused);
        assert_eq!(
            session.grid().get(3, 24).map(|c| c.material),
            Some(MaterialKind::Wood)
        );
    }

    #[test]
    fn test_build_refused_on_player() {
        let mut session = Session::new(arena_config()).expect("session");
        let at = session.player().position();
        let target = GridCoord::from_world(at.x, at.y, 4.0);

        let report = session.frame(&FrameInput {
            build: Some(target),
            ..FrameInput::idle(0.0)
        });

        assert!(report.build_refused);
        assert_eq!(report.edited, 0);
        assert!(!session.grid().is_solid(target.x, target.y));
    }

    #[test]
    fn test_reset_restores_world() {
        let mut session = Session::new(noise_config()).expect("session");
        let initial = session.grid().clone();

        for _ in 0..10 {
            session.frame(&FrameInput {
                mine: Some(GridCoord::new(10, 10)),
                ..FrameInput::walking(Vec2::RIGHT, 0.05)
            });
        }
        session.reset();

        assert_eq!(session.grid(), &initial);
    }

    #[test]
    fn test_reset_replays_fresh_session() {
        let mut fresh = Session::new(noise_config()).expect("session");
        let mut replayed = Session::new(noise_config()).expect("session");

        for _ in 0..20 {
            replayed.frame(&FrameInput::walking(Vec2::DOWN, 0.05));
        }
        replayed.frame(&FrameInput {
            reset: true,
            ..FrameInput::idle(0.05)
        });
        fresh.frame(&FrameInput::idle(0.05));

        for _ in 0..20 {
            fresh.frame(&FrameInput::idle(0.05));
            replayed.frame(&FrameInput::idle(0.05));
        }

        assert_eq!(fresh.grid(), replayed.grid());
        assert_eq!(fresh.player().position(), replayed.player().position());
    }

    #[test]
    fn test_reset_via_frame_respawns_player() {
        let mut session = Session::new(arena_config()).expect("session");
        let spawn = session.player().position();

        for _ in 0..5 {
            session.frame(&FrameInput::walking(Vec2::LEFT, 0.1));
        }
        assert_ne!(session.player().position(), spawn);

        let report = session.frame(&FrameInput {
            reset: true,
            ..FrameInput::idle(0.0)
        });

        assert!(report.reset);
        assert_eq!(session.player().position(), spawn);
    }

    #[test]
    fn test_poured_water_spreads() {
        let mut session = Session::new(arena_config()).expect("session");
        session.brush_mut().palette_mut().select(3);

        let report = session.frame(&FrameInput {
            build: Some(GridCoord::new(4, 10)),
            ..FrameInput::idle(0.0)
        });
        assert!(!report.build_refused);
        let water = session.grid().count(MaterialKind::Water);
        assert_eq!(water, 25);

        for _ in 0..30 {
            session.frame(&FrameInput::idle(1.0 / 60.0));
        }

        assert_eq!(session.grid().count(MaterialKind::Water), water);
        assert!(session.totals().moves > 0);
    }

    #[test]
    fn test_all_solid_world_carves_spawn() {
        let mut grid = Grid::filled(10, 10, Cell::new(MaterialKind::Stone)).expect("valid grid");
        let config = SessionConfig::default();

        let spawn = place_player(&mut grid, &config);

        let cell = GridCoord::from_world(spawn.x, spawn.y, config.cell_size);
        assert_eq!(cell, GridCoord::new(5, 5));
        assert!(!grid.is_solid(5, 5));
        assert!(!grid.is_solid(3, 7));
    }
}
