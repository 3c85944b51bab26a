//! Headless frame loop.
//!
//! Drives a [`Session`] with a fixed demo script instead of a keyboard and
//! mouse, logging progress as it goes. The script pours water and lava,
//! builds a wood pile, sets it alight and digs a hole while the player walks
//! a square.

use anyhow::{Context, Result};
use sandfall_common::GridCoord;
use sandfall_gameplay::{FrameInput, Session, Vec2};
use sandfall_kernel::{MaterialKind, TickStats};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::timing::FrameTiming;

/// Frames spent walking in each direction.
const LEG_FRAMES: u64 = 90;

/// Palette slots used by the script.
const SLOT_WATER: usize = 3;
const SLOT_LAVA: usize = 4;
const SLOT_WOOD: usize = 5;
const SLOT_FIRE: usize = 6;

/// Deterministic input source for headless runs.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    width: i32,
    height: i32,
    frame: u64,
}

impl ScriptedInput {
    /// Creates a script for a grid of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            frame: 0,
        }
    }

    /// Produces the input for the next frame.
    pub fn next_input(&mut self, dt: f32) -> FrameInput {
        let frame = self.frame;
        self.frame += 1;

        let movement = match (frame / LEG_FRAMES) % 4 {
            0 => Vec2::RIGHT,
            1 => Vec2::DOWN,
            2 => Vec2::LEFT,
            _ => Vec2::UP,
        };
        let mut input = FrameInput::walking(movement, dt);

        let (w, h) = (self.width, self.height);
        let pile = GridCoord::new(w / 2, h / 5);
        match frame {
            30 => Self::paint(&mut input, SLOT_WATER, GridCoord::new(w / 4, h / 4)),
            60 => Self::paint(&mut input, SLOT_LAVA, GridCoord::new(3 * w / 4, h / 4)),
            120 => Self::paint(&mut input, SLOT_WOOD, pile),
            121 => Self::paint(&mut input, SLOT_FIRE, pile.offset(5, 0)),
            f if f % 150 == 75 => input.mine = Some(GridCoord::new(w / 3, h / 2)),
            _ => {},
        }

        input
    }

    fn paint(input: &mut FrameInput, slot: usize, at: GridCoord) {
        input.select_slot = Some(slot);
        input.build = Some(at);
    }
}

/// Totals from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Seed the world was generated from
    pub seed: u32,
    /// Frames run
    pub frames: u64,
    /// Automaton ticks run
    pub ticks: u64,
    /// Summed automaton stats
    pub totals: TickStats,
    /// Cells of each material at the end
    pub counts: Vec<(MaterialKind, usize)>,
}

/// Runs a full headless session.
pub fn run(config: &SimConfig) -> Result<RunSummary> {
    let seed = config.world_seed.unwrap_or_else(|| fastrand::u32(..));
    let mut session =
        Session::new(config.session_config(seed)).context("Failed to create session")?;
    let mut script = ScriptedInput::new(session.grid().width(), session.grid().height());
    let mut timing = FrameTiming::new(config.tick_rate);
    let target = u64::from(config.frames);

    info!(
        "Running {} frames at {} ticks/s ({})",
        target,
        timing.tick_rate(),
        if config.realtime { "realtime" } else { "flat out" }
    );

    while session.frame_count() < target {
        let dt = if config.realtime {
            timing.delta_time()
        } else {
            timing.fixed_dt()
        };
        let updates = timing.accumulate(dt);

        for _ in 0..updates {
            if session.frame_count() >= target {
                break;
            }
            let input = script.next_input(timing.fixed_dt());
            let report = session.frame(&input);
            if report.build_refused {
                debug!("Scripted build refused at frame {}", session.frame_count());
            }
            log_progress(&session, config.report_interval);
        }

        if config.realtime {
            timing.sleep_remainder();
        }
    }

    let summary = RunSummary {
        seed,
        frames: session.frame_count(),
        ticks: session.tick_count(),
        totals: session.totals(),
        counts: MaterialKind::ALL
            .into_iter()
            .map(|kind| (kind, session.grid().count(kind)))
            .collect(),
    };

    info!(
        "Run complete: {} frames, {} moves, {} conflicts, {} ignitions, {} decays",
        summary.frames,
        summary.totals.moves,
        summary.totals.conflicts,
        summary.totals.ignitions,
        summary.totals.decays
    );

    Ok(summary)
}

fn log_progress(session: &Session, interval: u32) {
    if interval == 0 || session.frame_count() % u64::from(interval) != 0 {
        return;
    }

    let grid = session.grid();
    let player = session.player().position();
    info!(
        frame = session.frame_count(),
        water = grid.count(MaterialKind::Water),
        lava = grid.count(MaterialKind::Lava),
        fire = grid.count(MaterialKind::Fire),
        smoke = grid.count(MaterialKind::Smoke),
        "player at ({:.1}, {:.1})",
        player.x,
        player.y
    );
}
