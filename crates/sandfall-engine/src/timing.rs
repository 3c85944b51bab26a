//! Frame pacing.
//!
//! The automaton always advances in fixed ticks. Frame time feeds an
//! accumulator that says how many ticks are due. Realtime runs measure the
//! wall clock; flat-out runs feed exactly one tick's worth of time per frame.

use std::time::{Duration, Instant};

/// Ticks a single frame may run before the backlog is dropped.
const MAX_UPDATES_PER_FRAME: u32 = 10;

/// Longest frame time fed to the accumulator, in seconds.
const MAX_FRAME_TIME: f32 = 0.25;

/// Fixed-step tick clock.
#[derive(Debug)]
pub struct FrameTiming {
    tick_rate: u32,
    fixed_dt: f32,
    tick_budget: Duration,
    /// Start of the frame being timed
    frame_start: Instant,
    /// Seconds owed to the simulation
    backlog: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Creates a clock running `tick_rate` ticks per second (at least one).
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            fixed_dt: 1.0 / tick_rate as f32,
            tick_budget: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            frame_start: Instant::now(),
            backlog: 0.0,
        }
    }

    /// Seconds per tick.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Ticks per second.
    #[must_use]
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Wall-clock seconds since the previous call, capped at a quarter second.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.frame_start).as_secs_f32();
        self.frame_start = now;
        elapsed.min(MAX_FRAME_TIME)
    }

    /// Adds `dt` seconds and returns how many ticks are now due.
    ///
    /// At most [`MAX_UPDATES_PER_FRAME`] ticks are released per call; a
    /// backlog longer than two ticks beyond that is forgiven.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.backlog += dt.max(0.0);

        let mut due = 0;
        while due < MAX_UPDATES_PER_FRAME && self.backlog >= self.fixed_dt {
            self.backlog -= self.fixed_dt;
            due += 1;
        }

        if self.backlog > 2.0 * self.fixed_dt {
            self.backlog = 0.0;
        }
        due
    }

    /// Blocks until one tick's budget has passed since the frame started.
    pub fn sleep_remainder(&self) {
        if let Some(rest) = self.tick_budget.checked_sub(self.frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
