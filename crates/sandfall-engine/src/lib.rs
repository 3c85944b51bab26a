//! # Sandfall Engine
//!
//! Headless runner for the Sandfall falling-sand simulator.
//!
//! This crate ties together all subsystems:
//! - Kernel: cell grid and automaton
//! - World: terrain generation
//! - Gameplay: player, brush and frame sequencing
//!
//! and adds the configuration file, frame pacing and a scripted frame loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod headless;
pub mod timing;

pub use config::SimConfig;
pub use headless::{run, RunSummary, ScriptedInput};
pub use timing::FrameTiming;
