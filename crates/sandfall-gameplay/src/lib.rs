//! # Sandfall Gameplay
//!
//! Gameplay systems for Sandfall.
//!
//! This crate provides the CPU-side layer around the world grid:
//! - Player entity and top-down movement against solid cells
//! - Per-frame input
//! - Terrain editing brush and material palette
//! - Session: frame sequencing, world reset

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod input;
pub mod physics;
pub mod player;
pub mod session;
pub mod terrain_manipulation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::input::*;
    pub use crate::physics::*;
    pub use crate::player::*;
    pub use crate::session::*;
    pub use crate::terrain_manipulation::*;
}

pub use prelude::*;
