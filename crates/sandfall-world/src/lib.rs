//! # Sandfall World
//!
//! World creation for Sandfall.
//!
//! This crate handles:
//! - Procedural terrain from a seeded noise field
//! - Flat arena layouts for testing and sandbox play
//! - Finding a safe spawn point for the player

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod generation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::generation::*;
}

pub use prelude::*;
