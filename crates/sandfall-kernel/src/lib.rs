//! # Sandfall Kernel
//!
//! The cellular-automaton world engine.
//!
//! This crate provides:
//! - The material table (density, solidity, decay chain)
//! - Cells and their visual tags
//! - Double-buffered grid storage with bounds-checked access
//! - The per-tick automaton step for liquids, fire and smoke
//! - An entropy seam so runs can be seeded or forced
//! - Collision queries for gameplay code
//!
//! ## Double Buffering
//!
//! Each tick reads the *current* buffer and writes the *next* buffer, then
//! swaps them. Brush edits and player queries happen strictly between ticks
//! and only ever see the current buffer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod automaton;
pub mod buffer;
pub mod cell;
pub mod collision;
pub mod entropy;
pub mod material;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::automaton::*;
    pub use crate::buffer::*;
    pub use crate::cell::*;
    pub use crate::collision::*;
    pub use crate::entropy::*;
    pub use crate::material::*;
}

pub use prelude::*;
