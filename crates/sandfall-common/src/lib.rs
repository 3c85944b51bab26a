//! # Sandfall Common
//!
//! Common types shared by every Sandfall crate:
//! - Grid coordinates and cardinal/compass directions
//! - Top-level error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
