//! # Lulu Common
//!
//! Common types shared by the Legend of Lulu crates.
//!
//! This crate provides foundational types used by the simulation core and
//! the scene layer:
//! - Geometry (`Vec2`, `Rect`)
//! - ID types (`EntityId`, `ArenaId`)
//! - Logical input keys
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;
pub mod ids;
pub mod keys;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
    pub use crate::keys::*;
}

pub use prelude::*;
