//! # Lulu Core
//!
//! The simulation core of Legend of Lulu.
//!
//! This crate provides:
//! - Sprite animation sequencing and sprite size lookup
//! - The actor model with its movable and fighter capabilities
//! - AABB collision classification and resolution
//! - Behaviors: Link (the player), blade traps, Zols, doors and NPCs
//! - The arena, which owns actors and runs the per-tick simulation
//!
//! The core knows nothing about files or rendering. Scenes are built by
//! spawning actors into an [`Arena`]; the host calls [`Arena::tick`] once
//! per frame with the keys currently held and draws [`Arena::snapshot`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod animation;
pub mod arena;
pub mod blade_trap;
pub mod collision;
pub mod fighter;
pub mod input;
pub mod link;
pub mod movable;
pub mod props;
pub mod sprite;
pub mod zol;

mod e2e_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::animation::*;
    pub use crate::arena::*;
    pub use crate::blade_trap::*;
    pub use crate::collision::*;
    pub use crate::fighter::*;
    pub use crate::input::*;
    pub use crate::link::*;
    pub use crate::movable::*;
    pub use crate::props::*;
    pub use crate::sprite::*;
    pub use crate::zol::*;
}

pub use prelude::*;
