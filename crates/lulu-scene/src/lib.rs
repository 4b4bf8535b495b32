//! # Lulu Scene
//!
//! Everything between the simulation core and a running game of Legend of
//! Lulu.
//!
//! This crate provides:
//! - Game configuration (`lulu.toml`)
//! - Scene and character definition files
//! - NPC dialogue files and the typewriter dialogue box
//! - The stage, which owns the live scene and handles doors and talking
//! - Scripted input for the headless `lulu` runner

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod character;
pub mod config;
pub mod dialogue;
pub mod loader;
pub mod script;
pub mod stage;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::character::*;
    pub use crate::config::*;
    pub use crate::dialogue::*;
    pub use crate::loader::*;
    pub use crate::script::*;
    pub use crate::stage::*;
}

pub use prelude::*;
