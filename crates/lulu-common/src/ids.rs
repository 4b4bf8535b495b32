//! Handles for actors and arenas.
//!
//! Both are process-unique: every `new()` draws from its own counter, so an
//! actor keeps its id when it moves between arenas.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $counter:ident, $prefix:literal) => {
        static $counter: AtomicU64 = AtomicU64::new(1);

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Draws the next unused handle.
            #[must_use]
            pub fn new() -> Self {
                Self($counter.fetch_add(1, Ordering::Relaxed))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle!(
    /// Identity of an actor, shown as `#7`.
    EntityId,
    NEXT_ENTITY,
    "#"
);

handle!(
    /// Identity of an arena, shown as `arena 2`.
    ///
    /// Actors store this instead of a reference to their arena, so removing
    /// an actor can never leave a dangling back-reference.
    ArenaId,
    NEXT_ARENA,
    "arena "
);
