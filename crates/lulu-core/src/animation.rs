//! Table-driven sprite sequencing.
//!
//! An [`AnimationHandler`] maps a (state, facing) pair to an ordered list of
//! sprite identifiers and walks the active list one frame at a time.

use std::path::Path;

use ahash::AHashMap;
use lulu_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Logical animation state of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimState {
    /// Standing still
    #[default]
    Still,
    /// Walking
    Moving,
    /// Swinging a weapon
    Attack,
    /// Recoiling from a hit
    Hurt,
    /// Playing the death animation
    Dead,
}

/// Facing direction: none or one of the 8 compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// No facing (still)
    #[default]
    None,
    /// North
    Up,
    /// South
    Down,
    /// West
    Left,
    /// East
    Right,
    /// North-west
    UpLeft,
    /// North-east
    UpRight,
    /// South-west
    DownLeft,
    /// South-east
    DownRight,
}

impl Direction {
    /// The 8 compass directions, in the order random picks index them.
    pub const COMPASS: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
    ];

    /// Resolves held directional inputs into a facing.
    ///
    /// Opposite inputs cancel each other and diagonals win over single axes.
    #[must_use]
    pub const fn from_held(up: bool, down: bool, left: bool, right: bool) -> Self {
        let (up, down) = if up && down { (false, false) } else { (up, down) };
        let (left, right) = if left && right {
            (false, false)
        } else {
            (left, right)
        };
        match (up, down, left, right) {
            (true, _, true, _) => Self::UpLeft,
            (true, _, _, true) => Self::UpRight,
            (_, true, true, _) => Self::DownLeft,
            (_, true, _, true) => Self::DownRight,
            (true, ..) => Self::Up,
            (_, true, ..) => Self::Down,
            (_, _, true, _) => Self::Left,
            (_, _, _, true) => Self::Right,
            _ => Self::None,
        }
    }

    /// 8-way direction pointing along `diff`, picked by its dominant axis.
    #[must_use]
    pub fn toward(diff: Vec2) -> Self {
        let sx = diff.x.partial_cmp(&0.0);
        let sy = diff.y.partial_cmp(&0.0);
        use std::cmp::Ordering::{Greater, Less};
        if diff.x.abs() > diff.y.abs() {
            match (sx, sy) {
                (Some(Greater), Some(Greater)) => Self::DownRight,
                (Some(Greater), Some(Less)) => Self::UpRight,
                (Some(Greater), _) => Self::Right,
                (_, Some(Greater)) => Self::DownLeft,
                (_, Some(Less)) => Self::UpLeft,
                _ => Self::Left,
            }
        } else {
            match (sy, sx) {
                (Some(Greater), Some(Greater)) => Self::DownRight,
                (Some(Greater), Some(Less)) => Self::DownLeft,
                (Some(Greater), _) => Self::Down,
                (_, Some(Greater)) => Self::UpRight,
                (_, Some(Less)) => Self::UpLeft,
                _ => Self::Up,
            }
        }
    }

    /// Picks one of the 8 compass directions uniformly.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::COMPASS[rng.usize(..Self::COMPASS.len())]
    }

    /// Unit step along this direction (`(0, 0)` for `None`).
    ///
    /// Diagonal steps are `(±1, ±1)`; callers scale them separately.
    #[must_use]
    pub const fn signs(self) -> (f32, f32) {
        match self {
            Self::None => (0.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::UpLeft => (-1.0, -1.0),
            Self::UpRight => (1.0, -1.0),
            Self::DownLeft => (-1.0, 1.0),
            Self::DownRight => (1.0, 1.0),
        }
    }

    /// Returns `true` for the four diagonal directions.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::UpLeft | Self::UpRight | Self::DownLeft | Self::DownRight
        )
    }
}

/// Sprite lists for the four cardinal facings.
///
/// Diagonal facings reuse the vertical list they lean towards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalSprites {
    /// Facing up
    pub up: Vec<String>,
    /// Facing down
    pub down: Vec<String>,
    /// Facing left
    pub left: Vec<String>,
    /// Facing right
    pub right: Vec<String>,
}

/// Sprite sequencer keyed by (state, direction).
#[derive(Debug, Clone)]
pub struct AnimationHandler {
    animations: AHashMap<(AnimState, Direction), Vec<String>>,
    state: AnimState,
    direction: Direction,
    frame: usize,
    /// When `false`, [`AnimationHandler::next_sprite`] yields nothing and the frame stays put.
    pub enabled: bool,
}

impl Default for AnimationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationHandler {
    /// Creates an empty, enabled handler positioned at (Still, None).
    #[must_use]
    pub fn new() -> Self {
        Self {
            animations: AHashMap::new(),
            state: AnimState::default(),
            direction: Direction::default(),
            frame: 0,
            enabled: true,
        }
    }

    /// Registers a sprite sequence, replacing any previous one for the same key.
    pub fn add_animation(&mut self, state: AnimState, direction: Direction, sprites: Vec<String>) {
        self.animations.insert((state, direction), sprites);
    }

    /// Registers `sprites` for all 8 facings of `state`.
    pub fn add_directional(&mut self, state: AnimState, sprites: &DirectionalSprites) {
        for direction in Direction::COMPASS {
            let list = match direction {
                Direction::Up | Direction::UpLeft | Direction::UpRight => &sprites.up,
                Direction::Down | Direction::DownLeft | Direction::DownRight => &sprites.down,
                Direction::Left => &sprites.left,
                Direction::Right | Direction::None => &sprites.right,
            };
            self.add_animation(state, direction, list.clone());
        }
    }

    /// Switches the active sequence and rewinds to its first frame.
    pub fn set(&mut self, state: AnimState, direction: Direction) {
        self.state = state;
        self.direction = direction;
        self.frame = 0;
    }

    /// Returns the sprite at the current frame and advances, wrapping at the end.
    ///
    /// Returns `None` when no sequence is registered for the active key, the
    /// sequence is empty, or the handler is disabled.
    pub fn next_sprite(&mut self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        let sprites = self.animations.get(&(self.state, self.direction))?;
        if sprites.is_empty() {
            return None;
        }
        let index = self.frame % sprites.len();
        self.frame = (index + 1) % sprites.len();
        Some(sprites[index].as_str())
    }

    /// Active state.
    #[must_use]
    pub const fn current_state(&self) -> AnimState {
        self.state
    }

    /// Active direction.
    #[must_use]
    pub const fn current_direction(&self) -> Direction {
        self.direction
    }

    /// Index of the sprite the next call to `next_sprite` returns.
    #[must_use]
    pub const fn current_frame(&self) -> usize {
        self.frame
    }

    /// Sprites of the active sequence (empty if unregistered).
    #[must_use]
    pub fn current_animation(&self) -> &[String] {
        self.animations
            .get(&(self.state, self.direction))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if a sequence is registered for the key.
    #[must_use]
    pub fn has_animation(&self, state: AnimState, direction: Direction) -> bool {
        self.animations.contains_key(&(state, direction))
    }

    /// Reads the native pixel dimensions of an image file from its header.
    ///
    /// Returns `None` for missing, unreadable or malformed files.
    #[must_use]
    pub fn sprite_dimensions(path: impl AsRef<Path>) -> Option<Vec2> {
        let path = path.as_ref();
        match image::image_dimensions(path) {
            Ok((w, h)) => Some(Vec2::new(w as f32, h as f32)),
            Err(e) => {
                warn!("Cannot read sprite header {:?}: {}", path, e);
                None
            }
        }
    }
}
