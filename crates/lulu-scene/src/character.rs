//! Character definition files.
//!
//! A definition describes one kind of fighter independently of where it is
//! placed. It has the sections the game's character JSON has always had:
//!
//! ```json
//! {
//!   "actor":      { "sprite": "link/still.png", "size": { "width": 32, "height": 32 } },
//!   "movable":    { "speed": { "x": 3, "y": 3 }, "enableAnimation": true },
//!   "fighter":    { "hp": 12, "damage": 1 },
//!   "animations": { "movement": { "up": [..], "down": [..], "left": [..], "right": [..] },
//!                   "attack": { .. }, "death": [..], "idle": [..], "charge": { .. } }
//! }
//! ```
//!
//! Optional `attack` (swing timing) and `trap` (blade trap tuning) sections
//! override the built-in defaults.

use lulu_common::{Rect, Vec2};
use lulu_core::{
    Actor, AttackTiming, BladeTrap, Direction, DirectionalSprites, FighterStats, Link, Movable,
    TrapSettings, Zol,
};
use serde::{Deserialize, Serialize};

use crate::loader::{SceneError, SceneResult};

/// Width and height as written in scene and character files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDef {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl From<SizeDef> for Vec2 {
    fn from(size: SizeDef) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Which behavior a placed character gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// The player
    Link,
    /// Wandering slime
    Zol,
    /// Charging blade trap
    #[serde(alias = "trap_blade", alias = "bladeTrap")]
    BladeTrap,
}

/// `actor` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSection {
    /// Sprite shown before any animation runs
    #[serde(default)]
    pub sprite: String,
    /// Hitbox size
    pub size: SizeDef,
}

/// `movable` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovableSection {
    /// Units per tick on each axis
    pub speed: Vec2,
    /// Whether sprites cycle
    pub enable_animation: bool,
}

impl Default for MovableSection {
    fn default() -> Self {
        Self {
            speed: Vec2::splat(1.0),
            enable_animation: true,
        }
    }
}

/// `animations` section. Each behavior reads the lists it knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationsSection {
    /// Walking sprites (Link, Zol)
    pub movement: Option<DirectionalSprites>,
    /// Swing sprites (Link)
    pub attack: Option<DirectionalSprites>,
    /// Death sequence (Zol)
    pub death: Vec<String>,
    /// Resting sprites (blade trap)
    pub idle: Vec<String>,
    /// Charging sprites (blade trap)
    pub charge: Option<DirectionalSprites>,
}

/// A parsed character definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDef {
    /// Sprite and hitbox
    pub actor: ActorSection,
    /// Motion
    #[serde(default)]
    pub movable: MovableSection,
    /// Health and damage
    #[serde(default)]
    pub fighter: FighterStats,
    /// Sprite lists
    #[serde(default)]
    pub animations: AnimationsSection,
    /// Swing timing override
    #[serde(default)]
    pub attack: Option<AttackTiming>,
    /// Blade trap tuning override
    #[serde(default)]
    pub trap: Option<TrapSettings>,
}

impl CharacterDef {
    /// Validates the definition.
    pub fn validate(&self) -> SceneResult<()> {
        let hitbox = Rect::try_new(Vec2::ZERO, self.actor.size.into())
            .map_err(|e| SceneError::ValidationError(format!("character size: {e}")))?;
        if hitbox.size.x == 0.0 || hitbox.size.y == 0.0 {
            return Err(SceneError::ValidationError(
                "character size must not be empty".to_string(),
            ));
        }

        let speed = self.movable.speed;
        if !speed.is_finite() || speed.x < 0.0 || speed.y < 0.0 {
            return Err(SceneError::ValidationError(format!(
                "character speed must be finite and non-negative: ({}, {})",
                speed.x, speed.y
            )));
        }

        if !self.fighter.damage.is_finite() || self.fighter.damage < 0.0 {
            return Err(SceneError::ValidationError(format!(
                "character damage must be non-negative: {}",
                self.fighter.damage
            )));
        }

        Ok(())
    }

    /// Hitbox size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.actor.size.into()
    }

    /// Builds the actor for a character of `kind` placed at `pos`.
    ///
    /// `facing` sets a Zol's first wander direction. Without one the Zol
    /// starts in a direction drawn from `rng`. Other kinds ignore both.
    pub fn build(
        &self,
        kind: CharacterKind,
        pos: Vec2,
        facing: Option<Direction>,
        rng: &mut fastrand::Rng,
    ) -> Actor {
        let movement = self.animations.movement.clone().unwrap_or_default();
        let mut actor = match kind {
            CharacterKind::Link => {
                let mut link = Link::new(self.size(), self.movable.speed.x, self.fighter)
                    .with_speed(self.movable.speed)
                    .with_timing(self.attack.unwrap_or_default())
                    .with_sprites(
                        &movement,
                        &self.animations.attack.clone().unwrap_or_default(),
                    );
                link.animation_mut().enabled = self.movable.enable_animation;
                Actor::link(pos, link)
            },
            CharacterKind::Zol => {
                let mut zol = Zol::new(
                    self.movable.speed.x,
                    self.fighter,
                    facing.unwrap_or_else(|| Direction::random(rng)),
                )
                .with_speed(self.movable.speed)
                .with_sprites(&movement, self.animations.death.clone());
                zol.animation_mut().enabled = self.movable.enable_animation;
                Actor::zol(pos, self.size(), zol)
            },
            CharacterKind::BladeTrap => {
                let mut trap = BladeTrap::new(
                    pos,
                    self.movable.speed.x,
                    self.fighter.damage,
                    self.trap.unwrap_or_default(),
                )
                .with_sprites(
                    self.animations.idle.clone(),
                    &self.animations.charge.clone().unwrap_or_default(),
                );
                trap.animation_mut().enabled = self.movable.enable_animation;
                Actor::blade_trap(self.size(), trap)
            },
        };

        if actor.sprite().is_empty() {
            actor.body_mut().sprite.clone_from(&self.actor.sprite);
        }
        actor
    }
}
