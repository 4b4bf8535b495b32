//! Actors: the entities an arena owns.
//!
//! Every actor has an id, a body (position, size, sprite) and a role. The
//! role is a closed set of behaviors; capability queries ("can it move?",
//! "is it a fighter?") go through [`ActorKind`], which is fixed when the
//! actor is built.

use lulu_common::{ArenaId, EntityId, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimState, Direction};
use crate::blade_trap::BladeTrap;
use crate::collision::{check_collision, Collision, Side};
use crate::fighter::{Fighter, FighterStats};
use crate::link::Link;
use crate::movable::Movable;
use crate::props::{Door, Npc};
use crate::zol::Zol;

/// Capability class of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// Solid and never moves (walls, NPCs)
    #[default]
    Static,
    /// Non-solid area that gameplay glue watches (doors)
    Trigger,
    /// Moves and fights
    Fighter,
    /// Moves, fights and reads player input
    Player,
}

impl ActorKind {
    /// Returns `true` if actors of this kind take part in the motion step.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        matches!(self, Self::Fighter | Self::Player)
    }

    /// Returns `true` if actors of this kind have health and can be hit.
    #[must_use]
    pub const fn is_fighter(self) -> bool {
        matches!(self, Self::Fighter | Self::Player)
    }

    /// Returns `true` for the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    /// Returns `true` if movers are pushed out of actors of this kind.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Trigger)
    }
}

/// Spatial state shared by every actor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world units
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Sprite identifier (empty for invisible actors)
    pub sprite: String,
}

impl Body {
    /// Creates a body.
    #[must_use]
    pub fn new(pos: Vec2, size: Vec2, sprite: impl Into<String>) -> Self {
        Self {
            pos,
            size,
            sprite: sprite.into(),
        }
    }

    /// Bounding box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Moves the body flush against the contacted side of the other box.
    pub fn flush_against(&mut self, collision: &Collision) {
        let other = collision.target_rect;
        match collision.side {
            Side::Top => self.pos.y = other.bottom(),
            Side::Bottom => self.pos.y = other.top() - self.size.y,
            Side::Left => self.pos.x = other.right(),
            Side::Right => self.pos.x = other.left() - self.size.x,
            Side::None => {}
        }
    }

    /// Pulls the body back inside `bounds`.
    pub fn clamp_into(&mut self, bounds: &Rect) {
        self.pos = bounds.clamp_position(self.pos, self.size);
    }

    /// Replaces the sprite if `next` is available.
    pub fn show(&mut self, next: Option<&str>) {
        if let Some(sprite) = next {
            if sprite != self.sprite {
                sprite.clone_into(&mut self.sprite);
            }
        }
    }
}

/// What an actor is and how it behaves.
#[derive(Debug, Clone)]
pub enum Role {
    /// Solid block
    Obstacle,
    /// Scene exit
    Door(Door),
    /// Talking character
    Npc(Npc),
    /// The player
    Link(Box<Link>),
    /// Charging blade trap
    BladeTrap(Box<BladeTrap>),
    /// Wandering slime
    Zol(Box<Zol>),
}

impl Role {
    /// Capability class of this role.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        match self {
            Self::Obstacle | Self::Npc(_) => ActorKind::Static,
            Self::Door(_) => ActorKind::Trigger,
            Self::BladeTrap(_) | Self::Zol(_) => ActorKind::Fighter,
            Self::Link(_) => ActorKind::Player,
        }
    }

    /// Short lowercase name for logs and snapshots.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::Door(_) => "door",
            Self::Npc(_) => "npc",
            Self::Link(_) => "link",
            Self::BladeTrap(_) => "blade_trap",
            Self::Zol(_) => "zol",
        }
    }

    fn as_movable(&self) -> Option<&dyn Movable> {
        match self {
            Self::Link(link) => Some(link.as_ref()),
            Self::BladeTrap(trap) => Some(trap.as_ref()),
            Self::Zol(zol) => Some(zol.as_ref()),
            _ => None,
        }
    }

    fn as_movable_mut(&mut self) -> Option<&mut dyn Movable> {
        match self {
            Self::Link(link) => Some(link.as_mut()),
            Self::BladeTrap(trap) => Some(trap.as_mut()),
            Self::Zol(zol) => Some(zol.as_mut()),
            _ => None,
        }
    }

    fn as_fighter(&self) -> Option<&dyn Fighter> {
        match self {
            Self::Link(link) => Some(link.as_ref()),
            Self::BladeTrap(trap) => Some(trap.as_ref()),
            Self::Zol(zol) => Some(zol.as_ref()),
            _ => None,
        }
    }

    fn as_fighter_mut(&mut self) -> Option<&mut dyn Fighter> {
        match self {
            Self::Link(link) => Some(link.as_mut()),
            Self::BladeTrap(trap) => Some(trap.as_mut()),
            Self::Zol(zol) => Some(zol.as_mut()),
            _ => None,
        }
    }
}

/// An entity owned by an arena.
#[derive(Debug, Clone)]
pub struct Actor {
    id: EntityId,
    arena: Option<ArenaId>,
    body: Body,
    role: Role,
}

impl Actor {
    /// Creates an actor with a fresh id.
    ///
    /// Movable roles show the first sprite of their starting animation.
    #[must_use]
    pub fn new(body: Body, role: Role) -> Self {
        let mut actor = Self {
            id: EntityId::new(),
            arena: None,
            body,
            role,
        };
        if let Some(movable) = actor.role.as_movable_mut() {
            actor.body.show(movable.animation_mut().next_sprite());
        }
        actor
    }

    /// Solid block with an optional sprite.
    #[must_use]
    pub fn obstacle(pos: Vec2, size: Vec2, sprite: impl Into<String>) -> Self {
        Self::new(Body::new(pos, size, sprite), Role::Obstacle)
    }

    /// Invisible scene exit.
    #[must_use]
    pub fn door(pos: Vec2, size: Vec2, door: Door) -> Self {
        Self::new(Body::new(pos, size, ""), Role::Door(door))
    }

    /// Talking character.
    #[must_use]
    pub fn npc(pos: Vec2, size: Vec2, sprite: impl Into<String>, npc: Npc) -> Self {
        Self::new(Body::new(pos, size, sprite), Role::Npc(npc))
    }

    /// The player. The hitbox starts at the size Link was configured with.
    #[must_use]
    pub fn link(pos: Vec2, link: Link) -> Self {
        let size = link.base_size();
        Self::new(Body::new(pos, size, ""), Role::Link(Box::new(link)))
    }

    /// A blade trap whose home is its current position.
    #[must_use]
    pub fn blade_trap(size: Vec2, trap: BladeTrap) -> Self {
        let pos = trap.home();
        Self::new(Body::new(pos, size, ""), Role::BladeTrap(Box::new(trap)))
    }

    /// A wandering Zol.
    #[must_use]
    pub fn zol(pos: Vec2, size: Vec2, zol: Zol) -> Self {
        Self::new(Body::new(pos, size, ""), Role::Zol(Box::new(zol)))
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Arena this actor currently belongs to.
    #[must_use]
    pub const fn arena(&self) -> Option<ArenaId> {
        self.arena
    }

    pub(crate) fn set_arena(&mut self, arena: Option<ArenaId>) {
        self.arena = arena;
    }

    /// Spatial state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable spatial state (for loaders and scene glue).
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Top-left corner.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.body.size
    }

    /// Current sprite identifier.
    #[must_use]
    pub fn sprite(&self) -> &str {
        &self.body.sprite
    }

    /// Bounding box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Behavior.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Mutable behavior.
    pub fn role_mut(&mut self) -> &mut Role {
        &mut self.role
    }

    /// Capability class.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.role.kind()
    }

    /// Contact side of this actor against `other`.
    #[must_use]
    pub fn check_collision(&self, other: &Self) -> Side {
        check_collision(&self.rect(), &other.rect())
    }

    /// Facing of movable actors; `None` for everything else.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.role
            .as_movable()
            .map_or(Direction::None, |m| m.animation().current_direction())
    }

    /// Animation state of movable actors; `Still` for everything else.
    #[must_use]
    pub fn anim_state(&self) -> AnimState {
        self.role
            .as_movable()
            .map_or(AnimState::Still, |m| m.animation().current_state())
    }

    /// Combat stats, if this actor fights.
    #[must_use]
    pub fn stats(&self) -> Option<&FighterStats> {
        self.role.as_fighter().map(|f| f.stats())
    }

    /// Returns `true` for fighters with positive health.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.stats().is_some_and(FighterStats::is_alive)
    }

    /// Applies damage if this actor fights. Returns `false` otherwise.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        match self.role.as_fighter_mut() {
            Some(fighter) => {
                fighter.take_damage(amount);
                true
            }
            None => false,
        }
    }

    /// Splits the actor into its movement behavior and its body.
    pub(crate) fn movable_parts(&mut self) -> Option<(&mut dyn Movable, &mut Body)> {
        let movable = self.role.as_movable_mut()?;
        Some((movable, &mut self.body))
    }

    /// Door data, if this actor is a door.
    #[must_use]
    pub const fn as_door(&self) -> Option<&Door> {
        match &self.role {
            Role::Door(door) => Some(door),
            _ => None,
        }
    }

    /// NPC data, if this actor is an NPC.
    #[must_use]
    pub const fn as_npc(&self) -> Option<&Npc> {
        match &self.role {
            Role::Npc(npc) => Some(npc),
            _ => None,
        }
    }

    /// Mutable NPC data, if this actor is an NPC.
    pub fn as_npc_mut(&mut self) -> Option<&mut Npc> {
        match &mut self.role {
            Role::Npc(npc) => Some(npc),
            _ => None,
        }
    }

    /// Render-facing view of this actor.
    #[must_use]
    pub fn view(&self) -> ActorView {
        ActorView {
            id: self.id,
            role: self.role.name().to_string(),
            kind: self.kind(),
            pos: self.pos(),
            size: self.size(),
            sprite: self.body.sprite.clone(),
            facing: self.facing(),
            state: self.anim_state(),
            hp: self.stats().map(|s| s.hp),
        }
    }
}

/// What a renderer needs to draw one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    /// Actor id
    pub id: EntityId,
    /// Role name
    pub role: String,
    /// Capability class
    pub kind: ActorKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Sprite identifier
    pub sprite: String,
    /// Facing direction
    pub facing: Direction,
    /// Animation state
    pub state: AnimState,
    /// Health, for fighters
    pub hp: Option<f32>,
}
