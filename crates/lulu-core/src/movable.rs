//! The motion capability and the per-step context the arena hands to it.

use std::f32::consts::FRAC_1_SQRT_2;

use lulu_common::{EntityId, Key, Rect, Vec2};

use crate::actor::{Actor, Body};
use crate::animation::{AnimState, AnimationHandler, Direction};
use crate::collision::Collision;
use crate::input::InputSnapshot;
use crate::sprite::SpriteMetrics;

/// A change one actor requests on another during its step.
///
/// The arena applies damage right after the requesting actor finishes its
/// step and collision handling; removals wait until the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// `source` hits `target` for `amount`
    Damage {
        /// Attacker
        source: EntityId,
        /// Victim
        target: EntityId,
        /// Health to subtract
        amount: f32,
    },
    /// Remove an actor from the arena
    Despawn(EntityId),
}

/// Every actor of the arena except the one being stepped.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    before: &'a [Actor],
    after: &'a [Actor],
}

impl<'a> Neighbors<'a> {
    /// Wraps the actors on either side of the stepped one.
    #[must_use]
    pub const fn new(before: &'a [Actor], after: &'a [Actor]) -> Self {
        Self { before, after }
    }

    /// Iterates in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Actor> {
        self.before.iter().chain(self.after.iter())
    }

    /// Looks up an actor by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&'a Actor> {
        self.iter().find(|a| a.id() == id)
    }

    /// Number of neighbors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Returns `true` if the stepped actor is alone.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What an actor can see and request while the arena steps it.
pub struct StepContext<'a> {
    /// The actor being stepped
    pub id: EntityId,
    /// Keys held this tick and the last
    pub input: &'a InputSnapshot,
    /// Arena bounds
    pub bounds: Rect,
    /// This actor's collision list as last computed by the arena
    pub collisions: &'a [Collision],
    /// The other actors
    pub neighbors: Neighbors<'a>,
    /// Sprite size lookup
    pub metrics: &'a mut dyn SpriteMetrics,
    /// Arena random source
    pub rng: &'a mut fastrand::Rng,
    effects: &'a mut Vec<Effect>,
}

impl<'a> StepContext<'a> {
    /// Builds a context. `effects` collects the requests made during the step.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        input: &'a InputSnapshot,
        bounds: Rect,
        collisions: &'a [Collision],
        neighbors: Neighbors<'a>,
        metrics: &'a mut dyn SpriteMetrics,
        rng: &'a mut fastrand::Rng,
        effects: &'a mut Vec<Effect>,
    ) -> Self {
        Self {
            id,
            input,
            bounds,
            collisions,
            neighbors,
            metrics,
            rng,
            effects,
        }
    }

    /// Returns `true` while `key` is held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.is_down(key)
    }

    /// Returns `true` on the tick `key` goes down.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.input.is_just_pressed(key)
    }

    /// Requests `amount` damage on `target`.
    pub fn damage(&mut self, target: EntityId, amount: f32) {
        self.effects.push(Effect::Damage {
            source: self.id,
            target,
            amount,
        });
    }

    /// Requests removal of the stepped actor at the end of the tick.
    pub fn despawn_self(&mut self) {
        self.effects.push(Effect::Despawn(self.id));
    }

    /// Cached contacts whose target can be hit.
    pub fn colliding_fighters(&self) -> impl Iterator<Item = &'a Collision> {
        self.collisions
            .iter()
            .filter(|c| c.target_kind.is_fighter())
    }

    /// Returns `true` if a cached contact is a solid, non-moving actor.
    #[must_use]
    pub fn is_colliding_with_static(&self) -> bool {
        self.collisions
            .iter()
            .any(|c| c.target_kind.is_solid() && !c.target_kind.is_movable())
    }
}

/// Displacement for one step of `speed` along `direction`.
///
/// Diagonal steps use the normalized diagonal so their length equals an
/// axial step. Anisotropic speeds scale each axis by 1/√2 instead.
#[must_use]
pub fn displacement(speed: Vec2, direction: Direction) -> Vec2 {
    let (sx, sy) = direction.signs();
    let step = if direction.is_diagonal() {
        speed.diagonal().unwrap_or(speed * FRAC_1_SQRT_2)
    } else {
        speed
    };
    Vec2::new(step.x * sx, step.y * sy)
}

/// Pushes `body` out of every solid contact in order, then into `bounds`.
pub fn resolve_solid_contacts(body: &mut Body, collisions: &[Collision], bounds: &Rect) {
    for collision in collisions.iter().filter(|c| c.target_kind.is_solid()) {
        body.flush_against(collision);
    }
    body.clamp_into(bounds);
}

/// Per-tick motion and animation driven by input or AI.
pub trait Movable {
    /// Per-axis speed in world units per tick.
    fn speed(&self) -> Vec2;

    /// Sprite sequencer.
    fn animation(&self) -> &AnimationHandler;

    /// Mutable sprite sequencer.
    fn animation_mut(&mut self) -> &mut AnimationHandler;

    /// Logical state for this tick.
    fn updated_state(&self, ctx: &StepContext<'_>) -> AnimState;

    /// Facing for this tick.
    fn updated_direction(&self, ctx: &mut StepContext<'_>) -> Direction;

    /// Displacement for one step along `direction`.
    fn calculate_movement(&self, direction: Direction) -> Vec2 {
        displacement(self.speed(), direction)
    }

    /// Advances position, facing and animation by one tick.
    fn step(&mut self, body: &mut Body, ctx: &mut StepContext<'_>);

    /// Reacts to this tick's contacts. By default the body is pushed out of
    /// solid actors and kept inside the arena.
    fn handle_collisions(
        &mut self,
        body: &mut Body,
        collisions: &[Collision],
        ctx: &mut StepContext<'_>,
    ) {
        resolve_solid_contacts(body, collisions, &ctx.bounds);
    }
}
