//! Arena: owns the actors of one scene and runs the per-tick simulation.
//!
//! A tick advances the input snapshot, then visits every movable actor in
//! insertion order. Each one is stepped, its collision list is rebuilt
//! against the current positions of everyone else, and the list is handed
//! back to it for resolution. Because actors are processed one after the
//! other, an actor later in the order sees earlier actors at their already
//! updated positions.

use ahash::AHashMap;
use lulu_common::{ArenaId, EntityId, Key, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::actor::{Actor, ActorView};
use crate::collision::Collision;
use crate::input::InputSnapshot;
use crate::movable::{Effect, Neighbors, StepContext};
use crate::sprite::{NoMetrics, SpriteMetrics};

/// Error types for arena operations.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// No actor with this id lives in the arena
    #[error("Actor not found in arena: {0}")]
    NotFound(EntityId),
}

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// A hit that landed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Attacker
    pub source: EntityId,
    /// Victim
    pub target: EntityId,
    /// Health removed
    pub amount: f32,
    /// Victim health after the hit
    pub remaining_hp: f32,
}

/// Summary of one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Number of actors stepped
    pub moved: usize,
    /// Total contacts recorded across all collision lists
    pub collisions: usize,
    /// Hits applied this tick, in order
    pub damage: Vec<DamageEvent>,
    /// Actors removed at the end of the tick
    pub despawned: Vec<EntityId>,
}

/// World-space container that owns actors and their collision lists.
pub struct Arena {
    id: ArenaId,
    bounds: Rect,
    input: InputSnapshot,
    actors: Vec<Actor>,
    collisions: AHashMap<EntityId, Vec<Collision>>,
    metrics: Box<dyn SpriteMetrics>,
    rng: fastrand::Rng,
    tick_count: u64,
}

impl Arena {
    /// Creates an empty arena covering `size` at `pos`.
    #[must_use]
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        let id = ArenaId::new();
        info!(
            "Created {} at ({}, {}) size {}x{}",
            id,
            pos.x,
            pos.y,
            size.x,
            size.y
        );
        Self {
            id,
            bounds: Rect::new(pos, size),
            input: InputSnapshot::new(),
            actors: Vec::new(),
            collisions: AHashMap::new(),
            metrics: Box::new(NoMetrics),
            rng: fastrand::Rng::new(),
            tick_count: 0,
        }
    }

    /// Seeds the random source so AI decisions replay identically.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Sets the sprite size lookup used by attacks.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl SpriteMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Replaces the sprite size lookup.
    pub fn set_metrics(&mut self, metrics: Box<dyn SpriteMetrics>) {
        self.metrics = metrics;
    }

    /// Arena handle.
    #[must_use]
    pub const fn id(&self) -> ArenaId {
        self.id
    }

    /// World-space bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Input snapshot of the latest tick.
    #[must_use]
    pub const fn input(&self) -> &InputSnapshot {
        &self.input
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

    /// Number of actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns `true` if the arena holds no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Actors in insertion order.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Returns `true` if the actor lives here.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.actors.iter().any(|a| a.id() == id)
    }

    /// Looks up an actor.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// Looks up an actor mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    /// The first living-or-not player actor.
    #[must_use]
    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.kind().is_player())
    }

    /// Latest collision list of an actor. Empty for unknown ids and
    /// non-movable actors.
    #[must_use]
    pub fn collisions_of(&self, id: EntityId) -> &[Collision] {
        self.collisions
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every collision list, keyed by movable actor.
    #[must_use]
    pub const fn collisions(&self) -> &AHashMap<EntityId, Vec<Collision>> {
        &self.collisions
    }

    /// Render views of every actor, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ActorView> {
        self.actors.iter().map(Actor::view).collect()
    }

    /// Adds an actor and points its back-reference here.
    ///
    /// Spawning an id that is already present does nothing.
    pub fn spawn(&mut self, mut actor: Actor) -> EntityId {
        let id = actor.id();
        if self.contains(id) {
            debug!("Actor {} already in {}", id, self.id);
            return id;
        }
        actor.set_arena(Some(self.id));
        if actor.kind().is_movable() {
            self.collisions.insert(id, Vec::new());
        }
        debug!("Spawned {} {} in {}", actor.role().name(), id, self.id);
        self.actors.push(actor);
        id
    }

    /// Removes an actor, its collision list and every contact pointing at it.
    ///
    /// Returns the actor with its back-reference cleared, or `None` if it
    /// does not live here.
    pub fn kill(&mut self, id: EntityId) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id() == id)?;
        let mut actor = self.actors.remove(index);
        self.collisions.remove(&id);
        for list in self.collisions.values_mut() {
            list.retain(|c| c.target != id);
        }
        actor.set_arena(None);
        debug!("Killed {} {} in {}", actor.role().name(), id, self.id);
        Some(actor)
    }

    /// Moves an actor into `other`.
    pub fn transfer(&mut self, id: EntityId, other: &mut Self) -> ArenaResult<EntityId> {
        let actor = self.kill(id).ok_or(ArenaError::NotFound(id))?;
        Ok(other.spawn(actor))
    }

    /// Runs one simulation tick with `keys` held.
    pub fn tick(&mut self, keys: &[Key]) -> TickReport {
        self.input.advance(keys);
        self.tick_count += 1;

        let mut report = TickReport {
            tick: self.tick_count,
            ..TickReport::default()
        };
        let mut effects = Vec::new();
        let mut despawns = Vec::new();

        for index in 0..self.actors.len() {
            if !self.actors[index].kind().is_movable() {
                continue;
            }
            self.step_actor(index, &mut effects);
            report.moved += 1;

            for effect in effects.drain(..) {
                match effect {
                    Effect::Damage {
                        source,
                        target,
                        amount,
                    } => {
                        if let Some(event) = self.apply_damage(source, target, amount) {
                            report.damage.push(event);
                        }
                    }
                    Effect::Despawn(id) => despawns.push(id),
                }
            }
        }

        for id in despawns {
            if self.kill(id).is_some() {
                report.despawned.push(id);
            }
        }
        report.collisions = self.collisions.values().map(Vec::len).sum();
        report
    }

    fn step_actor(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Self {
            bounds,
            input,
            actors,
            collisions,
            metrics,
            rng,
            ..
        } = self;

        let (before, rest) = actors.split_at_mut(index);
        let Some((actor, after)) = rest.split_first_mut() else {
            return;
        };
        let id = actor.id();
        let Some((movable, body)) = actor.movable_parts() else {
            return;
        };
        let before: &[Actor] = before;
        let after: &[Actor] = after;

        {
            let cached = collisions
                .get(&id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut ctx = StepContext::new(
                id,
                input,
                *bounds,
                cached,
                Neighbors::new(before, after),
                &mut **metrics,
                rng,
                effects,
            );
            movable.step(body, &mut ctx);
        }

        let rect = body.rect();
        let fresh: Vec<Collision> = before
            .iter()
            .chain(after.iter())
            .filter_map(|other| Collision::detect(&rect, other))
            .collect();

        {
            let mut ctx = StepContext::new(
                id,
                input,
                *bounds,
                &fresh,
                Neighbors::new(before, after),
                &mut **metrics,
                rng,
                effects,
            );
            movable.handle_collisions(body, &fresh, &mut ctx);
        }

        collisions.insert(id, fresh);
    }

    fn apply_damage(
        &mut self,
        source: EntityId,
        target: EntityId,
        amount: f32,
    ) -> Option<DamageEvent> {
        let victim = self.get_mut(target)?;
        if !victim.take_damage(amount) {
            return None;
        }
        let remaining_hp = victim.stats().map_or(0.0, |s| s.hp);
        debug!("{} hit {} for {} ({} hp left)", source, target, amount, remaining_hp);
        Some(DamageEvent {
            source,
            target,
            amount,
            remaining_hp,
        })
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("actors", &self.actors.len())
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}
