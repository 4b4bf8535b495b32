//! Blade trap: an enemy that sits still until the player comes close,
//! charges at where the player was, then slides back home.

use lulu_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{ActorKind, Body};
use crate::animation::{AnimState, AnimationHandler, Direction, DirectionalSprites};
use crate::collision::Collision;
use crate::fighter::{Fighter, FighterStats};
use crate::movable::{Movable, StepContext};

/// Phase of the trap's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrapState {
    /// Waiting for a target
    #[default]
    Idle,
    /// Rushing toward the target's last position
    Charging,
    /// Going back to the home position
    Returning,
}

/// Tuning knobs of a blade trap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapSettings {
    /// Maximum distance at which the player is noticed
    pub detection_range: f32,
    /// Speed multiplier while charging
    pub charge_multiplier: f32,
    /// A charge longer than this gives up and returns
    pub max_charge_frames: u32,
    /// Ticks spent idle before detection resumes after a reset
    pub cooldown_frames: u32,
    /// Number of charge frames that deal damage
    pub damage_frames: u32,
    /// Distance at which the charge target counts as reached
    pub target_tolerance: f32,
    /// Distance at which home counts as reached
    pub home_tolerance: f32,
}

impl Default for TrapSettings {
    fn default() -> Self {
        Self {
            detection_range: 200.0,
            charge_multiplier: 3.0,
            max_charge_frames: 60,
            cooldown_frames: 30,
            damage_frames: 20,
            target_tolerance: 10.0,
            home_tolerance: 5.0,
        }
    }
}

/// The blade trap behavior.
#[derive(Debug, Clone)]
pub struct BladeTrap {
    speed: Vec2,
    stats: FighterStats,
    settings: TrapSettings,
    animation: AnimationHandler,
    state: TrapState,
    home: Vec2,
    target: Vec2,
    idle_frames: u32,
    charge_frames: u32,
    cooldown: u32,
    can_damage: bool,
}

impl BladeTrap {
    /// Creates a trap resting at `home`. Traps cannot be destroyed.
    #[must_use]
    pub fn new(home: Vec2, speed: f32, damage: f32, settings: TrapSettings) -> Self {
        let mut animation = AnimationHandler::new();
        animation.set(AnimState::Still, Direction::None);
        Self {
            speed: Vec2::splat(speed),
            stats: FighterStats::new(f32::INFINITY, damage),
            settings,
            animation,
            state: TrapState::Idle,
            home,
            target: home,
            idle_frames: 0,
            charge_frames: 0,
            cooldown: 0,
            can_damage: false,
        }
    }

    /// Registers the resting sprite and the per-direction charge sprites.
    #[must_use]
    pub fn with_sprites(mut self, idle: Vec<String>, charge: &DirectionalSprites) -> Self {
        self.animation
            .add_animation(AnimState::Still, Direction::None, idle);
        self.animation.add_directional(AnimState::Moving, charge);
        self
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> TrapState {
        self.state
    }

    /// Resting position.
    #[must_use]
    pub const fn home(&self) -> Vec2 {
        self.home
    }

    /// Where the current charge is headed.
    #[must_use]
    pub const fn target(&self) -> Vec2 {
        self.target
    }

    /// Remaining cooldown ticks.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Returns `true` while the charge still deals damage.
    #[must_use]
    pub const fn can_damage(&self) -> bool {
        self.can_damage
    }

    /// Tuning knobs.
    #[must_use]
    pub const fn settings(&self) -> &TrapSettings {
        &self.settings
    }

    fn update_ai(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.can_damage && self.charge_frames > self.settings.damage_frames {
            self.can_damage = false;
        }
    }

    /// Position of the closest living player within detection range.
    fn detect_nearby_player(&self, from: Vec2, ctx: &StepContext<'_>) -> Option<Vec2> {
        let mut best: Option<(f32, Vec2)> = None;
        for actor in ctx.neighbors.iter() {
            if !actor.kind().is_player() || !actor.is_alive() {
                continue;
            }
            let distance = from.distance(actor.pos());
            if distance > self.settings.detection_range {
                continue;
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, actor.pos()));
            }
        }
        best.map(|(_, pos)| pos)
    }

    fn move_toward(&mut self, body: &mut Body, target: Vec2, multiplier: f32, ctx: &StepContext<'_>) {
        let direction = Direction::toward(target - body.pos);
        body.pos += self.calculate_movement(direction) * multiplier;
        body.clamp_into(&ctx.bounds);
        if direction != Direction::None
            && (self.animation.current_state() != AnimState::Moving
                || self.animation.current_direction() != direction)
        {
            self.animation.set(AnimState::Moving, direction);
        }
    }

    fn start_charge(&mut self, from: Vec2, target: Vec2) {
        self.state = TrapState::Charging;
        self.target = target;
        self.charge_frames = 0;
        self.can_damage = true;
        self.animation
            .set(AnimState::Moving, Direction::toward(target - from));
        debug!("Blade trap charging toward ({}, {})", target.x, target.y);
    }

    fn start_return(&mut self, from: Vec2) {
        self.state = TrapState::Returning;
        self.can_damage = false;
        self.charge_frames = 0;
        self.animation
            .set(AnimState::Moving, Direction::toward(self.home - from));
        debug!("Blade trap returning home");
    }

    fn reset_to_idle(&mut self, body: &mut Body) {
        self.state = TrapState::Idle;
        body.pos = self.home;
        self.idle_frames = 0;
        self.charge_frames = 0;
        self.can_damage = false;
        self.cooldown = self.settings.cooldown_frames;
        self.animation.set(AnimState::Still, Direction::None);
    }

    fn handle_idle(&mut self, body: &mut Body, ctx: &StepContext<'_>) {
        self.idle_frames += 1;
        if self.cooldown == 0 {
            if let Some(target) = self.detect_nearby_player(body.pos, ctx) {
                self.start_charge(body.pos, target);
                return;
            }
        }
        if self.animation.current_state() != AnimState::Still {
            self.animation.set(AnimState::Still, Direction::None);
        }
    }

    fn handle_charging(&mut self, body: &mut Body, ctx: &StepContext<'_>) {
        self.charge_frames += 1;
        if self.charge_frames >= self.settings.max_charge_frames {
            self.start_return(body.pos);
            return;
        }

        let target = self.target;
        self.move_toward(body, target, self.settings.charge_multiplier, ctx);

        let reached = body.pos.distance(target) <= self.settings.target_tolerance;
        if reached || ctx.is_colliding_with_static() {
            self.start_return(body.pos);
        }
    }

    fn handle_returning(&mut self, body: &mut Body, ctx: &StepContext<'_>) {
        let home = self.home;
        self.move_toward(body, home, 1.0, ctx);
        if body.pos.distance(home) <= self.settings.home_tolerance {
            self.reset_to_idle(body);
        }
    }
}

impl Movable for BladeTrap {
    fn speed(&self) -> Vec2 {
        self.speed
    }

    fn animation(&self) -> &AnimationHandler {
        &self.animation
    }

    fn animation_mut(&mut self) -> &mut AnimationHandler {
        &mut self.animation
    }

    fn updated_state(&self, _ctx: &StepContext<'_>) -> AnimState {
        match self.state {
            TrapState::Idle => AnimState::Still,
            TrapState::Charging | TrapState::Returning => AnimState::Moving,
        }
    }

    fn updated_direction(&self, _ctx: &mut StepContext<'_>) -> Direction {
        self.animation.current_direction()
    }

    fn step(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        self.update_ai();
        match self.state {
            TrapState::Idle => self.handle_idle(body, ctx),
            TrapState::Charging => self.handle_charging(body, ctx),
            TrapState::Returning => self.handle_returning(body, ctx),
        }
        body.show(self.animation.next_sprite());
    }

    /// The trap never repositions on contact. A charge ends on hitting a
    /// static actor and hurts the fighters it runs into while it can.
    fn handle_collisions(
        &mut self,
        body: &mut Body,
        collisions: &[Collision],
        ctx: &mut StepContext<'_>,
    ) {
        for collision in collisions {
            if self.state != TrapState::Charging {
                break;
            }
            if collision.target_kind == ActorKind::Static {
                self.start_return(body.pos);
                break;
            }
            if self.can_damage && collision.target_kind.is_fighter() {
                self.attack(collision.target, ctx);
            }
        }
    }
}

impl Fighter for BladeTrap {
    fn stats(&self) -> &FighterStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut FighterStats {
        &mut self.stats
    }
}
