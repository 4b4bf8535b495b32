//! Link, the player-controlled fighter.
//!
//! Link walks in 8 directions from WASD or the arrow keys and swings on a
//! fresh press of Space. While swinging, movement input is ignored and
//! static obstacles do not push Link around. Attack sprites are larger than
//! walking sprites, so each swing frame resizes the hitbox and shifts it
//! to keep the sprite anchored.

use lulu_common::{Key, Vec2};
use tracing::debug;

use crate::actor::Body;
use crate::animation::{AnimState, AnimationHandler, Direction, DirectionalSprites};
use crate::collision::Collision;
use crate::fighter::{AttackTiming, Fighter, FighterStats};
use crate::movable::{Movable, StepContext};

/// Walking sprite advances once every this many ticks.
pub const WALK_FRAME_INTERVAL: u32 = 4;

/// The player.
#[derive(Debug, Clone)]
pub struct Link {
    speed: Vec2,
    base_size: Vec2,
    stats: FighterStats,
    timing: AttackTiming,
    animation: AnimationHandler,
    attacking: bool,
    attack_frame: u32,
    original_size: Vec2,
    walk_counter: u32,
}

impl Link {
    /// Creates Link facing up, standing still.
    #[must_use]
    pub fn new(size: Vec2, speed: f32, stats: FighterStats) -> Self {
        let mut animation = AnimationHandler::new();
        animation.set(AnimState::Still, Direction::Up);
        Self {
            speed: Vec2::splat(speed),
            base_size: size,
            stats,
            timing: AttackTiming::default(),
            animation,
            attacking: false,
            attack_frame: 0,
            original_size: size,
            walk_counter: 0,
        }
    }

    /// Uses a separate speed per axis.
    #[must_use]
    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    /// Replaces the swing timing.
    #[must_use]
    pub fn with_timing(mut self, timing: AttackTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Registers walking (also used standing still) and attack sprites.
    #[must_use]
    pub fn with_sprites(mut self, movement: &DirectionalSprites, attack: &DirectionalSprites) -> Self {
        self.animation.add_directional(AnimState::Moving, movement);
        self.animation.add_directional(AnimState::Still, movement);
        self.animation.add_directional(AnimState::Attack, attack);
        self
    }

    /// Hitbox size outside of attacks.
    #[must_use]
    pub const fn base_size(&self) -> Vec2 {
        self.base_size
    }

    /// Swing timing.
    #[must_use]
    pub const fn timing(&self) -> AttackTiming {
        self.timing
    }

    /// Returns `true` during a swing.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Frames elapsed in the current swing.
    #[must_use]
    pub const fn attack_frame(&self) -> u32 {
        self.attack_frame
    }

    /// Shifts the body so that a size change grows up or left when facing
    /// that way, instead of always growing down and right.
    fn adjust_position_for_size(&self, body: &mut Body, size_diff: Vec2) {
        match self.animation.current_direction() {
            Direction::Up | Direction::UpLeft | Direction::UpRight => body.pos.y -= size_diff.y,
            Direction::Left | Direction::DownLeft => body.pos.x -= size_diff.x,
            _ => {}
        }
    }

    fn walk(&mut self, body: &mut Body, direction: Direction) {
        if direction == Direction::None {
            return;
        }
        body.pos += self.calculate_movement(direction);

        if self.animation.current_state() != AnimState::Moving
            || self.animation.current_direction() != direction
        {
            self.animation.set(AnimState::Moving, direction);
            body.show(self.animation.next_sprite());
            self.walk_counter = 0;
        }

        if self.walk_counter % WALK_FRAME_INTERVAL == 0 {
            body.show(self.animation.next_sprite());
        }
        self.walk_counter = self.walk_counter.wrapping_add(1);
    }
}

impl Movable for Link {
    fn speed(&self) -> Vec2 {
        self.speed
    }

    fn animation(&self) -> &AnimationHandler {
        &self.animation
    }

    fn animation_mut(&mut self) -> &mut AnimationHandler {
        &mut self.animation
    }

    fn updated_state(&self, ctx: &StepContext<'_>) -> AnimState {
        let current = self.animation.current_state();
        if matches!(current, AnimState::Attack | AnimState::Hurt) {
            return current;
        }
        if self.attacking || ctx.is_key_just_pressed(Key::Space) {
            return AnimState::Attack;
        }
        if held_direction(ctx) == Direction::None {
            AnimState::Still
        } else {
            AnimState::Moving
        }
    }

    fn updated_direction(&self, ctx: &mut StepContext<'_>) -> Direction {
        held_direction(ctx)
    }

    fn step(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        let state = self.updated_state(ctx);
        let direction = self.updated_direction(ctx);

        match state {
            AnimState::Still => {
                if self.animation.current_state() != AnimState::Still {
                    let facing = self.animation.current_direction();
                    self.animation.set(AnimState::Still, facing);
                }
            }
            AnimState::Moving => self.walk(body, direction),
            AnimState::Attack => {
                if !self.attacking {
                    self.setup_attack(body);
                }
                self.perform_attack(body, ctx);
                if self.attack_frame >= self.timing.duration {
                    self.end_attack(body, ctx);
                }
            }
            AnimState::Hurt | AnimState::Dead => {}
        }
    }

    fn handle_collisions(
        &mut self,
        body: &mut Body,
        collisions: &[Collision],
        ctx: &mut StepContext<'_>,
    ) {
        for collision in collisions {
            if !collision.target_kind.is_solid() {
                continue;
            }
            if self.attacking && !collision.target_kind.is_movable() {
                continue;
            }
            body.flush_against(collision);
        }
        body.clamp_into(&ctx.bounds);
    }
}

impl Fighter for Link {
    fn stats(&self) -> &FighterStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut FighterStats {
        &mut self.stats
    }

    fn setup_attack(&mut self, body: &mut Body) {
        self.attacking = true;
        self.attack_frame = 0;
        self.original_size = body.size;
        let facing = self.animation.current_direction();
        self.animation.set(AnimState::Attack, facing);
        debug!("Link swings facing {:?}", facing);
    }

    fn perform_attack(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        self.attack_frame += 1;

        if self.attack_frame == self.timing.damage_frame {
            self.damage_colliding_fighters(ctx);
        }

        let old_size = body.size;
        body.size = match self.animation.next_sprite() {
            Some(sprite) => {
                let size = ctx.metrics.dimensions(sprite).unwrap_or(self.original_size);
                body.show(Some(sprite));
                size
            }
            None => self.original_size,
        };
        self.adjust_position_for_size(body, body.size - old_size);
    }

    fn end_attack(&mut self, body: &mut Body, _ctx: &mut StepContext<'_>) {
        self.attacking = false;
        self.attack_frame = 0;

        let facing = self.animation.current_direction();
        self.animation.set(AnimState::Moving, facing);
        body.show(self.animation.next_sprite());

        let old_size = body.size;
        body.size = self.original_size;
        self.adjust_position_for_size(body, body.size - old_size);
        debug!("Link swing over");
    }
}

/// Facing from the held movement keys.
fn held_direction(ctx: &StepContext<'_>) -> Direction {
    let up = ctx.is_key_down(Key::W) || ctx.is_key_down(Key::Up);
    let down = ctx.is_key_down(Key::S) || ctx.is_key_down(Key::Down);
    let left = ctx.is_key_down(Key::A) || ctx.is_key_down(Key::Left);
    let right = ctx.is_key_down(Key::D) || ctx.is_key_down(Key::Right);
    Direction::from_held(up, down, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;
    use crate::input::InputSnapshot;
    use crate::movable::{Effect, Neighbors};
    use crate::sprite::{FixedMetrics, NoMetrics, SpriteMetrics};
    use lulu_common::{EntityId, Rect};

    struct Harness {
        id: EntityId,
        input: InputSnapshot,
        rng: fastrand::Rng,
        effects: Vec<Effect>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                id: EntityId::new(),
                input: InputSnapshot::new(),
                rng: fastrand::Rng::with_seed(7),
                effects: Vec::new(),
            }
        }

        fn step(
            &mut self,
            link: &mut Link,
            body: &mut Body,
            keys: &[Key],
            collisions: &[Collision],
            metrics: &mut dyn SpriteMetrics,
        ) {
            self.input.advance(keys);
            let mut ctx = StepContext::new(
                self.id,
                &self.input,
                Rect::new(Vec2::ZERO, Vec2::new(1000.0, 1000.0)),
                collisions,
                Neighbors::new(&[], &[]),
                metrics,
                &mut self.rng,
                &mut self.effects,
            );
            link.step(body, &mut ctx);
        }

        fn damage_count(&self) -> usize {
            self.effects
                .iter()
                .filter(|e| matches!(e, Effect::Damage { .. }))
                .count()
        }
    }

    fn sprites(prefix: &str) -> DirectionalSprites {
        let list = |dir: &str| vec![format!("{prefix}_{dir}_1"), format!("{prefix}_{dir}_2")];
        DirectionalSprites {
            up: list("up"),
            down: list("down"),
            left: list("left"),
            right: list("right"),
        }
    }

    fn link() -> Link {
        Link::new(Vec2::splat(30.0), 5.0, FighterStats::new(12.0, 1.0))
            .with_sprites(&sprites("walk"), &sprites("attack"))
    }

    fn enemy_contact() -> Collision {
        Collision {
            target: EntityId::new(),
            side: crate::collision::Side::Right,
            target_kind: ActorKind::Fighter,
            target_rect: Rect::new(Vec2::new(130.0, 100.0), Vec2::splat(30.0)),
        }
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        h.step(&mut link, &mut body, &[Key::A, Key::D], &[], &mut NoMetrics);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(link.animation().current_state(), AnimState::Still);
    }

    #[test]
    fn test_arrows_and_wasd_combine_diagonally() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        h.step(&mut link, &mut body, &[Key::Up, Key::D], &[], &mut NoMetrics);
        assert_eq!(link.animation().current_direction(), Direction::UpRight);
        let moved = body.pos - Vec2::new(100.0, 100.0);
        assert!((moved.length() - 5.0).abs() < 1e-4);
        assert!(moved.x > 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_walk_sprite_advances_every_fourth_tick() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(30.0), "");

        h.step(&mut link, &mut body, &[Key::S], &[], &mut NoMetrics);
        assert_eq!(body.sprite, "walk_down_2");
        for _ in 0..3 {
            h.step(&mut link, &mut body, &[Key::S], &[], &mut NoMetrics);
            assert_eq!(body.sprite, "walk_down_2");
        }
        h.step(&mut link, &mut body, &[Key::S], &[], &mut NoMetrics);
        assert_eq!(body.sprite, "walk_down_1");
    }

    #[test]
    fn test_attack_damages_exactly_once_per_swing() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        let contact = [enemy_contact()];
        let duration = link.timing().duration;

        h.step(&mut link, &mut body, &[Key::Space], &contact, &mut NoMetrics);
        assert!(link.is_attacking());
        for _ in 1..duration {
            h.step(&mut link, &mut body, &[Key::Space], &contact, &mut NoMetrics);
        }
        assert!(!link.is_attacking());
        assert_eq!(h.damage_count(), 1);

        h.step(&mut link, &mut body, &[Key::Space], &contact, &mut NoMetrics);
        assert!(!link.is_attacking());
        assert_eq!(h.damage_count(), 1);
    }

    #[test]
    fn test_attack_ignores_movement_input() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        h.step(&mut link, &mut body, &[Key::Space, Key::D], &[], &mut NoMetrics);
        h.step(&mut link, &mut body, &[Key::D], &[], &mut NoMetrics);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(link.animation().current_state(), AnimState::Attack);
    }

    #[test]
    fn test_upward_attack_grows_up_and_restores() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        let mut metrics = FixedMetrics::new()
            .with("attack_up_1", Vec2::new(30.0, 50.0))
            .with("attack_up_2", Vec2::new(30.0, 60.0));

        h.step(&mut link, &mut body, &[Key::Space], &[], &mut metrics);
        assert_eq!(body.size, Vec2::new(30.0, 50.0));
        assert_eq!(body.pos, Vec2::new(100.0, 80.0));
        assert_eq!(body.rect().bottom(), 130.0);

        h.step(&mut link, &mut body, &[], &[], &mut metrics);
        assert_eq!(body.size, Vec2::new(30.0, 60.0));
        assert_eq!(body.pos, Vec2::new(100.0, 70.0));

        for _ in 2..link.timing().duration {
            h.step(&mut link, &mut body, &[], &[], &mut metrics);
        }
        assert!(!link.is_attacking());
        assert_eq!(body.size, Vec2::splat(30.0));
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(link.animation().current_state(), AnimState::Moving);
    }

    #[test]
    fn test_rightward_attack_does_not_shift() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        let mut metrics = FixedMetrics::new().with("attack_right_1", Vec2::new(50.0, 30.0));

        h.step(&mut link, &mut body, &[Key::D], &[], &mut metrics);
        let start = body.pos;
        h.step(&mut link, &mut body, &[Key::Space], &[], &mut metrics);
        assert_eq!(body.size, Vec2::new(50.0, 30.0));
        assert_eq!(body.pos, start);
    }

    #[test]
    fn test_attacking_ignores_static_obstacles() {
        let mut h = Harness::new();
        let mut link = link();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        h.step(&mut link, &mut body, &[Key::Space], &[], &mut NoMetrics);

        let wall = Collision {
            target: EntityId::new(),
            side: crate::collision::Side::Right,
            target_kind: ActorKind::Static,
            target_rect: Rect::new(Vec2::new(120.0, 100.0), Vec2::splat(30.0)),
        };
        let mut enemy = enemy_contact();
        enemy.target_rect.pos.x = 125.0;
        let mut metrics = NoMetrics;
        let mut ctx = StepContext::new(
            h.id,
            &h.input,
            Rect::new(Vec2::ZERO, Vec2::new(1000.0, 1000.0)),
            &[],
            Neighbors::new(&[], &[]),
            &mut metrics,
            &mut h.rng,
            &mut h.effects,
        );
        link.handle_collisions(&mut body, &[wall], &mut ctx);
        assert_eq!(body.pos.x, 100.0);

        link.handle_collisions(&mut body, &[enemy], &mut ctx);
        assert_eq!(body.pos.x, 95.0);
    }

    #[test]
    fn test_link_survives_at_zero_health() {
        let mut link = link();
        link.take_damage(12.0);
        assert!(!link.is_alive());
        let mut h = Harness::new();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(30.0), "");
        h.step(&mut link, &mut body, &[Key::D], &[], &mut NoMetrics);
        assert_eq!(body.pos.x, 105.0);
        assert!(h.effects.is_empty());
    }
}
