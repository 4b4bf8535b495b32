//! Zol: a slime that wanders on a fixed duty cycle.
//!
//! It moves for 45 ticks, rests for 15, and picks a new random facing
//! roughly every 30 ticks. Once its health runs out it plays its death
//! animation through once and asks the arena to remove it.

use lulu_common::Vec2;
use tracing::debug;

use crate::actor::Body;
use crate::animation::{AnimState, AnimationHandler, Direction, DirectionalSprites};
use crate::fighter::{Fighter, FighterStats};
use crate::movable::{Movable, StepContext};

/// Ticks spent moving at the start of each cycle.
pub const MOVE_FRAMES: u32 = 45;
/// Length of one move/rest cycle.
pub const CYCLE_FRAMES: u32 = 60;
/// Ticks between direction changes.
pub const TURN_FRAMES: u32 = 30;
/// Sprite advances once every this many ticks while moving.
pub const MOVE_ANIMATION_INTERVAL: u32 = 8;
/// Sprite advances once every this many ticks while resting.
pub const REST_ANIMATION_INTERVAL: u32 = 12;

/// The wandering slime behavior.
#[derive(Debug, Clone)]
pub struct Zol {
    speed: Vec2,
    stats: FighterStats,
    animation: AnimationHandler,
    direction: Direction,
    movement_counter: u32,
    direction_counter: u32,
    animation_counter: u32,
    death_frames: usize,
    should_die: bool,
}

impl Zol {
    /// Creates a Zol walking toward `direction`.
    #[must_use]
    pub fn new(speed: f32, stats: FighterStats, direction: Direction) -> Self {
        let mut animation = AnimationHandler::new();
        animation.set(AnimState::Moving, direction);
        Self {
            speed: Vec2::splat(speed),
            stats,
            animation,
            direction,
            movement_counter: 0,
            direction_counter: 0,
            animation_counter: 0,
            death_frames: 0,
            should_die: false,
        }
    }

    /// Uses a separate speed per axis.
    #[must_use]
    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    /// Registers walking/resting sprites and the death sequence.
    #[must_use]
    pub fn with_sprites(mut self, movement: &DirectionalSprites, death: Vec<String>) -> Self {
        self.animation.add_directional(AnimState::Moving, movement);
        self.animation.add_directional(AnimState::Still, movement);
        self.animation
            .add_animation(AnimState::Dead, Direction::None, death);
        self
    }

    /// Current wander direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` once the death animation has finished.
    #[must_use]
    pub const fn should_die(&self) -> bool {
        self.should_die
    }

    fn advance_counters(&mut self, new_direction: Direction) {
        self.movement_counter += 1;
        if self.movement_counter >= CYCLE_FRAMES {
            self.movement_counter = 0;
        }
        self.direction_counter += 1;
        if self.direction_counter > TURN_FRAMES {
            self.direction_counter = 0;
            self.direction = new_direction;
        }
    }

    fn rest(&mut self, body: &mut Body) {
        if self.animation.current_state() != AnimState::Still {
            self.animation.set(AnimState::Still, self.direction);
            body.show(self.animation.next_sprite());
        }
        if self.animation_counter % REST_ANIMATION_INTERVAL == 0 {
            body.show(self.animation.next_sprite());
        }
        self.animation_counter = self.animation_counter.wrapping_add(1);
    }

    fn wander(&mut self, body: &mut Body, direction: Direction) {
        if direction == Direction::None {
            return;
        }
        body.pos += self.calculate_movement(direction);

        if self.animation.current_state() != AnimState::Moving
            || self.animation.current_direction() != direction
        {
            self.animation.set(AnimState::Moving, direction);
            body.show(self.animation.next_sprite());
            self.animation_counter = 0;
        }
        if self.animation_counter % MOVE_ANIMATION_INTERVAL == 0 {
            body.show(self.animation.next_sprite());
        }
        self.animation_counter = self.animation_counter.wrapping_add(1);
    }

    fn die(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        if self.animation.current_state() != AnimState::Dead {
            self.animation.set(AnimState::Dead, Direction::None);
            self.death_frames = 0;
            return;
        }
        if self.death_frames < self.animation.current_animation().len() {
            body.show(self.animation.next_sprite());
            self.death_frames += 1;
        } else {
            self.should_die = true;
            ctx.despawn_self();
            debug!("Zol {} finished dying", ctx.id);
        }
    }
}

impl Movable for Zol {
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
        if !self.is_alive() {
            AnimState::Dead
        } else if self.movement_counter < MOVE_FRAMES {
            AnimState::Moving
        } else {
            AnimState::Still
        }
    }

    fn updated_direction(&self, ctx: &mut StepContext<'_>) -> Direction {
        if self.direction_counter >= TURN_FRAMES {
            Direction::random(ctx.rng)
        } else {
            self.direction
        }
    }

    fn step(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        if self.should_die {
            return;
        }
        let state = self.updated_state(ctx);
        let direction = self.updated_direction(ctx);
        self.advance_counters(direction);

        match state {
            AnimState::Still => self.rest(body),
            AnimState::Moving => self.wander(body, direction),
            AnimState::Dead => self.die(body, ctx),
            AnimState::Attack | AnimState::Hurt => {}
        }
    }
}

impl Fighter for Zol {
    fn stats(&self) -> &FighterStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut FighterStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;
    use crate::movable::{Effect, Neighbors};
    use crate::sprite::NoMetrics;
    use lulu_common::{EntityId, Rect};

    struct Rig {
        input: InputSnapshot,
        rng: fastrand::Rng,
        effects: Vec<Effect>,
    }

    impl Rig {
        fn new(seed: u64) -> Self {
            Self {
                input: InputSnapshot::new(),
                rng: fastrand::Rng::with_seed(seed),
                effects: Vec::new(),
            }
        }

        fn step(&mut self, zol: &mut Zol, body: &mut Body) {
            let mut metrics = NoMetrics;
            let mut ctx = StepContext::new(
                EntityId::new(),
                &self.input,
                Rect::new(Vec2::ZERO, Vec2::new(1000.0, 1000.0)),
                &[],
                Neighbors::new(&[], &[]),
                &mut metrics,
                &mut self.rng,
                &mut self.effects,
            );
            zol.step(body, &mut ctx);
        }
    }

    fn sprites() -> DirectionalSprites {
        DirectionalSprites {
            up: vec!["zol_a".into(), "zol_b".into()],
            down: vec!["zol_a".into(), "zol_b".into()],
            left: vec!["zol_a".into(), "zol_b".into()],
            right: vec!["zol_a".into(), "zol_b".into()],
        }
    }

    fn zol() -> Zol {
        Zol::new(1.0, FighterStats::new(2.0, 1.0), Direction::Right)
            .with_sprites(&sprites(), vec!["die_1".into(), "die_2".into(), "die_3".into()])
    }

    #[test]
    fn test_moves_then_rests() {
        let mut rig = Rig::new(3);
        let mut zol = zol();
        let mut body = Body::new(Vec2::new(500.0, 500.0), Vec2::splat(20.0), "");

        let mut moving_ticks = 0;
        for _ in 0..CYCLE_FRAMES {
            let before = body.pos;
            rig.step(&mut zol, &mut body);
            if body.pos != before {
                moving_ticks += 1;
            }
        }
        assert_eq!(moving_ticks, MOVE_FRAMES);
        assert_eq!(zol.animation().current_state(), AnimState::Still);
    }

    #[test]
    fn test_direction_changes_after_turn_period() {
        let mut rig = Rig::new(11);
        let mut zol = zol();
        let mut body = Body::new(Vec2::new(500.0, 500.0), Vec2::splat(20.0), "");
        for _ in 0..TURN_FRAMES {
            rig.step(&mut zol, &mut body);
            assert_eq!(zol.direction(), Direction::Right);
        }
        rig.step(&mut zol, &mut body);
        assert_ne!(zol.direction(), Direction::None);
    }

    #[test]
    fn test_seeded_wander_is_deterministic() {
        let run = |seed| {
            let mut rig = Rig::new(seed);
            let mut zol = zol();
            let mut body = Body::new(Vec2::new(500.0, 500.0), Vec2::splat(20.0), "");
            for _ in 0..200 {
                rig.step(&mut zol, &mut body);
            }
            body.pos
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_death_plays_once_then_despawns() {
        let mut rig = Rig::new(5);
        let mut zol = zol();
        let mut body = Body::new(Vec2::new(500.0, 500.0), Vec2::splat(20.0), "");
        zol.take_damage(2.0);

        rig.step(&mut zol, &mut body);
        assert_eq!(zol.animation().current_state(), AnimState::Dead);
        let still_at = body.pos;

        let mut shown = Vec::new();
        for _ in 0..3 {
            rig.step(&mut zol, &mut body);
            shown.push(body.sprite.clone());
        }
        assert_eq!(shown, vec!["die_1", "die_2", "die_3"]);
        assert!(!zol.should_die());
        assert!(rig.effects.is_empty());

        rig.step(&mut zol, &mut body);
        assert!(zol.should_die());
        assert_eq!(rig.effects.len(), 1);
        assert!(matches!(rig.effects[0], Effect::Despawn(_)));

        for _ in 0..10 {
            rig.step(&mut zol, &mut body);
        }
        assert_eq!(rig.effects.len(), 1);
        assert_eq!(body.pos, still_at);
        assert_eq!(zol.animation().current_state(), AnimState::Dead);
    }
}
