//! End-to-end scenarios for the simulation core.
//!
//! These tests build small arenas through the public API and drive them
//! with scripted input, checking what a player would observe on screen.

#![cfg(test)]

use lulu_common::{Key, Vec2};
use proptest::prelude::*;

use crate::actor::Actor;
use crate::animation::{Direction, DirectionalSprites};
use crate::arena::Arena;
use crate::blade_trap::{BladeTrap, TrapSettings, TrapState};
use crate::collision::Side;
use crate::fighter::{AttackTiming, FighterStats};
use crate::link::Link;
use crate::sprite::FixedMetrics;
use crate::zol::Zol;

fn hero(size: f32, speed: f32) -> Link {
    Link::new(Vec2::splat(size), speed, FighterStats::new(12.0, 1.0))
}

fn directional(prefix: &str) -> DirectionalSprites {
    let list = |dir: &str| vec![format!("{prefix}_{dir}_1"), format!("{prefix}_{dir}_2")];
    DirectionalSprites {
        up: list("up"),
        down: list("down"),
        left: list("left"),
        right: list("right"),
    }
}

/// Player movement against the arena bounds
mod movement_tests {
    use super::*;

    #[test]
    fn e2e_link_walks_right_then_stops_at_wall() {
        let mut arena = Arena::new(Vec2::new(100.0, 100.0), Vec2::new(600.0, 350.0));
        let id = arena.spawn(Actor::link(Vec2::new(400.0, 275.0), hero(50.0, 10.0)));

        for _ in 0..5 {
            arena.tick(&[Key::D]);
        }
        let link = arena.get(id).expect("link present");
        assert_eq!(link.pos(), Vec2::new(450.0, 275.0));

        for _ in 0..30 {
            arena.tick(&[Key::D]);
        }
        let link = arena.get(id).expect("link present");
        assert_eq!(link.pos().x, 650.0);
        assert_eq!(link.rect().right(), 700.0);
    }

    #[test]
    fn e2e_arrow_keys_and_wasd_agree() {
        let run = |key: Key| {
            let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
            let id = arena.spawn(Actor::link(Vec2::new(300.0, 300.0), hero(30.0, 4.0)));
            for _ in 0..3 {
                arena.tick(&[key]);
            }
            arena.get(id).map(Actor::pos)
        };
        assert_eq!(run(Key::W), run(Key::Up));
        assert_eq!(run(Key::A), run(Key::Left));
        assert_eq!(run(Key::W), Some(Vec2::new(300.0, 288.0)));
    }

    #[test]
    fn e2e_diagonal_walk_covers_axial_distance() {
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let id = arena.spawn(Actor::link(Vec2::new(300.0, 300.0), hero(30.0, 10.0)));
        arena.tick(&[Key::W, Key::D]);

        let link = arena.get(id).expect("link present");
        let moved = link.pos().distance(Vec2::new(300.0, 300.0));
        assert!((moved - 10.0).abs() < 1e-3, "moved {moved}");
        assert_eq!(link.facing(), Direction::UpRight);
    }
}

/// Contact detection and resolution
mod collision_tests {
    use super::*;

    #[test]
    fn e2e_link_is_stopped_by_idle_trap() {
        let settings = TrapSettings {
            detection_range: 0.0,
            ..TrapSettings::default()
        };
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let trap = arena.spawn(Actor::blade_trap(
            Vec2::splat(50.0),
            BladeTrap::new(Vec2::new(100.0, 100.0), 2.0, 2.0, settings),
        ));
        let link = arena.spawn(Actor::link(Vec2::new(40.0, 100.0), hero(50.0, 20.0)));

        arena.tick(&[Key::D]);

        assert_eq!(arena.get(link).map(|a| a.pos().x), Some(50.0));
        let contacts = arena.collisions_of(link);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].target, trap);
        assert_eq!(contacts[0].side, Side::Right);
        assert_eq!(arena.get(trap).map(Actor::pos), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn e2e_zol_never_leaves_the_room() {
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(120.0, 120.0)).with_seed(99);
        let id = arena.spawn(Actor::zol(
            Vec2::new(50.0, 50.0),
            Vec2::splat(20.0),
            Zol::new(3.0, FighterStats::new(2.0, 1.0), Direction::Left),
        ));
        arena.spawn(Actor::obstacle(Vec2::new(0.0, 0.0), Vec2::new(120.0, 10.0), ""));

        for _ in 0..600 {
            arena.tick(&[]);
            let zol = arena.get(id).expect("zol present");
            assert!(arena.bounds().contains_rect(&zol.rect()));
            assert!(zol.pos().y >= 10.0);
        }
    }

    #[test]
    fn e2e_earlier_actor_sees_stale_position() {
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let slow = arena.spawn(Actor::zol(
            Vec2::new(200.0, 100.0),
            Vec2::splat(20.0),
            Zol::new(0.0, FighterStats::new(3.0, 1.0), Direction::Down),
        ));
        let link = arena.spawn(Actor::link(Vec2::new(150.0, 100.0), hero(20.0, 40.0)));

        arena.tick(&[Key::D]);

        // The Zol was checked before Link moved into it.
        assert!(arena.collisions_of(slow).is_empty());
        assert!(arena.collisions_of(link).iter().any(|c| c.target == slow));
        assert_eq!(arena.get(link).map(|a| a.pos().x), Some(180.0));
    }
}

/// Damage flowing between fighters
mod combat_tests {
    use super::*;

    fn sword_fight(metrics: FixedMetrics) -> (usize, bool) {
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0)).with_metrics(metrics);
        arena.spawn(Actor::link(
            Vec2::new(100.0, 100.0),
            hero(30.0, 3.0)
                .with_timing(AttackTiming::new(2, 6))
                .with_sprites(&directional("walk"), &directional("attack")),
        ));
        let slime = arena.spawn(Actor::zol(
            Vec2::new(140.0, 100.0),
            Vec2::splat(20.0),
            Zol::new(0.0, FighterStats::new(1.0, 1.0), Direction::Down),
        ));

        arena.tick(&[Key::D]);
        let mut hits = 0;
        for tick in 0..8 {
            let keys: &[Key] = if tick == 0 { &[Key::Space] } else { &[] };
            hits += arena.tick(keys).damage.len();
        }
        (hits, arena.contains(slime))
    }

    #[test]
    fn e2e_sword_sprite_extends_reach() {
        let metrics = FixedMetrics::new()
            .with("attack_right_1", Vec2::new(50.0, 30.0))
            .with("attack_right_2", Vec2::new(50.0, 30.0));
        let (hits, slime_alive) = sword_fight(metrics);
        assert_eq!(hits, 1);
        assert!(!slime_alive);
    }

    #[test]
    fn e2e_swing_without_reach_misses() {
        let (hits, slime_alive) = sword_fight(FixedMetrics::new());
        assert_eq!(hits, 0);
        assert!(slime_alive);
    }

    #[test]
    fn e2e_blade_trap_charges_into_link() {
        let settings = TrapSettings {
            damage_frames: 60,
            ..TrapSettings::default()
        };
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let trap = arena.spawn(Actor::blade_trap(
            Vec2::splat(50.0),
            BladeTrap::new(Vec2::new(100.0, 100.0), 2.0, 2.0, settings),
        ));
        let link = arena.spawn(Actor::link(Vec2::new(300.0, 100.0), hero(50.0, 5.0)));

        let mut first_hit = None;
        for _ in 0..60 {
            let report = arena.tick(&[]);
            if let Some(hit) = report.damage.first() {
                first_hit = Some(*hit);
                break;
            }
        }

        let hit = first_hit.expect("trap should reach link");
        assert_eq!(hit.source, trap);
        assert_eq!(hit.target, link);
        assert_eq!(hit.amount, 2.0);
        assert_eq!(hit.remaining_hp, 10.0);

        let state = arena
            .get(trap)
            .and_then(|a| match a.role() {
                crate::actor::Role::BladeTrap(t) => Some(t.state()),
                _ => None,
            });
        assert_eq!(state, Some(TrapState::Charging));
    }
}

/// Membership bookkeeping across arenas
mod lifecycle_tests {
    use super::*;

    #[test]
    fn e2e_player_moves_between_rooms() {
        let mut field = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let mut cave = Arena::new(Vec2::ZERO, Vec2::new(400.0, 300.0));
        let link = field.spawn(Actor::link(Vec2::new(10.0, 10.0), hero(30.0, 5.0)));
        field.tick(&[Key::D]);

        let moved = field.transfer(link, &mut cave).expect("link in field");
        assert_eq!(moved, link);
        assert!(!field.contains(link));
        assert!(field.collisions_of(link).is_empty());
        assert!(!field.collisions().contains_key(&link));
        assert_eq!(cave.get(link).and_then(Actor::arena), Some(cave.id()));
        assert!(cave.collisions().contains_key(&link));

        cave.tick(&[Key::S]);
        assert_eq!(cave.get(link).map(|a| a.pos().y), Some(15.0));
    }

    #[test]
    fn e2e_killed_actor_is_forgotten_by_everyone() {
        let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let link = arena.spawn(Actor::link(Vec2::new(100.0, 100.0), hero(30.0, 5.0)));
        let rock = arena.spawn(Actor::obstacle(Vec2::new(125.0, 100.0), Vec2::splat(30.0), ""));
        arena.tick(&[]);
        assert!(!arena.collisions_of(link).is_empty());

        let rock_actor = arena.kill(rock).expect("rock present");
        assert_eq!(rock_actor.arena(), None);
        assert!(arena.collisions_of(link).is_empty());
        assert!(arena.collisions().values().flatten().all(|c| c.target != rock));
    }
}

/// Properties that hold for any input script
mod property_tests {
    use super::*;

    const KEYS: [Key; 6] = [Key::W, Key::A, Key::S, Key::D, Key::Space, Key::Right];

    proptest! {
        #[test]
        fn e2e_movers_stay_inside_bounds(
            start_x in 0.0f32..750.0,
            start_y in 0.0f32..550.0,
            script in prop::collection::vec(prop::collection::vec(0usize..KEYS.len(), 0..3), 1..60),
            seed in any::<u64>(),
        ) {
            let mut arena = Arena::new(Vec2::ZERO, Vec2::new(800.0, 600.0)).with_seed(seed);
            arena.spawn(Actor::link(Vec2::new(start_x, start_y), hero(50.0, 12.0)));
            arena.spawn(Actor::obstacle(Vec2::new(380.0, 280.0), Vec2::splat(40.0), ""));
            arena.spawn(Actor::zol(
                Vec2::new(600.0, 100.0),
                Vec2::splat(20.0),
                Zol::new(5.0, FighterStats::new(3.0, 1.0), Direction::Up),
            ));

            let bounds = arena.bounds();
            for held in script {
                let keys: Vec<Key> = held.into_iter().map(|i| KEYS[i]).collect();
                arena.tick(&keys);
                for actor in arena.actors().iter().filter(|a| a.kind().is_movable()) {
                    let rect = actor.rect();
                    prop_assert!(rect.left() >= bounds.left() - 1e-3);
                    prop_assert!(rect.top() >= bounds.top() - 1e-3);
                    prop_assert!(rect.right() <= bounds.right() + 1e-3);
                    prop_assert!(rect.bottom() <= bounds.bottom() + 1e-3);
                }
            }
        }
    }
}
