//! Combat capability: health, damage and the three-phase attack protocol.
//!
//! This module provides:
//! - Fighter stats (health is never clamped; "alive" is derived)
//! - Attack timing (damage frame and total duration)
//! - The `Fighter` trait built on top of `Movable`

use serde::{Deserialize, Serialize};

use crate::actor::Body;
use crate::movable::{Movable, StepContext};

// ============================================================================
// Stats
// ============================================================================

/// Health and damage of a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    /// Current health. May drop to or below zero.
    pub hp: f32,
    /// Health removed from a target per hit
    pub damage: f32,
}

impl FighterStats {
    /// Creates stats.
    #[must_use]
    pub const fn new(hp: f32, damage: f32) -> Self {
        Self { hp, damage }
    }

    /// Subtracts `amount` from health. No floor is applied.
    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    /// Applies this fighter's damage to `target`.
    pub fn attack(&self, target: &mut Self) {
        target.take_damage(self.damage);
    }

    /// Returns `true` while health is positive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

impl Default for FighterStats {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

// ============================================================================
// Attack timing
// ============================================================================

/// Frame layout of one swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTiming {
    /// Attack frame (1-based) on which damage lands
    pub damage_frame: u32,
    /// Number of frames before the swing ends
    pub duration: u32,
}

impl AttackTiming {
    /// Creates a timing, keeping the damage frame inside the swing.
    #[must_use]
    pub fn new(damage_frame: u32, duration: u32) -> Self {
        let duration = duration.max(1);
        Self {
            damage_frame: damage_frame.clamp(1, duration),
            duration,
        }
    }
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self {
            damage_frame: 3,
            duration: 8,
        }
    }
}

// ============================================================================
// Fighter capability
// ============================================================================

/// A movable actor that has health and can deal damage.
///
/// Attack phases default to no-ops for fighters that only deal contact
/// damage or none at all.
pub trait Fighter: Movable {
    /// Current stats.
    fn stats(&self) -> &FighterStats;

    /// Mutable stats.
    fn stats_mut(&mut self) -> &mut FighterStats;

    /// Subtracts `amount` from health.
    fn take_damage(&mut self, amount: f32) {
        self.stats_mut().take_damage(amount);
    }

    /// Returns `true` while health is positive.
    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }

    /// Hits the actor `target` with this fighter's damage.
    fn attack(&self, target: lulu_common::EntityId, ctx: &mut StepContext<'_>) {
        ctx.damage(target, self.stats().damage);
    }

    /// Hits every fighter in the cached collision list.
    fn damage_colliding_fighters(&self, ctx: &mut StepContext<'_>) {
        let targets = ctx.colliding_fighters().map(|c| c.target);
        let targets: Vec<_> = targets.collect();
        for target in targets {
            self.attack(target, ctx);
        }
    }

    /// Enters the attack animation and records what must be restored.
    fn setup_attack(&mut self, _body: &mut Body) {}

    /// Advances the swing by one frame.
    fn perform_attack(&mut self, _body: &mut Body, _ctx: &mut StepContext<'_>) {}

    /// Leaves the attack and restores size and position.
    fn end_attack(&mut self, _body: &mut Body, _ctx: &mut StepContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage_has_no_floor() {
        let mut stats = FighterStats::new(2.0, 1.0);
        stats.take_damage(5.0);
        assert_eq!(stats.hp, -3.0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn test_attack_uses_attacker_damage() {
        let hero = FighterStats::new(12.0, 2.5);
        let mut slime = FighterStats::new(3.0, 1.0);
        hero.attack(&mut slime);
        assert_eq!(slime.hp, 0.5);
        assert!(slime.is_alive());
        hero.attack(&mut slime);
        assert!(!slime.is_alive());
    }

    #[test]
    fn test_zero_health_is_dead() {
        assert!(!FighterStats::new(0.0, 1.0).is_alive());
    }

    #[test]
    fn test_attack_timing_clamps_damage_frame() {
        let timing = AttackTiming::new(10, 4);
        assert_eq!(timing.damage_frame, 4);
        assert_eq!(AttackTiming::new(0, 0), AttackTiming::new(1, 1));
    }
}
