//! AABB overlap test and contact-side classification.

use lulu_common::{EntityId, Rect};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorKind};

/// Side of the *tested* box that touches the other box.
///
/// `Right` means the other box sits against this box's right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// No overlap
    #[default]
    None,
    /// Contact on the top edge
    Top,
    /// Contact on the bottom edge
    Bottom,
    /// Contact on the left edge
    Left,
    /// Contact on the right edge
    Right,
}

impl Side {
    /// The side the other box reports for the same contact.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` if there is no contact.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` for `Left` and `Right`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Classifies the contact between `this` and `other`.
///
/// Boxes that only share an edge do not collide. On overlap, the axis with
/// the smaller penetration wins (horizontal on ties), and the side on that
/// axis comes from comparing centers, with `<=` favouring `Right`/`Bottom`.
#[must_use]
pub fn check_collision(this: &Rect, other: &Rect) -> Side {
    let this_max = this.max();
    let other_max = other.max();

    if this_max.x <= other.pos.x
        || other_max.x <= this.pos.x
        || this_max.y <= other.pos.y
        || other_max.y <= this.pos.y
    {
        return Side::None;
    }

    let left = (this_max.x - other.pos.x).abs();
    let right = (other_max.x - this.pos.x).abs();
    let top = (this_max.y - other.pos.y).abs();
    let bottom = (other_max.y - this.pos.y).abs();

    let min_h = left.min(right);
    let min_v = top.min(bottom);

    let this_center = this.center();
    let other_center = other.center();

    if min_h <= min_v {
        if this_center.x <= other_center.x {
            Side::Right
        } else {
            Side::Left
        }
    } else if this_center.y <= other_center.y {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// One contact found for an actor during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// The other actor
    pub target: EntityId,
    /// Which side of the moving actor is in contact
    pub side: Side,
    /// Capability class of the other actor
    pub target_kind: ActorKind,
    /// The other actor's box at detection time
    pub target_rect: Rect,
}

impl Collision {
    /// Tests `rect` against `other`, returning a record on contact.
    #[must_use]
    pub fn detect(rect: &Rect, other: &Actor) -> Option<Self> {
        let target_rect = other.rect();
        match check_collision(rect, &target_rect) {
            Side::None => None,
            side => Some(Self {
                target: other.id(),
                side,
                target_kind: other.kind(),
                target_rect,
            }),
        }
    }
}
