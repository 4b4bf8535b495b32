//! Geometry primitives: a generic 2D vector and an axis-aligned rectangle.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// A 2D vector of any numeric component type.
///
/// Positions and sizes in world units use the default `f32` component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2<T = f32> {
    /// X component
    pub x: T,
    /// Y component
    pub y: T,
}

impl<T> Vec2<T> {
    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy> Vec2<T> {
    /// Creates a vector with both components set to `v`.
    #[must_use]
    pub const fn splat(v: T) -> Self {
        Self { x: v, y: v }
    }
}

impl Vec2<f32> {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Returns both components scaled by 1/√2 when `x == y`.
    ///
    /// Used to turn a per-axis speed into the per-axis step of a diagonal
    /// move that covers the same distance as an axial one. Returns `None`
    /// for anisotropic vectors.
    #[must_use]
    pub fn diagonal(self) -> Option<Self> {
        if self.x == self.y {
            Some(self * std::f32::consts::FRAC_1_SQRT_2)
        } else {
            None
        }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Returns `true` if both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vec2<i32>> for Vec2<f32> {
    fn from(v: Vec2<i32>) -> Self {
        Self::new(v.x as f32, v.y as f32)
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Mul<Output = T>> Mul for Vec2<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl<T: Div<Output = T>> Div for Vec2<T> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: Div<Output = T> + Copy> Div<T> for Vec2<T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl<T: Neg<Output = T>> Neg for Vec2<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: AddAssign> AddAssign for Vec2<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T: SubAssign> SubAssign for Vec2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle without validating its size.
    #[must_use]
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Creates a rectangle, rejecting negative or non-finite sizes.
    pub fn try_new(pos: Vec2, size: Vec2) -> CommonResult<Self> {
        if !size.is_finite() || size.x < 0.0 || size.y < 0.0 {
            return Err(CommonError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self { pos, size })
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.pos.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.pos.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Returns `true` if `inner` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, inner: &Self) -> bool {
        inner.left() >= self.left()
            && inner.top() >= self.top()
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    /// Returns the position that keeps a box of `size` inside this rectangle,
    /// moving `pos` as little as possible.
    ///
    /// A box larger than the rectangle on some axis is pinned to the
    /// rectangle's near edge on that axis.
    #[must_use]
    pub fn clamp_position(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let max = self.max() - size;
        Vec2::new(
            pos.x.min(max.x).max(self.pos.x),
            pos.y.min(max.y).max(self.pos.y),
        )
    }
}
