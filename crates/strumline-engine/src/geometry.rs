//! 2D vector math and the string's line geometry.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component (up is positive).
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Creates a new vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a vector from an angle measured clockwise from "up", in degrees.
    pub fn from_clock_angle(degrees: f32, length: f32) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.sin() * length, radians.cos() * length)
    }

    /// Dot product.
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Distance to another point.
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Counter-clockwise perpendicular (same length).
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Linear interpolation from `self` to `other`.
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// The string: a directed segment from `origin` to the pitch circle's `center`.
///
/// The angle of `origin` around `center` selects the pitch class and the
/// segment length (relative to `radius`) selects the octave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    /// Endpoint on (or around) the pitch circle.
    pub origin: Vec2,
    /// Center of the pitch circle; the pivot of the string.
    pub center: Vec2,
    /// Pitch circle radius. Must be positive.
    pub radius: f32,
}

impl LineGeometry {
    /// Creates a new line geometry.
    pub fn new(origin: Vec2, center: Vec2, radius: f32) -> Self {
        Self {
            origin,
            center,
            radius,
        }
    }

    /// Vector from center to origin.
    pub fn direction(&self) -> Vec2 {
        self.origin - self.center
    }

    /// Length of the string.
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Angle of the origin around the center, clockwise from "up", in `[0, 360)`.
    pub fn angle_from_12(&self) -> f32 {
        clock_angle(self.direction())
    }

    /// Exchanges origin and center. Applying it twice is the identity.
    pub fn swap_endpoints(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.center);
    }

    /// Returns a copy with origin and center exchanged.
    pub fn swapped(mut self) -> Self {
        self.swap_endpoints();
        self
    }
}

/// Angle of `direction` clockwise from "up", in degrees, normalized to `[0, 360)`.
pub fn clock_angle(direction: Vec2) -> f32 {
    let mut angle = direction.x.atan2(direction.y).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    // -0.0000001 + 360 rounds to exactly 360 in f32
    if angle >= 360.0 {
        angle -= 360.0;
    }
    angle
}
