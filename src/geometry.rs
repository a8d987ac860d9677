//! Axis-aligned rectangles, segment tests and small vector helpers.
//!
//! Everything in the simulation collides as an axis-aligned rectangle in
//! screen pixels. A rectangle with zero area never overlaps anything, which
//! is how dying enemies become uncollidable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on a point
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// True when the rectangle lies entirely inside `outer`
    pub fn is_inside(&self, outer: &Rect) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow on every side by `margin` (shrinks for negative margins)
    pub fn inflated(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            (self.width + margin * 2.0).max(0.0),
            (self.height + margin * 2.0).max(0.0),
        )
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Whether the segment `a -> b` touches this rectangle (Liang-Barsky clip)
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        if self.is_empty() {
            return false;
        }
        let d = b - a;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        let checks = [
            (-d.x, a.x - self.x),
            (d.x, self.right() - a.x),
            (-d.y, a.y - self.y),
            (d.y, self.bottom() - a.y),
        ];
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return false;
                }
                t0 = t0.max(t);
            } else {
                if t < t0 {
                    return false;
                }
                t1 = t1.min(t);
            }
        }
        t0 <= t1
    }
}

/// Normalised direction from `from` to `to`, or `fallback` when they coincide
pub fn direction_between(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(fallback)
}

/// Unit vector for an angle in degrees (0° points right, 90° points down)
pub fn unit_from_degrees(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(r.cos(), r.sin())
}
