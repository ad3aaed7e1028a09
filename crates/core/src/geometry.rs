use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let d = *self - other;
        d.dx * d.dx + d.dy * d.dy
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Angle of this vector in degrees, measured like `atan2(dy, dx)`.
    pub fn angle_degrees(&self) -> f64 {
        self.dy.atan2(self.dx).to_degrees()
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Scales down so the larger side is at most `max_dim`, preserving aspect
    /// ratio. Sizes already within bounds are returned unchanged.
    pub fn fit_within(&self, max_dim: f64) -> Size {
        let largest = self.width.max(self.height);
        if largest <= max_dim || largest <= 0.0 {
            return *self;
        }
        let scale = max_dim / largest;
        Size::new(self.width * scale, self.height * scale)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn inflate(&self, by: f64) -> Rect {
        Rect::new(
            self.x - by,
            self.y - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }

    /// Clamps the origin of a box of `size` so the box stays inside `self`.
    /// A box larger than the container is pinned to the container's origin.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        let max_x = (self.right() - size.width).max(self.x);
        let max_y = (self.bottom() - size.height).max(self.y);
        Point::new(origin.x.clamp(self.x, max_x), origin.y.clamp(self.y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_within_preserves_aspect() {
        let s = Size::new(400.0, 200.0).fit_within(80.0);
        assert_eq!(s, Size::new(80.0, 40.0));
        let tall = Size::new(50.0, 160.0).fit_within(80.0);
        assert_eq!(tall, Size::new(25.0, 80.0));
    }

    #[test]
    fn fit_within_leaves_small_sizes() {
        let s = Size::new(40.0, 20.0);
        assert_eq!(s.fit_within(80.0), s);
    }

    #[test]
    fn clamp_origin_keeps_box_inside() {
        let container = Rect::new(0.0, 0.0, 500.0, 400.0);
        let size = Size::new(80.0, 80.0);
        assert_eq!(container.clamp_origin(Point::new(-10.0, 50.0), size), Point::new(0.0, 50.0));
        assert_eq!(
            container.clamp_origin(Point::new(480.0, 390.0), size),
            Point::new(420.0, 320.0)
        );
    }

    #[test]
    fn clamp_origin_pins_oversized_box() {
        let container = Rect::new(10.0, 10.0, 50.0, 50.0);
        let p = container.clamp_origin(Point::new(100.0, 100.0), Size::new(80.0, 80.0));
        assert_eq!(p, Point::new(10.0, 10.0));
    }

    #[test]
    fn angle_of_axes() {
        assert_eq!(Vector::new(1.0, 0.0).angle_degrees(), 0.0);
        assert!((Vector::new(0.0, 1.0).angle_degrees() - 90.0).abs() < 1e-9);
    }
}
