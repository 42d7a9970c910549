#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in either world or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rotate `point` about `center` by `angle_deg` using screen-space handedness.
///
/// `x' = cos·(x−cx) + sin·(y−cy) + cx`
/// `y' = cos·(y−cy) − sin·(x−cx) + cy`
///
/// This is the same motion as a canvas `rotate(-angle)`, so a position rotated
/// here lands exactly where the map drawn under `rotate(-yaw)` puts it.
#[must_use]
pub fn rotate_point(center: Point, point: Point, angle_deg: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point {
        x: cos.mul_add(dx, sin * dy) + center.x,
        y: cos.mul_add(dy, -(sin * dx)) + center.y,
    }
}

/// 2D affine transform in canvas `setTransform(a, b, c, d, e, f)` order.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. The builder methods
/// post-multiply, matching how a 2D canvas context accumulates transforms:
/// the most recently applied operation acts on the drawing coordinates first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// `self · other`: apply `other` first, then `self`.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self {
            a: self.a.mul_add(other.a, self.c * other.b),
            b: self.b.mul_add(other.a, self.d * other.b),
            c: self.a.mul_add(other.c, self.c * other.d),
            d: self.b.mul_add(other.c, self.d * other.d),
            e: self.a.mul_add(other.e, self.c.mul_add(other.f, self.e)),
            f: self.b.mul_add(other.e, self.d.mul_add(other.f, self.f)),
        }
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.then(Self { e: dx, f: dy, ..Self::IDENTITY })
    }

    /// Canvas rotation: positive angles turn clockwise on a y-down screen.
    #[must_use]
    pub fn rotate_deg(self, angle_deg: f64) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        self.then(Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 })
    }

    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.then(Self { a: sx, d: sy, ..Self::IDENTITY })
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a.mul_add(p.x, self.c.mul_add(p.y, self.e)),
            y: self.b.mul_add(p.x, self.d.mul_add(p.y, self.f)),
        }
    }
}

/// Explicit drawing transform with scoped save/restore.
///
/// Replaces the implicit push/pop of a canvas context: every change made
/// inside [`TransformStack::scoped`] is undone when the closure returns,
/// whichever path it returns by.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Affine,
    depth: usize,
}

impl TransformStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Affine {
        self.current
    }

    /// Number of scopes currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current.translate(dx, dy);
    }

    pub fn translate_to(&mut self, p: Point) {
        self.translate(p.x, p.y);
    }

    pub fn rotate_deg(&mut self, angle_deg: f64) {
        self.current = self.current.rotate_deg(angle_deg);
    }

    pub fn scale(&mut self, s: f64) {
        self.current = self.current.scale(s, s);
    }

    /// Run `f` with a saved copy of the transform and restore it afterwards.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.current;
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        self.current = saved;
        out
    }
}
