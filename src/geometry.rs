/// Value types shared by every coordinate space the engine touches.
///
/// `Size`, `Point` and `Rect` are plain pixel quantities (source pixels,
/// rendered pixels or viewport/client pixels depending on context).
/// `UnitPoint` and `UnitRect` are relative to the source image and always lie
/// within `[0, 1]`; they are the only shapes that get persisted.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        is_positive(self.width) && is_positive(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in pixel space, `x`/`y` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn top_left(&self) -> Point {
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

    pub fn is_finite(&self) -> bool {
        self.top_left().is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Inclusive on all edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Intersection with `[0, bounds.width] x [0, bounds.height]`.
    /// The result may have zero width/height.
    pub fn clip_to(&self, bounds: Size) -> Rect {
        let x1 = self.x.clamp(0.0, bounds.width);
        let y1 = self.y.clamp(0.0, bounds.height);
        let x2 = self.right().clamp(0.0, bounds.width);
        let y2 = self.bottom().clamp(0.0, bounds.height);
        Rect::new(x1, y1, (x2 - x1).max(0.0), (y2 - y1).max(0.0))
    }

    /// Smallest rect containing every point, `None` for an empty iterator or
    /// any non-finite coordinate.
    pub fn bounding<I: IntoIterator<Item = Point>>(points: I) -> Option<Rect> {
        let mut it = points.into_iter();
        let first = it.next()?;
        if !first.is_finite() {
            return None;
        }
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for p in it {
            if !p.is_finite() {
                return None;
            }
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

/// A point relative to the source image, each axis within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitPoint {
    pub x: f64,
    pub y: f64,
}

impl UnitPoint {
    pub const CENTER: UnitPoint = UnitPoint { x: 0.5, y: 0.5 };

    /// Clamp into the unit square; non-finite axes collapse to `0`.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self { x: clamp01(x), y: clamp01(y) }
    }

    pub fn is_valid(&self) -> bool {
        is_unit(self.x) && is_unit(self.y)
    }
}

/// Rectangle relative to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl UnitRect {
    /// Normalized rect spanned by two corners, independent of their order.
    pub fn from_corners(a: UnitPoint, b: UnitPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Every edge inside the unit square and no negative extent.
    pub fn is_valid(&self) -> bool {
        is_unit(self.x)
            && is_unit(self.y)
            && is_unit(self.width)
            && is_unit(self.height)
            && self.x + self.width <= 1.0 + UNIT_EPSILON
            && self.y + self.height <= 1.0 + UNIT_EPSILON
    }

    /// Width and height reach `min`, allowing for rounding in the
    /// subtraction that produced them.
    pub fn meets_min_size(&self, min: f64) -> bool {
        self.width + UNIT_EPSILON >= min && self.height + UNIT_EPSILON >= min
    }
}

/// Slack for sums of unit coordinates that should not exceed `1`.
const UNIT_EPSILON: f64 = 1e-9;

/// Clamp into `[0, 1]`; NaN maps to `0`.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Clamp into `[0, 100]`; NaN maps to `0`.
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

pub fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

pub fn is_unit(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_validity() {
        assert!(Size::new(10.0, 5.0).is_valid());
        assert!(!Size::new(0.0, 5.0).is_valid());
        assert!(!Size::new(10.0, f64::NAN).is_valid());
        assert!(!Size::new(f64::INFINITY, 5.0).is_valid());
    }

    #[test]
    fn clip_to_bounds() {
        let r = Rect::new(-10.0, 20.0, 50.0, 200.0).clip_to(Size::new(100.0, 100.0));
        assert_eq!(r, Rect::new(0.0, 20.0, 40.0, 80.0));

        let outside = Rect::new(150.0, 150.0, 10.0, 10.0).clip_to(Size::new(100.0, 100.0));
        assert_eq!(outside.width, 0.0);
        assert_eq!(outside.height, 0.0);
    }

    #[test]
    fn bounding_box_of_points() {
        let r = Rect::bounding([
            Point::new(10.0, 40.0),
            Point::new(30.0, 5.0),
            Point::new(20.0, 25.0),
        ])
        .unwrap();
        assert_eq!(r, Rect::new(10.0, 5.0, 20.0, 35.0));
        assert!(Rect::bounding(Vec::<Point>::new()).is_none());
        assert!(Rect::bounding([Point::new(f64::NAN, 0.0)]).is_none());
    }

    #[test]
    fn unit_rect_is_order_independent() {
        let a = UnitPoint::clamped(0.2, 0.7);
        let b = UnitPoint::clamped(0.6, 0.3);
        assert_eq!(UnitRect::from_corners(a, b), UnitRect::from_corners(b, a));
        let r = UnitRect::from_corners(a, b);
        assert!((r.width - 0.4).abs() < 1e-12);
        assert!((r.height - 0.4).abs() < 1e-12);
    }

    #[test]
    fn min_size_tolerates_rounding() {
        let r =
            UnitRect::from_corners(UnitPoint::clamped(0.05, 0.1), UnitPoint::clamped(0.06, 0.5));
        assert!(r.width < 0.01);
        assert!(r.meets_min_size(0.01));
        let narrow = UnitRect { x: 0.0, y: 0.0, width: 0.0099, height: 0.5 };
        assert!(!narrow.meets_min_size(0.01));
    }

    #[test]
    fn clamping_handles_nan() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp_percent(-3.0), 0.0);
        assert_eq!(clamp_percent(f64::INFINITY), 100.0);
    }
}
