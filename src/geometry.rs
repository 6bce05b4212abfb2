//! Edge anchoring for map shapes.
//!
//! Given two shapes joined by a connection, this module finds the point on
//! each shape's silhouette that faces the other shape's center, plus the
//! compass side (`Anchor`) each end of the edge should attach to. Rendered
//! edges then touch the outline instead of ending inside the shape or
//! floating next to it.
//!
//! Silhouettes per kind:
//! - Rectangle: the axis-aligned bounding box
//! - Circle: radius `width / 2`, centered at `position + (r, r)`
//! - Cloud: an ellipse with radii `0.4 * width` and `0.4 * height` around the
//!   box center. The drawn cloud is irregular; the ellipse is close enough
//!   for anchoring without tracing the path.
//!
//! Everything here is pure and total. [`Dimensions::sanitized`] turns missing
//! or bad sizes into 100x100, and an undefined direction (reference at the
//! center) falls back to Right.

use serde::{Deserialize, Serialize};

/// Width and height used when a node has no usable size.
pub const DEFAULT_SIZE: f64 = 100.0;

/// Cloud ellipse radii as a fraction of the node box.
pub const CLOUD_RADIUS_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl Dimensions {
    /// Build dimensions from possibly-missing values. Each side falls back to
    /// [`DEFAULT_SIZE`] on its own when absent, non-positive or non-finite.
    pub fn sanitized(width: Option<f64>, height: Option<f64>) -> Self {
        fn side(v: Option<f64>) -> f64 {
            match v {
                Some(v) if v.is_finite() && v > 0.0 => v,
                _ => DEFAULT_SIZE,
            }
        }
        Self {
            width: side(width),
            height: side(height),
        }
    }

    /// Same dimensions with unusable sides replaced by [`DEFAULT_SIZE`].
    pub fn or_default(self) -> Self {
        Self::sanitized(Some(self.width), Some(self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Cloud,
}

impl ShapeKind {
    /// Map a node type name to a shape. Unknown names draw as rectangles.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "circle" => ShapeKind::Circle,
            "cloud" => ShapeKind::Cloud,
            _ => ShapeKind::Rectangle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Cloud => "cloud",
        }
    }

    /// Size given to freshly created nodes of this kind.
    pub fn default_dimensions(&self) -> Dimensions {
        match self {
            ShapeKind::Circle => Dimensions {
                width: 100.0,
                height: 100.0,
            },
            ShapeKind::Rectangle => Dimensions {
                width: 150.0,
                height: 60.0,
            },
            ShapeKind::Cloud => Dimensions {
                width: 150.0,
                height: 80.0,
            },
        }
    }
}

/// Side of a shape where an edge attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// Classify a direction (radians, canvas y pointing down) into one of four
    /// 90 degree sectors centered on the compass axes.
    pub fn from_angle(angle: f64) -> Self {
        let degrees = angle.to_degrees().rem_euclid(360.0);
        if !(45.0..315.0).contains(&degrees) {
            Anchor::Right
        } else if degrees < 135.0 {
            Anchor::Bottom
        } else if degrees < 225.0 {
            Anchor::Left
        } else {
            Anchor::Top
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Anchor::Top => Anchor::Bottom,
            Anchor::Right => Anchor::Left,
            Anchor::Bottom => Anchor::Top,
            Anchor::Left => Anchor::Right,
        }
    }
}

/// A node as seen by the resolver: top-left position, size and kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub position: Point,
    pub dimensions: Dimensions,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(kind: ShapeKind, position: Point, dimensions: Dimensions) -> Self {
        Self {
            position,
            dimensions: dimensions.or_default(),
            kind,
        }
    }

    /// Copy with zero, negative or non-finite sides set to the default size.
    /// Fields are public, so every geometric query goes through this.
    fn normalized(&self) -> Shape {
        Shape {
            dimensions: self.dimensions.or_default(),
            ..*self
        }
    }

    /// Center of the node box.
    pub fn center(&self) -> Point {
        let d = self.dimensions.or_default();
        Point::new(
            self.position.x + d.width / 2.0,
            self.position.y + d.height / 2.0,
        )
    }

    /// Box the silhouette is drawn in, as `(min, max)`. Circles use the
    /// `width x width` square since their radius only depends on the width.
    pub fn bounds(&self) -> (Point, Point) {
        let d = self.dimensions.or_default();
        let (w, h) = match self.kind {
            ShapeKind::Circle => (d.width, d.width),
            _ => (d.width, d.height),
        };
        (
            self.position,
            Point::new(self.position.x + w, self.position.y + h),
        )
    }

    /// Point on the silhouette in the direction of `reference`.
    pub fn boundary_point(&self, reference: Point) -> Point {
        let shape = self.normalized();
        match shape.kind {
            ShapeKind::Rectangle => rectangle_boundary(&shape, reference),
            ShapeKind::Circle => circle_boundary(&shape, reference),
            ShapeKind::Cloud => cloud_boundary(&shape, reference),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorResult {
    pub source_point: Point,
    pub target_point: Point,
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
}

/// Resolve where an edge from `source` to `target` meets both outlines.
pub fn resolve_anchors(source: &Shape, target: &Shape) -> AnchorResult {
    let source_point = source.boundary_point(target.center());
    let target_point = target.boundary_point(source.center());

    let angle = (target_point.y - source_point.y).atan2(target_point.x - source_point.x);
    let source_anchor = Anchor::from_angle(angle);

    AnchorResult {
        source_point,
        target_point,
        source_anchor,
        // Same lookup as `from_angle(angle + PI)`, without rounding at sector edges.
        target_anchor: source_anchor.opposite(),
    }
}

fn rectangle_boundary(shape: &Shape, reference: Point) -> Point {
    let Dimensions { width, height } = shape.dimensions;
    let c = shape.center();
    let dx = reference.x - c.x;
    let dy = reference.y - c.y;

    if dx == 0.0 && dy == 0.0 {
        return Point::new(shape.position.x + width, c.y);
    }

    if dx.abs() * height > dy.abs() * width {
        // Exits through a vertical edge; dx is non-zero here.
        let x = if dx > 0.0 {
            shape.position.x + width
        } else {
            shape.position.x
        };
        let tan = dy / dx;
        Point::new(x, c.y + tan * (x - c.x))
    } else {
        // Exits through a horizontal edge; dy is non-zero here.
        let y = if dy > 0.0 {
            shape.position.y + height
        } else {
            shape.position.y
        };
        let cot = dx / dy;
        Point::new(c.x + (y - c.y) * cot, y)
    }
}

fn circle_boundary(shape: &Shape, reference: Point) -> Point {
    let r = shape.dimensions.width / 2.0;
    let c = Point::new(shape.position.x + r, shape.position.y + r);
    let dx = reference.x - c.x;
    let dy = reference.y - c.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return Point::new(c.x + r, c.y);
    }
    Point::new(c.x + r * dx / len, c.y + r * dy / len)
}

fn cloud_boundary(shape: &Shape, reference: Point) -> Point {
    let c = shape.center();
    let rx = shape.dimensions.width * CLOUD_RADIUS_FACTOR;
    let ry = shape.dimensions.height * CLOUD_RADIUS_FACTOR;
    // atan2(0, 0) is 0, which is the Right default.
    let angle = (reference.y - c.y).atan2(reference.x - c.x);
    Point::new(c.x + rx * angle.cos(), c.y + ry * angle.sin())
}
