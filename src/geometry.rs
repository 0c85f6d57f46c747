use std::fmt;
use std::marker::PhantomData;

/// Screen pixel coordinates, before the view's pan/zoom is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSpace {}

/// Coordinates in which the layout engine places nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSpace {}

/// A point tagged with the coordinate space it lives in.
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<S>,
}

impl<S> Point<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }
}

// Manual impls: derives would require `S` itself to implement these traits.
impl<S> Clone for Point<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Point<S> {}

impl<S> PartialEq for Point<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`.
///
/// The only constructor is [`Rect::from_corners`], so the ordering holds for every
/// value regardless of which way the box was dragged.
pub struct Rect<S> {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    _space: PhantomData<S>,
}

impl<S> Rect<S> {
    /// Build the rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point<S>, b: Point<S>) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
            _space: PhantomData,
        }
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Inclusive containment: points on an edge are inside.
    pub fn contains(&self, p: Point<S>) -> bool {
        self.x1 <= p.x && p.x <= self.x2 && self.y1 <= p.y && p.y <= self.y2
    }
}

impl<S> Clone for Rect<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Rect<S> {}

impl<S> PartialEq for Rect<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x1 == other.x1 && self.y1 == other.y1 && self.x2 == other.x2 && self.y2 == other.y2
    }
}

impl<S> fmt::Debug for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect[({}, {}) .. ({}, {})]",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// Pan/zoom state of the view: `pointer = graph * scale + translate`.
///
/// Owned by the view controller; the engine only reads it. `scale` is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        debug_assert!(scale > 0.0, "transform scale must be positive, got {scale}");
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// Map a graph-space point to where it is drawn on screen.
    pub fn apply(&self, p: Point<GraphSpace>) -> Point<PointerSpace> {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Remove the pan/zoom from a pointer position.
    pub fn invert(&self, p: Point<PointerSpace>) -> Point<GraphSpace> {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Convert a dragged pointer-space box into the graph-space box it covers.
pub fn to_graph_space(rect: Rect<PointerSpace>, transform: &Transform) -> Rect<GraphSpace> {
    let a = transform.invert(Point::new(rect.x1, rect.y1));
    let b = transform.invert(Point::new(rect.x2, rect.y2));
    Rect::from_corners(a, b)
}
