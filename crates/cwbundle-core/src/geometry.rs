//! Points, sizes and rectangles in SVG canvas space.
//!
//! The origin is the top-left corner and Y grows downward. Diagram specs are
//! authored in plot space, where Y grows upward; the renderer converts
//! between the two before anything here is used.

/// A position on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// The rectangle of `size` centered on this point.
    ///
    /// ```
    /// # use cwbundle_core::geometry::{Point, Size};
    /// let bounds = Point::new(120.0, 200.0).to_bounds(Size::new(240.0, 80.0));
    /// assert_eq!(bounds.min_point(), Point::new(0.0, 160.0));
    /// ```
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Width and height of a drawable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned rectangle, stored as its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    origin: Point,
    size: Size,
}

impl Bounds {
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let origin = Point::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
        );
        Self { origin, size }
    }

    /// Top-left corner.
    pub fn min_point(self) -> Point {
        self.origin
    }

    pub fn width(self) -> f32 {
        self.size.width
    }

    pub fn height(self) -> f32 {
        self.size.height
    }
}
