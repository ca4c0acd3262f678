/// A point in screen or parent-relative pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A rectangle representing a surface's position and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the same size placed at `location`.
    ///
    /// Used to translate a parent-relative rectangle into screen
    /// coordinates once the absolute origin is known.
    pub fn at(&self, location: Point) -> Rect {
        Rect::new(location.x, location.y, self.width, self.height)
    }

    /// Replaces the size, keeping the top-left corner.
    pub fn with_size(&self, size: Size) -> Rect {
        Rect::new(self.x, self.y, size.width, size.height)
    }
}
