use crate::units::*;

/// A rectangle, specified by two opposite corners, in PDF (bottom-up) coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and its size
    pub fn from_origin(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// The smallest rectangle containing all of the given points
    pub fn bounding(points: &[(Pt, Pt)]) -> Option<Rect> {
        let (&(x, y), rest) = points.split_first()?;
        let mut rect = Rect {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        };
        for &(x, y) in rest {
            rect.x1 = rect.x1.min(x);
            rect.y1 = rect.y1.min(y);
            rect.x2 = rect.x2.max(x);
            rect.y2 = rect.y2.max(y);
        }
        Some(rect)
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Move the rectangle by the given offsets
    pub fn translated(&self, dx: Pt, dy: Pt) -> Rect {
        Rect {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<&Rect> for pdf_writer::Rect {
    fn from(r: &Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}
