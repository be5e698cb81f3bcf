use crate::units::Pt;

/// Space to leave around a page or a piece of content. Page margins determine where
/// flowing content starts and how much room it has; content margins push the
/// content away from its neighbours.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    pub fn empty() -> Margins {
        Margins::default()
    }

    /// left + right
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// top + bottom
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}
