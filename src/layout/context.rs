use super::Margins;
use crate::{pagesize::PageSize, units::Pt};

/// The flow cursor threaded through every layout call.
///
/// Coordinates are measured from the top left corner of the page, with `y` growing
/// downwards. `width` and `height` are the space left for content at the cursor,
/// i.e. inside the page margins.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawContext {
    /// 0-based index of the page being drawn on
    pub page: usize,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
    pub page_width: Pt,
    pub page_height: Pt,
    pub margins: Margins,
    /// Set by inline divisions: content advances `x` instead of `y`
    pub inline: bool,
}

impl DrawContext {
    /// A cursor at the top left of the content area of the first page
    pub fn new(page_size: PageSize, margins: Margins) -> DrawContext {
        let (page_width, page_height) = page_size;
        DrawContext {
            page: 0,
            x: margins.left,
            y: margins.top,
            width: page_width - margins.horizontal(),
            height: page_height - margins.vertical(),
            page_width,
            page_height,
            margins,
            inline: false,
        }
    }

    /// The same cursor moved to the top of the content area of the following page.
    /// The horizontal position and width are kept so nested content stays indented.
    pub fn next_page(self) -> DrawContext {
        DrawContext {
            page: self.page + 1,
            y: self.margins.top,
            height: self.page_height - self.margins.vertical(),
            ..self
        }
    }

    /// Whether nothing has been drawn on the current page yet. Moving to a new page
    /// cannot make more room than this, so content that still doesn't fit overflows
    /// instead.
    pub fn is_fresh_page(&self) -> bool {
        self.y <= self.margins.top
    }

    /// Move the cursor down by `dy`, shrinking the space left on the page
    pub fn advance(mut self, dy: Pt) -> DrawContext {
        self.y += dy;
        self.height -= dy;
        self
    }

    /// The PDF (bottom-up) y coordinate of the top-down `y`
    pub fn pdf_y(&self, y: Pt) -> Pt {
        self.page_height - y
    }
}

/// How a drawable decides where to go
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Positioning {
    /// Placed at the cursor, moving it along
    #[default]
    Relative,
    /// Placed at fixed coordinates (top-down), leaving the cursor untouched
    Absolute { x: Pt, y: Pt },
}

impl Positioning {
    pub fn is_relative(&self) -> bool {
        matches!(self, Positioning::Relative)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contexts_start_inside_the_margins() {
        let ctx = DrawContext::new((Pt(600.0), Pt(800.0)), Margins::all(Pt(50.0)));
        assert_eq!((ctx.x, ctx.y), (Pt(50.0), Pt(50.0)));
        assert_eq!((ctx.width, ctx.height), (Pt(500.0), Pt(700.0)));
        assert!(ctx.is_fresh_page());

        let moved = ctx.advance(Pt(100.0));
        assert_eq!(moved.height, Pt(600.0));
        assert!(!moved.is_fresh_page());

        let indented = DrawContext {
            x: Pt(80.0),
            width: Pt(470.0),
            ..moved
        };
        let next = indented.next_page();
        assert_eq!(next.page, 1);
        assert_eq!((next.x, next.width), (Pt(80.0), Pt(470.0)));
        assert_eq!(next.y, Pt(50.0));
        assert_eq!(next.height, Pt(700.0));
    }
}
