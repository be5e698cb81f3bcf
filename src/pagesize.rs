//! Common paper sizes, in portrait orientation (width ≤ height).
//!
//! ```
//! use pdf_compose::pagesize::{PageOrientation, A4, LETTER};
//!
//! let (width, height) = LETTER;
//! assert_eq!(*width, 612.0);
//! assert!(A4.landscape().0 > A4.landscape().1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

const MM: f32 = 72.0 / 25.4;

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const EXECUTIVE: PageSize = (Pt(7.25 * 72.0), Pt(10.5 * 72.0));

pub const A3: PageSize = (Pt(297.0 * MM), Pt(420.0 * MM));
pub const A4: PageSize = (Pt(210.0 * MM), Pt(297.0 * MM));
pub const A5: PageSize = (Pt(148.0 * MM), Pt(210.0 * MM));
pub const B4: PageSize = (Pt(250.0 * MM), Pt(353.0 * MM));
pub const B5: PageSize = (Pt(176.0 * MM), Pt(250.0 * MM));

/// Swap a page size between portrait and landscape orientations.
pub trait PageOrientation {
    fn portrait(self) -> Self;
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> Self {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
