//! Layout components and the flow protocol they share.
//!
//! Every component implements [Drawable]: given the document and a [DrawContext]
//! (the cursor), it produces one [Block](crate::Block) per page it draws on and
//! the cursor after it. Components nest through the [Content] enum, which is what
//! divisions, lists, table cells and chapters hold.
//!
//! Layout coordinates are measured in points from the top left corner of the page,
//! `y` growing downwards. Blocks hold PDF (bottom-up) coordinates; components flip
//! `y` when they emit ops.

mod chapter;
mod context;
mod division;
mod drawable;
mod figure;
mod invoice;
mod line;
mod list;
mod margins;
mod paragraph;
mod shapes;
mod styled_paragraph;
mod table;
mod toc;
mod wrap;

pub use chapter::*;
pub use context::*;
pub use division::*;
pub use drawable::{Content, Drawable};
pub use figure::*;
pub use invoice::*;
pub use list::*;
pub use margins::*;
pub use paragraph::*;
pub use shapes::*;
pub use styled_paragraph::*;
pub use table::*;
pub use toc::*;
pub use wrap::{LineWrapper, TextChunk, TextStyle};
