//! Flow-based page layout for PDF documents.
//!
//! Documents are described as a tree of layout components (paragraphs, tables,
//! lists, divisions, images, chapters) which are drawn one after another by a
//! [Creator]. Content that doesn't fit on the current page continues on a new one.
//!
//! ```
//! use pdf_compose::{layout::{Paragraph, Table, TextStyle}, Creator, Font, Pt, StandardFont};
//!
//! let mut creator = Creator::default();
//! let helvetica = creator.add_font(Font::standard(StandardFont::Helvetica));
//! let style = TextStyle::new(helvetica, Pt(10.0));
//!
//! creator.draw(&Paragraph::new("A short table:", style.clone())).expect("can draw");
//! let mut table = Table::new(2);
//! for text in ["one", "two", "three", "four"] {
//!     table.new_cell().set_content(Paragraph::new(text, style.clone())).expect("paragraphs fit in cells");
//! }
//! creator.draw(&table).expect("can draw");
//!
//! let mut pdf = Vec::new();
//! creator.write(&mut pdf).expect("can write");
//! ```

mod block;
pub use block::*;

mod colour;
pub use colour::*;

/// Content stream operations
pub mod content;

mod creator;
pub use creator::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Layout components and the flow context they are laid out in
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod standard_fonts;
pub use standard_fonts::StandardFont;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
