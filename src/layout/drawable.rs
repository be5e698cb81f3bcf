use super::{
    DrawContext, Division, Figure, List, Paragraph, Shape, StyledParagraph, Table,
};
use crate::{block::Block, units::Pt, Document, PDFError};

/// Anything that can be laid out in the flow of a document.
///
/// `layout` places the content at the cursor described by `ctx` (or at its own
/// fixed position) and returns one block per page it was drawn on, in page order,
/// together with the cursor after the content.
pub trait Drawable {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError>;

    /// The natural width of the content, including its margins
    fn width(&self, doc: &Document) -> Result<Pt, PDFError>;

    /// The natural height of the content, including its margins
    fn height(&self, doc: &Document) -> Result<Pt, PDFError>;
}

/// The content that containers (divisions, lists, table cells and chapters) hold
#[derive(Debug, Clone)]
pub enum Content {
    Paragraph(Paragraph),
    StyledParagraph(StyledParagraph),
    Figure(Figure),
    Table(Table),
    List(List),
    Division(Division),
    Block(Block),
    Shape(Shape),
    /// Continue on a new page
    PageBreak,
}

impl Content {
    /// A short name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Paragraph(_) => "paragraph",
            Content::StyledParagraph(_) => "styled paragraph",
            Content::Figure(_) => "figure",
            Content::Table(_) => "table",
            Content::List(_) => "list",
            Content::Division(_) => "division",
            Content::Block(_) => "block",
            Content::Shape(_) => "shape",
            Content::PageBreak => "page break",
        }
    }

    /// Size of the content when laid out in `width`: the width it actually occupies
    /// and its height, both including margins
    pub(crate) fn measure(&self, doc: &Document, width: Pt) -> Result<(Pt, Pt), PDFError> {
        match self {
            Content::Paragraph(p) => {
                let p = p.with_width(width - p.margins().horizontal());
                let lines = p.lines(doc)?;
                let mut used = Pt::ZERO;
                for line in lines {
                    used = used.max(p.style().text_width(doc, line)?);
                }
                Ok((used + p.margins().horizontal(), p.height(doc)?))
            }
            Content::StyledParagraph(p) => {
                let p = p.with_width(width - p.margins().horizontal());
                let lines = p.lines(doc)?;
                let used = super::line::max_line_width(doc, lines)?;
                Ok((used + p.margins().horizontal(), p.height(doc)?))
            }
            Content::Table(t) => Ok((width, t.measured_height(doc, width)?)),
            Content::List(l) => Ok((width, l.measured_height(doc, width)?)),
            Content::Division(d) => Ok((width, d.measured_height(doc, width)?)),
            Content::Figure(_) | Content::Block(_) | Content::Shape(_) => {
                Ok((self.width(doc)?, self.height(doc)?))
            }
            Content::PageBreak => Ok((Pt::ZERO, Pt::ZERO)),
        }
    }

    /// The height a table row needs for this content in a cell `width` wide. Text
    /// gets half a line of padding.
    pub(crate) fn required_height(&self, doc: &Document, width: Pt) -> Result<Pt, PDFError> {
        let (_, height) = self.measure(doc, width)?;
        let padding = match self {
            Content::Paragraph(p) => p.style().size * p.line_height_factor() * 0.5,
            Content::StyledParagraph(p) => p.max_font_size() * p.line_height_factor() * 0.5,
            _ => Pt::ZERO,
        };
        Ok(height + padding)
    }
}

/// Merge the first of a child's blocks into the current page block and append
/// the rest
pub(crate) fn absorb(blocks: &mut Vec<Block>, child_blocks: Vec<Block>) {
    let mut child_blocks = child_blocks.into_iter();
    if let Some(first) = child_blocks.next() {
        match blocks.last_mut() {
            Some(last) => last.merge(first),
            None => blocks.push(first),
        }
    }
    blocks.extend(child_blocks);
}

impl Drawable for Content {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        match self {
            Content::Paragraph(p) => p.layout(doc, ctx),
            Content::StyledParagraph(p) => p.layout(doc, ctx),
            Content::Figure(f) => f.layout(doc, ctx),
            Content::Table(t) => t.layout(doc, ctx),
            Content::List(l) => l.layout(doc, ctx),
            Content::Division(d) => d.layout(doc, ctx),
            Content::Block(b) => b.layout(doc, ctx),
            Content::Shape(s) => s.layout(doc, ctx),
            Content::PageBreak => {
                let next = ctx.next_page();
                Ok((vec![Block::for_page(&ctx), Block::for_page(&next)], next))
            }
        }
    }

    fn width(&self, doc: &Document) -> Result<Pt, PDFError> {
        match self {
            Content::Paragraph(p) => p.width(doc),
            Content::StyledParagraph(p) => p.width(doc),
            Content::Figure(f) => f.width(doc),
            Content::Table(t) => t.width(doc),
            Content::List(l) => l.width(doc),
            Content::Division(d) => d.width(doc),
            Content::Block(b) => b.width(doc),
            Content::Shape(s) => s.width(doc),
            Content::PageBreak => Ok(Pt::ZERO),
        }
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        match self {
            Content::Paragraph(p) => p.height(doc),
            Content::StyledParagraph(p) => p.height(doc),
            Content::Figure(f) => f.height(doc),
            Content::Table(t) => t.height(doc),
            Content::List(l) => l.height(doc),
            Content::Division(d) => d.height(doc),
            Content::Block(b) => b.height(doc),
            Content::Shape(s) => s.height(doc),
            Content::PageBreak => Ok(Pt::ZERO),
        }
    }
}

impl From<Paragraph> for Content {
    fn from(p: Paragraph) -> Self {
        Content::Paragraph(p)
    }
}

impl From<StyledParagraph> for Content {
    fn from(p: StyledParagraph) -> Self {
        Content::StyledParagraph(p)
    }
}

impl From<Figure> for Content {
    fn from(f: Figure) -> Self {
        Content::Figure(f)
    }
}

impl From<Table> for Content {
    fn from(t: Table) -> Self {
        Content::Table(t)
    }
}

impl From<List> for Content {
    fn from(l: List) -> Self {
        Content::List(l)
    }
}

impl From<Division> for Content {
    fn from(d: Division) -> Self {
        Content::Division(d)
    }
}

impl From<Block> for Content {
    fn from(b: Block) -> Self {
        Content::Block(b)
    }
}

impl From<Shape> for Content {
    fn from(s: Shape) -> Self {
        Content::Shape(s)
    }
}
