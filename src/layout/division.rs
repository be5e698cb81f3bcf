use super::{drawable::absorb, Content, DrawContext, Drawable, Margins};
use crate::{block::Block, colour::Colour, content::Op, units::Pt, Document, PDFError};

/// A container laying out its children one after another.
///
/// Children are stacked vertically by default. In inline mode they are placed
/// side by side, wrapping onto a new line when the next child doesn't fit in the
/// remaining width; each line is as tall as its tallest child.
///
/// A background and border, if set, are drawn behind the children on every page
/// the division covers.
#[derive(Debug, Clone, Default)]
pub struct Division {
    children: Vec<Content>,
    inline: bool,
    margins: Margins,
    padding: Margins,
    background: Option<Colour>,
    border: Option<(Colour, Pt)>,
}

impl Division {
    pub fn new() -> Division {
        Division::default()
    }

    pub fn children(&self) -> &[Content] {
        &self.children
    }

    /// Append a child. Page breaks can't be placed in a division.
    pub fn add<C: Into<Content>>(&mut self, content: C) -> Result<(), PDFError> {
        let content = content.into();
        if let Content::PageBreak = content {
            return Err(PDFError::UnsupportedContent {
                container: "division",
                content: content.kind(),
            });
        }
        self.children.push(content);
        Ok(())
    }

    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Space between the border and the children
    pub fn set_padding(&mut self, padding: Margins) {
        self.padding = padding;
    }

    pub fn set_background(&mut self, colour: Colour) {
        self.background = Some(colour);
    }

    pub fn set_border(&mut self, colour: Colour, width: Pt) {
        self.border = Some((colour, width));
    }

    fn insets(&self) -> Margins {
        Margins::trbl(
            self.margins.top + self.padding.top,
            self.margins.right + self.padding.right,
            self.margins.bottom + self.padding.bottom,
            self.margins.left + self.padding.left,
        )
    }

    /// Heights of the lines the children are placed on in inline mode
    fn inline_lines(&self, doc: &Document, width: Pt) -> Result<Vec<Pt>, PDFError> {
        let mut lines = Vec::new();
        let mut x = Pt::ZERO;
        let mut line_height = Pt::ZERO;
        for child in &self.children {
            if x > Pt::ZERO && x + child.width(doc)? > width {
                lines.push(line_height);
                x = Pt::ZERO;
                line_height = Pt::ZERO;
            }
            let (child_width, child_height) = child.measure(doc, width - x)?;
            x += child_width;
            line_height = line_height.max(child_height);
        }
        if !self.children.is_empty() {
            lines.push(line_height);
        }
        Ok(lines)
    }

    /// The division's height when laid out `width` wide, including margins
    pub(crate) fn measured_height(&self, doc: &Document, width: Pt) -> Result<Pt, PDFError> {
        let insets = self.insets();
        let inner = width - insets.horizontal();
        let content: Pt = if self.inline {
            self.inline_lines(doc, inner)?.into_iter().sum()
        } else {
            let mut total = Pt::ZERO;
            for child in &self.children {
                total += child.measure(doc, inner)?.1;
            }
            total
        };
        Ok(content + insets.vertical())
    }

    fn layout_stacked(
        &self,
        doc: &Document,
        mut ctx: DrawContext,
        blocks: &mut Vec<Block>,
    ) -> Result<DrawContext, PDFError> {
        let (x, width) = (ctx.x, ctx.width);
        for child in &self.children {
            let (child_blocks, next) = child.layout(doc, ctx)?;
            absorb(blocks, child_blocks);
            ctx = DrawContext { x, width, ..next };
        }
        Ok(ctx)
    }

    fn layout_inline(
        &self,
        doc: &Document,
        mut ctx: DrawContext,
        blocks: &mut Vec<Block>,
    ) -> Result<DrawContext, PDFError> {
        let (left, right) = (ctx.x, ctx.x + ctx.width);
        let mut line_height = Pt::ZERO;

        for child in &self.children {
            if ctx.x > left && ctx.x + child.width(doc)? > right {
                ctx = ctx.advance(line_height);
                ctx.x = left;
                ctx.width = right - left;
                line_height = Pt::ZERO;
            }
            // the child wraps to whatever is left of the line
            let (child_width, child_height) = child.measure(doc, right - ctx.x)?;
            if ctx.x <= left && child_height > ctx.height && !ctx.is_fresh_page() {
                let next = ctx.next_page();
                blocks.push(Block::for_page(&next));
                ctx = next;
            }

            let child_ctx = DrawContext {
                inline: true,
                width: right - ctx.x,
                ..ctx
            };
            let (child_blocks, next) = child.layout(doc, child_ctx)?;
            absorb(blocks, child_blocks);

            if next.page != child_ctx.page {
                // the child moved on to another page, carry on with the line there
                ctx = DrawContext {
                    x: ctx.x,
                    width: ctx.width,
                    inline: false,
                    ..next
                };
                line_height = Pt::ZERO;
            }
            let advanced = if next.x > child_ctx.x {
                next.x
            } else {
                child_ctx.x + child_width
            };
            ctx.x = advanced;
            ctx.width = right - advanced;
            line_height = line_height.max(child_height);
        }

        let mut ctx = ctx.advance(line_height);
        ctx.x = left;
        ctx.width = right - left;
        Ok(ctx)
    }

    /// Draw the background and border behind the content of each page block.
    /// `top` and `bottom` are where the decorated box starts on the first page and
    /// ends on the last.
    fn decorate(&self, blocks: Vec<Block>, area: DecoratedArea) -> Vec<Block> {
        if self.background.is_none() && self.border.is_none() {
            return blocks;
        }
        let last = blocks.len().saturating_sub(1);
        let ctx = area.ctx;

        blocks
            .into_iter()
            .enumerate()
            .map(|(i, block)| {
                if block.is_empty() {
                    return block;
                }
                let top = if i == 0 { area.top } else { ctx.margins.top };
                let bottom = if i == last {
                    area.bottom
                } else {
                    ctx.page_height - ctx.margins.bottom
                };

                let mut decorated = Block::new(block.width, block.height);
                decorated.push(Op::SaveState);
                if let Some(background) = self.background {
                    decorated.push(Op::FillColour(background));
                }
                if let Some((colour, width)) = self.border {
                    decorated.push(Op::StrokeColour(colour));
                    decorated.push(Op::LineWidth(width));
                }
                decorated.push(Op::Rectangle(
                    area.x,
                    ctx.page_height - bottom,
                    area.width,
                    bottom - top,
                ));
                decorated.push(match (self.background.is_some(), self.border.is_some()) {
                    (true, true) => Op::FillStroke,
                    (true, false) => Op::Fill,
                    _ => Op::Stroke,
                });
                decorated.push(Op::RestoreState);
                decorated.merge(block);
                decorated
            })
            .collect()
    }
}

#[derive(Debug, Copy, Clone)]
struct DecoratedArea {
    x: Pt,
    width: Pt,
    top: Pt,
    bottom: Pt,
    ctx: DrawContext,
}

impl Drawable for Division {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let orig = ctx;
        let insets = self.insets();
        let top = ctx.y + self.margins.top;

        let inner = DrawContext {
            x: ctx.x + insets.left,
            width: ctx.width - insets.horizontal(),
            inline: false,
            ..ctx.advance(insets.top)
        };
        let mut blocks = vec![Block::for_page(&inner)];
        let end = if self.inline {
            self.layout_inline(doc, inner, &mut blocks)?
        } else {
            self.layout_stacked(doc, inner, &mut blocks)?
        };
        let end = end.advance(self.padding.bottom);

        let blocks = self.decorate(
            blocks,
            DecoratedArea {
                x: orig.x + self.margins.left,
                width: orig.width - self.margins.horizontal(),
                top,
                bottom: end.y,
                ctx: end,
            },
        );

        let ctx = DrawContext {
            x: orig.x,
            width: orig.width,
            inline: orig.inline,
            ..end.advance(self.margins.bottom)
        };
        Ok((blocks, ctx))
    }

    fn width(&self, doc: &Document) -> Result<Pt, PDFError> {
        let mut width = Pt::ZERO;
        for child in &self.children {
            let child_width = child.width(doc)?;
            width = if self.inline {
                width + child_width
            } else {
                width.max(child_width)
            };
        }
        Ok(width + self.insets().horizontal())
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        let mut height = Pt::ZERO;
        for child in &self.children {
            let child_height = child.height(doc)?;
            height = if self.inline {
                height.max(child_height)
            } else {
                height + child_height
            };
        }
        Ok(height + self.insets().vertical())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        colours,
        layout::{
            wrap::test::{helvetica_doc, LOREM},
            Paragraph, TextStyle,
        },
        pagesize::LETTER,
        Transform,
    };

    #[test]
    fn children_are_stacked() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut div = Division::new();
        div.add(Paragraph::new("one", style.clone())).unwrap();
        div.add(Paragraph::new("two\nthree", style)).unwrap();
        div.set_margins(Margins::trbl(Pt(5.0), Pt(0.0), Pt(5.0), Pt(0.0)));

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = div.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, Pt(112.0));
        assert_eq!(next.x, ctx.x);
        assert_eq!(div.height(&doc).unwrap(), Pt(40.0));
        assert_eq!(div.measured_height(&doc, Pt(468.0)).unwrap(), Pt(40.0));
    }

    #[test]
    fn page_breaks_are_not_allowed() {
        let mut div = Division::new();
        assert!(matches!(
            div.add(Content::PageBreak),
            Err(PDFError::UnsupportedContent {
                container: "division",
                content: "page break"
            })
        ));
    }

    #[test]
    fn backgrounds_are_drawn_on_every_page() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut div = Division::new();
        for _ in 0..3 {
            div.add(Paragraph::new(LOREM, style.clone())).unwrap();
        }
        div.set_background(colours::LIGHT_GREY);

        // 100pt wide content area: each paragraph is 29 lines tall
        let ctx = DrawContext::new((Pt(244.0), Pt(792.0)), Margins::all(Pt(72.0)));
        let (blocks, next) = div.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!((next.page, next.y), (1, Pt(362.0)));
        for block in &blocks {
            assert_eq!(block.ops()[1], Op::FillColour(colours::LIGHT_GREY));
        }
        assert_eq!(
            blocks[1].ops()[2],
            Op::Rectangle(Pt(72.0), Pt(430.0), Pt(100.0), Pt(290.0))
        );
    }

    #[test]
    fn inline_children_are_placed_side_by_side() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut div = Division::new();
        div.set_inline(true);
        div.add(Paragraph::new("Hi", style.clone())).unwrap();
        div.add(Paragraph::new("Hi", style)).unwrap();

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = div.layout(&doc, ctx).unwrap();
        let xs: Vec<f32> = blocks[0]
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::TextMatrix(Transform { e, .. }) => Some(*e),
                _ => None,
            })
            .collect();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0], 72.0);
        // "Hi" is 9.44 points wide
        assert!((xs[1] - 81.44).abs() < 0.01);
        assert_eq!(next.y, Pt(82.0));
        assert_eq!(next.x, Pt(72.0));
    }

    #[test]
    fn inline_children_wrap_onto_new_lines() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut div = Division::new();
        div.set_inline(true);
        for _ in 0..3 {
            div.add(Paragraph::new("Hello", style.clone())).unwrap();
        }
        // "Hello" is 22.78 points wide, two fit in 50
        assert_eq!(div.measured_height(&doc, Pt(50.0)).unwrap(), Pt(20.0));
    }

    #[test]
    fn inline_paragraphs_advance_by_their_wrapped_height() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut div = Division::new();
        div.set_inline(true);
        div.add(Paragraph::new(LOREM, style.clone())).unwrap();

        let wrapped = Paragraph::new(LOREM, style)
            .with_width(Pt(468.0))
            .height(&doc)
            .unwrap();
        // more lines than the two explicit ones
        assert!(wrapped > Pt(20.0));

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = div.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, Pt(72.0) + wrapped);
        assert_eq!(next.x, Pt(72.0));
        assert_eq!(div.measured_height(&doc, Pt(468.0)).unwrap(), wrapped);
    }
}
