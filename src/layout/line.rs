//! Rendering and flowing of wrapped text lines, shared by [Paragraph](super::Paragraph)
//! and [StyledParagraph](super::StyledParagraph).

use super::{DrawContext, Margins, Positioning, TextAlignment, TextChunk};
use crate::{
    block::Block,
    content::{Op, TextItem},
    rect::Rect,
    transform::Transform,
    units::Pt,
    Document, PDFError,
};

/// A wrapped line: the pieces of the chunks that ended up on it
pub(crate) type Line = Vec<TextChunk>;

/// Formatting and placement settings common to all text components
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextFrame {
    pub alignment: TextAlignment,
    /// Line height as a multiple of the largest font size on the line
    pub line_height: f32,
    pub wrap: bool,
    pub width: Option<Pt>,
    pub margins: Margins,
    pub positioning: Positioning,
    pub angle: f32,
}

impl Default for TextFrame {
    fn default() -> Self {
        TextFrame {
            alignment: TextAlignment::Left,
            line_height: 1.0,
            wrap: true,
            width: None,
            margins: Margins::empty(),
            positioning: Positioning::Relative,
            angle: 0.0,
        }
    }
}

impl TextFrame {
    /// The width lines are wrapped to when no context is known
    pub fn stored_wrap_width(&self) -> Option<Pt> {
        if self.wrap {
            self.width
        } else {
            None
        }
    }

    /// The width lines are wrapped to when laid out in `ctx`
    pub fn wrap_width(&self, ctx: &DrawContext) -> Option<Pt> {
        if !self.wrap {
            return None;
        }
        match self.positioning {
            Positioning::Relative => Some(ctx.width - self.margins.horizontal()),
            Positioning::Absolute { .. } => self.width,
        }
    }

    /// Place the lines, breaking to a new page first if they don't fit in the space
    /// left. Text is never split between pages: if it doesn't fit on an empty page
    /// either, it overflows.
    pub fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
        lines: &[Line],
        wrap_width: Option<Pt>,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let height = lines_height(lines, self.line_height);
        let box_width = match wrap_width {
            Some(width) => width,
            None => max_line_width(doc, lines)?,
        };

        let mut blocks = Vec::new();
        let mut ctx = ctx;

        let (x, y) = match self.positioning {
            Positioning::Absolute { x, y } => (x, y),
            Positioning::Relative => {
                if height + self.margins.vertical() > ctx.height && !ctx.is_fresh_page() {
                    blocks.push(Block::for_page(&ctx));
                    ctx = ctx.next_page();
                }
                (ctx.x + self.margins.left, ctx.y + self.margins.top)
            }
        };

        let mut block = Block::for_page(&ctx);
        render_lines(
            doc,
            &mut block,
            lines,
            LinePlacement {
                x,
                y,
                width: box_width,
                alignment: self.alignment,
                line_height: self.line_height,
                angle: self.angle,
                page_height: ctx.page_height,
            },
        )?;
        blocks.push(block);

        if !self.positioning.is_relative() {
            return Ok((blocks, ctx));
        }

        if ctx.inline {
            let advance = max_line_width(doc, lines)? + self.margins.horizontal();
            ctx.x += advance;
            ctx.width -= advance;
        } else {
            ctx = ctx.advance(height + self.margins.vertical());
        }
        Ok((blocks, ctx))
    }
}

pub(crate) fn line_height(line: &[TextChunk], factor: f32) -> Pt {
    max_size(line) * factor
}

fn max_size(line: &[TextChunk]) -> Pt {
    line.iter()
        .map(|chunk| chunk.style.size)
        .fold(Pt::ZERO, Pt::max)
}

pub(crate) fn lines_height(lines: &[Line], factor: f32) -> Pt {
    lines.iter().map(|line| line_height(line, factor)).sum()
}

pub(crate) fn line_width(doc: &Document, line: &[TextChunk]) -> Result<Pt, PDFError> {
    let mut width = Pt::ZERO;
    for chunk in line {
        width += chunk.style.text_width(doc, &chunk.text)?;
    }
    Ok(width)
}

pub(crate) fn max_line_width(doc: &Document, lines: &[Line]) -> Result<Pt, PDFError> {
    let mut width = Pt::ZERO;
    for line in lines {
        width = width.max(line_width(doc, line)?);
    }
    Ok(width)
}

/// Where and how a set of lines is drawn. `y` is the top of the first line,
/// measured from the top of the page
#[derive(Debug, Copy, Clone)]
pub(crate) struct LinePlacement {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub alignment: TextAlignment,
    pub line_height: f32,
    pub angle: f32,
    pub page_height: Pt,
}

pub(crate) fn render_lines(
    doc: &Document,
    block: &mut Block,
    lines: &[Line],
    placement: LinePlacement,
) -> Result<(), PDFError> {
    if lines.is_empty() {
        return Ok(());
    }

    let LinePlacement {
        x,
        y,
        width,
        alignment,
        line_height: factor,
        angle,
        page_height,
    } = placement;
    let rotation = (angle != 0.0).then(|| Transform::rotate_about(angle, x, page_height - y));

    block.push(Op::SaveState);
    if let Some(rotation) = rotation {
        block.push(Op::Transform(rotation));
    }
    block.push(Op::BeginText);

    let mut top = y;
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let size = max_size(line);
        let height = size * factor;
        let mut cap_height = Pt::ZERO;
        for chunk in line {
            let font = &doc.fonts[chunk.style.font];
            cap_height = cap_height.max(chunk.style.size * (font.cap_height() / 1000.0));
        }
        let baseline = page_height - (top + cap_height + (height - size) / 2.0);

        let used = line_width(doc, line)?;
        let spaces = line
            .iter()
            .map(|chunk| chunk.text.chars().filter(|&c| c == ' ').count())
            .sum::<usize>();
        let (offset, extra) = match alignment {
            TextAlignment::Left => (Pt::ZERO, Pt::ZERO),
            TextAlignment::Right => (width - used, Pt::ZERO),
            TextAlignment::Center => ((width - used) / 2.0, Pt::ZERO),
            TextAlignment::Justify if i != last && spaces > 0 => {
                (Pt::ZERO, (width - used) / spaces as f32)
            }
            TextAlignment::Justify => (Pt::ZERO, Pt::ZERO),
        };

        block.push(Op::TextMatrix(Transform::translate(x, baseline)));
        let mut pen = x + offset;
        for (ci, chunk) in line.iter().enumerate() {
            let style = &chunk.style;
            let font = &doc.fonts[style.font];
            let name = block.resources_mut().add_font(style.font);

            block.push(Op::Font(name, style.size));
            block.push(Op::FillColour(style.colour));
            if style.rendering_mode.strokes() {
                block.push(Op::StrokeColour(style.outline_colour));
                block.push(Op::LineWidth(style.outline_size));
            }
            block.push(Op::CharSpacing(style.char_spacing));
            block.push(Op::RenderingMode(style.rendering_mode));

            let mut items: Vec<TextItem> = Vec::new();
            if ci == 0 && offset != Pt::ZERO {
                items.push(TextItem::Adjust(-(offset / style.size) * 1000.0));
            }
            let mut glyphs: Vec<u8> = Vec::new();
            let mut chunk_spaces = 0;
            for ch in chunk.text.chars() {
                let encoded = font.encode(ch).ok_or_else(|| PDFError::MissingGlyph {
                    ch,
                    font: font.name(),
                })?;
                glyphs.extend(encoded);
                if ch == ' ' {
                    chunk_spaces += 1;
                    if extra != Pt::ZERO {
                        items.push(TextItem::Glyphs(std::mem::take(&mut glyphs)));
                        items.push(TextItem::Adjust(-(extra / style.size) * 1000.0));
                    }
                }
            }
            if !glyphs.is_empty() {
                items.push(TextItem::Glyphs(glyphs));
            }
            if !items.is_empty() {
                block.push(Op::ShowText(items));
            }

            let chunk_width =
                style.text_width(doc, &chunk.text)? + extra * chunk_spaces as f32;
            if let Some(link) = &chunk.link {
                let rect = Rect {
                    x1: pen,
                    y1: baseline + style.size * (font.descent() / 1000.0),
                    x2: pen + chunk_width,
                    y2: baseline + style.size,
                };
                let rect = match rotation {
                    Some(rotation) => {
                        let corners = [
                            rotation.apply(rect.x1, rect.y1),
                            rotation.apply(rect.x2, rect.y1),
                            rotation.apply(rect.x1, rect.y2),
                            rotation.apply(rect.x2, rect.y2),
                        ];
                        Rect::bounding(&corners).unwrap_or(rect)
                    }
                    None => rect,
                };
                block.add_link(rect, link.clone());
            }
            pen += chunk_width;
        }

        top += height;
    }

    block.push(Op::EndText);
    block.push(Op::RestoreState);
    Ok(())
}
