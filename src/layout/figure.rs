use super::{DrawContext, Drawable, HorizontalAlignment, Margins, Positioning};
use crate::{
    block::{Block, GraphicsState},
    content::Op,
    image::Image,
    transform::Transform,
    units::Pt,
    Document, PDFError,
};
use id_arena::Id;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Sizing {
    /// Explicit dimensions, falling back to the natural size where unset
    Explicit { width: Option<Pt>, height: Option<Pt> },
    Scaled(f32, f32),
    ToWidth(Pt),
    ToHeight(Pt),
}

/// An image placed in the flow of the document.
///
/// Images are shown at their natural size (one point per pixel) unless scaled.
/// In relative positioning the figure is aligned horizontally within the width
/// available at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    image: Id<Image>,
    sizing: Sizing,
    alignment: HorizontalAlignment,
    opacity: f32,
    angle: f32,
    margins: Margins,
    positioning: Positioning,
}

impl Figure {
    pub fn new(image: Id<Image>) -> Figure {
        Figure {
            image,
            sizing: Sizing::Explicit {
                width: None,
                height: None,
            },
            alignment: HorizontalAlignment::Left,
            opacity: 1.0,
            angle: 0.0,
            margins: Margins::empty(),
            positioning: Positioning::Relative,
        }
    }

    pub fn image(&self) -> Id<Image> {
        self.image
    }

    /// Set the displayed width without changing the height
    pub fn set_width(&mut self, width: Pt) {
        let height = match self.sizing {
            Sizing::Explicit { height, .. } => height,
            _ => None,
        };
        self.sizing = Sizing::Explicit {
            width: Some(width),
            height,
        };
    }

    /// Set the displayed height without changing the width
    pub fn set_height(&mut self, height: Pt) {
        let width = match self.sizing {
            Sizing::Explicit { width, .. } => width,
            _ => None,
        };
        self.sizing = Sizing::Explicit {
            width,
            height: Some(height),
        };
    }

    /// Scale the natural size by `x` horizontally and `y` vertically
    pub fn scale(&mut self, x: f32, y: f32) {
        self.sizing = Sizing::Scaled(x, y);
    }

    /// Scale to `width`, keeping the aspect ratio
    pub fn scale_to_width(&mut self, width: Pt) {
        self.sizing = Sizing::ToWidth(width);
    }

    /// Scale to `height`, keeping the aspect ratio
    pub fn scale_to_height(&mut self, height: Pt) {
        self.sizing = Sizing::ToHeight(height);
    }

    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }

    /// Opacity from 0 (invisible) to 1 (opaque)
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Rotation in degrees, counter-clockwise around the top left corner
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Draw at a fixed position, `y` measured from the top of the page
    pub fn set_pos(&mut self, x: Pt, y: Pt) {
        self.positioning = Positioning::Absolute { x, y };
    }

    /// The displayed size, without margins
    pub fn size(&self, doc: &Document) -> (Pt, Pt) {
        let image = &doc.images[self.image];
        let (natural_width, natural_height) = (image.width(), image.height());
        match self.sizing {
            Sizing::Explicit { width, height } => (
                width.unwrap_or(natural_width),
                height.unwrap_or(natural_height),
            ),
            Sizing::Scaled(x, y) => (natural_width * x, natural_height * y),
            Sizing::ToWidth(width) if *natural_width > 0.0 => {
                (width, natural_height * (width / natural_width))
            }
            Sizing::ToHeight(height) if *natural_height > 0.0 => {
                (natural_width * (height / natural_height), height)
            }
            Sizing::ToWidth(width) => (width, natural_height),
            Sizing::ToHeight(height) => (natural_width, height),
        }
    }

    fn render(&self, block: &mut Block, x: Pt, y: Pt, size: (Pt, Pt), page_height: Pt) {
        let (width, height) = size;
        let name = block.resources_mut().add_image(self.image);

        let mut placement =
            Transform::scale(*width, *height).with_translate(x, page_height - y - height);
        if self.angle != 0.0 {
            placement = placement.then(Transform::rotate_about(self.angle, x, page_height - y));
        }

        block.push(Op::SaveState);
        if self.opacity < 1.0 {
            let state = block
                .resources_mut()
                .add_graphics_state(GraphicsState::opacity(self.opacity));
            block.push(Op::GraphicsState(state));
        }
        block.push(Op::Transform(placement));
        block.push(Op::XObject(name));
        block.push(Op::RestoreState);
    }
}

impl Drawable for Figure {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let size @ (width, height) = self.size(doc);
        let mut blocks = Vec::new();
        let mut ctx = ctx;

        let (x, y) = match self.positioning {
            Positioning::Absolute { x, y } => (x, y),
            Positioning::Relative => {
                if height + self.margins.vertical() > ctx.height && !ctx.is_fresh_page() {
                    blocks.push(Block::for_page(&ctx));
                    ctx = ctx.next_page();
                }
                let free = (ctx.width - self.margins.horizontal() - width).max(Pt::ZERO);
                let offset = match self.alignment {
                    HorizontalAlignment::Left => Pt::ZERO,
                    HorizontalAlignment::Center => free / 2.0,
                    HorizontalAlignment::Right => free,
                };
                let offset = if ctx.inline { Pt::ZERO } else { offset };
                (ctx.x + self.margins.left + offset, ctx.y + self.margins.top)
            }
        };

        let mut block = Block::for_page(&ctx);
        self.render(&mut block, x, y, size, ctx.page_height);
        blocks.push(block);

        match self.positioning {
            Positioning::Absolute { .. } => {}
            Positioning::Relative if ctx.inline => {
                let advance = width + self.margins.horizontal();
                ctx.x += advance;
                ctx.width -= advance;
            }
            Positioning::Relative => ctx = ctx.advance(height + self.margins.vertical()),
        }
        Ok((blocks, ctx))
    }

    fn width(&self, doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.size(doc).0 + self.margins.horizontal())
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.size(doc).1 + self.margins.vertical())
    }
}
