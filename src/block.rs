//! Blocks: positioned buffers of content stream operations.
//!
//! Every layout component produces [Block]s. A block owns the [Op]s it draws
//! along with the [Resources] those ops refer to by name, the link annotations
//! placed on it and the heading marks used to build a table of contents. When
//! content spans several pages a component produces one block per page, and
//! the [`Creator`](crate::Creator) merges each of them into the matching page
//! block.

use crate::{
    content::Op,
    font::Font,
    image::Image,
    layout::{DrawContext, Drawable, Margins, Positioning},
    rect::Rect,
    transform::Transform,
    units::Pt,
    Document, PDFError,
};
use id_arena::Id;
use std::collections::{BTreeMap, HashMap};

/// Opacity settings, written as an `ExtGState` dictionary
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraphicsState {
    pub fill_opacity: Option<f32>,
    pub stroke_opacity: Option<f32>,
}

impl GraphicsState {
    /// The same opacity for filling and stroking
    pub fn opacity(opacity: f32) -> GraphicsState {
        GraphicsState {
            fill_opacity: Some(opacity),
            stroke_opacity: Some(opacity),
        }
    }
}

/// The named resources a block refers to from its content stream.
///
/// Names are handed out from a monotonic counter per table (`F1`, `F2`, ...,
/// `Im1`, ..., `GS1`, ...) and adding a resource that is already present returns
/// its existing name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resources {
    pub(crate) fonts: BTreeMap<String, Id<Font>>,
    pub(crate) images: BTreeMap<String, Id<Image>>,
    pub(crate) graphics_states: BTreeMap<String, GraphicsState>,
    next_font: usize,
    next_image: usize,
    next_graphics_state: usize,
}

fn existing_or_new<T: PartialEq + Copy>(
    table: &mut BTreeMap<String, T>,
    counter: &mut usize,
    prefix: &str,
    value: T,
) -> String {
    if let Some((name, _)) = table.iter().find(|(_, v)| **v == value) {
        return name.clone();
    }
    loop {
        *counter += 1;
        let name = format!("{prefix}{counter}");
        if !table.contains_key(&name) {
            table.insert(name.clone(), value);
            return name;
        }
    }
}

impl Resources {
    pub fn add_font(&mut self, font: Id<Font>) -> String {
        existing_or_new(&mut self.fonts, &mut self.next_font, "F", font)
    }

    pub fn add_image(&mut self, image: Id<Image>) -> String {
        existing_or_new(&mut self.images, &mut self.next_image, "Im", image)
    }

    pub fn add_graphics_state(&mut self, state: GraphicsState) -> String {
        existing_or_new(
            &mut self.graphics_states,
            &mut self.next_graphics_state,
            "GS",
            state,
        )
    }

    pub fn font(&self, name: &str) -> Option<Id<Font>> {
        self.fonts.get(name).copied()
    }

    pub fn image(&self, name: &str) -> Option<Id<Image>> {
        self.images.get(name).copied()
    }

    pub fn graphics_state(&self, name: &str) -> Option<GraphicsState> {
        self.graphics_states.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty() && self.images.is_empty() && self.graphics_states.is_empty()
    }
}

/// Where a link leads
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// An external URI
    External(String),
    /// A location in this document. `page` is the 0-based page index and `y` is
    /// measured from the top of the page, like all layout coordinates
    Internal {
        page: usize,
        x: Pt,
        y: Pt,
        zoom: Option<f32>,
    },
}

impl Link {
    pub fn external<S: ToString>(uri: S) -> Link {
        Link::External(uri.to_string())
    }

    pub fn internal(page: usize, x: Pt, y: Pt) -> Link {
        Link::Internal {
            page,
            x,
            y,
            zoom: None,
        }
    }
}

/// A clickable area of a block, in the block's own (bottom-up) coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub link: Link,
}

/// Marks the position of a chapter heading, for building tables of contents
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingMark {
    /// The full heading, including its number
    pub title: String,
    /// Nesting depth, 1 for top level chapters
    pub level: usize,
    pub x: Pt,
    /// Distance from the top of the block
    pub y: Pt,
}

/// A rectangular area holding drawing operations and the resources they use.
///
/// Blocks produced by layout are page sized and their ops are in page coordinates
/// (origin at the bottom left). A block can also be built by hand, for example a
/// stamp or a logo, and then drawn as content itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub width: Pt,
    pub height: Pt,
    pub(crate) ops: Vec<Op>,
    pub(crate) resources: Resources,
    pub(crate) annotations: Vec<LinkAnnotation>,
    pub(crate) headings: Vec<HeadingMark>,
    positioning: Positioning,
    margins: Margins,
    angle: f32,
}

impl Block {
    pub fn new(width: Pt, height: Pt) -> Block {
        Block {
            width,
            height,
            ops: Vec::new(),
            resources: Resources::default(),
            annotations: Vec::new(),
            headings: Vec::new(),
            positioning: Positioning::Relative,
            margins: Margins::empty(),
            angle: 0.0,
        }
    }

    /// A block covering a whole page of the given context
    pub fn for_page(ctx: &DrawContext) -> Block {
        Block::new(ctx.page_width, ctx.page_height)
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn annotations(&self) -> &[LinkAnnotation] {
        &self.annotations
    }

    pub fn headings(&self) -> &[HeadingMark] {
        &self.headings
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.annotations.is_empty() && self.headings.is_empty()
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn extend<I: IntoIterator<Item = Op>>(&mut self, ops: I) {
        self.ops.extend(ops);
    }

    pub fn add_link(&mut self, rect: Rect, link: Link) {
        self.annotations.push(LinkAnnotation { rect, link });
    }

    pub fn add_heading(&mut self, heading: HeadingMark) {
        self.headings.push(heading);
    }

    /// Shift the target page of every internal link, for pages inserted in front
    pub(crate) fn offset_internal_links(&mut self, pages: usize) {
        for annotation in self.annotations.iter_mut() {
            if let Link::Internal { page, .. } = &mut annotation.link {
                *page += pages;
            }
        }
    }

    /// Place the block at a fixed position when drawn, `y` measured from the top of
    /// the page
    pub fn set_pos(&mut self, x: Pt, y: Pt) {
        self.positioning = Positioning::Absolute { x, y };
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Rotation in degrees, counter-clockwise around the block's top left corner
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Merge `other` into this block, drawing it on top of the existing content.
    ///
    /// Resources of `other` are renamed where they collide with this block's names.
    pub fn merge(&mut self, other: Block) {
        self.merge_transformed(other, Transform::identity());
    }

    /// Merge `other` into this block, mapping its coordinates through `transform`
    pub fn merge_transformed(&mut self, other: Block, transform: Transform) {
        let Block {
            mut ops,
            resources,
            annotations,
            headings,
            height: other_height,
            ..
        } = other;

        let mut font_names: HashMap<String, String> = HashMap::new();
        for (name, id) in resources.fonts.iter() {
            font_names.insert(name.clone(), self.resources.add_font(*id));
        }
        let mut image_names: HashMap<String, String> = HashMap::new();
        for (name, id) in resources.images.iter() {
            image_names.insert(name.clone(), self.resources.add_image(*id));
        }
        let mut state_names: HashMap<String, String> = HashMap::new();
        for (name, state) in resources.graphics_states.iter() {
            state_names.insert(name.clone(), self.resources.add_graphics_state(*state));
        }

        for op in ops.iter_mut() {
            let names = match op {
                Op::Font(..) => &font_names,
                Op::XObject(_) => &image_names,
                Op::GraphicsState(_) => &state_names,
                _ => continue,
            };
            let Some(name) = op.resource_name_mut() else {
                continue;
            };
            match names.get(name.as_str()) {
                Some(renamed) if renamed != name => {
                    log::debug!("renaming resource {name} to {renamed} while merging blocks");
                    *name = renamed.clone();
                }
                Some(_) => {}
                None => log::warn!("resource {name} is not declared by the merged block"),
            }
        }

        if !ops.is_empty() {
            self.ops.reserve(ops.len() + 3);
            self.ops.push(Op::SaveState);
            if !transform.is_identity() {
                self.ops.push(Op::Transform(transform));
            }
            self.ops.extend(ops);
            self.ops.push(Op::RestoreState);
        }

        for LinkAnnotation { rect, link } in annotations {
            let corners = [
                transform.apply(rect.x1, rect.y1),
                transform.apply(rect.x2, rect.y1),
                transform.apply(rect.x1, rect.y2),
                transform.apply(rect.x2, rect.y2),
            ];
            if let Some(rect) = Rect::bounding(&corners) {
                self.annotations.push(LinkAnnotation { rect, link });
            }
        }

        for mut heading in headings {
            let (x, y) = transform.apply(heading.x, other_height - heading.y);
            heading.x = x;
            heading.y = self.height - y;
            self.headings.push(heading);
        }
    }

    /// Lay out `drawable` inside this block, as if the block were a page without
    /// margins. The drawable must fit: content that would continue on another page is
    /// an error.
    pub fn draw<D: Drawable + ?Sized>(&mut self, doc: &Document, drawable: &D) -> Result<(), PDFError> {
        let ctx = DrawContext::new((self.width, self.height), Margins::empty());
        let (blocks, _) = drawable.layout(doc, ctx)?;
        if blocks.len() > 1 {
            return Err(PDFError::TooManyBlocks(blocks.len()));
        }
        for block in blocks {
            self.merge(block);
        }
        Ok(())
    }

    /// The transform placing this block with its top left corner at `(x, y)` (top-down)
    /// on a page of height `page_height`
    fn placement(&self, x: Pt, y: Pt, page_height: Pt) -> Transform {
        let bottom = page_height - y - self.height;
        if self.angle == 0.0 {
            Transform::translate(x, bottom)
        } else {
            Transform::translate(x, bottom).then(Transform::rotate_about(
                self.angle,
                x,
                page_height - y,
            ))
        }
    }
}

impl Drawable for Block {
    fn layout(
        &self,
        _doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let mut blocks = Vec::new();
        let mut page_block = Block::for_page(&ctx);
        let mut ctx = ctx;
        let orig = ctx;

        let (x, y) = match self.positioning {
            Positioning::Relative => {
                if self.height + self.margins.vertical() > ctx.height && !ctx.is_fresh_page() {
                    blocks.push(page_block);
                    page_block = Block::for_page(&ctx);
                    ctx = ctx.next_page();
                }
                (ctx.x + self.margins.left, ctx.y + self.margins.top)
            }
            Positioning::Absolute { x, y } => (x, y),
        };

        let placement = self.placement(x, y, ctx.page_height);
        page_block.merge_transformed(self.clone(), placement);
        blocks.push(page_block);

        match self.positioning {
            Positioning::Relative if ctx.inline => {
                let advance = self.width + self.margins.horizontal();
                ctx.x += advance;
                ctx.width -= advance;
                Ok((blocks, ctx))
            }
            Positioning::Relative => {
                let advance = self.height + self.margins.vertical();
                ctx.y += advance;
                ctx.height -= advance;
                Ok((blocks, ctx))
            }
            Positioning::Absolute { .. } => Ok((blocks, orig)),
        }
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.width + self.margins.horizontal())
    }

    fn height(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.height + self.margins.vertical())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{colours, content::render_ops, layout::Content, Font, StandardFont};

    fn font_ids() -> (Document, Id<Font>, Id<Font>) {
        let mut doc = Document::default();
        let a = doc.add_font(Font::standard(StandardFont::Helvetica));
        let b = doc.add_font(Font::standard(StandardFont::Courier));
        (doc, a, b)
    }

    #[test]
    fn resource_names_are_reused_for_the_same_resource() {
        let (_, a, b) = font_ids();
        let mut resources = Resources::default();
        assert_eq!(resources.add_font(a), "F1");
        assert_eq!(resources.add_font(b), "F2");
        assert_eq!(resources.add_font(a), "F1");
        assert_eq!(resources.add_graphics_state(GraphicsState::opacity(0.5)), "GS1");
        assert_eq!(resources.add_graphics_state(GraphicsState::opacity(0.5)), "GS1");
    }

    #[test]
    fn merging_renames_colliding_resources() {
        let (_, a, b) = font_ids();

        let mut dest = Block::new(Pt(100.0), Pt(100.0));
        let name = dest.resources_mut().add_font(a);
        dest.push(Op::Font(name, Pt(10.0)));

        let mut src = Block::new(Pt(100.0), Pt(100.0));
        let b_name = src.resources_mut().add_font(b);
        let a_name = src.resources_mut().add_font(a);
        assert_eq!(b_name, "F1");
        src.push(Op::Font(b_name, Pt(12.0)));
        src.push(Op::Font(a_name, Pt(14.0)));

        dest.merge(src);

        assert_eq!(dest.resources().font("F1"), Some(a));
        assert_eq!(dest.resources().font("F2"), Some(b));
        assert_eq!(
            dest.ops(),
            &[
                Op::Font("F1".into(), Pt(10.0)),
                Op::SaveState,
                Op::Font("F2".into(), Pt(12.0)),
                Op::Font("F1".into(), Pt(14.0)),
                Op::RestoreState,
            ]
        );
    }

    #[test]
    fn undeclared_resources_are_left_alone() {
        let mut dest = Block::new(Pt(10.0), Pt(10.0));
        let mut src = Block::new(Pt(10.0), Pt(10.0));
        src.push(Op::XObject("Im9".into()));
        dest.merge(src);
        assert_eq!(dest.ops()[1], Op::XObject("Im9".into()));
    }

    #[test]
    fn merging_moves_links_with_the_content() {
        let mut dest = Block::new(Pt(100.0), Pt(100.0));
        let mut src = Block::new(Pt(10.0), Pt(10.0));
        src.add_link(
            Rect::from_origin(Pt(0.0), Pt(0.0), Pt(5.0), Pt(5.0)),
            Link::external("https://example.com"),
        );
        dest.merge_transformed(src, Transform::translate(Pt(20.0), Pt(30.0)));
        assert_eq!(
            dest.annotations()[0].rect,
            Rect::from_origin(Pt(20.0), Pt(30.0), Pt(5.0), Pt(5.0))
        );
    }

    #[test]
    fn blocks_draw_relative_to_the_cursor() {
        let doc = Document::default();
        let mut stamp = Block::new(Pt(50.0), Pt(20.0));
        stamp.push(Op::FillColour(colours::RED));
        stamp.push(Op::Rectangle(Pt(0.0), Pt(0.0), Pt(50.0), Pt(20.0)));
        stamp.push(Op::Fill);

        let ctx = DrawContext::new((Pt(200.0), Pt(200.0)), Margins::all(Pt(10.0)));
        let (blocks, next) = stamp.layout(&doc, ctx).expect("can lay out block");
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, Pt(30.0));
        assert_eq!(next.height, Pt(160.0));

        let rendered = render_ops(blocks[0].ops()).expect("can render ops");
        let rendered = String::from_utf8(rendered).expect("ops are ascii");
        assert!(rendered.starts_with("q\n1 0 0 1 10 170 cm\n"));
    }

    #[test]
    fn drawing_content_that_spills_over_is_an_error() {
        let doc = Document::default();
        let mut target = Block::new(Pt(100.0), Pt(100.0));
        match target.draw(&doc, &Content::PageBreak) {
            Err(PDFError::TooManyBlocks(2)) => {}
            other => panic!("expected TooManyBlocks, got {other:?}"),
        }
    }
}
