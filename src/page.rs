use crate::{
    block::{Block, Link},
    content::render_ops,
    layout::Margins,
    pagesize::PageSize,
    rect::Rect,
    refs::{ObjectReferences, RefType},
    units::Pt,
    PDFError,
};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{
    types::{ActionType, AnnotationType},
    Filter, Finish, Name, Pdf, Ref, Str,
};

/// A page of the document: its size and the block holding everything drawn on it
#[derive(Debug, Clone)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The drawn content, in page coordinates
    pub block: Block,
}

impl Page {
    /// An empty page
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        Page::with_block(size, margins, Block::new(size.0, size.1))
    }

    /// A page showing `block`, which should be page sized
    pub fn with_block(size: PageSize, margins: Option<Margins>, block: Block) -> Page {
        let (width, height) = size;
        let margins = margins.unwrap_or_default();
        Page {
            media_box: Rect::from_origin(Pt::ZERO, Pt::ZERO, width, height),
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: width - margins.right,
                y2: height - margins.top,
            },
            block,
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    /// Write the page, its content stream, graphics states and link annotations.
    /// Fonts and images must have been written already. `page_heights` holds the height
    /// of every page in the document, for flipping internal link destinations.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        page_heights: &[Pt],
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let id = refs.get_or_gen(RefType::Page(page_index));
        let page_tree = refs.get_or_gen(RefType::PageTree);
        let resources = &self.block.resources;

        let fonts: Vec<(&String, Ref)> = resources
            .fonts
            .iter()
            .filter_map(|(name, font)| match refs.get(RefType::Font(font.index())) {
                Some(r) => Some((name, r)),
                None => {
                    log::warn!("font {name} on page {page_index} is not in the document");
                    None
                }
            })
            .collect();
        let images: Vec<(&String, Ref)> = resources
            .images
            .iter()
            .filter_map(|(name, image)| match refs.get(RefType::Image(image.index())) {
                Some(r) => Some((name, r)),
                None => {
                    log::warn!("image {name} on page {page_index} is not in the document");
                    None
                }
            })
            .collect();
        let states: Vec<(&String, Ref)> = resources
            .graphics_states
            .keys()
            .enumerate()
            .map(|(i, name)| (name, refs.gen(RefType::GraphicsState(page_index, i))))
            .collect();
        let annotations: Vec<Ref> = (0..self.block.annotations.len())
            .map(|i| refs.gen(RefType::Annotation(page_index, i)))
            .collect();
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(page_tree);

        let mut page_resources = page.resources();
        if !fonts.is_empty() {
            let mut dict = page_resources.fonts();
            for (name, r) in &fonts {
                dict.pair(Name(name.as_bytes()), *r);
            }
            dict.finish();
        }
        if !images.is_empty() {
            let mut dict = page_resources.x_objects();
            for (name, r) in &images {
                dict.pair(Name(name.as_bytes()), *r);
            }
            dict.finish();
        }
        if !states.is_empty() {
            let mut dict = page_resources.ext_g_states();
            for (name, r) in &states {
                dict.pair(Name(name.as_bytes()), *r);
            }
            dict.finish();
        }
        page_resources.finish();

        page.contents(content_id);
        if !annotations.is_empty() {
            page.annotations(annotations.iter().copied());
        }
        page.finish();

        for ((_, r), state) in states.iter().zip(resources.graphics_states.values()) {
            let mut ext = writer.ext_graphics(*r);
            if let Some(opacity) = state.fill_opacity {
                ext.non_stroking_alpha(opacity);
            }
            if let Some(opacity) = state.stroke_opacity {
                ext.stroking_alpha(opacity);
            }
            ext.finish();
        }

        for (r, annotation) in annotations.iter().zip(&self.block.annotations) {
            let mut annot = writer.annotation(*r);
            annot.subtype(AnnotationType::Link);
            annot.rect(annotation.rect.into());
            annot.border(0.0, 0.0, 0.0, None);
            match &annotation.link {
                Link::External(uri) => {
                    annot
                        .action()
                        .action_type(ActionType::Uri)
                        .uri(Str(uri.as_bytes()));
                }
                Link::Internal { page, x, y, zoom } => {
                    match (refs.get(RefType::Page(*page)), page_heights.get(*page)) {
                        (Some(target), Some(height)) => {
                            annot
                                .action()
                                .action_type(ActionType::GoTo)
                                .destination()
                                .page(target)
                                .xyz(**x, **height - **y, *zoom);
                        }
                        _ => log::warn!(
                            "link on page {page_index} points to missing page {page}, leaving it without a destination"
                        ),
                    }
                }
            }
            annot.finish();
        }

        let rendered = render_ops(&self.block.ops)?;
        let compressed =
            compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{content::Op, pagesize::LETTER};

    #[test]
    fn pages_keep_their_margins_as_the_content_box() {
        let page = Page::new(LETTER, Some(Margins::all(Pt(72.0))));
        assert_eq!(page.width(), Pt(612.0));
        assert_eq!(page.height(), Pt(792.0));
        assert_eq!(page.content_box.x1, Pt(72.0));
        assert_eq!(page.content_box.y2, Pt(720.0));
    }

    #[test]
    fn pages_write_links_and_graphics_states() {
        let mut block = Block::new(Pt(612.0), Pt(792.0));
        let state = block
            .resources_mut()
            .add_graphics_state(crate::block::GraphicsState::opacity(0.5));
        block.push(Op::GraphicsState(state));
        block.add_link(
            Rect::from_origin(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0)),
            Link::internal(0, Pt(72.0), Pt(100.0)),
        );
        block.add_link(
            Rect::from_origin(Pt(0.0), Pt(20.0), Pt(10.0), Pt(10.0)),
            Link::internal(5, Pt(72.0), Pt(100.0)),
        );
        let page = Page::with_block(LETTER, None, block);

        let mut refs = ObjectReferences::new();
        refs.gen(RefType::PageTree);
        refs.gen(RefType::Page(0));
        let mut writer = Pdf::new();
        page.write(&mut refs, 0, &[Pt(792.0)], &mut writer).unwrap();
        assert!(refs.get(RefType::GraphicsState(0, 0)).is_some());
        assert!(refs.get(RefType::Annotation(0, 1)).is_some());

        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/CA 0.5"));
        // 792 - 100 from the top
        assert!(text.contains("/XYZ 72 692"));
        assert!(text.contains("/FlateDecode"));
    }
}
