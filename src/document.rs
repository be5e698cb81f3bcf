use crate::{
    font::Font,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    units::Pt,
    PDFError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Add a font to the document structure. Fonts are stored "globally" within the
    /// document and text styles refer to them by the returned id.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document structure, to be shown with
    /// [`Figure`](crate::layout::Figure)s referring to the returned id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Write the entire document to the writer. Although this can write to arbitrary
    /// streams, the entire document is rendered in memory first.
    ///
    /// Objects are numbered in a fixed order (catalog, page tree, info, pages, fonts,
    /// images, then the objects of each page), so the same document always produces
    /// the same bytes.
    pub fn write<W: Write>(&self, mut w: W) -> Result<(), PDFError> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document so links can refer to them
        let page_refs: Vec<Ref> = (0..self.page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in self.fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        for (id, image) in self.images.iter() {
            image.write(&mut refs, id, &mut writer);
        }

        let pages = self
            .page_order
            .iter()
            .map(|id| self.pages.get(*id).ok_or(PDFError::PageMissing))
            .collect::<Result<Vec<&Page>, PDFError>>()?;
        let page_heights: Vec<Pt> = pages.iter().map(|page| page.height()).collect();
        log::debug!(
            "writing {} pages, {} fonts and {} images",
            pages.len(),
            self.fonts.len(),
            self.images.len()
        );

        for (page_index, page) in pages.into_iter().enumerate() {
            page.write(&mut refs, page_index, &page_heights, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}
