//! The top level entry point: draws content into a flowing sequence of pages and
//! writes them out as a PDF.

use crate::{
    block::Block,
    document::Document,
    font::Font,
    image::Image,
    info::Info,
    layout::{Chapter, DrawContext, Drawable, Margins, TableOfContents, TextStyle, TocEntry},
    page::Page,
    pagesize::{self, PageSize},
    transform::Transform,
    units::Pt,
    PDFError,
};
use id_arena::Id;
use std::io::Write;

/// The contents pages are laid out again until their page count settles; this
/// bounds the number of attempts.
const MAX_TOC_PASSES: usize = 4;

/// Which page a header or footer is being drawn on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number
    pub number: usize,
    pub total: usize,
}

type Decoration = Box<dyn Fn(&Document, &mut Block, PageInfo) -> Result<(), PDFError>>;

#[derive(Debug, Clone)]
struct DraftPage {
    size: PageSize,
    margins: Margins,
    block: Block,
}

impl DraftPage {
    fn new(size: PageSize, margins: Margins) -> DraftPage {
        DraftPage {
            size,
            margins,
            block: Block::new(size.0, size.1),
        }
    }

    fn for_context(ctx: &DrawContext) -> DraftPage {
        DraftPage::new((ctx.page_width, ctx.page_height), ctx.margins)
    }
}

/// Lays content out on pages, starting a new page whenever content overflows.
///
/// ```
/// use pdf_compose::{layout::{Paragraph, TextStyle}, Creator, Font, Pt, StandardFont};
///
/// let mut creator = Creator::default();
/// let helvetica = creator.add_font(Font::standard(StandardFont::Helvetica));
/// creator
///     .draw(&Paragraph::new("Hello, world!", TextStyle::new(helvetica, Pt(12.0))))
///     .expect("can draw");
/// let mut out = Vec::new();
/// creator.write(&mut out).expect("can write");
/// assert!(out.starts_with(b"%PDF"));
/// ```
pub struct Creator {
    doc: Document,
    page_size: PageSize,
    margins: Margins,
    pages: Vec<DraftPage>,
    ctx: DrawContext,
    header: Option<Decoration>,
    footer: Option<Decoration>,
    toc: Option<TableOfContents>,
    chapters: usize,
}

impl Default for Creator {
    /// Letter sized pages with one inch margins
    fn default() -> Self {
        Creator::new(pagesize::LETTER, Margins::all(Pt(72.0)))
    }
}

impl Creator {
    pub fn new(page_size: PageSize, margins: Margins) -> Creator {
        Creator {
            doc: Document::default(),
            page_size,
            margins,
            pages: Vec::new(),
            ctx: DrawContext::new(page_size, margins),
            header: None,
            footer: None,
            toc: None,
            chapters: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.doc.add_font(font)
    }

    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.doc.add_image(image)
    }

    pub fn set_info(&mut self, info: Info) {
        self.doc.set_info(info);
    }

    /// The size of pages started with [Creator::new_page] from now on. Pages that
    /// content overflows onto keep the size of the page the content was laid out on.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
    }

    /// The margins of pages started with [Creator::new_page] from now on. Like the
    /// page size, overflow pages keep the margins of the page they continue.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The cursor content is drawn at
    pub fn context(&self) -> DrawContext {
        self.ctx
    }

    /// Start a new page with the current page size and margins and move the cursor
    /// to its top
    pub fn new_page(&mut self) {
        self.pages.push(DraftPage::new(self.page_size, self.margins));
        self.ctx = DrawContext {
            page: self.pages.len() - 1,
            ..DrawContext::new(self.page_size, self.margins)
        };
    }

    /// Move the cursor down the page
    pub fn move_down(&mut self, dy: Pt) {
        self.ctx = self.ctx.advance(dy);
    }

    /// Move the cursor to `(x, y)` on the current page, `y` measured from the top
    pub fn move_to(&mut self, x: Pt, y: Pt) {
        let ctx = self.ctx;
        self.ctx = DrawContext {
            x,
            y,
            width: ctx.page_width - ctx.margins.right - x,
            height: ctx.page_height - ctx.margins.bottom - y,
            ..ctx
        };
    }

    /// Lay out `drawable` at the cursor, adding pages as the content flows onto them
    pub fn draw<D: Drawable + ?Sized>(&mut self, drawable: &D) -> Result<(), PDFError> {
        if self.pages.is_empty() {
            self.new_page();
        }
        let (blocks, next) = drawable.layout(&self.doc, self.ctx)?;
        let start = self.ctx.page;
        for (i, block) in blocks.into_iter().enumerate() {
            let index = start + i;
            while self.pages.len() <= index {
                self.pages.push(DraftPage::for_context(&next));
            }
            self.pages[index].block.merge(block);
        }
        self.ctx = next;
        Ok(())
    }

    /// A chapter numbered after the chapters created so far. Draw it once its content
    /// has been added.
    pub fn new_chapter<S: ToString>(&mut self, title: S, heading_style: TextStyle) -> Chapter {
        self.chapters += 1;
        Chapter::new(self.chapters, title, heading_style)
    }

    /// Draw `header` in the top margin of every page when the document is written
    pub fn set_header<F>(&mut self, header: F)
    where
        F: Fn(&Document, &mut Block, PageInfo) -> Result<(), PDFError> + 'static,
    {
        self.header = Some(Box::new(header));
    }

    /// Draw `footer` in the bottom margin of every page when the document is written
    pub fn set_footer<F>(&mut self, footer: F)
    where
        F: Fn(&Document, &mut Block, PageInfo) -> Result<(), PDFError> + 'static,
    {
        self.footer = Some(Box::new(footer));
    }

    /// Put a table of contents in front of the first page, listing the chapter
    /// headings drawn in the document
    pub fn set_toc(&mut self, toc: TableOfContents) {
        self.toc = Some(toc);
    }

    fn toc_pages(
        &self,
        toc: &TableOfContents,
        (size, margins): (PageSize, Margins),
    ) -> Result<Vec<DraftPage>, PDFError> {
        let ctx = DrawContext::new(size, margins);
        let (blocks, _) = toc.layout(&self.doc, ctx)?;
        Ok(blocks
            .into_iter()
            .map(|block| DraftPage {
                size,
                margins,
                block,
            })
            .collect())
    }

    /// Lay out the contents pages for the headings in `pages`
    fn layout_toc(
        &self,
        mut toc: TableOfContents,
        pages: &[DraftPage],
    ) -> Result<Vec<DraftPage>, PDFError> {
        let entries = pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| {
                page.block
                    .headings()
                    .iter()
                    .map(move |heading| TocEntry::from_heading(heading, i))
            })
            .collect();
        toc.set_entries(entries);
        // contents pages take the size of the first page
        let frame = pages
            .first()
            .map(|page| (page.size, page.margins))
            .unwrap_or((self.page_size, self.margins));

        let mut offset = 0;
        toc.set_page_offset(offset);
        let mut laid_out = self.toc_pages(&toc, frame)?;
        for _ in 0..MAX_TOC_PASSES {
            if laid_out.len() == offset {
                break;
            }
            offset = laid_out.len();
            toc.set_page_offset(offset);
            laid_out = self.toc_pages(&toc, frame)?;
        }
        if laid_out.len() != offset {
            log::warn!(
                "contents page count didn't settle ({} pages, numbered for {offset})",
                laid_out.len()
            );
        }
        Ok(laid_out)
    }

    fn decorate(&self, pages: &mut [DraftPage]) -> Result<(), PDFError> {
        let total = pages.len();
        for (i, page) in pages.iter_mut().enumerate() {
            let info = PageInfo {
                number: i + 1,
                total,
            };
            let (width, height) = page.size;
            if let Some(header) = &self.header {
                let mut block = Block::new(width, page.margins.top);
                header(&self.doc, &mut block, info)?;
                page.block.merge_transformed(
                    block,
                    Transform::translate(Pt::ZERO, height - page.margins.top),
                );
            }
            if let Some(footer) = &self.footer {
                let mut block = Block::new(width, page.margins.bottom);
                footer(&self.doc, &mut block, info)?;
                page.block.merge(block);
            }
        }
        Ok(())
    }

    /// Finish the document: insert the table of contents, draw headers and footers
    /// and write the PDF to `w`
    pub fn write<W: Write>(mut self, w: W) -> Result<(), PDFError> {
        let mut pages = std::mem::take(&mut self.pages);
        if pages.is_empty() {
            pages.push(DraftPage::new(self.page_size, self.margins));
        }

        if let Some(toc) = self.toc.take() {
            let toc_pages = self.layout_toc(toc, &pages)?;
            let offset = toc_pages.len();
            for page in pages.iter_mut() {
                page.block.offset_internal_links(offset);
            }
            pages = toc_pages.into_iter().chain(pages).collect();
        }

        self.decorate(&mut pages)?;

        for page in pages {
            self.doc
                .add_page(Page::with_block(page.size, Some(page.margins), page.block));
        }
        self.doc.write(w)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        block::Link,
        layout::{Paragraph, StyledParagraph},
        StandardFont,
    };

    fn creator() -> (Creator, TextStyle) {
        let mut creator = Creator::default();
        let helvetica = creator.add_font(Font::standard(StandardFont::Helvetica));
        (creator, TextStyle::new(helvetica, Pt(10.0)))
    }

    #[test]
    fn page_settings_apply_from_the_next_new_page() {
        let (mut creator, style) = creator();
        creator.draw(&Paragraph::new("first", style.clone())).unwrap();
        creator.set_page_size(pagesize::A4);
        creator.set_margins(Margins::all(Pt(36.0)));
        // overflow continues the letter page
        creator.move_down(Pt(640.0));
        creator.draw(&Paragraph::new("overflow", style.clone())).unwrap();
        assert_eq!(creator.page_count(), 2);
        assert_eq!(creator.pages[1].size, pagesize::LETTER);
        assert_eq!(creator.pages[1].margins, Margins::all(Pt(72.0)));

        creator.new_page();
        creator.draw(&Paragraph::new("a4", style)).unwrap();
        assert_eq!(creator.pages[2].size, pagesize::A4);
        assert_eq!(creator.context().y, Pt(46.0));
    }

    #[test]
    fn content_flows_onto_new_pages() {
        let (mut creator, style) = creator();
        for i in 0..100 {
            creator
                .draw(&Paragraph::new(format!("Line {i}"), style.clone()))
                .unwrap();
        }
        // 648pt of content height per page, 10pt per line
        assert_eq!(creator.page_count(), 2);
        assert_eq!(creator.context().page, 1);
        assert_eq!(creator.context().y, Pt(72.0 + 360.0));
    }

    #[test]
    fn cursor_moves() {
        let (mut creator, style) = creator();
        creator.new_page();
        creator.move_down(Pt(100.0));
        assert_eq!(creator.context().y, Pt(172.0));
        creator.move_to(Pt(300.0), Pt(400.0));
        let ctx = creator.context();
        assert_eq!(ctx.width, Pt(240.0));
        assert_eq!(ctx.height, Pt(320.0));
        creator.draw(&Paragraph::new("narrow", style)).unwrap();
        assert_eq!(creator.context().x, Pt(300.0));
        assert_eq!(creator.page_count(), 1);
    }

    #[test]
    fn new_pages_use_the_current_settings() {
        let (mut creator, _) = creator();
        creator.new_page();
        creator.set_page_size(pagesize::A4);
        creator.set_margins(Margins::all(Pt(36.0)));
        creator.new_page();
        assert_eq!(creator.page_count(), 2);
        assert_eq!(creator.pages[1].size, pagesize::A4);
        assert_eq!(creator.context().page, 1);
        assert_eq!(creator.context().y, Pt(36.0));
    }

    #[test]
    fn headers_and_footers_know_the_page_count() {
        let (mut creator, style) = creator();
        for _ in 0..3 {
            creator.new_page();
        }
        let footer_style = style.clone();
        creator.set_footer(move |doc, block, info| {
            let text = format!("Page {} of {}", info.number, info.total);
            block.draw(doc, &Paragraph::new(text, footer_style.clone()))
        });
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let record = seen.clone();
        creator.set_header(move |_, _, info| {
            record.borrow_mut().push(info);
            Ok(())
        });

        let mut pages = creator.pages.clone();
        creator.decorate(&mut pages).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                PageInfo { number: 1, total: 3 },
                PageInfo { number: 2, total: 3 },
                PageInfo { number: 3, total: 3 },
            ]
        );
        assert!(pages.iter().all(|page| !page.block.is_empty()));
    }

    #[test]
    fn contents_pages_go_first_and_shift_links() {
        let (mut creator, style) = creator();
        let mut chapter = creator.new_chapter("First", style.clone());
        chapter.add(Paragraph::new("Body", style.clone()));
        creator.draw(&chapter).unwrap();
        creator.new_page();
        let mut linked = StyledParagraph::new(style.clone());
        linked.append_link("back to the start", Link::internal(0, Pt(72.0), Pt(72.0)));
        creator.draw(&linked).unwrap();
        let second = creator.new_chapter("Second", style.clone());
        assert_eq!(second.number(), 2);
        creator.draw(&second).unwrap();

        let toc = TableOfContents::new(style.clone(), style);
        let pages = creator.pages.clone();
        let toc_pages = creator.layout_toc(toc, &pages).unwrap();
        assert_eq!(toc_pages.len(), 1);
        let targets: Vec<usize> = toc_pages[0]
            .block
            .annotations()
            .iter()
            .filter_map(|a| match a.link {
                Link::Internal { page, .. } => Some(page),
                _ => None,
            })
            .collect();
        assert!(targets.contains(&1));
        assert!(targets.contains(&2));

        let mut page = pages[1].clone();
        page.block.offset_internal_links(1);
        assert!(matches!(
            page.block.annotations()[0].link,
            Link::Internal { page: 1, .. }
        ));
    }

    #[test]
    fn writing_an_empty_creator_gives_one_page() {
        let creator = Creator::default();
        let mut out = Vec::new();
        creator.write(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Count 1"));
    }
}
