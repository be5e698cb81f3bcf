use super::{DrawContext, Division, Drawable, Margins, Paragraph, StyledParagraph, TextStyle};
use crate::{
    block::{Block, HeadingMark, Link},
    units::Pt,
    Document, PDFError,
};

/// A line in the table of contents
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    /// Nesting depth, 1 for top level chapters
    pub level: usize,
    /// 0-based index of the page the heading is on, not counting the contents pages
    pub page: usize,
    pub x: Pt,
    /// Position of the heading from the top of the page
    pub y: Pt,
}

impl TocEntry {
    pub fn from_heading(heading: &HeadingMark, page: usize) -> TocEntry {
        TocEntry {
            title: heading.title.clone(),
            level: heading.level,
            page,
            x: heading.x,
            y: heading.y,
        }
    }
}

/// A table of contents: one line per heading, the title and page number joined by a
/// row of leader characters. Every line links to its heading.
///
/// The contents pages come before the rest of the document, so page numbers and
/// link targets are shifted by [TableOfContents::set_page_offset].
#[derive(Debug, Clone)]
pub struct TableOfContents {
    heading: Option<String>,
    heading_style: TextStyle,
    line_style: TextStyle,
    leader: char,
    level_indent: Pt,
    entries: Vec<TocEntry>,
    page_offset: usize,
}

impl TableOfContents {
    pub fn new(heading_style: TextStyle, line_style: TextStyle) -> TableOfContents {
        TableOfContents {
            heading: Some("Contents".to_string()),
            heading_style,
            line_style,
            leader: '.',
            level_indent: Pt(10.0),
            entries: Vec::new(),
            page_offset: 0,
        }
    }

    /// The title above the lines, none to leave it out
    pub fn set_heading(&mut self, heading: Option<String>) {
        self.heading = heading;
    }

    pub fn set_leader(&mut self, leader: char) {
        self.leader = leader;
    }

    /// How far each level is indented from the one above it
    pub fn set_level_indent(&mut self, indent: Pt) {
        self.level_indent = indent;
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn add_entry(&mut self, entry: TocEntry) {
        self.entries.push(entry);
    }

    pub fn set_entries(&mut self, entries: Vec<TocEntry>) {
        self.entries = entries;
    }

    /// Number of pages placed in front of the pages the entries point to
    pub fn set_page_offset(&mut self, offset: usize) {
        self.page_offset = offset;
    }

    fn line(&self, doc: &Document, entry: &TocEntry, width: Pt) -> Result<StyledParagraph, PDFError> {
        let indent = self.level_indent * entry.level.saturating_sub(1) as f32;
        let page = entry.page + self.page_offset;
        let number = (page + 1).to_string();
        let link = Link::internal(page, entry.x, entry.y);

        let style = &self.line_style;
        let fixed = style.text_width(doc, &entry.title)?
            + style.text_width(doc, &number)?
            + style.text_width(doc, " ")? * 2.0;
        let leader_width = style.text_width(doc, &self.leader.to_string())?;
        let count = if *leader_width > 0.0 {
            ((width - indent - fixed) / leader_width).floor().max(0.0) as usize
        } else {
            0
        };
        let leaders: String = std::iter::repeat(self.leader).take(count).collect();

        let mut line = StyledParagraph::new(style.clone());
        line.set_wrap(false);
        line.set_margins(Margins::trbl(Pt::ZERO, Pt::ZERO, Pt::ZERO, indent));
        for text in [entry.title.clone(), format!(" {leaders} "), number] {
            line.append_link(text, link.clone());
        }
        Ok(line)
    }

    fn division(&self, doc: &Document, width: Pt) -> Result<Division, PDFError> {
        let mut division = Division::new();
        if let Some(heading) = &self.heading {
            let mut paragraph = Paragraph::new(heading, self.heading_style.clone());
            paragraph.set_margins(Margins::trbl(
                Pt::ZERO,
                Pt::ZERO,
                self.heading_style.size * 0.5,
                Pt::ZERO,
            ));
            division.add(paragraph)?;
        }
        for entry in &self.entries {
            division.add(self.line(doc, entry, width)?)?;
        }
        Ok(division)
    }
}

impl Drawable for TableOfContents {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        self.division(doc, ctx.width)?.layout(doc, ctx)
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(Pt::ZERO)
    }

    /// The height of the heading and one line per entry
    fn height(&self, _doc: &Document) -> Result<Pt, PDFError> {
        let heading = match &self.heading {
            Some(_) => self.heading_style.size * 1.5,
            None => Pt::ZERO,
        };
        Ok(heading + self.line_style.size * self.entries.len() as f32)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{layout::wrap::test::helvetica_doc, pagesize::LETTER};

    fn entry(title: &str, level: usize, page: usize) -> TocEntry {
        TocEntry {
            title: title.to_string(),
            level,
            page,
            x: Pt(72.0),
            y: Pt(100.0),
        }
    }

    #[test]
    fn lines_link_to_shifted_pages() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut toc = TableOfContents::new(TextStyle::new(helvetica, Pt(16.0)), style);
        toc.add_entry(entry("1. Introduction", 1, 0));
        toc.add_entry(entry("1.1. Background", 2, 2));
        toc.set_page_offset(1);

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = toc.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        // 16pt heading + 8pt gap + two 10pt lines
        assert_eq!(next.y, Pt(116.0));

        let annotations = blocks[0].annotations();
        assert!(!annotations.is_empty());
        assert!(annotations
            .iter()
            .all(|a| matches!(a.link, Link::Internal { page: 1 | 3, .. })));
        assert!(annotations
            .iter()
            .any(|a| a.link == Link::internal(3, Pt(72.0), Pt(100.0))));
    }

    #[test]
    fn leaders_fill_the_line() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let toc = TableOfContents::new(style.clone(), style.clone());
        let line = toc.line(&doc, &entry("Title", 1, 4), Pt(200.0)).unwrap();
        let text: String = line.chunks().iter().map(|c| c.text.as_str()).collect();
        assert!(text.starts_with("Title ..."));
        assert!(text.ends_with(". 5"));
        let width = style.text_width(&doc, &text).unwrap();
        assert!(width <= Pt(200.01));
        assert!(width > Pt(200.0) - style.text_width(&doc, ".").unwrap());

        let nested = toc.line(&doc, &entry("Title", 3, 4), Pt(200.0)).unwrap();
        assert_eq!(nested.margins().left, Pt(20.0));
    }
}
