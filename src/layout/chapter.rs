use super::{drawable::absorb, Content, DrawContext, Drawable, Margins, Paragraph, TextStyle};
use crate::{
    block::{Block, HeadingMark},
    units::Pt,
    Document, PDFError,
};

#[derive(Debug, Clone)]
enum Section {
    Content(Content),
    Subchapter(Chapter),
}

/// A numbered section of a document: a heading followed by its contents, which
/// may include subchapters.
///
/// Headings are numbered from the chapter's position in the hierarchy, e.g. the
/// second subchapter of chapter 1 is headed "1.2. Title". Every heading leaves a
/// [HeadingMark] on the block it lands on, which the
/// [`Creator`](crate::Creator) collects into the table of contents.
#[derive(Debug, Clone)]
pub struct Chapter {
    number: usize,
    title: String,
    heading_style: TextStyle,
    show_numbering: bool,
    include_in_toc: bool,
    margins: Margins,
    sections: Vec<Section>,
}

impl Chapter {
    pub fn new<S: ToString>(number: usize, title: S, heading_style: TextStyle) -> Chapter {
        Chapter {
            number,
            title: title.to_string(),
            heading_style,
            show_numbering: true,
            include_in_toc: true,
            margins: Margins::empty(),
            sections: Vec::new(),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add content after whatever the chapter already holds
    pub fn add<C: Into<Content>>(&mut self, content: C) {
        self.sections.push(Section::Content(content.into()));
    }

    /// Start a subchapter numbered after the existing ones. Its heading is 7/8 the
    /// size of this chapter's.
    pub fn new_subchapter<S: ToString>(&mut self, title: S) -> &mut Chapter {
        let number = self
            .sections
            .iter()
            .filter(|s| matches!(s, Section::Subchapter(_)))
            .count()
            + 1;
        let mut style = self.heading_style.clone();
        style.size = style.size * 0.875;
        let mut subchapter = Chapter::new(number, title, style);
        subchapter.show_numbering = self.show_numbering;
        subchapter.include_in_toc = self.include_in_toc;
        self.sections.push(Section::Subchapter(subchapter));
        match self.sections.last_mut() {
            Some(Section::Subchapter(chapter)) => chapter,
            _ => unreachable!("a subchapter was just pushed"),
        }
    }

    pub fn set_show_numbering(&mut self, show: bool) {
        self.show_numbering = show;
    }

    pub fn set_include_in_toc(&mut self, include: bool) {
        self.include_in_toc = include;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// The heading text for this chapter under the given parent numbers
    fn heading(&self, numbers: &[usize]) -> String {
        if !self.show_numbering {
            return self.title.clone();
        }
        let number: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        format!("{}. {}", number.join("."), self.title)
    }

    fn heading_paragraph(&self, text: &str) -> Paragraph {
        let mut heading = Paragraph::new(text, self.heading_style.clone());
        heading.set_margins(Margins::trbl(
            Pt::ZERO,
            Pt::ZERO,
            self.heading_style.size * 0.5,
            Pt::ZERO,
        ));
        heading
    }

    fn layout_numbered(
        &self,
        doc: &Document,
        ctx: DrawContext,
        parents: &[usize],
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let mut numbers = parents.to_vec();
        numbers.push(self.number);

        let orig = ctx;
        let x = ctx.x + self.margins.left;
        let width = ctx.width - self.margins.horizontal();
        let mut ctx = DrawContext {
            x,
            width,
            inline: false,
            ..ctx.advance(self.margins.top)
        };

        let title = self.heading(&numbers);
        let heading = self.heading_paragraph(&title);
        let (mut blocks, next) = heading.layout(doc, ctx)?;
        if self.include_in_toc {
            let top = next.y - heading.height(doc)?;
            if let Some(block) = blocks.last_mut() {
                block.add_heading(HeadingMark {
                    title,
                    level: numbers.len(),
                    x,
                    y: top,
                });
            }
        }
        ctx = DrawContext { x, width, ..next };

        for section in &self.sections {
            let (section_blocks, next) = match section {
                Section::Content(content) => content.layout(doc, ctx)?,
                Section::Subchapter(chapter) => chapter.layout_numbered(doc, ctx, &numbers)?,
            };
            absorb(&mut blocks, section_blocks);
            ctx = DrawContext { x, width, ..next };
        }

        let ctx = DrawContext {
            x: orig.x,
            width: orig.width,
            inline: orig.inline,
            ..ctx.advance(self.margins.bottom)
        };
        Ok((blocks, ctx))
    }
}

impl Drawable for Chapter {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        self.layout_numbered(doc, ctx, &[])
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.margins.horizontal())
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        let mut height =
            self.heading_paragraph(&self.heading(&[self.number])).height(doc)? + self.margins.vertical();
        for section in &self.sections {
            height += match section {
                Section::Content(content) => content.height(doc)?,
                Section::Subchapter(chapter) => chapter.height(doc)?,
            };
        }
        Ok(height)
    }
}
