use super::{
    line::{lines_height, max_line_width, Line, TextFrame},
    wrap::LineBreaker,
    DrawContext, Drawable, Margins, Positioning, TextAlignment, TextChunk, TextStyle,
};
use crate::{
    block::{Block, Link},
    units::Pt,
    Document, PDFError,
};
use std::{borrow::Cow, cell::OnceCell};

/// Text made of several differently styled chunks, which may carry links.
///
/// Lines are broken across chunk boundaries: the break point is the last space of
/// the whole line, whichever chunk it belongs to.
#[derive(Debug, Clone)]
pub struct StyledParagraph {
    chunks: Vec<TextChunk>,
    default_style: TextStyle,
    frame: TextFrame,
    lines: OnceCell<Vec<Line>>,
}

impl StyledParagraph {
    /// An empty paragraph; `default_style` is used by [StyledParagraph::append]
    pub fn new(default_style: TextStyle) -> StyledParagraph {
        StyledParagraph {
            chunks: Vec::new(),
            default_style,
            frame: TextFrame::default(),
            lines: OnceCell::new(),
        }
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn default_style(&self) -> &TextStyle {
        &self.default_style
    }

    /// Append text in the default style, returning the new chunk for further styling
    pub fn append<S: ToString>(&mut self, text: S) -> &mut TextChunk {
        let style = self.default_style.clone();
        self.append_styled(text, style)
    }

    pub fn append_styled<S: ToString>(&mut self, text: S, style: TextStyle) -> &mut TextChunk {
        self.lines.take();
        self.chunks.push(TextChunk::new(text, style));
        let last = self.chunks.len() - 1;
        &mut self.chunks[last]
    }

    /// Append text in the default style that links to `link`
    pub fn append_link<S: ToString>(&mut self, text: S, link: Link) -> &mut TextChunk {
        let chunk = self.append(text);
        chunk.link = Some(link);
        chunk
    }

    pub fn insert(&mut self, index: usize, chunk: TextChunk) {
        self.lines.take();
        let index = index.min(self.chunks.len());
        self.chunks.insert(index, chunk);
    }

    /// Replace all chunks with `text` in the default style
    pub fn set_text<S: ToString>(&mut self, text: S) -> &mut TextChunk {
        self.chunks.clear();
        self.append(text)
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.frame.alignment = alignment;
    }

    pub fn set_line_height(&mut self, line_height: f32) {
        self.frame.line_height = line_height;
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.frame.wrap = wrap;
        self.lines.take();
    }

    pub fn set_width(&mut self, width: Pt) {
        self.frame.width = Some(width);
        self.lines.take();
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.frame.margins = margins;
    }

    pub fn margins(&self) -> Margins {
        self.frame.margins
    }

    pub fn set_pos(&mut self, x: Pt, y: Pt) {
        self.frame.positioning = Positioning::Absolute { x, y };
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.frame.angle = angle;
    }

    /// Break the chunks into lines of at most `width`; [None] only breaks at line feeds
    fn wrap_at(&self, doc: &Document, width: Option<Pt>) -> Result<Vec<Line>, PDFError> {
        let mut breaker: LineBreaker<usize> = match width {
            Some(width) if *width > 0.0 => LineBreaker::new(width),
            _ => LineBreaker::unbounded(),
        };
        let mut lines: Vec<Line> = Vec::new();

        for (index, chunk) in self.chunks.iter().enumerate() {
            let font = &doc.fonts[chunk.style.font];
            for ch in chunk.text.chars() {
                if ch == '\n' {
                    lines.push(self.assemble(breaker.break_line(), index));
                    continue;
                }
                let (advance, spaced) = chunk.style.char_widths(font, ch)?;
                if let Some(line) = breaker.push(ch, index, advance, spaced) {
                    lines.push(self.assemble(line, index));
                }
            }
        }
        if !breaker.is_empty() {
            let line = breaker.take();
            lines.push(self.assemble(line, self.chunks.len().saturating_sub(1)));
        }

        Ok(lines)
    }

    /// Turn characters tagged with their chunk index back into chunks. An empty line
    /// keeps the style of the chunk it was ended in, so it still has a height.
    fn assemble(&self, chars: Vec<(char, usize)>, current: usize) -> Line {
        let mut line: Line = Vec::new();
        let mut last_index: Option<usize> = None;
        for (ch, index) in chars {
            if last_index == Some(index) {
                if let Some(chunk) = line.last_mut() {
                    chunk.text.push(ch);
                    continue;
                }
            }
            let source = &self.chunks[index];
            line.push(TextChunk {
                text: ch.to_string(),
                style: source.style.clone(),
                link: source.link.clone(),
            });
            last_index = Some(index);
        }
        if line.is_empty() {
            let style = self
                .chunks
                .get(current)
                .map(|chunk| chunk.style.clone())
                .unwrap_or_else(|| self.default_style.clone());
            line.push(TextChunk::new("", style));
        }
        line
    }

    /// The wrapped lines at the set width, wrapping them if that hasn't happened yet
    pub fn lines(&self, doc: &Document) -> Result<&[Vec<TextChunk>], PDFError> {
        if let Some(lines) = self.lines.get() {
            return Ok(lines.as_slice());
        }
        let lines = self.wrap_at(doc, self.frame.stored_wrap_width())?;
        Ok(self.lines.get_or_init(|| lines).as_slice())
    }

    /// A copy wrapped to `width`, used to measure the paragraph in table cells
    pub(crate) fn with_width(&self, width: Pt) -> StyledParagraph {
        let mut paragraph = self.clone();
        paragraph.frame.positioning = Positioning::Relative;
        paragraph.set_width(width);
        paragraph
    }

    /// The largest font size used, for cell padding
    pub(crate) fn max_font_size(&self) -> Pt {
        self.chunks
            .iter()
            .map(|chunk| chunk.style.size)
            .fold(self.default_style.size, Pt::max)
    }

    pub(crate) fn line_height_factor(&self) -> f32 {
        self.frame.line_height
    }
}

impl Drawable for StyledParagraph {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let wrap_width = self.frame.wrap_width(&ctx);
        let lines: Cow<[Line]> = if wrap_width == self.frame.stored_wrap_width() {
            Cow::Borrowed(self.lines(doc)?)
        } else {
            Cow::Owned(self.wrap_at(doc, wrap_width)?)
        };
        self.frame.layout(doc, ctx, &lines, wrap_width)
    }

    fn width(&self, doc: &Document) -> Result<Pt, PDFError> {
        let margins = self.frame.margins.horizontal();
        match self.frame.stored_wrap_width() {
            Some(width) => Ok(width + margins),
            None => Ok(max_line_width(doc, self.lines(doc)?)? + margins),
        }
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        let lines = self.lines(doc)?;
        Ok(lines_height(lines, self.frame.line_height) + self.frame.margins.vertical())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        colours,
        layout::wrap::test::{helvetica_doc, LOREM},
        pagesize::LETTER,
        Font, StandardFont,
    };

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn single_style_wraps_like_a_plain_chunk() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut p = StyledParagraph::new(style.clone());
        p.append(LOREM);
        p.set_width(Pt(100.0));

        let plain: Vec<String> = TextChunk::new(LOREM, style)
            .wrap(&doc, Pt(100.0))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(texts(p.lines(&doc).unwrap()), plain);
    }

    #[test]
    fn breaks_use_the_last_space_across_chunks() {
        let (mut doc, helvetica) = helvetica_doc();
        let bold = doc.add_font(Font::standard(StandardFont::HelveticaBold));
        let mut p = StyledParagraph::new(TextStyle::new(helvetica, Pt(10.0)));
        p.append("Hello ");
        p.append_styled("big", TextStyle::new(bold, Pt(10.0)));
        p.append("gest world");
        p.set_width(Pt(45.0));

        let lines = p.lines(&doc).unwrap();
        assert_eq!(texts(lines), vec!["Hello", "biggest", "world"]);
        // the second line keeps both styles
        assert_eq!(lines[1].len(), 2);
        assert_eq!(lines[1][0].text, "big");
        assert_eq!(lines[1][0].style.font, bold);
    }

    #[test]
    fn line_feeds_end_lines_and_keep_empty_lines() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = StyledParagraph::new(TextStyle::new(helvetica, Pt(10.0)));
        p.append("one\n\n");
        p.append_styled("two", TextStyle::new(helvetica, Pt(20.0)));
        p.set_wrap(false);

        let lines = p.lines(&doc).unwrap();
        assert_eq!(texts(lines), vec!["one", "", "two"]);
        assert_eq!(p.height(&doc).unwrap(), Pt(40.0));
    }

    #[test]
    fn setters_reset_the_wrapped_lines() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = StyledParagraph::new(TextStyle::new(helvetica, Pt(10.0)));
        p.append("Hello there world");
        p.set_width(Pt(60.0));
        assert_eq!(p.lines(&doc).unwrap().len(), 2);
        p.set_width(Pt(200.0));
        assert_eq!(p.lines(&doc).unwrap().len(), 1);
        p.append(" and more text to wrap onto another line entirely");
        assert_eq!(p.lines(&doc).unwrap().len(), 2);
    }

    #[test]
    fn links_are_recorded_where_the_chunk_is_drawn() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = StyledParagraph::new(TextStyle::new(helvetica, Pt(10.0)));
        p.append("See ");
        p.append_link("here", Link::external("https://example.com"))
            .style
            .colour = colours::BLUE;
        p.set_pos(Pt(100.0), Pt(100.0));

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, _) = p.layout(&doc, ctx).unwrap();
        let annotations = blocks[0].annotations();
        assert_eq!(annotations.len(), 1);

        let rect = annotations[0].rect;
        // "See " is 6.67 + 5.56 + 5.56 + 2.78 points wide
        assert!((*rect.x1 - 120.57).abs() < 0.01);
        // "here" is 5.56 + 5.56 + 3.33 + 5.56 points wide
        assert!((*rect.width() - 20.01).abs() < 0.01);
        assert_eq!(annotations[0].link, Link::external("https://example.com"));
    }
}
