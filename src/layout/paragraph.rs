use super::{
    line::{max_line_width, Line, TextFrame},
    DrawContext, Drawable, LineWrapper, Margins, Positioning, TextAlignment, TextChunk,
    TextStyle,
};
use crate::{block::Block, units::Pt, Document, PDFError};
use std::{borrow::Cow, cell::OnceCell};

/// A block of text in a single style.
///
/// In relative positioning the text is wrapped to the width available at the
/// cursor; in absolute positioning it is wrapped to the width set with
/// [Paragraph::set_width], or not at all if none was set.
///
/// ```
/// use pdf_compose::{layout::{Paragraph, TextStyle, Drawable}, Document, Font, Pt, StandardFont};
///
/// let mut doc = Document::default();
/// let helvetica = doc.add_font(Font::standard(StandardFont::Helvetica));
/// let mut paragraph = Paragraph::new("Hello there world", TextStyle::new(helvetica, Pt(10.0)));
/// paragraph.set_width(Pt(60.0));
/// assert_eq!(paragraph.height(&doc).unwrap(), Pt(20.0));
/// ```
#[derive(Debug, Clone)]
pub struct Paragraph {
    text: String,
    style: TextStyle,
    frame: TextFrame,
    lines: OnceCell<Vec<String>>,
}

impl Paragraph {
    pub fn new<S: ToString>(text: S, style: TextStyle) -> Paragraph {
        Paragraph {
            text: text.to_string(),
            style,
            frame: TextFrame::default(),
            lines: OnceCell::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_text<S: ToString>(&mut self, text: S) {
        self.text = text.to_string();
        self.lines.take();
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.lines.take();
    }

    pub fn set_font_size(&mut self, size: Pt) {
        self.style.size = size;
        self.lines.take();
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.frame.alignment = alignment;
    }

    /// Line height as a multiple of the font size
    pub fn set_line_height(&mut self, line_height: f32) {
        self.frame.line_height = line_height;
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.frame.wrap = wrap;
        self.lines.take();
    }

    /// The width to wrap the text to
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

    /// Draw at a fixed position, `y` measured from the top of the page
    pub fn set_pos(&mut self, x: Pt, y: Pt) {
        self.frame.positioning = Positioning::Absolute { x, y };
    }

    /// Rotation in degrees, counter-clockwise around the top left corner
    pub fn set_angle(&mut self, angle: f32) {
        self.frame.angle = angle;
    }

    pub(crate) fn line_height_factor(&self) -> f32 {
        self.frame.line_height
    }

    fn wrap_at(&self, doc: &Document, width: Option<Pt>) -> Result<Vec<String>, PDFError> {
        match width {
            Some(width) if *width > 0.0 => {
                LineWrapper::new(doc, &self.text, &self.style, width).collect()
            }
            _ if self.text.is_empty() => Ok(Vec::new()),
            _ => Ok(self.text.split('\n').map(ToString::to_string).collect()),
        }
    }

    /// The lines of text at the set width, wrapping them if that hasn't happened yet
    pub fn lines(&self, doc: &Document) -> Result<&[String], PDFError> {
        if let Some(lines) = self.lines.get() {
            return Ok(lines.as_slice());
        }
        let lines = self.wrap_at(doc, self.frame.stored_wrap_width())?;
        Ok(self.lines.get_or_init(|| lines).as_slice())
    }

    fn styled_lines(&self, lines: &[String]) -> Vec<Line> {
        lines
            .iter()
            .map(|line| vec![TextChunk::new(line, self.style.clone())])
            .collect()
    }

    fn text_height(&self, line_count: usize) -> Pt {
        self.style.size * self.frame.line_height * line_count as f32
    }

    /// A copy wrapped to `width`, used to measure the paragraph in table cells
    pub(crate) fn with_width(&self, width: Pt) -> Paragraph {
        let mut paragraph = self.clone();
        paragraph.frame.positioning = Positioning::Relative;
        paragraph.set_width(width);
        paragraph
    }
}

impl Drawable for Paragraph {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        let wrap_width = self.frame.wrap_width(&ctx);
        let lines: Cow<[String]> = if wrap_width == self.frame.stored_wrap_width() {
            Cow::Borrowed(self.lines(doc)?)
        } else {
            Cow::Owned(self.wrap_at(doc, wrap_width)?)
        };
        let lines = self.styled_lines(&lines);
        self.frame.layout(doc, ctx, &lines, wrap_width)
    }

    fn width(&self, doc: &Document) -> Result<Pt, PDFError> {
        let margins = self.frame.margins.horizontal();
        match self.frame.stored_wrap_width() {
            Some(width) => Ok(width + margins),
            None => {
                let lines = self.styled_lines(self.lines(doc)?);
                Ok(max_line_width(doc, &lines)? + margins)
            }
        }
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        let lines = self.lines(doc)?;
        Ok(self.text_height(lines.len()) + self.frame.margins.vertical())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content::{Op, TextItem},
        layout::wrap::test::{helvetica_doc, LOREM},
        pagesize::LETTER,
    };

    fn ctx() -> DrawContext {
        DrawContext::new(LETTER, Margins::all(Pt(72.0)))
    }

    #[test]
    fn height_follows_the_wrapped_lines() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new(LOREM, TextStyle::new(helvetica, Pt(10.0)));
        p.set_width(Pt(100.0));
        assert_eq!(p.lines(&doc).unwrap().len(), 29);
        assert_eq!(p.height(&doc).unwrap(), Pt(290.0));

        p.set_width(Pt(2000.0));
        assert_eq!(p.lines(&doc).unwrap().len(), 2);
        p.set_line_height(1.5);
        assert_eq!(p.height(&doc).unwrap(), Pt(30.0));
    }

    #[test]
    fn zero_width_only_breaks_at_line_feeds() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new("one\ntwo", TextStyle::new(helvetica, Pt(10.0)));
        p.set_width(Pt(0.0));
        assert_eq!(p.lines(&doc).unwrap(), ["one", "two"]);
        assert_eq!(p.height(&doc).unwrap(), Pt(20.0));

        let start = ctx();
        let (_, next) = p.layout(&doc, DrawContext { width: Pt(0.0), ..start }).unwrap();
        assert_eq!(next.y, start.y + Pt(20.0));
    }

    #[test]
    fn relative_layout_moves_the_cursor() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new("Hello there world", TextStyle::new(helvetica, Pt(10.0)));
        p.set_margins(Margins::trbl(Pt(5.0), Pt(0.0), Pt(5.0), Pt(0.0)));
        let start = ctx();
        let (blocks, next) = p.layout(&doc, start).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, start.y + Pt(20.0));
        assert_eq!(next.x, start.x);
        assert!(blocks[0].ops().contains(&Op::BeginText));
    }

    #[test]
    fn paragraphs_that_dont_fit_move_to_the_next_page() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new(LOREM, TextStyle::new(helvetica, Pt(10.0)));
        p.set_width(Pt(100.0));
        let start = ctx().advance(Pt(640.0));
        let (blocks, next) = p.layout(&doc, start).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_empty());
        assert_eq!(next.page, 1);
    }

    #[test]
    fn absolute_paragraphs_leave_the_cursor_alone() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new("Stamp", TextStyle::new(helvetica, Pt(10.0)));
        p.set_pos(Pt(100.0), Pt(100.0));
        let start = ctx();
        let (blocks, next) = p.layout(&doc, start).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next, start);
        // baseline = page height - (top + cap height)
        let cap_height = Pt(10.0) * (718.0 / 1000.0);
        let expected = Op::TextMatrix(crate::Transform::translate(
            Pt(100.0),
            Pt(792.0) - (Pt(100.0) + cap_height + Pt::ZERO / 2.0),
        ));
        assert!(blocks[0].ops().contains(&expected));
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut p = Paragraph::new(LOREM, style.clone());
        p.set_alignment(TextAlignment::Justify);
        p.set_width(Pt(150.0));
        p.set_pos(Pt(0.0), Pt(0.0));
        let (blocks, _) = p.layout(&doc, ctx()).unwrap();

        let lines = p.lines(&doc).unwrap().to_vec();
        let shown: Vec<&Vec<TextItem>> = blocks[0]
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::ShowText(items) => Some(items),
                _ => None,
            })
            .collect();
        assert_eq!(shown.len(), lines.len());

        for (line, items) in lines.iter().zip(shown.iter()) {
            let spaces = line.chars().filter(|&c| c == ' ').count();
            if spaces == 0 || line.as_str() == lines[lines.len() - 1] {
                continue;
            }
            let natural = style.text_width(&doc, line).unwrap();
            let stretch: f32 = items
                .iter()
                .filter_map(|item| match item {
                    TextItem::Adjust(a) => Some(-a * 10.0 / 1000.0),
                    _ => None,
                })
                .sum();
            assert!((*natural + stretch - 150.0).abs() < 0.01, "{line}");
        }
    }

    #[test]
    fn right_alignment_shifts_the_line() {
        let (doc, helvetica) = helvetica_doc();
        let mut p = Paragraph::new("Hi", TextStyle::new(helvetica, Pt(10.0)));
        p.set_alignment(TextAlignment::Right);
        p.set_width(Pt(100.0));
        p.set_pos(Pt(0.0), Pt(0.0));
        let (blocks, _) = p.layout(&doc, ctx()).unwrap();
        // "Hi" is 7.22 + 2.22 points wide
        let shift = (100.0 - 9.44) * 1000.0 / 10.0;
        let adjust = blocks[0].ops().iter().find_map(|op| match op {
            Op::ShowText(items) => match items.first() {
                Some(TextItem::Adjust(a)) => Some(*a),
                _ => None,
            },
            _ => None,
        });
        assert!((adjust.unwrap() + shift).abs() < 0.5);
    }

    #[test]
    fn missing_glyphs_are_errors() {
        let (doc, helvetica) = helvetica_doc();
        let p = Paragraph::new("\u{4E2D}", TextStyle::new(helvetica, Pt(10.0)));
        assert!(matches!(
            p.layout(&doc, ctx()),
            Err(PDFError::MissingGlyph { .. })
        ));
    }
}
