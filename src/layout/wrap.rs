//! Greedy line breaking.
//!
//! Widths are accumulated in thousandths of a point (glyph advance in 1/1000 em
//! times the font size), so that breaking decisions don't depend on rounding of
//! the intermediate sums.

use crate::{
    block::Link, colour::Colour, content::TextRenderingMode, font::Font, units::Pt, Document,
    PDFError,
};
use id_arena::Id;

/// Everything that determines how a run of text looks
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Id<Font>,
    pub size: Pt,
    pub colour: Colour,
    pub outline_colour: Colour,
    pub outline_size: Pt,
    /// Extra space after every character
    pub char_spacing: Pt,
    pub rendering_mode: TextRenderingMode,
}

impl TextStyle {
    /// Filled black text in the given font
    pub fn new(font: Id<Font>, size: Pt) -> TextStyle {
        TextStyle {
            font,
            size,
            colour: Colour::default(),
            outline_colour: Colour::default(),
            outline_size: Pt(1.0),
            char_spacing: Pt::ZERO,
            rendering_mode: TextRenderingMode::Fill,
        }
    }

    pub fn with_colour(mut self, colour: Colour) -> TextStyle {
        self.colour = colour;
        self
    }

    pub fn with_char_spacing(mut self, spacing: Pt) -> TextStyle {
        self.char_spacing = spacing;
        self
    }

    pub fn with_outline(mut self, colour: Colour, size: Pt) -> TextStyle {
        self.outline_colour = colour;
        self.outline_size = size;
        self
    }

    pub fn with_rendering_mode(mut self, mode: TextRenderingMode) -> TextStyle {
        self.rendering_mode = mode;
        self
    }

    /// Width of `ch` in thousandths of a point, as (advance, advance + char spacing)
    pub(crate) fn char_widths(&self, font: &Font, ch: char) -> Result<(f32, f32), PDFError> {
        let w = *self.size * font.require_advance(ch)?;
        Ok((w, w + *self.char_spacing * 1000.0))
    }

    /// Rendered width of `text` in points, including character spacing
    pub fn text_width(&self, doc: &Document, text: &str) -> Result<Pt, PDFError> {
        let font = &doc.fonts[self.font];
        let mut width = 0.0;
        for ch in text.chars() {
            width += self.char_widths(font, ch)?.1;
        }
        Ok(Pt(width / 1000.0))
    }
}

/// A run of text sharing one style, optionally a link
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub style: TextStyle,
    pub link: Option<Link>,
}

impl TextChunk {
    pub fn new<S: ToString>(text: S, style: TextStyle) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            style,
            link: None,
        }
    }

    pub fn with_link(mut self, link: Link) -> TextChunk {
        self.link = Some(link);
        self
    }

    /// Break the text into lines no wider than `width`.
    ///
    /// Lines break after the last space that fits; a line without a usable space is
    /// broken between characters. Line feeds always end a line. With a `width` of zero
    /// or less the whole text is a single line.
    ///
    /// ```
    /// use pdf_compose::{layout::{TextChunk, TextStyle}, Document, Font, Pt, StandardFont};
    ///
    /// let mut doc = Document::default();
    /// let helvetica = doc.add_font(Font::standard(StandardFont::Helvetica));
    /// let chunk = TextChunk::new("Hello there world", TextStyle::new(helvetica, Pt(10.0)));
    /// let lines: Vec<String> = chunk
    ///     .wrap(&doc, Pt(60.0))
    ///     .collect::<Result<_, _>>()
    ///     .expect("helvetica has all glyphs");
    /// assert_eq!(lines, vec!["Hello there", "world"]);
    /// ```
    pub fn wrap<'a>(&'a self, doc: &'a Document, width: Pt) -> LineWrapper<'a> {
        LineWrapper::new(doc, &self.text, &self.style, width)
    }
}

/// The greedy breaking rule shared by plain and styled text. Each buffered character
/// carries a tag, which styled text uses to remember which chunk it came from.
pub(crate) struct LineBreaker<T> {
    max_width: f32,
    line: Vec<(char, T)>,
    widths: Vec<f32>,
    line_width: f32,
}

impl<T> LineBreaker<T> {
    pub(crate) fn new(width: Pt) -> LineBreaker<T> {
        LineBreaker {
            max_width: *width * 1000.0,
            line: Vec::new(),
            widths: Vec::new(),
            line_width: 0.0,
        }
    }

    /// A breaker that only breaks on line feeds
    pub(crate) fn unbounded() -> LineBreaker<T> {
        LineBreaker {
            max_width: f32::INFINITY,
            line: Vec::new(),
            widths: Vec::new(),
            line_width: 0.0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Add a character of width `advance` (`spaced` including character spacing),
    /// returning the completed line if the character didn't fit
    pub(crate) fn push(
        &mut self,
        ch: char,
        tag: T,
        advance: f32,
        spaced: f32,
    ) -> Option<Vec<(char, T)>> {
        if self.line.is_empty() || self.line_width + advance <= self.max_width {
            self.line.push((ch, tag));
            self.widths.push(spaced);
            self.line_width += spaced;
            return None;
        }

        let space = self.line.iter().rposition(|(c, _)| *c == ' ');
        let mut completed = match space {
            Some(index) if index > 0 => {
                let rest = self.line.split_off(index + 1);
                self.widths = self.widths.split_off(index + 1);
                std::mem::replace(&mut self.line, rest)
            }
            _ => {
                self.widths.clear();
                std::mem::take(&mut self.line)
            }
        };
        self.line.push((ch, tag));
        self.widths.push(spaced);
        self.line_width = self.widths.iter().sum();

        trim_end(&mut completed);
        Some(completed)
    }

    /// End the current line at a line feed
    pub(crate) fn break_line(&mut self) -> Vec<(char, T)> {
        let mut line = self.take();
        trim_end(&mut line);
        line
    }

    /// Everything buffered so far
    pub(crate) fn take(&mut self) -> Vec<(char, T)> {
        self.widths.clear();
        self.line_width = 0.0;
        std::mem::take(&mut self.line)
    }
}

fn trim_end<T>(line: &mut Vec<(char, T)>) {
    while line.last().is_some_and(|(c, _)| c.is_whitespace()) {
        line.pop();
    }
}

/// Lazily produced lines of a [TextChunk], see [TextChunk::wrap]
pub struct LineWrapper<'a> {
    font: &'a Font,
    style: &'a TextStyle,
    text: &'a str,
    chars: std::str::Chars<'a>,
    breaker: LineBreaker<()>,
    unbounded: bool,
    finished: bool,
}

impl<'a> LineWrapper<'a> {
    pub(crate) fn new(
        doc: &'a Document,
        text: &'a str,
        style: &'a TextStyle,
        width: Pt,
    ) -> LineWrapper<'a> {
        LineWrapper {
            font: &doc.fonts[style.font],
            style,
            text,
            chars: text.chars(),
            breaker: LineBreaker::new(width),
            unbounded: *width <= 0.0,
            finished: false,
        }
    }
}

fn collect(line: Vec<(char, ())>) -> String {
    line.into_iter().map(|(c, _)| c).collect()
}

impl Iterator for LineWrapper<'_> {
    type Item = Result<String, PDFError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.unbounded {
            self.finished = true;
            return Some(Ok(self.text.to_string()));
        }

        for ch in self.chars.by_ref() {
            if ch == '\n' {
                return Some(Ok(collect(self.breaker.break_line())));
            }
            let (advance, spaced) = match self.style.char_widths(self.font, ch) {
                Ok(widths) => widths,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };
            if let Some(line) = self.breaker.push(ch, (), advance, spaced) {
                return Some(Ok(collect(line)));
            }
        }

        self.finished = true;
        if self.breaker.is_empty() {
            None
        } else {
            Some(Ok(collect(self.breaker.take())))
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::StandardFont;

    pub(crate) const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Vestibulum condimentum pellentesque sollicitudin. Suspendisse consectetur, ullamcorper ligula, dignissim vulputate. Phasellus ullamcorper scelerisque tincidunt.\nMaecenas sollicitudin, consequat pellentesque, fermentum imperdiet. Curabitur hendrerit dignissim condimentum. Pellentesque elementum magna suscipit. Nullam ullamcorper tristique fermentum, scelerisque elementum.";

    pub(crate) fn helvetica_doc() -> (Document, Id<Font>) {
        let mut doc = Document::default();
        let id = doc.add_font(Font::standard(StandardFont::Helvetica));
        (doc, id)
    }

    fn wrap(doc: &Document, chunk: &TextChunk, width: f32) -> Vec<String> {
        chunk
            .wrap(doc, Pt(width))
            .collect::<Result<Vec<_>, _>>()
            .expect("all glyphs are available")
    }

    #[test]
    fn lorem_wraps_to_narrow_columns() {
        let (doc, helvetica) = helvetica_doc();
        assert_eq!(LOREM.chars().count(), 430);
        let chunk = TextChunk::new(LOREM, TextStyle::new(helvetica, Pt(10.0)));

        let lines = wrap(&doc, &chunk, 100.0);
        assert_eq!(lines.len(), 29);
        assert_eq!(lines[0], "Lorem ipsum dolor sit");
        assert_eq!(lines[1], "amet, consectetur");
        assert_eq!(lines[13], "scelerisque tincidunt.");
        assert_eq!(lines[14], "Maecenas");
        assert_eq!(lines[28], "elementum.");
    }

    #[test]
    fn wide_columns_only_break_on_line_feeds() {
        let (doc, helvetica) = helvetica_doc();
        let chunk = TextChunk::new(LOREM, TextStyle::new(helvetica, Pt(10.0)));
        let lines = wrap(&doc, &chunk, 2000.0);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("tincidunt."));
        assert!(lines[1].starts_with("Maecenas"));
    }

    #[test]
    fn char_spacing_makes_more_lines() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0)).with_char_spacing(Pt(0.5));
        let chunk = TextChunk::new(LOREM, style);
        assert_eq!(wrap(&doc, &chunk, 100.0).len(), 34);
    }

    #[test]
    fn wrapping_is_idempotent() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let chunk = TextChunk::new(LOREM, style.clone());
        for line in wrap(&doc, &chunk, 100.0) {
            let rewrapped = wrap(&doc, &TextChunk::new(&line, style.clone()), 100.0);
            assert_eq!(rewrapped, vec![line]);
        }
    }

    #[test]
    fn lines_fit_unless_they_are_a_single_word() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let chunk = TextChunk::new(LOREM, style.clone());
        for line in wrap(&doc, &chunk, 100.0) {
            let width = style.text_width(&doc, &line).expect("can measure");
            assert!(width <= Pt(100.0) || !line.contains(' '), "{line}");
        }
    }

    #[test]
    fn words_without_room_break_between_characters() {
        let (doc, helvetica) = helvetica_doc();
        let chunk = TextChunk::new("a supercalifragilistic b", TextStyle::new(helvetica, Pt(10.0)));
        assert_eq!(
            wrap(&doc, &chunk, 30.0),
            vec!["a", "super", "califra", "gilistic", "b"]
        );
    }

    #[test]
    fn glyphs_wider_than_the_line_sit_alone() {
        let (doc, helvetica) = helvetica_doc();
        let chunk = TextChunk::new("mm", TextStyle::new(helvetica, Pt(10.0)));
        assert_eq!(wrap(&doc, &chunk, 5.0), vec!["m", "m"]);
    }

    #[test]
    fn non_positive_widths_give_one_line() {
        let (doc, helvetica) = helvetica_doc();
        let chunk = TextChunk::new("one two\nthree", TextStyle::new(helvetica, Pt(10.0)));
        assert_eq!(wrap(&doc, &chunk, 0.0), vec!["one two\nthree"]);
        assert_eq!(wrap(&doc, &chunk, -5.0).len(), 1);
    }

    #[test]
    fn missing_glyphs_stop_wrapping() {
        let (doc, helvetica) = helvetica_doc();
        let chunk = TextChunk::new("ok \u{4E2D}", TextStyle::new(helvetica, Pt(10.0)));
        let result: Result<Vec<String>, PDFError> = chunk.wrap(&doc, Pt(100.0)).collect();
        assert!(matches!(
            result,
            Err(PDFError::MissingGlyph { ch: '\u{4E2D}', .. })
        ));
    }
}
