use super::{Content, DrawContext, Drawable, Margins, Paragraph, Table, TextStyle};
use crate::{block::Block, units::Pt, Document, PDFError};

/// What is drawn in front of each list item
#[derive(Debug, Clone, PartialEq)]
pub enum ListMarker {
    /// The same symbol in front of every item
    Bullet(String),
    /// `1.`, `2.`, ... counting the items that aren't nested lists
    Decimal,
}

impl Default for ListMarker {
    fn default() -> Self {
        ListMarker::Bullet("\u{2022}".to_string())
    }
}

/// A bulleted or numbered list.
///
/// The list is laid out as a two column table: the markers go in the first column,
/// which is as wide as the widest marker, and the items in the second. Nested lists
/// take up the second column of a row without a marker and are indented by their
/// own indent.
#[derive(Debug, Clone)]
pub struct List {
    items: Vec<Content>,
    marker: ListMarker,
    marker_style: TextStyle,
    indent: Pt,
    margins: Margins,
}

impl List {
    pub fn new(marker_style: TextStyle) -> List {
        List {
            items: Vec::new(),
            marker: ListMarker::default(),
            marker_style,
            indent: Pt(10.0),
            margins: Margins::empty(),
        }
    }

    pub fn items(&self) -> &[Content] {
        &self.items
    }

    /// Append an item: text, a figure, a division or another list
    pub fn add<C: Into<Content>>(&mut self, item: C) -> Result<(), PDFError> {
        let item = item.into();
        match item {
            Content::Paragraph(_)
            | Content::StyledParagraph(_)
            | Content::List(_)
            | Content::Division(_)
            | Content::Figure(_) => {
                self.items.push(item);
                Ok(())
            }
            _ => Err(PDFError::UnsupportedContent {
                container: "list",
                content: item.kind(),
            }),
        }
    }

    pub fn set_marker(&mut self, marker: ListMarker) {
        self.marker = marker;
    }

    pub fn set_marker_style(&mut self, style: TextStyle) {
        self.marker_style = style;
    }

    /// Space on the left of the list, applied again for every level of nesting
    pub fn set_indent(&mut self, indent: Pt) {
        self.indent = indent;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// The marker text of every item, `None` for nested lists. Markers end in a
    /// space separating them from the item.
    fn markers(&self) -> Vec<Option<String>> {
        let mut number = 0;
        self.items
            .iter()
            .map(|item| match item {
                Content::List(_) => None,
                _ => {
                    number += 1;
                    Some(match &self.marker {
                        ListMarker::Bullet(symbol) => format!("{symbol} "),
                        ListMarker::Decimal => format!("{number}. "),
                    })
                }
            })
            .collect()
    }

    fn table(&self, doc: &Document, width: Pt) -> Result<Table, PDFError> {
        let markers = self.markers();
        let mut marker_width = Pt::ZERO;
        for marker in markers.iter().flatten() {
            marker_width = marker_width.max(self.marker_style.text_width(doc, marker)?);
        }

        let mut table = Table::new(2);
        table.set_margins(Margins {
            left: self.margins.left + self.indent,
            ..self.margins
        });
        let inner = width - self.margins.horizontal() - self.indent;
        if *inner > 0.0 {
            let fraction = (marker_width / inner).min(1.0);
            table.set_column_widths(&[fraction, 1.0 - fraction])?;
        }

        for (marker, item) in markers.into_iter().zip(&self.items) {
            let cell = table.new_cell();
            cell.set_indent(Pt::ZERO);
            if let Some(marker) = marker {
                let mut paragraph = Paragraph::new(marker, self.marker_style.clone());
                paragraph.set_wrap(false);
                cell.set_content(paragraph)?;
            }
            let cell = table.new_cell();
            cell.set_indent(Pt::ZERO);
            cell.set_content(item.clone())?;
        }
        Ok(table)
    }

    /// The list's height when laid out `width` wide, including margins
    pub(crate) fn measured_height(&self, doc: &Document, width: Pt) -> Result<Pt, PDFError> {
        self.table(doc, width)?.measured_height(doc, width)
    }
}

impl Drawable for List {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        self.table(doc, ctx.width)?.layout(doc, ctx)
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.margins.horizontal() + self.indent)
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        let mut height = self.margins.vertical();
        for item in &self.items {
            height += item.height(doc)?;
        }
        Ok(height)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content::{Op, TextItem},
        layout::{wrap::test::helvetica_doc, Table},
        pagesize::LETTER,
    };

    fn shows_glyph(block: &Block, glyph: u8) -> bool {
        block.ops().iter().any(|op| match op {
            Op::ShowText(items) => items.iter().any(|item| match item {
                TextItem::Glyphs(bytes) => bytes.contains(&glyph),
                _ => false,
            }),
            _ => false,
        })
    }

    #[test]
    fn only_flowing_content_can_be_listed() {
        let (_, helvetica) = helvetica_doc();
        let mut list = List::new(TextStyle::new(helvetica, Pt(10.0)));
        assert!(matches!(
            list.add(Table::new(2)),
            Err(PDFError::UnsupportedContent {
                container: "list",
                content: "table"
            })
        ));
        assert!(list.add(Content::PageBreak).is_err());
        let style = TextStyle::new(helvetica, Pt(10.0));
        assert!(list.add(Paragraph::new("item", style)).is_ok());
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn numbering_skips_nested_lists() {
        let (_, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut list = List::new(style.clone());
        list.set_marker(ListMarker::Decimal);
        list.add(Paragraph::new("one", style.clone())).unwrap();
        list.add(List::new(style.clone())).unwrap();
        list.add(Paragraph::new("two", style)).unwrap();
        assert_eq!(
            list.markers(),
            vec![Some("1. ".to_string()), None, Some("2. ".to_string())]
        );
    }

    #[test]
    fn bulleted_items_stack_down_the_page() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut list = List::new(style.clone());
        for text in ["apples", "pears", "plums"] {
            list.add(Paragraph::new(text, style.clone())).unwrap();
        }

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = list.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        // each row is a 10pt line with half a line of padding
        assert_eq!(next.y, Pt(117.0));
        assert_eq!(list.measured_height(&doc, ctx.width).unwrap(), Pt(45.0));
        // the bullet is 0x95 in WinAnsiEncoding
        assert!(shows_glyph(&blocks[0], 0x95));
    }

    #[test]
    fn nested_lists_are_indented() {
        let (doc, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut inner = List::new(style.clone());
        inner.set_marker(ListMarker::Bullet("-".to_string()));
        inner.add(Paragraph::new("inner", style.clone())).unwrap();

        let mut outer = List::new(style.clone());
        outer.add(Paragraph::new("outer", style)).unwrap();
        outer.add(inner).unwrap();

        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = outer.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.y, Pt(102.0));
        assert!(shows_glyph(&blocks[0], b'-'));
    }
}
