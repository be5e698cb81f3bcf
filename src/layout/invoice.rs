//! A ready made invoice layout built from tables and paragraphs.

use super::{
    CellBorder, Content, DrawContext, Division, Drawable, HorizontalAlignment, Margins,
    Paragraph, Side, StyledParagraph, Table, TextStyle,
};
use crate::{block::Block, colour::Colour, colours, units::Pt, Document, PDFError};

/// A party on the invoice. Empty fields are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceAddress {
    /// Shown in bold above the address, e.g. "Bill to"
    pub heading: String,
    pub name: String,
    pub street: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

impl InvoiceAddress {
    fn lines(&self) -> Vec<&str> {
        [
            &self.name,
            &self.street,
            &self.city,
            &self.country,
            &self.phone,
            &self.email,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .collect()
    }
}

/// A line item. Values are shown as given, formatting numbers and currencies is up
/// to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
}

/// An invoice: title and details, seller and buyer addresses, a table of line
/// items, totals and notes.
///
/// The item table repeats its heading row on every page it continues on.
#[derive(Debug, Clone)]
pub struct Invoice {
    title: String,
    details: Vec<(String, String)>,
    seller: InvoiceAddress,
    buyer: InvoiceAddress,
    column_headings: [String; 4],
    items: Vec<InvoiceItem>,
    subtotal: Option<String>,
    totals: Vec<(String, String)>,
    total: Option<String>,
    notes: Vec<(String, String)>,
    regular: TextStyle,
    bold: TextStyle,
    header_background: Colour,
    margins: Margins,
}

const ITEM_COLUMNS: [f32; 4] = [0.5, 0.15, 0.15, 0.2];

impl Invoice {
    pub fn new(regular: TextStyle, bold: TextStyle) -> Invoice {
        Invoice {
            title: "INVOICE".to_string(),
            details: Vec::new(),
            seller: InvoiceAddress {
                heading: "From".to_string(),
                ..InvoiceAddress::default()
            },
            buyer: InvoiceAddress {
                heading: "Bill to".to_string(),
                ..InvoiceAddress::default()
            },
            column_headings: ["Description", "Quantity", "Unit price", "Amount"]
                .map(ToString::to_string),
            items: Vec::new(),
            subtotal: None,
            totals: Vec::new(),
            total: None,
            notes: Vec::new(),
            regular,
            bold,
            header_background: colours::LIGHT_GREY,
            margins: Margins::empty(),
        }
    }

    pub fn set_title<S: ToString>(&mut self, title: S) {
        self.title = title.to_string();
    }

    pub fn set_number<S: ToString>(&mut self, number: S) {
        self.set_detail("Invoice number", number);
    }

    pub fn set_date<S: ToString>(&mut self, date: S) {
        self.set_detail("Date", date);
    }

    pub fn set_due_date<S: ToString>(&mut self, date: S) {
        self.set_detail("Due date", date);
    }

    /// Set a line in the details next to the title, replacing one with the same label
    pub fn set_detail<L: ToString, V: ToString>(&mut self, label: L, value: V) {
        let label = label.to_string();
        let value = value.to_string();
        match self.details.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = value,
            None => self.details.push((label, value)),
        }
    }

    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    pub fn set_seller(&mut self, seller: InvoiceAddress) {
        self.seller = seller;
    }

    pub fn set_buyer(&mut self, buyer: InvoiceAddress) {
        self.buyer = buyer;
    }

    pub fn set_column_headings(&mut self, headings: [String; 4]) {
        self.column_headings = headings;
    }

    pub fn add_item<D, Q, U, A>(
        &mut self,
        description: D,
        quantity: Q,
        unit_price: U,
        amount: A,
    ) -> &mut InvoiceItem
    where
        D: ToString,
        Q: ToString,
        U: ToString,
        A: ToString,
    {
        self.items.push(InvoiceItem {
            description: description.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
            amount: amount.to_string(),
        });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn set_subtotal<S: ToString>(&mut self, subtotal: S) {
        self.subtotal = Some(subtotal.to_string());
    }

    /// A line between the subtotal and the total, e.g. taxes or discounts
    pub fn add_total_line<L: ToString, V: ToString>(&mut self, label: L, value: V) {
        self.totals.push((label.to_string(), value.to_string()));
    }

    pub fn set_total<S: ToString>(&mut self, total: S) {
        self.total = Some(total.to_string());
    }

    /// A titled block of text below the totals, e.g. payment terms
    pub fn add_note<T: ToString, S: ToString>(&mut self, title: T, text: S) {
        self.notes.push((title.to_string(), text.to_string()));
    }

    pub fn set_header_background(&mut self, colour: Colour) {
        self.header_background = colour;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    fn gap(&self) -> Margins {
        Margins::trbl(Pt::ZERO, Pt::ZERO, self.regular.size, Pt::ZERO)
    }

    fn text(&self, text: &str, bold: bool) -> Paragraph {
        let style = if bold { &self.bold } else { &self.regular };
        Paragraph::new(text, style.clone())
    }

    fn heading_table(&self) -> Result<Table, PDFError> {
        let mut table = Table::new(2);
        table.set_margins(self.gap());

        let mut title_style = self.bold.clone();
        title_style.size = title_style.size * 2.0;
        table.new_cell().set_content(Paragraph::new(&self.title, title_style))?;

        let mut details = StyledParagraph::new(self.regular.clone());
        for (i, (label, value)) in self.details.iter().enumerate() {
            let separator = if i + 1 < self.details.len() { "\n" } else { "" };
            details.append_styled(format!("{label}: "), self.bold.clone());
            details.append(format!("{value}{separator}"));
        }
        let cell = table.new_cell();
        cell.set_horizontal_alignment(HorizontalAlignment::Right);
        cell.set_content(details)?;
        Ok(table)
    }

    fn address(&self, address: &InvoiceAddress) -> StyledParagraph {
        let mut paragraph = StyledParagraph::new(self.regular.clone());
        paragraph.append_styled(&address.heading, self.bold.clone());
        for line in address.lines() {
            paragraph.append(format!("\n{line}"));
        }
        paragraph
    }

    fn address_table(&self) -> Result<Table, PDFError> {
        let mut table = Table::new(2);
        table.set_margins(self.gap());
        table.new_cell().set_content(self.address(&self.seller))?;
        table.new_cell().set_content(self.address(&self.buyer))?;
        Ok(table)
    }

    fn items_table(&self) -> Result<Table, PDFError> {
        let mut table = Table::new(4);
        table.set_column_widths(&ITEM_COLUMNS)?;
        table.set_margins(self.gap());
        let rule = CellBorder::single(Pt(0.5), colours::GREY);

        for (i, heading) in self.column_headings.iter().enumerate() {
            let cell = table.new_cell();
            cell.set_background(self.header_background);
            cell.set_border(Side::Bottom, rule);
            if i > 0 {
                cell.set_horizontal_alignment(HorizontalAlignment::Right);
            }
            cell.set_content(self.text(heading, true))?;
        }
        table.set_header_rows(1, 1)?;

        for item in &self.items {
            let values = [&item.description, &item.quantity, &item.unit_price, &item.amount];
            for (i, value) in values.into_iter().enumerate() {
                let cell = table.new_cell();
                cell.set_border(Side::Bottom, rule);
                if i > 0 {
                    cell.set_horizontal_alignment(HorizontalAlignment::Right);
                }
                cell.set_content(self.text(value, false))?;
            }
        }
        Ok(table)
    }

    fn totals_table(&self) -> Result<Table, PDFError> {
        let mut table = Table::new(4);
        table.set_column_widths(&ITEM_COLUMNS)?;
        table.set_margins(self.gap());

        let mut lines: Vec<(&str, &str, bool)> = Vec::new();
        if let Some(subtotal) = &self.subtotal {
            lines.push(("Subtotal", subtotal, false));
        }
        for (label, value) in &self.totals {
            lines.push((label, value, false));
        }
        if let Some(total) = &self.total {
            lines.push(("Total", total, true));
        }

        for (label, value, bold) in lines {
            table.skip_cells(2);
            for text in [label, value] {
                let cell = table.new_cell();
                cell.set_horizontal_alignment(HorizontalAlignment::Right);
                if bold {
                    cell.set_border(Side::Top, CellBorder::single(Pt(1.0), colours::BLACK));
                }
                cell.set_content(self.text(text, bold))?;
            }
        }
        Ok(table)
    }

    fn division(&self) -> Result<Division, PDFError> {
        let mut division = Division::new();
        division.set_margins(self.margins);
        division.add(self.heading_table()?)?;
        division.add(self.address_table()?)?;
        division.add(self.items_table()?)?;
        if self.subtotal.is_some() || self.total.is_some() || !self.totals.is_empty() {
            division.add(self.totals_table()?)?;
        }
        for (title, text) in &self.notes {
            division.add(self.text(title, true))?;
            let mut note = self.text(text, false);
            note.set_margins(self.gap());
            division.add(note)?;
        }
        Ok(division)
    }
}

impl Drawable for Invoice {
    fn layout(
        &self,
        doc: &Document,
        ctx: DrawContext,
    ) -> Result<(Vec<Block>, DrawContext), PDFError> {
        self.division()?.layout(doc, ctx)
    }

    fn width(&self, _doc: &Document) -> Result<Pt, PDFError> {
        Ok(self.margins.horizontal())
    }

    fn height(&self, doc: &Document) -> Result<Pt, PDFError> {
        Content::Division(self.division()?).height(doc)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content::{Op, TextItem},
        layout::wrap::test::helvetica_doc,
        pagesize::LETTER,
        Font, StandardFont,
    };

    fn shown_text(block: &Block) -> Vec<u8> {
        let mut text = Vec::new();
        for op in block.ops() {
            if let Op::ShowText(items) = op {
                for item in items {
                    if let TextItem::Glyphs(bytes) = item {
                        text.extend_from_slice(bytes);
                    }
                }
                text.push(b'\n');
            }
        }
        text
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    fn invoice(doc: &mut Document, items: usize) -> Invoice {
        let helvetica = doc.add_font(Font::standard(StandardFont::Helvetica));
        let bold = doc.add_font(Font::standard(StandardFont::HelveticaBold));
        let mut invoice = Invoice::new(
            TextStyle::new(helvetica, Pt(10.0)),
            TextStyle::new(bold, Pt(10.0)),
        );
        invoice.set_number("0042");
        invoice.set_date("2024-03-01");
        invoice.set_due_date("2024-03-31");
        invoice.set_seller(InvoiceAddress {
            heading: "From".to_string(),
            name: "Widgets Ltd".to_string(),
            city: "Calgary".to_string(),
            ..InvoiceAddress::default()
        });
        invoice.set_buyer(InvoiceAddress {
            heading: "Bill to".to_string(),
            name: "Gadgets Inc".to_string(),
            ..InvoiceAddress::default()
        });
        for i in 0..items {
            invoice.add_item(format!("Widget {i}"), 2, "$5.00", "$10.00");
        }
        invoice.set_subtotal("$20.00");
        invoice.add_total_line("Tax", "$1.00");
        invoice.set_total("$21.00");
        invoice.add_note("Terms", "Payable within 30 days.");
        invoice
    }

    #[test]
    fn details_replace_existing_labels() {
        let (_, helvetica) = helvetica_doc();
        let style = TextStyle::new(helvetica, Pt(10.0));
        let mut invoice = Invoice::new(style.clone(), style);
        invoice.set_number("1");
        invoice.set_date("today");
        invoice.set_number("2");
        assert_eq!(
            invoice.details(),
            &[
                ("Invoice number".to_string(), "2".to_string()),
                ("Date".to_string(), "today".to_string())
            ]
        );
    }

    #[test]
    fn invoices_show_every_section() {
        let mut doc = Document::default();
        let invoice = invoice(&mut doc, 2);
        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = invoice.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(next.y > ctx.y);

        let text = shown_text(&blocks[0]);
        for needle in [
            "INVOICE",
            "0042",
            "Widgets Ltd",
            "Gadgets Inc",
            "Description",
            "Widget 1",
            "$21.00",
            "Terms",
            "Payable within 30 days.",
        ] {
            assert!(contains(&text, needle), "missing {needle}");
        }
    }

    #[test]
    fn long_item_lists_repeat_the_column_headings() {
        let mut doc = Document::default();
        let invoice = invoice(&mut doc, 60);
        let ctx = DrawContext::new(LETTER, Margins::all(Pt(72.0)));
        let (blocks, next) = invoice.layout(&doc, ctx).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(next.page, 1);
        assert!(contains(&shown_text(&blocks[0]), "Description"));
        assert!(contains(&shown_text(&blocks[1]), "Description"));
        assert!(contains(&shown_text(&blocks[1]), "Widget 59"));
    }
}
