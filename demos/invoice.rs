use pdf_compose::layout::{Invoice, InvoiceAddress, TextStyle};
use pdf_compose::{Creator, Font, Pt, StandardFont};

fn main() {
    let mut creator = Creator::default();
    let regular = creator.add_font(Font::standard(StandardFont::Helvetica));
    let bold = creator.add_font(Font::standard(StandardFont::HelveticaBold));

    let mut invoice = Invoice::new(TextStyle::new(regular, Pt(10.0)), TextStyle::new(bold, Pt(10.0)));
    invoice.set_number("0001");
    invoice.set_date("2024-03-01");
    invoice.set_due_date("2024-03-31");
    invoice.set_seller(InvoiceAddress {
        heading: "From".to_string(),
        name: "Widget Works".to_string(),
        street: "12 Main Street".to_string(),
        city: "Saskatoon, SK".to_string(),
        ..Default::default()
    });
    invoice.set_buyer(InvoiceAddress {
        heading: "Bill to".to_string(),
        name: "Gadget Co.".to_string(),
        email: "accounts@gadget.example".to_string(),
        ..Default::default()
    });
    for (i, price) in [12, 40, 7, 19].into_iter().enumerate() {
        invoice.add_item(format!("Widget #{}", i + 1), 2, format!("${price}.00"), format!("${}.00", price * 2));
    }
    invoice.set_subtotal("$156.00");
    invoice.add_total_line("Tax (5%)", "$7.80");
    invoice.set_total("$163.80");
    invoice.add_note("Payment", "Due within 30 days.");

    creator.draw(&invoice).expect("can lay out invoice");

    let mut out = std::fs::File::create("invoice.pdf").expect("can create file");
    creator.write(&mut out).expect("can write pdf");
}
