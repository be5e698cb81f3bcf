use pdf_compose::layout::{Paragraph, TextAlignment, TextStyle};
use pdf_compose::{Creator, Font, StandardFont};
use pdf_compose::{In, Pt};

fn main() {
    // US Letter pages with half inch margins
    let mut creator = Creator::new(
        pdf_compose::pagesize::LETTER,
        pdf_compose::layout::Margins::all(In(0.5)),
    );

    // the standard fonts don't need to be embedded
    let helvetica = creator.add_font(Font::standard(StandardFont::Helvetica));

    let mut hello = Paragraph::new("Hello world!", TextStyle::new(helvetica, Pt(16.0)));
    hello.set_alignment(TextAlignment::Center);
    creator.draw(&hello).expect("can lay out text");

    let mut out = std::fs::File::create("hello-world.pdf").expect("can create file");
    creator.write(&mut out).expect("can write pdf");
}
