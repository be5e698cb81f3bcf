use pdf_compose::layout::{List, Paragraph, TableOfContents, TextAlignment, TextStyle};
use pdf_compose::{Creator, Font, Info, Pt, StandardFont};

fn main() {
    let mut creator = Creator::default();
    let regular = creator.add_font(Font::standard(StandardFont::Helvetica));
    let bold = creator.add_font(Font::standard(StandardFont::HelveticaBold));
    let body = TextStyle::new(regular, Pt(11.0));
    let heading = TextStyle::new(bold, Pt(18.0));

    creator.set_info(Info::new().title("Lorem ipsum").created_now().clone());

    for (i, title) in ["Lorem", "Ipsum", "Dolor"].into_iter().enumerate() {
        let mut chapter = creator.new_chapter(title, heading.clone());
        for words in [120, 80, 200] {
            let mut paragraph = Paragraph::new(lipsum::lipsum(words), body.clone());
            paragraph.set_alignment(TextAlignment::Justify);
            paragraph.set_line_height(1.3);
            chapter.add(paragraph);
        }

        let section = chapter.new_subchapter("Sit amet");
        let mut list = List::new(body.clone());
        for words in [8, 16, 24] {
            list.add(Paragraph::new(lipsum::lipsum(words), body.clone()))
                .expect("paragraphs can be listed");
        }
        section.add(list);

        creator.draw(&chapter).expect("can lay out chapter");
        if i < 2 {
            creator.new_page();
        }
    }

    let footer = body.clone();
    creator.set_footer(move |doc, block, page| {
        let mut number = Paragraph::new(format!("{} / {}", page.number, page.total), footer.clone());
        number.set_alignment(TextAlignment::Center);
        number.set_pos(Pt(0.0), Pt(36.0));
        number.set_width(block.width);
        block.draw(doc, &number)
    });
    creator.set_toc(TableOfContents::new(heading, body));

    let mut out = std::fs::File::create("lorem-ipsum.pdf").expect("can create file");
    creator.write(&mut out).expect("can write pdf");
}
