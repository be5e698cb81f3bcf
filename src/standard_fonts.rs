//! Metrics for the standard 14 fonts that every PDF reader provides.
//!
//! Standard fonts are never embedded, so documents using them stay small and
//! layout needs no font files at all. Only the glyphs listed here can be
//! measured and encoded (WinAnsiEncoding); anything else is reported as a
//! missing glyph.

/// The supported standard fonts
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

// advance widths for ' '..='~' in 1/1000 em
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Non-ASCII characters available through WinAnsiEncoding:
/// (char, code, helvetica width, helvetica-bold width)
const WIN_ANSI_EXTRAS: [(char, u8, u16, u16); 17] = [
    ('\u{20AC}', 0x80, 556, 556), // euro
    ('\u{201A}', 0x82, 222, 278), // quotesinglbase
    ('\u{2026}', 0x85, 1000, 1000), // ellipsis
    ('\u{2018}', 0x91, 222, 278), // quoteleft
    ('\u{2019}', 0x92, 222, 278), // quoteright
    ('\u{201C}', 0x93, 333, 500), // quotedblleft
    ('\u{201D}', 0x94, 333, 500), // quotedblright
    ('\u{2022}', 0x95, 350, 350), // bullet
    ('\u{2013}', 0x96, 556, 556), // endash
    ('\u{2014}', 0x97, 1000, 1000), // emdash
    ('\u{00A0}', 0xA0, 278, 278), // nbsp
    ('\u{00A7}', 0xA7, 556, 556), // section
    ('\u{00A9}', 0xA9, 737, 737), // copyright
    ('\u{00AE}', 0xAE, 737, 737), // registered
    ('\u{00B0}', 0xB0, 400, 400), // degree
    ('\u{00B6}', 0xB6, 537, 556), // paragraph
    ('\u{00B7}', 0xB7, 278, 278), // periodcentered
];

impl StandardFont {
    /// The PostScript name used as the `BaseFont`
    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::Courier => "Courier",
        }
    }

    /// Horizontal advance of `ch` in 1/1000 em
    pub fn advance(self, ch: char) -> Option<u16> {
        let code = self.encode(ch)?;
        if let StandardFont::Courier = self {
            return Some(600);
        }
        if (0x20..=0x7E).contains(&code) {
            let index = (code - 0x20) as usize;
            return Some(match self {
                StandardFont::HelveticaBold => HELVETICA_BOLD_ASCII[index],
                _ => HELVETICA_ASCII[index],
            });
        }
        WIN_ANSI_EXTRAS
            .iter()
            .find(|(_, c, _, _)| *c == code)
            .map(|&(_, _, regular, bold)| match self {
                StandardFont::HelveticaBold => bold,
                _ => regular,
            })
    }

    /// The WinAnsiEncoding code of `ch`
    pub fn encode(self, ch: char) -> Option<u8> {
        if (' '..='~').contains(&ch) {
            return Some(ch as u8);
        }
        WIN_ANSI_EXTRAS
            .iter()
            .find(|(c, _, _, _)| *c == ch)
            .map(|&(_, code, _, _)| code)
    }

    pub fn cap_height(self) -> f32 {
        match self {
            StandardFont::Courier => 562.0,
            _ => 718.0,
        }
    }

    pub fn ascender(self) -> f32 {
        match self {
            StandardFont::Courier => 629.0,
            _ => 718.0,
        }
    }

    pub fn descender(self) -> f32 {
        match self {
            StandardFont::Courier => -157.0,
            _ => -207.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn helvetica_widths() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.advance(' '), Some(278));
        assert_eq!(f.advance('L'), Some(556));
        assert_eq!(f.advance('m'), Some(833));
        assert_eq!(f.advance('~'), Some(584));
        assert_eq!(f.advance('\u{2022}'), Some(350));
        assert_eq!(f.advance('\u{4E2D}'), None);
    }

    #[test]
    fn bold_and_courier_widths() {
        assert_eq!(StandardFont::HelveticaBold.advance('b'), Some(611));
        assert_eq!(StandardFont::HelveticaBold.advance('@'), Some(975));
        assert_eq!(StandardFont::Courier.advance('i'), Some(600));
        assert_eq!(StandardFont::Courier.advance('\n'), None);
    }

    #[test]
    fn win_ansi_codes() {
        assert_eq!(StandardFont::Helvetica.encode('A'), Some(0x41));
        assert_eq!(StandardFont::Helvetica.encode('\u{2014}'), Some(0x97));
        assert_eq!(StandardFont::Helvetica.encode('\t'), None);
    }
}
