//! Content stream operations shared by blocks and pages.
//!
//! Layout components never write raw bytes: they emit [Op]s into a
//! [Block](crate::Block), which lets blocks rename the resources they refer to
//! when they are merged together. The ops are only serialized when a page is
//! written.

use crate::colour::Colour;
use crate::transform::Transform;
use crate::units::Pt;
use std::io::Write;

/// One element of a `TJ` array
#[derive(Debug, Clone, PartialEq)]
pub enum TextItem {
    /// Encoded glyphs
    Glyphs(Vec<u8>),
    /// Horizontal adjustment in thousandths of text space; negative moves right
    Adjust(f32),
}

/// How glyph outlines are painted, see PDF 32000-1:2008 table 106
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TextRenderingMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

impl TextRenderingMode {
    pub fn operand(self) -> u8 {
        match self {
            TextRenderingMode::Fill => 0,
            TextRenderingMode::Stroke => 1,
            TextRenderingMode::FillStroke => 2,
            TextRenderingMode::Invisible => 3,
            TextRenderingMode::FillClip => 4,
            TextRenderingMode::StrokeClip => 5,
            TextRenderingMode::FillStrokeClip => 6,
            TextRenderingMode::Clip => 7,
        }
    }

    /// Whether the glyph outlines are stroked, and so need a stroke colour
    pub fn strokes(self) -> bool {
        matches!(
            self,
            TextRenderingMode::Stroke
                | TextRenderingMode::FillStroke
                | TextRenderingMode::StrokeClip
                | TextRenderingMode::FillStrokeClip
        )
    }
}

/// A single content stream operator with its operands.
///
/// Resource operands (`Tf`, `gs`, `Do`) hold the block-local resource name
/// without the leading slash.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SaveState,
    RestoreState,
    Transform(Transform),
    LineWidth(Pt),
    FillColour(Colour),
    StrokeColour(Colour),
    GraphicsState(String),
    MoveTo(Pt, Pt),
    LineTo(Pt, Pt),
    CurveTo(Pt, Pt, Pt, Pt, Pt, Pt),
    Rectangle(Pt, Pt, Pt, Pt),
    ClosePath,
    Fill,
    Stroke,
    FillStroke,
    EndPath,
    BeginText,
    EndText,
    Font(String, Pt),
    CharSpacing(Pt),
    RenderingMode(TextRenderingMode),
    TextMatrix(Transform),
    ShowText(Vec<TextItem>),
    XObject(String),
}

impl Op {
    /// The resource name referenced by this op, if any
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Op::GraphicsState(name) | Op::Font(name, _) | Op::XObject(name) => Some(name),
            _ => None,
        }
    }

    pub(crate) fn resource_name_mut(&mut self) -> Option<&mut String> {
        match self {
            Op::GraphicsState(name) | Op::Font(name, _) | Op::XObject(name) => Some(name),
            _ => None,
        }
    }

    #[allow(clippy::write_with_newline)]
    pub fn write<W: Write>(&self, out: &mut W) -> Result<(), std::io::Error> {
        match self {
            Op::SaveState => write!(out, "q\n"),
            Op::RestoreState => write!(out, "Q\n"),
            Op::Transform(t) => write!(out, "{} {} {} {} {} {} cm\n", t.a, t.b, t.c, t.d, t.e, t.f),
            Op::LineWidth(w) => write!(out, "{w} w\n"),
            Op::FillColour(colour) => write_colour(out, *colour, false),
            Op::StrokeColour(colour) => write_colour(out, *colour, true),
            Op::GraphicsState(name) => write!(out, "/{name} gs\n"),
            Op::MoveTo(x, y) => write!(out, "{x} {y} m\n"),
            Op::LineTo(x, y) => write!(out, "{x} {y} l\n"),
            Op::CurveTo(x1, y1, x2, y2, x3, y3) => {
                write!(out, "{x1} {y1} {x2} {y2} {x3} {y3} c\n")
            }
            Op::Rectangle(x, y, w, h) => write!(out, "{x} {y} {w} {h} re\n"),
            Op::ClosePath => write!(out, "h\n"),
            Op::Fill => write!(out, "f\n"),
            Op::Stroke => write!(out, "S\n"),
            Op::FillStroke => write!(out, "B\n"),
            Op::EndPath => write!(out, "n\n"),
            Op::BeginText => write!(out, "BT\n"),
            Op::EndText => write!(out, "ET\n"),
            Op::Font(name, size) => write!(out, "/{name} {size} Tf\n"),
            Op::CharSpacing(spacing) => write!(out, "{spacing} Tc\n"),
            Op::RenderingMode(mode) => write!(out, "{} Tr\n", mode.operand()),
            Op::TextMatrix(t) => write!(out, "{} {} {} {} {} {} Tm\n", t.a, t.b, t.c, t.d, t.e, t.f),
            Op::ShowText(items) => {
                write!(out, "[")?;
                for item in items {
                    match item {
                        TextItem::Glyphs(bytes) => {
                            write!(out, "<")?;
                            for b in bytes {
                                write!(out, "{b:02x}")?;
                            }
                            write!(out, ">")?;
                        }
                        TextItem::Adjust(adjust) => write!(out, " {adjust} ")?,
                    }
                }
                write!(out, "] TJ\n")
            }
            Op::XObject(name) => write!(out, "/{name} Do\n"),
        }
    }
}

/// Serializes a list of operations into content stream bytes
pub fn render_ops(ops: &[Op]) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();
    for op in ops {
        op.write(&mut content)?;
    }
    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn write_colour<W: Write>(out: &mut W, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(out, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(out, "{r} {g} {b} RG\n"),
        (Colour::CMYK { c, m, y, k }, false) => write!(out, "{c} {m} {y} {k} k\n"),
        (Colour::CMYK { c, m, y, k }, true) => write!(out, "{c} {m} {y} {k} K\n"),
        (Colour::Grey { g }, false) => write!(out, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(out, "{g} G\n"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;

    #[test]
    fn ops_serialize_to_pdf_operators() {
        let ops = vec![
            Op::SaveState,
            Op::FillColour(colours::RED),
            Op::StrokeColour(colours::BLACK),
            Op::Rectangle(Pt(1.0), Pt(2.0), Pt(3.5), Pt(4.0)),
            Op::FillStroke,
            Op::RestoreState,
        ];
        let rendered = String::from_utf8(render_ops(&ops).unwrap()).unwrap();
        assert_eq!(rendered, "q\n1 0 0 rg\n0 G\n1 2 3.5 4 re\nB\nQ\n");
    }

    #[test]
    fn text_arrays_are_hex_encoded_with_adjustments() {
        let op = Op::ShowText(vec![
            TextItem::Adjust(-250.0),
            TextItem::Glyphs(vec![0x48, 0x69]),
        ]);
        let rendered = String::from_utf8(render_ops(&[op]).unwrap()).unwrap();
        assert_eq!(rendered, "[ -250 <4869>] TJ\n");
    }

    #[test]
    fn resource_names_are_exposed() {
        assert_eq!(Op::Font("F0".into(), Pt(10.0)).resource_name(), Some("F0"));
        assert_eq!(Op::XObject("Im1".into()).resource_name(), Some("Im1"));
        assert_eq!(Op::Fill.resource_name(), None);
    }
}
