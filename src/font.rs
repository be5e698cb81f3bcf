use crate::{
    refs::{ObjectReferences, RefType},
    standard_fonts::StandardFont,
    PDFError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// Where the glyphs of a [Font] come from
pub enum FontSource {
    /// A parsed TTF or OTF font that is embedded in its entirety in the generated PDF
    Embedded(OwnedFace),
    /// One of the standard fonts every reader provides; nothing is embedded
    Standard(StandardFont),
}

/// A font that text can be measured with and rendered in.
///
/// All metrics are expressed in glyph space units (1/1000 em), so a metric must be
/// multiplied by `font size / 1000` to obtain points.
///
/// Typically, fonts are referred to throughout user applications by their _id_ within
/// the document itself, and not by any typed references
pub struct Font {
    pub source: FontSource,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            source: FontSource::Embedded(face),
        })
    }

    /// Use one of the standard fonts
    pub fn standard(font: StandardFont) -> Font {
        Font {
            source: FontSource::Standard(font),
        }
    }

    /// Obtain the full name of the font
    pub fn name(&self) -> String {
        match &self.source {
            FontSource::Embedded(face) => face
                .as_face_ref()
                .names()
                .into_iter()
                .find(|name| {
                    name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode()
                })
                .and_then(|name| name.to_string())
                .unwrap_or_else(|| "Unnamed".to_string()),
            FontSource::Standard(font) => font.base_name().to_string(),
        }
    }

    fn family(face: &OwnedFace) -> String {
        face.as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| "Unnamed".to_string())
    }

    fn scaling(face: &OwnedFace) -> f32 {
        1000.0 / face.as_face_ref().units_per_em() as f32
    }

    /// Horizontal advance of `ch` in glyph space, or [None] if the font has no glyph
    /// for it
    pub fn glyph_advance(&self, ch: char) -> Option<f32> {
        match &self.source {
            FontSource::Embedded(face) => {
                let face_ref = face.as_face_ref();
                let gid = face_ref.glyph_index(ch)?;
                face_ref
                    .glyph_hor_advance(gid)
                    .map(|adv| adv as f32 * Self::scaling(face))
            }
            FontSource::Standard(font) => font.advance(ch).map(f32::from),
        }
    }

    /// Like [Font::glyph_advance], but a missing glyph is an error
    pub fn require_advance(&self, ch: char) -> Result<f32, PDFError> {
        self.glyph_advance(ch).ok_or_else(|| PDFError::MissingGlyph {
            ch,
            font: self.name(),
        })
    }

    /// Height of capital letters above the baseline, in glyph space
    pub fn cap_height(&self) -> f32 {
        match &self.source {
            FontSource::Embedded(face) => {
                let face_ref = face.as_face_ref();
                face_ref
                    .capital_height()
                    .map(|h| h as f32)
                    .unwrap_or(face_ref.ascender() as f32)
                    * Self::scaling(face)
            }
            FontSource::Standard(font) => font.cap_height(),
        }
    }

    /// Distance from the baseline to the bottom of the font in glyph space.
    /// Note: this is usually negative
    pub fn descent(&self) -> f32 {
        match &self.source {
            FontSource::Embedded(face) => {
                face.as_face_ref().descender() as f32 * Self::scaling(face)
            }
            FontSource::Standard(font) => font.descender(),
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        let ascender = match &self.source {
            FontSource::Embedded(face) => {
                face.as_face_ref().ascender() as f32 * Self::scaling(face)
            }
            FontSource::Standard(font) => font.ascender(),
        };
        size * (ascender / 1000.0)
    }

    /// The bytes that select the glyph for `ch` in a content stream, or [None] if the
    /// font cannot encode it
    pub fn encode(&self, ch: char) -> Option<Vec<u8>> {
        match &self.source {
            FontSource::Embedded(face) => face
                .as_face_ref()
                .glyph_index(ch)
                .map(|gid| gid.0.to_be_bytes().to_vec()),
            FontSource::Standard(font) => font.encode(ch).map(|code| vec![code]),
        }
    }

    fn write_cid(
        face: &OwnedFace,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_descriptor_id = Self::write_descriptor(face, refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(pdf_writer::types::CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let ids = Self::glyph_ids(face);
        let ids_augmented = Self::glyphs_sizing(face, &ids);

        let scaling = Self::scaling(face);

        // find the most popular width to use as the default
        // <width, count>
        let mut widths_counts: HashMap<u16, usize> = HashMap::new();
        for (_, (width, _)) in ids_augmented.values() {
            *widths_counts.entry(*width).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|(&width, &count)| (count, width))
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = ids_augmented
            .iter()
            .map(|(&cid, &(_, (width, _)))| (cid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|(id, _)| *id);

        let mut widths = cid_font.widths();
        // group consecutive glyph ids into runs
        if let Some((&(first_cid, first_width), rest)) = id_widths.split_first() {
            let mut start_cid: u16 = first_cid;
            let mut current_widths: Vec<f32> = vec![first_width];
            for &(cid, width) in rest {
                if (cid - start_cid) as usize > current_widths.len() {
                    widths.consecutive(start_cid, current_widths.clone());
                    start_cid = cid;
                    current_widths.clear();
                }
                current_widths.push(width);
            }
            widths.consecutive(start_cid, current_widths);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        face: &OwnedFace,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(font_data_stream_id, face.as_slice())
            .pair(Name(b"Length1"), face.as_slice().len() as i32);

        let face_ref = face.as_face_ref();
        let gids = Self::glyph_ids(face);
        let gids_augmented = Self::glyphs_sizing(face, &gids);

        let max_width = gids_augmented
            .values()
            .map(|&(_, (w, _))| w)
            .max()
            .unwrap_or_default();
        let max_height = gids_augmented
            .values()
            .map(|&(_, (_, h))| h)
            .max()
            .unwrap_or_default();
        let sum_width: usize = gids_augmented.values().map(|&(_, (w, _))| w as usize).sum();
        let avg_width = sum_width as f32 / gids_augmented.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let scaling = Self::scaling(face);
        let full_name = face_ref
            .names()
            .into_iter()
            .find(|n| n.name_id == owned_ttf_parser::name_id::FULL_NAME && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| format!("F{font_index}"));

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(full_name.replace(' ', "").as_bytes()));
        descriptor.family(Str(Self::family(face).as_bytes()));
        descriptor.weight(face_ref.weight().to_number());

        let mut flags: FontFlags = FontFlags::empty();
        if face_ref.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face_ref.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        flags.set(FontFlags::NON_SYMBOLIC, true);
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: 0.0,
            x2: max_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face_ref.italic_angle());
        descriptor.ascent(face_ref.ascender() as f32 * scaling);
        descriptor.descent(face_ref.descender() as f32 * scaling);
        descriptor.leading(face_ref.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face_ref
                .capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face_ref
                .x_height()
                .unwrap_or_else(|| face_ref.capital_height().unwrap_or_default())
                as f32
                * scaling,
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    fn glyph_ids(face: &OwnedFace) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();

        let Some(cmap) = face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    fn glyphs_sizing(face: &OwnedFace, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
        let face_ref = face.as_face_ref();
        let mut ids_augmented: HashMap<u16, (char, (u16, i16))> = HashMap::new();
        for (&id, &ch) in ids.iter() {
            if let Some(gid) = face_ref.glyph_index(ch) {
                if let Some(h_advance) = face_ref.glyph_hor_advance(gid) {
                    let height = face_ref
                        .glyph_bounding_box(gid)
                        .map(|bbox| bbox.y_max - bbox.y_min - face_ref.descender())
                        .unwrap_or(1000);
                    ids_augmented.insert(id, (ch, (h_advance, height)));
                }
            }
        }
        ids_augmented
    }

    fn write_to_unicode(
        face: &OwnedFace,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        let mut ids: Vec<(u16, char)> = Self::glyph_ids(face).into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // each bfchar block holds at most 100 entries sharing a high byte
        let mut cmap_blocks: Vec<Vec<(u16, char)>> = Vec::new();
        let mut current_block: Vec<(u16, char)> = Vec::new();
        let mut high_byte: u8 = 0;
        for &(id, ch) in ids.iter() {
            if (id >> 8) as u8 != high_byte || current_block.len() >= 100 {
                if !current_block.is_empty() {
                    cmap_blocks.push(std::mem::take(&mut current_block));
                }
                high_byte = (id >> 8) as u8;
            }
            current_block.push((id, ch));
        }
        if !current_block.is_empty() {
            cmap_blocks.push(current_block);
        }

        for block in cmap_blocks.into_iter() {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block.into_iter() {
                let mut utf16 = [0u16; 2];
                let encoded: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                map.push_str(&format!("<{id:04x}> <{encoded}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        match &self.source {
            FontSource::Embedded(face) => {
                let cid_font_id = Self::write_cid(face, refs, font_index, writer);
                let to_unicode_id = Self::write_to_unicode(face, refs, font_index, writer);

                let mut font = writer.type0_font(font_id);
                font.base_font(Name(format!("F{font_index}").as_bytes()));
                font.encoding_predefined(Name(b"Identity-H"));
                font.descendant_font(cid_font_id);
                font.to_unicode(to_unicode_id);
            }
            FontSource::Standard(standard) => {
                let mut font = writer.type1_font(font_id);
                font.base_font(Name(standard.base_name().as_bytes()));
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_fonts_measure_and_encode() {
        let font = Font::standard(StandardFont::Helvetica);
        assert_eq!(font.glyph_advance('a'), Some(556.0));
        assert_eq!(font.cap_height(), 718.0);
        assert_eq!(font.encode('a'), Some(vec![0x61]));
        assert_eq!(font.name(), "Helvetica");
        assert_eq!(font.ascent(Pt(10.0)), Pt(7.18));
    }

    #[test]
    fn missing_glyphs_are_errors() {
        let font = Font::standard(StandardFont::Courier);
        match font.require_advance('\u{263A}') {
            Err(PDFError::MissingGlyph { ch, font }) => {
                assert_eq!(ch, '\u{263A}');
                assert_eq!(font, "Courier");
            }
            other => panic!("expected a missing glyph error, got {other:?}"),
        }
    }
}
