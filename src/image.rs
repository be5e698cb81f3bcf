use crate::{
    refs::{ObjectReferences, RefType},
    PDFError, Pt,
};
use id_arena::Id;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

enum ImageData {
    /// JPEG bytes that can be embedded without re-encoding
    Jpeg(Vec<u8>),
    Decoded(DynamicImage),
}

/// A raster image that can be placed in the document via a
/// [`Figure`](crate::layout::Figure).
///
/// The natural size of an image is one point per pixel.
pub struct Image {
    data: ImageData,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, PDFError> {
        let data = std::fs::read(path.as_ref())?;
        Self::new_from_bytes(data)
    }

    /// Decode an image from memory, guessing its format
    pub fn new_from_bytes(data: Vec<u8>) -> Result<Image, PDFError> {
        let format = image::guess_format(&data)?;
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => {
                // we can embed it directly!
                let (pixel_width, pixel_height) = image.dimensions();
                Ok(Image {
                    data: ImageData::Jpeg(data),
                    pixel_width,
                    pixel_height,
                })
            }
            _ => Ok(Self::new_raster(image)),
        }
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let (pixel_width, pixel_height) = image.dimensions();
        Image {
            data: ImageData::Decoded(image),
            pixel_width,
            pixel_height,
        }
    }

    pub fn width(&self) -> Pt {
        Pt(self.pixel_width as f32)
    }

    pub fn height(&self) -> Pt {
        Pt(self.pixel_height as f32)
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            ImageData::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            ImageData::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Image>, writer: &mut Pdf) {
        let image_index = id.index();
        let image_id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mut image = writer.image_xobject(image_id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.pixel_width as i32);
        image.height(self.pixel_height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.pixel_width as i32);
            s_mask.height(self.pixel_height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
