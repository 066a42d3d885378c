//! Embedding signature rasters as PDF image XObjects
//!
//! The RGBA raster is split into a DeviceRGB stream and a DeviceGray soft
//! mask carrying the alpha channel, both FlateDecode-compressed, so the
//! transparent background of a trimmed signature stays transparent on the
//! sheet.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A registered image XObject plus its source pixel dimensions.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedImage {
    pub object_id: ObjectId,
    pub width: u32,
    pub height: u32,
}

/// Decode stored PNG bytes into a raster suitable for embedding.
pub fn decode_signature_png(png: &[u8]) -> Result<RgbaImage, String> {
    let decoded = image::load_from_memory(png).map_err(|e| e.to_string())?;
    Ok(decoded.to_rgba8())
}

/// Register `raster` with the document as an image XObject with an alpha
/// soft mask.
pub fn add_image_xobject(doc: &mut Document, raster: &RgbaImage) -> Result<EmbeddedImage, String> {
    let (width, height) = raster.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in raster.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        deflate(&alpha)?,
    ));

    let object_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
            "SMask" => Object::Reference(smask_id),
        },
        deflate(&rgb)?,
    ));

    Ok(EmbeddedImage {
        object_id,
        width,
        height,
    })
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|e| e.to_string())?;
    encoder.finish().map_err(|e| e.to_string())
}
