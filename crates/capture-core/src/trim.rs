//! Cropping a signature raster to its ink
//!
//! A pure function over an in-memory pixel buffer: no rendering surface is
//! involved, which keeps it testable without a graphical environment. The
//! embedded signature in the final document is tightly sized because of this
//! crop.

use image::{Rgba, RgbaImage};

/// Axis-aligned bounding box of drawn ink, in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop `raster` to the minimal rectangle containing any non-transparent
/// pixel.
///
/// Returns the cropped buffer together with the bounding box it was cut from.
/// When no pixel carries ink the box is `None` and the image degenerates to a
/// single transparent pixel.
pub fn trim(raster: &RgbaImage) -> (RgbaImage, Option<BoundingBox>) {
    let (width, height) = raster.dimensions();

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in raster.enumerate_pixels() {
        if pixel.0[3] != 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !found {
        return (
            RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])),
            None,
        );
    }

    let bbox = BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    };
    debug_assert!(bbox.x + bbox.width <= width && bbox.y + bbox.height <= height);

    let cropped =
        image::imageops::crop_imm(raster, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

    (cropped, Some(bbox))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the bounding box is always contained in the raster and
        /// the crop has exactly its dimensions
        #[test]
        fn bbox_contained_in_raster(
            width in 1u32..120,
            height in 1u32..120,
            points in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..30),
        ) {
            let mut raster = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
            for (fx, fy) in points {
                let x = ((fx * width as f64) as u32).min(width - 1);
                let y = ((fy * height as f64) as u32).min(height - 1);
                raster.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }

            let (cropped, bbox) = trim(&raster);
            let bbox = bbox.expect("ink was drawn");
            prop_assert!(bbox.x + bbox.width <= width);
            prop_assert!(bbox.y + bbox.height <= height);
            prop_assert_eq!(cropped.dimensions(), (bbox.width, bbox.height));
        }

        /// Property: trimming is idempotent - trimming a trimmed image changes
        /// nothing
        #[test]
        fn trim_is_idempotent(
            x in 0u32..40,
            y in 0u32..40,
            w in 1u32..20,
            h in 1u32..20,
        ) {
            let mut raster = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
            for dx in 0..w {
                for dy in 0..h {
                    raster.put_pixel(
                        (x + dx).min(63),
                        (y + dy).min(63),
                        Rgba([0, 0, 0, 255]),
                    );
                }
            }

            let (once, _) = trim(&raster);
            let (twice, bbox) = trim(&once);
            let bbox = bbox.expect("ink was drawn");
            prop_assert_eq!((bbox.x, bbox.y), (0, 0));
            prop_assert_eq!(once.dimensions(), twice.dimensions());
        }
    }
}
