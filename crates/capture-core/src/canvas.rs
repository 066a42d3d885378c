//! Stroke accumulation on the signature raster
//!
//! Each contiguous drag is one path: `begin` anchors the pen, `extend` draws
//! a segment from the previous point, `end` lifts the pen. Strokes accumulate
//! additively; the only way back is a full `clear`.

use std::io::Cursor;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::error::CaptureError;
use crate::geometry::PointerPoint;
use crate::trim::{trim, BoundingBox};

/// Logical pixel grid of the drawing surface.
pub const SURFACE_WIDTH: u32 = 1200;
pub const SURFACE_HEIGHT: u32 = 300;

/// Stroke width in logical pixels.
pub const STROKE_WIDTH: f64 = 3.0;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BLANK: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The drawing surface a resident signs on.
pub struct SignatureCanvas {
    raster: RgbaImage,
    /// Pen position while a drag is active.
    cursor: Option<PointerPoint>,
    has_ink: bool,
}

impl SignatureCanvas {
    pub fn new() -> Self {
        Self::with_size(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            raster: RgbaImage::from_pixel(width, height, BLANK),
            cursor: None,
            has_ink: false,
        }
    }

    /// Anchor the pen at `point`. A tap that never extends leaves the canvas
    /// empty.
    pub fn begin(&mut self, point: PointerPoint) {
        self.cursor = Some(point);
    }

    /// Draw from the current pen position to `point`. Ignored when no drag is
    /// active.
    pub fn extend(&mut self, point: PointerPoint) {
        let Some(from) = self.cursor else {
            return;
        };
        self.stroke_segment(from, point);
        self.cursor = Some(point);
        self.has_ink = true;
    }

    /// Lift the pen, closing the current path.
    pub fn end(&mut self) {
        self.cursor = None;
    }

    /// Wipe all ink and reset for the next signer.
    pub fn clear(&mut self) {
        let (width, height) = self.raster.dimensions();
        self.raster = RgbaImage::from_pixel(width, height, BLANK);
        self.cursor = None;
        self.has_ink = false;
    }

    /// True until at least one point has been extended after a `begin`.
    pub fn is_empty(&self) -> bool {
        !self.has_ink
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// The full surface as PNG bytes. Well-defined on a blank canvas.
    pub fn to_image(&self) -> Result<Vec<u8>, CaptureError> {
        encode_png(&self.raster)
    }

    /// The drawn ink cropped to its bounding box, as PNG bytes. A blank
    /// canvas yields a degenerate 1x1 transparent image.
    pub fn to_trimmed_image(&self) -> Result<Vec<u8>, CaptureError> {
        let (cropped, _) = trim(&self.raster);
        encode_png(&cropped)
    }

    /// The trimmed raster together with its bounding box.
    pub fn trimmed_raster(&self) -> (RgbaImage, Option<BoundingBox>) {
        trim(&self.raster)
    }

    /// Stamp round-capped discs along the segment, one per logical pixel of
    /// length, which gives round joins between segments for free.
    fn stroke_segment(&mut self, from: PointerPoint, to: PointerPoint) {
        let radius = (STROKE_WIDTH / 2.0) as i32;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = dx.hypot(dy).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.x + dx * t).round() as i32;
            let y = (from.y + dy * t).round() as i32;
            draw_filled_circle_mut(&mut self.raster, (x, y), radius, INK);
        }
    }
}

impl Default for SignatureCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(raster.clone())
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)?;
    Ok(bytes)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn surface_point() -> impl Strategy<Value = PointerPoint> {
        (
            STROKE_WIDTH..(SURFACE_WIDTH as f64 - STROKE_WIDTH),
            STROKE_WIDTH..(SURFACE_HEIGHT as f64 - STROKE_WIDTH),
        )
            .prop_map(|(x, y)| PointerPoint::new(x, y))
    }

    proptest! {
        /// Property: any sequence of strokes followed by clear() leaves the
        /// canvas empty with a degenerate trimmed image
        #[test]
        fn clear_always_empties(
            strokes in prop::collection::vec((surface_point(), surface_point()), 1..8),
        ) {
            let mut canvas = SignatureCanvas::new();
            for (from, to) in strokes {
                canvas.begin(from);
                canvas.extend(to);
                canvas.end();
            }
            prop_assert!(!canvas.is_empty());

            canvas.clear();
            prop_assert!(canvas.is_empty());
            let (cropped, bbox) = canvas.trimmed_raster();
            prop_assert_eq!(bbox, None);
            prop_assert_eq!(cropped.dimensions(), (1, 1));
        }

        /// Property: a single in-bounds stroke produces ink and a bounding
        /// box fully contained in the surface
        #[test]
        fn single_stroke_bbox_in_bounds(from in surface_point(), to in surface_point()) {
            let mut canvas = SignatureCanvas::new();
            canvas.begin(from);
            canvas.extend(to);
            canvas.end();

            prop_assert!(!canvas.is_empty());
            let (_, bbox) = canvas.trimmed_raster();
            let bbox = bbox.expect("stroke was drawn");
            prop_assert!(bbox.x + bbox.width <= SURFACE_WIDTH);
            prop_assert!(bbox.y + bbox.height <= SURFACE_HEIGHT);
        }
    }
}
