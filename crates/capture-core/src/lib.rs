//! Signature capture surface
//!
//! Turns freehand pointer input into a normalized raster image:
//! - `geometry` maps client coordinates onto the surface's logical pixel grid
//! - `canvas` accumulates strokes into an RGBA raster
//! - `trim` crops a raster to its minimal bounding box of drawn ink

pub mod canvas;
pub mod error;
pub mod geometry;
pub mod trim;

pub use canvas::{SignatureCanvas, STROKE_WIDTH, SURFACE_HEIGHT, SURFACE_WIDTH};
pub use error::CaptureError;
pub use geometry::{PointerPoint, SurfaceGeometry};
pub use trim::{trim, BoundingBox};
