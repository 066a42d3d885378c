//! Mapping between client (viewport) coordinates and the logical pixel grid
//!
//! The drawing surface is rendered responsively, so its on-screen rectangle
//! rarely matches its logical pixel size. Every pointer event is mapped
//! through `logical = (client - origin) * (logical / rendered)`, per axis,
//! before any capture logic sees it.

/// A single pointer position.
///
/// Mouse and touch events are reduced to this shape at the boundary; nothing
/// downstream knows which device produced the point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPoint {
    pub x: f64,
    pub y: f64,
}

impl PointerPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The rendered rectangle of the surface plus its logical pixel size.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceGeometry {
    /// Top-left corner of the rendered surface, in client coordinates.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Rendered (on-screen) size.
    pub rendered_width: f64,
    pub rendered_height: f64,
    /// Logical pixel grid the strokes are rasterized onto.
    pub logical_width: u32,
    pub logical_height: u32,
}

impl SurfaceGeometry {
    /// Map a client-coordinate pointer position onto the logical pixel grid.
    pub fn map_to_canvas(&self, client: PointerPoint) -> PointerPoint {
        let scale_x = self.logical_width as f64 / self.rendered_width;
        let scale_y = self.logical_height as f64 / self.rendered_height;

        PointerPoint {
            x: (client.x - self.origin_x) * scale_x,
            y: (client.y - self.origin_y) * scale_y,
        }
    }

    /// Inverse of `map_to_canvas`: logical pixels back to client coordinates.
    pub fn map_to_client(&self, canvas: PointerPoint) -> PointerPoint {
        let scale_x = self.rendered_width / self.logical_width as f64;
        let scale_y = self.rendered_height / self.logical_height as f64;

        PointerPoint {
            x: canvas.x * scale_x + self.origin_x,
            y: canvas.y * scale_y + self.origin_y,
        }
    }
}
