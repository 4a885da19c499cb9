//! Coordinate warping interface.
//!
//! The full reprojection kernels live outside this workspace; the point
//! renderer only needs a mapping from data-CRS coordinates to output
//! pixel positions, expressed by the [`Warper`] trait. [`BboxWarper`]
//! is the linear implementation used when data CRS and output CRS
//! coincide.

use wms_common::Extent;

/// Maps data-CRS coordinates to output pixel space.
pub trait Warper {
    /// Project a data-CRS coordinate to (fractional) pixel coordinates.
    /// Returns `None` when the point has no image in the output space.
    fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)>;

    /// Approximate output pixels per data-CRS unit along X, for
    /// zoom-dependent styling.
    fn pixel_density(&self) -> f64;
}

/// Linear bounding-box to canvas mapping.
///
/// The extent is normalized on construction; the west/north corner maps
/// to the pixel origin, matching map-view conventions.
#[derive(Debug, Clone)]
pub struct BboxWarper {
    bbox: Extent,
    width: u32,
    height: u32,
}

impl BboxWarper {
    pub fn new(bbox: Extent, width: u32, height: u32) -> Self {
        Self {
            bbox: bbox.normalized(),
            width,
            height,
        }
    }
}

impl Warper for BboxWarper {
    fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let dx = self.bbox.width();
        let dy = self.bbox.height();
        if dx == 0.0 || dy == 0.0 {
            return None;
        }
        let px = (x - self.bbox.left) / dx * self.width as f64;
        // Screen Y runs downward from the top edge.
        let py = (self.bbox.top - y) / dy * self.height as f64;
        Some((px, py))
    }

    fn pixel_density(&self) -> f64 {
        let dx = self.bbox.width().abs();
        if dx == 0.0 {
            return 0.0;
        }
        self.width as f64 / dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_mapping() {
        let warper = BboxWarper::new(Extent::new(0.0, 0.0, 10.0, 10.0), 100, 100);
        let (px, py) = warper.geo_to_pixel(5.0, 5.0).unwrap();
        assert_eq!((px, py), (50.0, 50.0));

        // Top-left corner of the extent maps to pixel origin.
        let (px, py) = warper.geo_to_pixel(0.0, 10.0).unwrap();
        assert_eq!((px, py), (0.0, 0.0));
    }

    #[test]
    fn test_pixel_density() {
        let warper = BboxWarper::new(Extent::new(0.0, 0.0, 20.0, 10.0), 100, 50);
        assert_eq!(warper.pixel_density(), 5.0);
    }

    #[test]
    fn test_degenerate_extent() {
        let warper = BboxWarper::new(Extent::new(0.0, 0.0, 0.0, 10.0), 100, 100);
        assert!(warper.geo_to_pixel(1.0, 1.0).is_none());
    }
}
