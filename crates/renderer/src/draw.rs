//! RGBA drawing surface.
//!
//! Thin wrapper over an `image` buffer with the primitives the point
//! renderer needs. Font loading is the caller's concern; text drawing
//! degrades to a no-op when no font has been supplied.

use crate::error::RenderError;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut,
};
use imageproc::point::Point;
use rusttype::{Font, Scale};
use std::path::Path;
use tracing::debug;
use wms_common::Color;

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// An RGBA canvas with drawing primitives.
pub struct DrawImage {
    canvas: RgbaImage,
    font: Option<Font<'static>>,
}

impl DrawImage {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            font: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn set_font(&mut self, font: Font<'static>) {
        self.font = Some(font);
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Load a TrueType font from disk for label and symbol drawing.
    pub fn load_font(&mut self, path: &Path) -> Result<(), RenderError> {
        let data = std::fs::read(path).map_err(|e| RenderError::Font(e.to_string()))?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| RenderError::Font(format!("could not parse {}", path.display())))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.canvas.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.canvas.put_pixel(x as u32, y as u32, to_rgba(color));
        }
    }

    /// Draw a line of the given width by stacking unit-width strokes
    /// offset perpendicular to the segment.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        let strokes = width.round().max(1.0) as i32;
        let length = (x1 - x0).hypot(y1 - y0);
        let (nx, ny) = if length > 0.0 {
            (-(y1 - y0) / length, (x1 - x0) / length)
        } else {
            (0.0, 0.0)
        };
        for stroke in 0..strokes {
            let offset = stroke as f32 - (strokes - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.canvas,
                (x0 + nx * offset, y0 + ny * offset),
                (x1 + nx * offset, y1 + ny * offset),
                to_rgba(color),
            );
        }
    }

    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        draw_hollow_circle_mut(&mut self.canvas, (cx, cy), radius, to_rgba(color));
    }

    pub fn filled_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        draw_filled_circle_mut(&mut self.canvas, (cx, cy), radius, to_rgba(color));
    }

    pub fn polygon(&mut self, points: &[(i32, i32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let mut poly: Vec<Point<i32>> = points.iter().map(|(x, y)| Point::new(*x, *y)).collect();
        // draw_polygon_mut rejects an explicitly closed ring.
        if poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() >= 3 {
            draw_polygon_mut(&mut self.canvas, &poly, to_rgba(color));
        }
    }

    /// Draw text with its top-left corner at `(x, y)`. No-op without a
    /// font.
    pub fn text(&mut self, x: i32, y: i32, size: f32, text: &str, color: Color) {
        match &self.font {
            Some(font) => {
                let font = font.clone();
                draw_text_mut(
                    &mut self.canvas,
                    to_rgba(color),
                    x,
                    y,
                    Scale::uniform(size),
                    &font,
                    text,
                );
            }
            None => debug!(text, "no font loaded, skipping text"),
        }
    }

    /// Number of pixels with non-zero alpha. Used by tests to verify
    /// that something was painted.
    pub fn painted_pixel_count(&self) -> usize {
        self.canvas.pixels().filter(|p| p.0[3] != 0).count()
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}
