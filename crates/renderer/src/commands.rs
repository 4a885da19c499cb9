//! Draw commands.
//!
//! Planning functions emit these instead of painting directly, keeping
//! the per-style logic pure and testable; [`execute`] replays them onto
//! a canvas.

use crate::draw::DrawImage;
use wms_common::Color;

/// One painting operation in output pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Dot {
        x: i32,
        y: i32,
        color: Color,
    },
    Disc {
        x: i32,
        y: i32,
        radius: i32,
        fill: Color,
        outline: Color,
    },
    Circle {
        x: i32,
        y: i32,
        radius: i32,
        color: Color,
    },
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        color: Color,
    },
    Polygon {
        points: Vec<(i32, i32)>,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        size: f32,
        text: String,
        color: Color,
    },
    /// A glyph keyed from the symbol-interval table, drawn centered.
    Symbol {
        x: i32,
        y: i32,
        size: f32,
        symbol: String,
        color: Color,
    },
}

impl DrawCommand {
    /// Whether this command marks a feature location (as opposed to a
    /// label or glyph detail). Used to count rendered points.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            DrawCommand::Dot { .. } | DrawCommand::Disc { .. } | DrawCommand::Symbol { .. }
        )
    }
}

/// Replay commands onto the canvas.
pub fn execute(commands: &[DrawCommand], image: &mut DrawImage) {
    for command in commands {
        match command {
            DrawCommand::Dot { x, y, color } => {
                image.filled_circle(*x, *y, 1, *color);
            }
            DrawCommand::Disc {
                x,
                y,
                radius,
                fill,
                outline,
            } => {
                image.filled_circle(*x, *y, *radius, *fill);
                image.circle(*x, *y, *radius, *outline);
            }
            DrawCommand::Circle {
                x,
                y,
                radius,
                color,
            } => {
                image.circle(*x, *y, *radius, *color);
            }
            DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            } => {
                image.line(*x0, *y0, *x1, *y1, *width, *color);
            }
            DrawCommand::Polygon { points, color } => {
                image.polygon(points, *color);
            }
            DrawCommand::Text {
                x,
                y,
                size,
                text,
                color,
            } => {
                image.text(*x, *y, *size, text, *color);
            }
            DrawCommand::Symbol {
                x,
                y,
                size,
                symbol,
                color,
            } => {
                if image.has_font() {
                    let half = (*size / 2.0) as i32;
                    image.text(*x - half, *y - half, *size, symbol, *color);
                } else {
                    // Placeholder marker when no symbol font is loaded.
                    image.circle(*x, *y, 3, *color);
                }
            }
        }
    }
}
