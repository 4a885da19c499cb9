//! Point and vector feature rendering.
//!
//! Consumes a resolved data source plus a style configuration and paints
//! station markers, labels, wind arrows and barbs onto an RGBA canvas.
//! Rendering is planned as a closed set of draw commands produced by
//! pure functions per style variant, then executed against the canvas.

pub mod barbs;
pub mod commands;
pub mod draw;
pub mod error;
pub mod legend;
pub mod point;
pub mod warper;

pub use commands::DrawCommand;
pub use draw::DrawImage;
pub use error::RenderError;
pub use legend::{pixel_color_for_value, pixel_index_for_value, LegendTable};
pub use point::{DrawMode, PointRenderer, PointSettings};
pub use warper::{BboxWarper, Warper};
