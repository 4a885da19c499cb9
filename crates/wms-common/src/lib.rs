//! Common types shared across the gridmap-wms crates.

pub mod crs;
pub mod extent;
pub mod layer;
pub mod style;

pub use crs::{CrsCode, CrsDescriptor};
pub use extent::Extent;
pub use layer::{LayerConfig, ProjectionConfig, RenderSettings};
pub use style::{
    Color, RenderMethod, StyleConfiguration, StyleDefinition, StyleError, StyleResolution,
    SymbolInterval,
};
