//! Geometry and metadata resolution for multidimensional datasets.
//!
//! Turns the loosely standardized metadata of a self-describing dataset
//! into a single renderer-ready description: which CRS the data lives in,
//! which axes are spatial, what the cell size and bounding box are, and
//! what role every remaining dimension plays. Resolution is a straight
//! per-request pipeline; a [`DataSource`] is owned by the request that
//! opened it and discarded afterwards.

pub mod crs;
pub mod datasource;
pub mod dimension;
pub mod error;
pub mod geometry;
pub mod reader;

pub use crs::CrsResolver;
pub use datasource::{DataObject, DataSource, PointFeature, TypedDimension};
pub use dimension::DimensionType;
pub use error::{Axis, ResolveError};
pub use reader::{DataSourceResolver, OpenMode, OpenRequest};
