//! In-memory model of a self-describing multidimensional dataset.
//!
//! This is the interface the resolution core consumes from the
//! array-store collaborator: ordered dimension and variable listings with
//! name/attribute lookup, and coordinate-value reads over an index range.
//! File IO and raw data access live outside this workspace; tests build
//! datasets directly through the [`testdata`] builders.

pub mod error;
pub mod model;
pub mod testdata;

pub use error::ModelError;
pub use model::{AttrValue, Attribute, Dataset, Dimension, Variable};
