//! The request-scoped data source descriptor.

use crate::dimension::DimensionType;
use wms_common::{CrsDescriptor, Extent, StyleConfiguration};

/// A non-spatial dimension of the target variable, tagged with its
/// semantic role.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDimension {
    pub name: String,
    /// Position within the variable's dimension list.
    pub index: usize,
    pub dimension_type: DimensionType,
}

/// One feature location with a value, as produced by the array store for
/// point/station datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    /// X coordinate in the data source CRS.
    pub x: f64,
    /// Y coordinate in the data source CRS.
    pub y: f64,
    pub value: f64,
    /// Station or feature identifier, when the dataset provides one.
    pub id: Option<String>,
}

impl PointFeature {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self {
            x,
            y,
            value,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Values of one variable bound to the data source, read through the
/// array store. Vector rendering pairs two of these (u and v components).
#[derive(Debug, Clone, Default)]
pub struct DataObject {
    pub variable: String,
    pub units: Option<String>,
    pub nodata: Option<f64>,
    pub points: Vec<PointFeature>,
}

impl DataObject {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            ..Default::default()
        }
    }

    pub fn with_points(mut self, points: Vec<PointFeature>) -> Self {
        self.points = points;
        self
    }
}

/// The central request-scoped descriptor of a dataset variable.
///
/// Exclusively owned by the request that opens it; resolution fills in
/// the CRS, spatial axes and grid geometry, after which renderers read it
/// without further mutation. The dataset itself stays outside this type
/// and is passed to the resolver explicitly, so a read-only dataset can
/// back many concurrent data sources.
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Target variable within the bound dataset.
    pub variable: String,

    /// Resolved CRS; defaults to unresolved until [`crate::CrsResolver`]
    /// has run.
    pub crs: CrsDescriptor,

    /// Index of the X dimension within the variable's dimension list.
    pub dim_x: Option<usize>,
    /// Index of the Y dimension within the variable's dimension list.
    pub dim_y: Option<usize>,
    /// Name of the coordinate variable backing the X axis.
    pub var_x: Option<String>,
    /// Name of the coordinate variable backing the Y axis.
    pub var_y: Option<String>,

    /// Output cell size per axis; negative values express axis direction.
    pub cell_size_x: f64,
    pub cell_size_y: f64,
    /// Bounding box in CRS units, stored in axis order.
    pub bbox: Extent,

    /// Resolved output pixel dimensions.
    pub width: usize,
    pub height: usize,
    /// Decimation stride between source cells and output pixels.
    pub stride: (usize, usize),
    pub requested_width: Option<usize>,
    pub requested_height: Option<usize>,

    /// Ordered non-spatial dimensions with their semantic roles.
    pub dimensions: Vec<TypedDimension>,

    /// Style resolved for this request, when rendering is intended.
    pub style: Option<StyleConfiguration>,

    /// Per-variable values read through the array store.
    pub data_objects: Vec<DataObject>,
}

impl DataSource {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            crs: CrsDescriptor::default(),
            dim_x: None,
            dim_y: None,
            var_x: None,
            var_y: None,
            cell_size_x: 0.0,
            cell_size_y: 0.0,
            bbox: Extent::default(),
            width: 0,
            height: 0,
            stride: (1, 1),
            requested_width: None,
            requested_height: None,
            dimensions: Vec::new(),
            style: None,
            data_objects: Vec::new(),
        }
    }

    /// Whether CRS and grid geometry have both been resolved.
    pub fn is_geometry_resolved(&self) -> bool {
        self.crs.is_resolved() && self.width > 0 && self.height > 0
    }

    /// The typed non-spatial dimension matching `dimension_type`, if any.
    pub fn dimension_by_type(&self, dimension_type: DimensionType) -> Option<&TypedDimension> {
        self.dimensions
            .iter()
            .find(|d| d.dimension_type == dimension_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_data_source_is_unresolved() {
        let source = DataSource::new("t2m");
        assert!(!source.is_geometry_resolved());
        assert!(source.dimension_by_type(DimensionType::Time).is_none());
    }
}
