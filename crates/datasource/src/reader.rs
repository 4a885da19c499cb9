//! Orchestration of the resolution pipeline.
//!
//! [`DataSourceResolver::open`] runs CRS resolution, spatial axis
//! detection, dimension classification and grid geometry in sequence;
//! the first failing phase short-circuits the rest and propagates its
//! own error class.

use crate::crs::CrsResolver;
use crate::datasource::{DataSource, TypedDimension};
use crate::dimension;
use crate::error::{Axis, ResolveError};
use crate::geometry;
use dataset_model::Dataset;
use tracing::debug;
use wms_common::LayerConfig;

/// How much of the pipeline a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Resolve everything: CRS, dimensions and grid geometry.
    #[default]
    All,
    /// Like [`OpenMode::All`], for a grid-index sub-extent of the native
    /// grid.
    ExtentOnly,
    /// Dimension classification only, for metadata queries such as
    /// capabilities listings.
    DimensionsOnly,
}

/// Parameters of one open request.
#[derive(Debug, Clone, Default)]
pub struct OpenRequest {
    pub mode: OpenMode,
    /// Requested output pixel dimensions; when present the stride is
    /// fitted to them, otherwise the native resolution is kept.
    pub requested_width: Option<usize>,
    pub requested_height: Option<usize>,
    /// Sub-extent in grid-index space: `[xmin, ymin, xmax, ymax]`,
    /// exclusive maxima.
    pub grid_extent: Option<[usize; 4]>,
    /// Grid cell for a point-probe query; forces a 1x1 result.
    pub single_cell: Option<(usize, usize)>,
}

impl OpenRequest {
    /// A full open at native resolution.
    pub fn full() -> Self {
        Self::default()
    }

    /// A full open fitted to the requested output size.
    pub fn fitted(width: usize, height: usize) -> Self {
        Self {
            requested_width: Some(width),
            requested_height: Some(height),
            ..Self::default()
        }
    }

    /// A single-cell probe at grid cell `(x, y)`.
    pub fn probe(x: usize, y: usize) -> Self {
        Self {
            single_cell: Some((x, y)),
            ..Self::default()
        }
    }
}

/// Resolves data sources against datasets; the single entry point used
/// by the rest of the server.
#[derive(Debug, Default)]
pub struct DataSourceResolver {
    crs: CrsResolver,
}

impl DataSourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully populate `source`'s spatial and dimensional description.
    pub fn open(
        &mut self,
        dataset: &Dataset,
        layer: Option<&LayerConfig>,
        source: &mut DataSource,
        request: &OpenRequest,
    ) -> Result<(), ResolveError> {
        let variable = dataset
            .variable(&source.variable)
            .ok_or_else(|| ResolveError::VariableNotFound(source.variable.clone()))?;

        if request.mode == OpenMode::DimensionsOnly {
            return self.parse_dimensions(dataset, source);
        }

        self.crs.resolve(dataset, layer, source)?;

        let (x_index, y_index) =
            geometry::determine_xy_dim_indices(variable).ok_or_else(|| {
                ResolveError::AxisNotFound {
                    axis: Axis::X,
                    variable: source.variable.clone(),
                }
            })?;
        source.dim_x = Some(x_index);
        source.dim_y = Some(y_index);

        source.dimensions = classify_remaining(dataset, variable, x_index, y_index);

        let x_dim_name = &variable.dimensions[x_index];
        let y_dim_name = &variable.dimensions[y_index];
        let x_var = geometry::coordinate_variable_for_dim(dataset, x_dim_name, Axis::X)
            .ok_or_else(|| ResolveError::AxisNotFound {
                axis: Axis::X,
                variable: source.variable.clone(),
            })?;
        let y_var = geometry::coordinate_variable_for_dim(dataset, y_dim_name, Axis::Y)
            .ok_or_else(|| ResolveError::AxisNotFound {
                axis: Axis::Y,
                variable: source.variable.clone(),
            })?;
        source.var_x = Some(x_var.name.clone());
        source.var_y = Some(y_var.name.clone());

        let native_width = dataset.dimension(x_dim_name).map(|d| d.len).unwrap_or(0);
        let native_height = dataset.dimension(y_dim_name).map(|d| d.len).unwrap_or(0);

        let striding_override = layer
            .and_then(|l| l.render_settings.as_ref())
            .and_then(|r| r.striding);
        source.stride = geometry::determine_stride(
            native_width,
            native_height,
            request.requested_width,
            request.requested_height,
            striding_override,
        );
        source.requested_width = request.requested_width;
        source.requested_height = request.requested_height;

        // A single-cell probe is a 1x1 sub-extent around the probed cell.
        let grid_extent = match request.single_cell {
            Some((x, y)) => {
                let x = x.min(native_width.saturating_sub(1));
                let y = y.min(native_height.saturating_sub(1));
                Some([x, y, x + 1, y + 1])
            }
            None => request.grid_extent.map(|[x0, y0, x1, y1]| {
                [
                    x0.min(native_width),
                    y0.min(native_height),
                    x1.min(native_width),
                    y1.min(native_height),
                ]
            }),
        };

        let (width, height) = geometry::determine_width_height(
            native_width,
            native_height,
            source.stride,
            request.single_cell.is_some(),
            grid_extent,
        );
        source.width = width;
        source.height = height;

        geometry::calculate_cell_size_and_bbox(x_var, y_var, grid_extent, source)?;

        debug!(
            variable = %source.variable,
            width = source.width,
            height = source.height,
            crs = %source.crs.code,
            "data source opened"
        );
        Ok(())
    }

    /// Open a grid-index sub-extent of the native grid.
    pub fn open_extent(
        &mut self,
        dataset: &Dataset,
        layer: Option<&LayerConfig>,
        source: &mut DataSource,
        grid_extent: [usize; 4],
    ) -> Result<(), ResolveError> {
        let request = OpenRequest {
            mode: OpenMode::ExtentOnly,
            grid_extent: Some(grid_extent),
            ..Default::default()
        };
        self.open(dataset, layer, source, &request)
    }

    /// Reduced variant: classify dimensions only, skipping CRS and
    /// geometry.
    pub fn parse_dimensions(
        &self,
        dataset: &Dataset,
        source: &mut DataSource,
    ) -> Result<(), ResolveError> {
        let variable = dataset
            .variable(&source.variable)
            .ok_or_else(|| ResolveError::VariableNotFound(source.variable.clone()))?;

        let (x_index, y_index) = match geometry::determine_xy_dim_indices(variable) {
            Some((x, y)) => {
                source.dim_x = Some(x);
                source.dim_y = Some(y);
                (x, y)
            }
            // Spatial axes are not required for a metadata-only query;
            // classify every dimension.
            None => (usize::MAX, usize::MAX),
        };
        source.dimensions = classify_remaining(dataset, variable, x_index, y_index);
        Ok(())
    }

    /// Resolve only the CRS of `source`.
    pub fn resolve_crs(
        &mut self,
        dataset: &Dataset,
        layer: Option<&LayerConfig>,
        source: &mut DataSource,
    ) -> Result<(), ResolveError> {
        self.crs.resolve(dataset, layer, source)
    }
}

/// Classify every non-spatial dimension of `variable`, preserving order.
fn classify_remaining(
    dataset: &Dataset,
    variable: &dataset_model::Variable,
    x_index: usize,
    y_index: usize,
) -> Vec<TypedDimension> {
    variable
        .dimensions
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != x_index && *i != y_index)
        .map(|(i, name)| TypedDimension {
            name: name.clone(),
            index: i,
            dimension_type: dimension::dimension_type(dataset, name),
        })
        .collect()
}

/// Synthesize a placeholder coordinate variable for a dimension the
/// dataset omits, as some conventions require one to exist.
pub fn add_blank_dim_variable(dataset: &mut Dataset, dim_name: &str) -> Result<(), ResolveError> {
    dataset.add_index_coordinate(dim_name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_model::testdata::forecast_grid;
    use crate::dimension::DimensionType;

    #[test]
    fn test_parse_dimensions_skips_spatial_axes() {
        let dataset = forecast_grid(8, 6);
        let mut source = DataSource::new("ta");
        DataSourceResolver::new()
            .parse_dimensions(&dataset, &mut source)
            .unwrap();

        let types: Vec<DimensionType> = source
            .dimensions
            .iter()
            .map(|d| d.dimension_type)
            .collect();
        assert_eq!(types, vec![DimensionType::Time, DimensionType::Elevation]);
        assert_eq!(source.dimensions[0].name, "time");
        assert_eq!(source.dimensions[1].name, "level");
    }

    #[test]
    fn test_open_missing_variable() {
        let dataset = forecast_grid(8, 6);
        let mut source = DataSource::new("nonexistent");
        let result = DataSourceResolver::new().open(
            &dataset,
            None,
            &mut source,
            &OpenRequest::full(),
        );
        assert!(matches!(result, Err(ResolveError::VariableNotFound(_))));
    }
}
