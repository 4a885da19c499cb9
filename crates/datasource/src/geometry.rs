//! Grid geometry resolution: spatial axes, stride, pixel dimensions,
//! cell size and bounding box.

use crate::datasource::DataSource;
use crate::error::{Axis, ResolveError};
use dataset_model::{Dataset, Variable};
use tracing::debug;
use wms_common::Extent;

/// Name fragments marking an X-like axis, in match order.
const X_NAME_HINTS: &[&str] = &["lon", "x"];
/// Name fragments marking a Y-like axis, in match order.
const Y_NAME_HINTS: &[&str] = &["lat", "y"];

pub(crate) fn matches_x_name(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    X_NAME_HINTS.iter().any(|hint| lowered.contains(hint))
}

pub(crate) fn matches_y_name(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    Y_NAME_HINTS.iter().any(|hint| lowered.contains(hint))
}

/// Determine the X and Y dimension indices of `variable`.
///
/// Name heuristics first; when no name matches, the last two dimensions
/// are assumed to be X and Y, per common storage order. Datasets may
/// store Y before X, so when the slot detected as X carries a Y-like
/// name the indices are swapped.
pub fn determine_xy_dim_indices(variable: &Variable) -> Option<(usize, usize)> {
    let dims = &variable.dimensions;
    if dims.len() < 2 {
        return None;
    }

    let mut x = dims.len() - 1;
    let mut y = dims.len() - 2;
    if let Some(found) = dims.iter().position(|d| matches_x_name(d)) {
        x = found;
    }
    if let Some(found) = dims.iter().position(|d| matches_y_name(d)) {
        y = found;
    }
    if x == y {
        x = dims.len() - 1;
        y = dims.len() - 2;
    }

    if matches_y_name(&dims[x]) && !matches_x_name(&dims[x]) {
        std::mem::swap(&mut x, &mut y);
    }
    Some((x, y))
}

/// Locate the coordinate variable backing a dimension: the variable of
/// the same name, any 1-D variable over the dimension, or an auxiliary
/// coordinate spanning it with axis-appropriate naming.
pub fn coordinate_variable_for_dim<'a>(
    dataset: &'a Dataset,
    dim_name: &str,
    axis: Axis,
) -> Option<&'a Variable> {
    if let Some(var) = dataset.variable(dim_name) {
        if var.values.is_some() {
            return Some(var);
        }
    }

    if let Some(var) = dataset
        .variables
        .iter()
        .find(|v| v.values.is_some() && v.dimensions.len() == 1 && v.dimensions[0] == dim_name)
    {
        return Some(var);
    }

    dataset.variables.iter().find(|v| {
        v.values.is_some()
            && v.dimensions.iter().any(|d| d == dim_name)
            && match axis {
                Axis::X => {
                    matches!(
                        v.text_attribute("standard_name"),
                        Some("longitude") | Some("projection_x_coordinate")
                    ) || matches_x_name(&v.name)
                }
                Axis::Y => {
                    matches!(
                        v.text_attribute("standard_name"),
                        Some("latitude") | Some("projection_y_coordinate")
                    ) || matches_y_name(&v.name)
                }
            }
    })
}

fn is_degrees_east(var: &Variable) -> bool {
    var.text_attribute("units") == Some("degrees_east")
        || var.text_attribute("standard_name") == Some("longitude")
}

fn is_degrees_north(var: &Variable) -> bool {
    var.text_attribute("units") == Some("degrees_north")
        || var.text_attribute("standard_name") == Some("latitude")
}

/// Whether the variable's spatial axes are plain latitude/longitude.
pub fn axes_are_geographic(dataset: &Dataset, variable: &Variable) -> bool {
    let Some((x, y)) = determine_xy_dim_indices(variable) else {
        return false;
    };
    let x_name = &variable.dimensions[x];
    let y_name = &variable.dimensions[y];

    let x_geographic = x_name.to_ascii_lowercase().contains("lon")
        || coordinate_variable_for_dim(dataset, x_name, Axis::X)
            .map(is_degrees_east)
            .unwrap_or(false);
    let y_geographic = y_name.to_ascii_lowercase().contains("lat")
        || coordinate_variable_for_dim(dataset, y_name, Axis::Y)
            .map(is_degrees_north)
            .unwrap_or(false);
    x_geographic && y_geographic
}

/// Compute the 2D decimation stride: an explicit compatibility override
/// wins, else the ratio of source grid size to the requested output
/// size, else identity.
pub fn determine_stride(
    native_width: usize,
    native_height: usize,
    requested_width: Option<usize>,
    requested_height: Option<usize>,
    striding_override: Option<usize>,
) -> (usize, usize) {
    if let Some(stride) = striding_override {
        let stride = stride.max(1);
        return (stride, stride);
    }
    match (requested_width, requested_height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            ((native_width / w).max(1), (native_height / h).max(1))
        }
        _ => (1, 1),
    }
}

/// Compute the output pixel dimensions from the native grid size, the
/// stride, and an optional grid-index sub-extent. Single-cell mode
/// always yields 1x1.
pub fn determine_width_height(
    native_width: usize,
    native_height: usize,
    stride: (usize, usize),
    single_cell: bool,
    grid_extent: Option<[usize; 4]>,
) -> (usize, usize) {
    if single_cell {
        return (1, 1);
    }
    let (sx, sy) = stride;
    match grid_extent {
        Some([x0, y0, x1, y1]) => (
            ((x1.saturating_sub(x0)) / sx).max(1),
            ((y1.saturating_sub(y0)) / sy).max(1),
        ),
        None => ((native_width / sx).max(1), (native_height / sy).max(1)),
    }
}

/// Edge coordinates and native cell size of one axis, over an optional
/// inclusive index range.
///
/// The box is normally centered on the cell midpoints
/// (`[first - cell/2, last + cell/2]`). An X axis literally named "col"
/// is a column index rather than a true coordinate axis and is already
/// edge-aligned: `[first, last + cell]`.
fn axis_edges(
    var: &Variable,
    range: Option<(usize, usize)>,
    edge_aligned: bool,
) -> Result<(f64, f64), ResolveError> {
    let insufficient = || ResolveError::InsufficientCoordinateSamples {
        variable: var.name.clone(),
    };
    let values = var.values.as_deref().ok_or_else(insufficient)?;
    if values.len() < 2 {
        return Err(insufficient());
    }

    let cell = values[1] - values[0];
    let (first_idx, last_idx) = range.unwrap_or((0, values.len() - 1));
    let first_idx = first_idx.min(values.len() - 1);
    let last_idx = last_idx.min(values.len() - 1);
    let first = values[first_idx];
    let last = values[last_idx.max(first_idx)];

    if edge_aligned {
        Ok((first, last + cell))
    } else {
        Ok((first - cell / 2.0, last + cell / 2.0))
    }
}

/// Derive the bounding box and signed output cell size from the X/Y
/// coordinate variables, honoring an optional grid-index sub-extent.
/// Requires `source.width`/`source.height` to be resolved already.
pub fn calculate_cell_size_and_bbox(
    x_var: &Variable,
    y_var: &Variable,
    grid_extent: Option<[usize; 4]>,
    source: &mut DataSource,
) -> Result<(), ResolveError> {
    let x_range = grid_extent.map(|[x0, _, x1, _]| (x0, x1.saturating_sub(1).max(x0)));
    let y_range = grid_extent.map(|[_, y0, _, y1]| (y0, y1.saturating_sub(1).max(y0)));

    let (left, right) = axis_edges(x_var, x_range, x_var.name == "col")?;
    let (bottom, top) = axis_edges(y_var, y_range, false)?;

    source.bbox = Extent::new(left, bottom, right, top);
    source.cell_size_x = source.bbox.width() / source.width.max(1) as f64;
    source.cell_size_y = source.bbox.height() / source.height.max(1) as f64;
    debug!(
        bbox = ?source.bbox,
        cell_x = source.cell_size_x,
        cell_y = source.cell_size_y,
        "grid geometry resolved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_model::{Attribute, Dimension, Variable};

    #[test]
    fn test_xy_indices_by_name() {
        let var = Variable::new("ta", &["time", "level", "lat", "lon"]);
        assert_eq!(determine_xy_dim_indices(&var), Some((3, 2)));
    }

    #[test]
    fn test_xy_indices_swapped_storage() {
        // Y stored after X; the conventional X slot holds a Y-like name.
        let var = Variable::new("ta", &["lon", "lat"]);
        assert_eq!(determine_xy_dim_indices(&var), Some((0, 1)));
    }

    #[test]
    fn test_xy_indices_default_last_two() {
        let var = Variable::new("field", &["time", "row", "col"]);
        // Neither "row" nor "col" carries an axis hint.
        assert_eq!(determine_xy_dim_indices(&var), Some((2, 1)));

        let too_few = Variable::new("scalar", &["time"]);
        assert_eq!(determine_xy_dim_indices(&too_few), None);
    }

    #[test]
    fn test_stride_from_requested_size() {
        assert_eq!(determine_stride(1000, 500, Some(250), Some(250), None), (4, 2));
        assert_eq!(determine_stride(100, 100, None, None, None), (1, 1));
        // Requested larger than native clamps to identity.
        assert_eq!(determine_stride(100, 100, Some(300), Some(300), None), (1, 1));
        // Explicit override wins.
        assert_eq!(determine_stride(100, 100, Some(50), Some(50), Some(5)), (5, 5));
    }

    #[test]
    fn test_width_height_modes() {
        assert_eq!(determine_width_height(100, 80, (1, 1), false, None), (100, 80));
        assert_eq!(determine_width_height(100, 80, (2, 2), false, None), (50, 40));
        assert_eq!(determine_width_height(100, 80, (1, 1), true, None), (1, 1));
        assert_eq!(
            determine_width_height(100, 80, (1, 1), false, Some([10, 10, 30, 20])),
            (20, 10)
        );
    }

    fn axis_var(name: &str, values: Vec<f64>) -> Variable {
        Variable::new(name, &[name]).with_values(values)
    }

    #[test]
    fn test_bbox_half_cell_centering() {
        let lon = axis_var("lon", vec![0.0, 1.0, 2.0, 3.0]);
        let lat = axis_var("lat", vec![0.0, 1.0, 2.0, 3.0]);
        let mut source = DataSource::new("pr");
        source.width = 4;
        source.height = 4;

        calculate_cell_size_and_bbox(&lon, &lat, None, &mut source).unwrap();
        assert_eq!(source.bbox, Extent::new(-0.5, -0.5, 3.5, 3.5));
        assert_eq!(source.cell_size_x, 1.0);
    }

    #[test]
    fn test_bbox_col_axis_edge_aligned() {
        let col = axis_var("col", vec![0.0, 1.0, 2.0, 3.0]);
        let row = axis_var("row", vec![0.0, 1.0, 2.0, 3.0]);
        let mut source = DataSource::new("counts");
        source.width = 4;
        source.height = 4;

        calculate_cell_size_and_bbox(&col, &row, None, &mut source).unwrap();
        assert_eq!(source.bbox.left, 0.0);
        assert_eq!(source.bbox.right, 4.0);
        // The Y axis keeps half-cell centering.
        assert_eq!(source.bbox.bottom, -0.5);
        assert_eq!(source.bbox.top, 3.5);
    }

    #[test]
    fn test_bbox_descending_latitude() {
        let lon = axis_var("lon", vec![0.0, 1.0]);
        let lat = axis_var("lat", vec![50.0, 49.0, 48.0]);
        let mut source = DataSource::new("pr");
        source.width = 2;
        source.height = 3;

        calculate_cell_size_and_bbox(&lon, &lat, None, &mut source).unwrap();
        assert_eq!(source.bbox.bottom, 50.5);
        assert_eq!(source.bbox.top, 47.5);
        assert!(source.cell_size_y < 0.0);
    }

    #[test]
    fn test_single_sample_axis_fails() {
        let lon = axis_var("lon", vec![0.0]);
        let lat = axis_var("lat", vec![0.0, 1.0]);
        let mut source = DataSource::new("pr");
        source.width = 1;
        source.height = 2;

        assert!(matches!(
            calculate_cell_size_and_bbox(&lon, &lat, None, &mut source),
            Err(ResolveError::InsufficientCoordinateSamples { .. })
        ));
    }

    #[test]
    fn test_geographic_axis_detection() {
        let dataset = dataset_model::testdata::latlon_grid(4, 4);
        let pr = dataset.variable("pr").unwrap();
        assert!(axes_are_geographic(&dataset, pr));

        let bare = dataset_model::testdata::bare_projected_grid(4, 4);
        let field = bare.variable("field").unwrap();
        assert!(!axes_are_geographic(&bare, field));
    }

    #[test]
    fn test_auxiliary_coordinate_lookup() {
        let dataset = Dataset::new()
            .with_dimension(Dimension::new("obs", 3))
            .with_variable(
                Variable::new("station_longitude", &["obs"])
                    .with_attribute(Attribute::text("standard_name", "longitude"))
                    .with_values(vec![4.9, 5.2, 6.6]),
            );
        let found = coordinate_variable_for_dim(&dataset, "obs", Axis::X).unwrap();
        assert_eq!(found.name, "station_longitude");
        assert!(coordinate_variable_for_dim(&dataset, "obs", Axis::Y).is_none());
    }
}
